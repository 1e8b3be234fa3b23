// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_ENV: &str = "POET_LOG";

/// `POET_LOG` wins over the configured level so a single run can be turned
/// up without editing the config file.
pub fn filter_directives(configured: &str) -> String {
    match env::var(LOG_ENV) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => configured.to_owned(),
    }
}

pub fn build_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives).with_context(|| {
        format!("invalid log filter {directives:?}; set [log].level or {LOG_ENV} to something like \"info\" or \"poet_api=debug\"")
    })
}

/// Sends `tracing` output to an append-only file. The terminal is owned by
/// the TUI, so nothing is written to stderr.
pub fn init(path: &Path, configured_level: &str) -> Result<()> {
    let filter = build_filter(&filter_directives(configured_level))?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| {
            format!(
                "open log file {} -- set [log].file to a writable path",
                path.display()
            )
        })?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_file = %path.display(),
        "poet starting"
    );
    Ok(())
}

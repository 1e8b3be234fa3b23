// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use poet_app::{AppCommand, AppEvent, AppState, results_summary};
use runtime::ApiRuntime;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `poet --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let client = poet_api::Client::new(config.api_base_url(), config.api_timeout()?)
        .with_context(|| {
            format!(
                "invalid [api] config in {}; fix base_url/timeout values",
                options.config_path.display()
            )
        })?;
    if options.check_only {
        return Ok(());
    }

    logging::init(&config.log_file()?, config.log_level())?;

    if let Some(term) = options.search_term {
        print!("{}", run_headless_search(&client, &term));
        return Ok(());
    }

    let mut state = AppState::default();
    let mut runtime = ApiRuntime::new(client);
    poet_tui::run_app(&mut state, &mut runtime)
}

/// Drives one search through the same state transitions the TUI uses and
/// returns what the user would have seen.
fn run_headless_search(client: &poet_api::Client, term: &str) -> String {
    let mut state = AppState::default();
    state.dispatch(AppCommand::SetSearchTerm(term.to_owned()));

    let ticket = state
        .dispatch(AppCommand::BeginSearch)
        .into_iter()
        .find_map(|event| match event {
            AppEvent::SearchStarted(ticket) => Some(ticket),
            _ => None,
        });
    if let Some(ticket) = ticket {
        let command = match client.search(&ticket.term) {
            Ok(results) => AppCommand::CompleteSearch {
                generation: ticket.generation,
                results,
            },
            Err(error) => AppCommand::AbortSearch {
                generation: ticket.generation,
                reason: format!("{error:#}"),
            },
        };
        state.dispatch(command);
    }

    search_report(&state)
}

fn search_report(state: &AppState) -> String {
    let mut out = String::new();
    if let Some(error) = &state.error {
        out.push_str(&format!("error: {error}\n"));
    }
    if let Some(status) = &state.status_line {
        out.push_str(&format!("notice: {status}\n"));
    }
    if let Some(results) = &state.search_results
        && !results.is_empty()
    {
        out.push_str(&results_summary(results.len()));
        out.push('\n');
        for poem in results {
            out.push('\n');
            out.push_str(&poet_tui::card_text(poem));
            out.push('\n');
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    search_term: Option<String>,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        check_only: false,
        search_term: None,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--search" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--search requires an author or title"))?;
                options.search_term = Some(value.as_ref().to_owned());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("poet: search PoetryDB by author or title");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --check                  Validate config and API settings, then exit");
    println!("  --search <term>          Run one search and print the results");
    println!("  --help                   Show this help");
}

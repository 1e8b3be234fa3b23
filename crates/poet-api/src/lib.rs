// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use poet_app::{FetchOutcome, Poem, SearchResults, SearchScope};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde_json::Value;
use std::thread;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://poetrydb.org";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const NOT_FOUND_STATUS: i64 = 404;
const MAX_ERROR_BODY_CHARS: usize = 120;

#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    base: Url,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }

        let base = Url::parse(&base_url)
            .with_context(|| format!("api.base_url {base_url:?} is not a valid URL"))?;
        if !matches!(base.scheme(), "http" | "https") {
            bail!(
                "api.base_url {base_url:?} must use http or https, got {:?}",
                base.scheme()
            );
        }
        if base.cannot_be_a_base() {
            bail!("api.base_url {base_url:?} cannot carry a request path");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .user_agent(concat!("poet/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            base,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds `{base}/{scope}/{term}` with the term encoded as a single path
    /// segment.
    pub fn search_url(&self, scope: SearchScope, term: &str) -> Result<String> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("api.base_url {:?} cannot carry a path", self.base_url))?
            .pop_if_empty()
            .push(scope.path_segment())
            .push(term);
        Ok(url.into())
    }

    /// Never fails: transport, status, and decode problems come back as
    /// `FetchOutcome::Failed`.
    pub fn fetch_poems(&self, url: &str) -> FetchOutcome {
        tracing::debug!(url, "fetching poems");

        let response = match self.http.get(url).send() {
            Ok(response) => response,
            Err(error) => {
                let reason = transport_error(&error, self.timeout);
                tracing::warn!(url, %reason, "poem request failed");
                return FetchOutcome::failed(url, reason);
            }
        };

        let status = response.status();
        let body = match response.text() {
            Ok(body) => body,
            Err(error) => {
                let reason = format!("read response body: {error}");
                tracing::warn!(url, %reason, "poem request failed");
                return FetchOutcome::failed(url, reason);
            }
        };

        if !status.is_success() {
            let reason = clean_error_response(status, &body);
            tracing::warn!(url, %reason, "poem request rejected");
            return FetchOutcome::failed(url, reason);
        }

        match decode_poems(&body) {
            Ok(Some(poems)) => {
                tracing::debug!(url, count = poems.len(), "poem request succeeded");
                FetchOutcome::Matches(poems)
            }
            Ok(None) => {
                tracing::debug!(url, "poem request found no matches");
                FetchOutcome::NoMatches
            }
            Err(error) => {
                let reason = format!("{error:#}");
                tracing::warn!(url, %reason, "poem response rejected");
                FetchOutcome::failed(url, reason)
            }
        }
    }

    /// Fans out the author and title lookups and waits for both. Only a
    /// worker panic makes this fail; request problems are folded into the
    /// per-scope outcomes.
    pub fn search(&self, term: &str) -> Result<SearchResults> {
        let term = term.trim();
        if term.is_empty() {
            bail!("search term must not be empty");
        }

        let author_url = self.search_url(SearchScope::Author, term)?;
        let title_url = self.search_url(SearchScope::Title, term)?;
        tracing::debug!(%author_url, %title_url, "search fan-out");

        thread::scope(|scope| {
            let author = scope.spawn(|| self.fetch_poems(&author_url));
            let title = scope.spawn(|| self.fetch_poems(&title_url));
            join_outcomes(author.join(), title.join())
        })
    }
}

/// Combines both joined halves of a fan-out. A panicked worker is the only
/// way a search fails as a whole.
pub fn join_outcomes(
    author: thread::Result<FetchOutcome>,
    title: thread::Result<FetchOutcome>,
) -> Result<SearchResults> {
    match (author, title) {
        (Ok(author), Ok(title)) => Ok(SearchResults { author, title }),
        (Err(_), _) => {
            tracing::error!("author request worker panicked");
            Err(anyhow!("author request worker panicked"))
        }
        (_, Err(_)) => {
            tracing::error!("title request worker panicked");
            Err(anyhow!("title request worker panicked"))
        }
    }
}

/// Decodes a PoetryDB response body. `Ok(None)` covers the service's
/// `{"status":404}` no-match object and any other non-array shape.
pub fn decode_poems(body: &str) -> Result<Option<Vec<Poem>>> {
    let value: Value = serde_json::from_str(body).context("decode response body as JSON")?;
    match value {
        Value::Array(records) => records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                serde_json::from_value::<Poem>(record)
                    .with_context(|| format!("malformed poem record at index {index}"))
            })
            .collect::<Result<Vec<_>>>()
            .map(Some),
        Value::Object(object) => {
            let status = object.get("status").and_then(Value::as_i64);
            if status != Some(NOT_FOUND_STATUS) {
                tracing::debug!(?status, "unexpected object response; treating as no matches");
            }
            Ok(None)
        }
        other => {
            tracing::debug!(kind = json_kind(&other), "unexpected response shape");
            Ok(None)
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn transport_error(error: &reqwest::Error, timeout: Duration) -> String {
    if error.is_timeout() {
        return format!("request timed out after {timeout:?} -- raise [api].timeout or retry");
    }
    if error.is_connect() {
        return format!("cannot reach the poetry service ({error}) -- check your network connection");
    }
    error.to_string()
}

fn clean_error_response(status: StatusCode, body: &str) -> String {
    let reason = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("reason")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.chars().count() > MAX_ERROR_BODY_CHARS {
                let cut: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
                format!("{cut}...")
            } else {
                trimmed.to_owned()
            }
        });

    if reason.is_empty() {
        format!("server returned {status}")
    } else {
        format!("server returned {status}: {reason}")
    }
}

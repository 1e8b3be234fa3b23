// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use poet_app::Poem;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tiny_http::{Header, Response, Server};

pub fn poem(title: &str, author: &str, lines: &[&str]) -> Poem {
    Poem {
        title: title.to_owned(),
        author: author.to_owned(),
        lines: lines.iter().map(|line| (*line).to_owned()).collect(),
        linecount: lines.len().to_string(),
    }
}

pub fn sonnet_18() -> Poem {
    poem(
        "Sonnet 18: Shall I compare thee to a summer's day?",
        "William Shakespeare",
        &[
            "Shall I compare thee to a summer's day?",
            "Thou art more lovely and more temperate:",
            "Rough winds do shake the darling buds of May,",
            "And summer's lease hath all too short a date:",
            "Sometime too hot the eye of heaven shines,",
            "And often is his gold complexion dimm'd;",
            "And every fair from fair sometime declines,",
        ],
    )
}

pub fn the_raven() -> Poem {
    poem(
        "The Raven",
        "Edgar Allan Poe",
        &[
            "Once upon a midnight dreary, while I pondered, weak and weary,",
            "Over many a quaint and curious volume of forgotten lore,",
        ],
    )
}

pub fn fire_and_ice() -> Poem {
    poem(
        "Fire and Ice",
        "Robert Frost",
        &[
            "Some say the world will end in fire,",
            "Some say in ice.",
            "From what I've tasted of desire",
            "I hold with those who favor fire.",
            "But if it had to perish twice,",
            "I think I know enough of hate",
            "To say that for destruction ice",
            "Is also great",
            "And would suffice.",
        ],
    )
}

pub fn poems_json(poems: &[Poem]) -> String {
    serde_json::to_string(poems).unwrap_or_else(|_| "[]".to_owned())
}

pub fn not_found_json() -> String {
    r#"{"status":404,"reason":"Not found"}"#.to_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl MockResponse {
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            delay: None,
        }
    }

    pub fn poems(poems: &[Poem]) -> Self {
        Self::json(poems_json(poems))
    }

    pub fn not_found() -> Self {
        Self::json(not_found_json())
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: None,
        }
    }

    pub fn delayed(self, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..self
        }
    }
}

/// A throwaway PoetryDB stand-in. Serves exactly `expected_requests`
/// requests, each on its own thread so a delayed route never blocks the
/// other half of a fan-out.
pub struct MockPoetryDb {
    base_url: String,
    seen: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl MockPoetryDb {
    pub fn serve<F>(expected_requests: usize, route: F) -> Result<Self>
    where
        F: Fn(&str) -> MockResponse + Send + Sync + 'static,
    {
        let server =
            Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
        let base_url = format!("http://{}", server.server_addr());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let route = Arc::new(route);

        let recorded = Arc::clone(&seen);
        let handle = thread::spawn(move || {
            let mut workers = Vec::new();
            for _ in 0..expected_requests {
                let Ok(request) = server.recv() else {
                    break;
                };
                let url = request.url().to_owned();
                if let Ok(mut seen) = recorded.lock() {
                    seen.push(url.clone());
                }
                let route = Arc::clone(&route);
                workers.push(thread::spawn(move || {
                    let reply = route(&url);
                    if let Some(delay) = reply.delay {
                        thread::sleep(delay);
                    }
                    let mut response =
                        Response::from_string(reply.body).with_status_code(reply.status);
                    if let Ok(header) = Header::from_bytes("Content-Type", "application/json") {
                        response = response.with_header(header);
                    }
                    let _ = request.respond(response);
                }));
            }
            for worker in workers {
                let _ = worker.join();
            }
        });

        Ok(Self {
            base_url,
            seen,
            handle,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Waits for every expected request and returns the request paths in
    /// sorted order.
    pub fn finish(self) -> Result<Vec<String>> {
        self.handle
            .join()
            .map_err(|_| anyhow!("mock server thread panicked"))?;
        let mut seen = self
            .seen
            .lock()
            .map_err(|_| anyhow!("mock server request log poisoned"))?
            .clone();
        seen.sort();
        Ok(seen)
    }
}

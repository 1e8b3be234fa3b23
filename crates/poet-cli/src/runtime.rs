// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use poet_api::Client;
use poet_app::{SearchResults, SearchTicket};
use poet_tui::{InternalEvent, SearchEvent, SearchRuntime};
use std::sync::mpsc::Sender;
use std::thread;

pub struct ApiRuntime {
    client: Client,
}

impl ApiRuntime {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn search_event(ticket: &SearchTicket, outcome: Result<SearchResults>) -> SearchEvent {
    match outcome {
        Ok(results) => SearchEvent::Completed {
            generation: ticket.generation,
            results,
        },
        Err(error) => SearchEvent::Failed {
            generation: ticket.generation,
            error: format!("{error:#}"),
        },
    }
}

impl SearchRuntime for ApiRuntime {
    fn search(&mut self, term: &str) -> Result<SearchResults> {
        self.client.search(term)
    }

    fn spawn_search(&mut self, ticket: &SearchTicket, tx: Sender<InternalEvent>) -> Result<()> {
        let client = self.client.clone();
        let ticket = ticket.clone();
        thread::Builder::new()
            .name(format!("poet-search-{}", ticket.generation))
            .spawn(move || {
                tracing::debug!(generation = ticket.generation, "search worker running");
                let event = search_event(&ticket, client.search(&ticket.term));
                if tx.send(InternalEvent::Search(event)).is_err() {
                    tracing::debug!(
                        generation = ticket.generation,
                        "search finished after the UI exited"
                    );
                }
            })
            .context("spawn search worker thread")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ApiRuntime;
    use anyhow::Result;
    use poet_api::Client;
    use poet_app::{FetchOutcome, SearchTicket};
    use poet_testkit::{MockPoetryDb, MockResponse, the_raven};
    use poet_tui::{InternalEvent, SearchEvent, SearchRuntime};
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn spawn_search_reports_completion_with_generation() -> Result<()> {
        let server = MockPoetryDb::serve(2, |url| {
            if url.starts_with("/title/") {
                MockResponse::poems(&[the_raven()])
            } else {
                MockResponse::not_found()
            }
        })?;
        let mut runtime = ApiRuntime::new(Client::new(server.base_url(), Duration::from_secs(2))?);
        let (tx, rx) = mpsc::channel();

        runtime.spawn_search(
            &SearchTicket {
                generation: 7,
                term: "Raven".to_owned(),
            },
            tx,
        )?;

        let event = rx.recv_timeout(Duration::from_secs(5))?;
        let (generation, results) = match event {
            InternalEvent::Search(SearchEvent::Completed {
                generation,
                results,
            }) => (generation, results),
            other => panic!("expected completed search event, got {other:?}"),
        };
        assert_eq!(generation, 7);
        assert_eq!(results.author, FetchOutcome::NoMatches);
        assert_eq!(results.merged(), vec![the_raven()]);

        server.finish()?;
        Ok(())
    }

    #[test]
    fn spawn_search_reports_search_error_as_failed_event() -> Result<()> {
        let mut runtime = ApiRuntime::new(Client::new(
            "http://127.0.0.1:1",
            Duration::from_millis(200),
        )?);
        let (tx, rx) = mpsc::channel();

        runtime.spawn_search(
            &SearchTicket {
                generation: 3,
                term: "   ".to_owned(),
            },
            tx,
        )?;

        let event = rx.recv_timeout(Duration::from_secs(5))?;
        assert!(matches!(
            event,
            InternalEvent::Search(SearchEvent::Failed { generation: 3, .. })
        ));
        Ok(())
    }
}

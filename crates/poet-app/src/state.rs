// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    EMPTY_TERM_MESSAGE, NETWORK_ERROR_MESSAGE, Poem, SearchResults, SearchScope,
    no_matches_message,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub search_term: String,
    /// Trimmed term of the newest started search. The input may change while
    /// it runs.
    pub searched_term: String,
    pub search_results: Option<Vec<Poem>>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub selected_poem: Option<Poem>,
    pub status_line: Option<String>,
    pub generation: u64,
}

/// Handed out when a search starts; the completion must carry the same
/// generation back or it is dropped as stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub generation: u64,
    pub term: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    SetSearchTerm(String),
    InsertChar(char),
    DeleteChar,
    ClearTerm,
    BeginSearch,
    CompleteSearch {
        generation: u64,
        results: SearchResults,
    },
    AbortSearch {
        generation: u64,
        reason: String,
    },
    SelectPoem(Poem),
    ClosePoem,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    TermChanged,
    SearchRejected,
    SearchStarted(SearchTicket),
    SearchDiscarded { generation: u64 },
    ResultsChanged(Option<usize>),
    LoadingChanged(bool),
    ErrorChanged(Option<String>),
    RequestFailed {
        scope: SearchScope,
        url: String,
        reason: String,
    },
    PoemSelected,
    PoemClosed,
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn trimmed_term(&self) -> &str {
        self.search_term.trim()
    }

    /// Mirrors the disabled state of the search button.
    pub fn can_submit(&self) -> bool {
        !self.trimmed_term().is_empty() && !self.is_loading
    }

    pub fn result_count(&self) -> usize {
        self.search_results.as_ref().map_or(0, Vec::len)
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::SetSearchTerm(term) => {
                self.search_term = term;
                vec![AppEvent::TermChanged]
            }
            AppCommand::InsertChar(ch) => {
                self.search_term.push(ch);
                vec![AppEvent::TermChanged]
            }
            AppCommand::DeleteChar => {
                self.search_term.pop();
                vec![AppEvent::TermChanged]
            }
            AppCommand::ClearTerm => {
                self.search_term.clear();
                vec![AppEvent::TermChanged]
            }
            AppCommand::BeginSearch => self.begin_search(),
            AppCommand::CompleteSearch {
                generation,
                results,
            } => self.complete_search(generation, results),
            AppCommand::AbortSearch { generation, reason } => {
                self.abort_search(generation, &reason)
            }
            AppCommand::SelectPoem(poem) => {
                self.selected_poem = Some(poem);
                vec![AppEvent::PoemSelected]
            }
            AppCommand::ClosePoem => {
                if self.selected_poem.take().is_some() {
                    vec![AppEvent::PoemClosed]
                } else {
                    Vec::new()
                }
            }
            AppCommand::SetStatus(message) => vec![self.set_status(message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn begin_search(&mut self) -> Vec<AppEvent> {
        let term = self.trimmed_term().to_owned();
        if term.is_empty() {
            tracing::warn!("search stopped: no term entered");
            self.error = Some(EMPTY_TERM_MESSAGE.to_owned());
            return vec![
                AppEvent::ErrorChanged(self.error.clone()),
                AppEvent::SearchRejected,
            ];
        }

        self.error = None;
        self.search_results = None;
        self.is_loading = true;
        self.generation = self.generation.wrapping_add(1);
        self.searched_term.clone_from(&term);
        tracing::info!(generation = self.generation, term = %term, "search started");

        vec![
            AppEvent::ErrorChanged(None),
            AppEvent::ResultsChanged(None),
            AppEvent::LoadingChanged(true),
            AppEvent::SearchStarted(SearchTicket {
                generation: self.generation,
                term,
            }),
        ]
    }

    fn complete_search(&mut self, generation: u64, results: SearchResults) -> Vec<AppEvent> {
        if generation != self.generation {
            tracing::warn!(
                generation,
                current = self.generation,
                "discarding stale search completion"
            );
            return vec![AppEvent::SearchDiscarded { generation }];
        }

        let mut events = Vec::new();
        let failures = results
            .failures()
            .into_iter()
            .map(|(scope, failure)| (scope, failure.url.clone(), failure.reason.clone()))
            .collect::<Vec<_>>();

        let merged = results.merged();
        let count = merged.len();
        self.search_results = Some(merged);
        self.is_loading = false;
        self.error = if count == 0 {
            Some(no_matches_message(&self.searched_term))
        } else {
            None
        };
        tracing::info!(generation, count, "search completed");

        events.push(AppEvent::ResultsChanged(Some(count)));
        events.push(AppEvent::LoadingChanged(false));
        events.push(AppEvent::ErrorChanged(self.error.clone()));

        for (scope, url, reason) in &failures {
            events.push(AppEvent::RequestFailed {
                scope: *scope,
                url: url.clone(),
                reason: reason.clone(),
            });
        }
        if !failures.is_empty() {
            let notice = failures
                .iter()
                .map(|(scope, url, reason)| format!("{} failed for {url}: {reason}", scope.label()))
                .collect::<Vec<_>>()
                .join("; ");
            events.push(self.set_status(notice));
        }
        events
    }

    fn abort_search(&mut self, generation: u64, reason: &str) -> Vec<AppEvent> {
        if generation != self.generation {
            return vec![AppEvent::SearchDiscarded { generation }];
        }

        tracing::error!(generation, reason, "search join failed");
        self.error = Some(NETWORK_ERROR_MESSAGE.to_owned());
        self.is_loading = false;
        vec![
            AppEvent::ErrorChanged(self.error.clone()),
            AppEvent::LoadingChanged(false),
        ]
    }

    fn set_status(&mut self, message: String) -> AppEvent {
        self.status_line = Some(message.clone());
        AppEvent::StatusUpdated(message)
    }
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const PREVIEW_LINES: usize = 5;
pub const PREVIEW_ELLIPSIS: &str = "...";
pub const EMPTY_TERM_MESSAGE: &str = "Please enter a search term.";
pub const NETWORK_ERROR_MESSAGE: &str = "An unexpected network error occurred.";

/// A poem as served by PoetryDB. Records are read-only once decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poem {
    pub title: String,
    pub author: String,
    pub lines: Vec<String>,
    pub linecount: String,
}

/// Identity of a poem: exact title plus exact author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoemKey<'a> {
    pub title: &'a str,
    pub author: &'a str,
}

impl Poem {
    pub fn key(&self) -> PoemKey<'_> {
        PoemKey {
            title: &self.title,
            author: &self.author,
        }
    }

    pub fn preview(&self) -> String {
        preview(&self.lines)
    }

    pub fn full_text(&self) -> String {
        self.lines.join("\n")
    }
}

pub fn preview(lines: &[String]) -> String {
    let mut out = lines
        .iter()
        .take(PREVIEW_LINES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");
    if lines.len() > PREVIEW_LINES {
        out.push('\n');
        out.push_str(PREVIEW_ELLIPSIS);
    }
    out
}

/// Author matches first, then title matches; the first occurrence of each
/// title+author pair wins.
pub fn merge_results(author: Vec<Poem>, title: Vec<Poem>) -> Vec<Poem> {
    let combined: Vec<Poem> = author.into_iter().chain(title).collect();
    let keep: Vec<bool> = {
        let mut seen = HashSet::new();
        combined.iter().map(|poem| seen.insert(poem.key())).collect()
    };
    combined
        .into_iter()
        .zip(keep)
        .filter_map(|(poem, keep)| keep.then_some(poem))
        .collect()
}

pub fn results_summary(count: usize) -> String {
    let noun = if count == 1 { "poem" } else { "poems" };
    format!("Found {count} {noun}")
}

pub fn no_matches_message(term: &str) -> String {
    format!(
        "No poems found matching \"{term}\". Try a poet's name or poem title like \"Shakespeare\" or \"Spring\"."
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchScope {
    Author,
    Title,
}

impl SearchScope {
    pub const ALL: [Self; 2] = [Self::Author, Self::Title];

    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Title => "title",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Author => "search by author",
            Self::Title => "search by title",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub url: String,
    pub reason: String,
}

/// Outcome of one request against the poetry service. Failures are data, not
/// errors: the caller decides how to surface them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Matches(Vec<Poem>),
    NoMatches,
    Failed(FetchFailure),
}

impl FetchOutcome {
    pub fn failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Failed(FetchFailure {
            url: url.into(),
            reason: reason.into(),
        })
    }

    pub fn poems(&self) -> &[Poem] {
        match self {
            Self::Matches(poems) => poems,
            Self::NoMatches | Self::Failed(_) => &[],
        }
    }

    pub fn into_poems(self) -> Vec<Poem> {
        match self {
            Self::Matches(poems) => poems,
            Self::NoMatches | Self::Failed(_) => Vec::new(),
        }
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            Self::Matches(_) | Self::NoMatches => None,
        }
    }
}

/// Both halves of one fan-out, in fixed author/title slots regardless of
/// which request finished first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResults {
    pub author: FetchOutcome,
    pub title: FetchOutcome,
}

impl SearchResults {
    pub fn outcome(&self, scope: SearchScope) -> &FetchOutcome {
        match scope {
            SearchScope::Author => &self.author,
            SearchScope::Title => &self.title,
        }
    }

    pub fn failures(&self) -> Vec<(SearchScope, &FetchFailure)> {
        SearchScope::ALL
            .iter()
            .filter_map(|scope| {
                self.outcome(*scope)
                    .failure()
                    .map(|failure| (*scope, failure))
            })
            .collect()
    }

    pub fn merged(self) -> Vec<Poem> {
        merge_results(self.author.into_poems(), self.title.into_poems())
    }
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use poet_api::Client;
use poet_app::{FetchOutcome, SearchScope};
use poet_testkit::{MockPoetryDb, MockResponse, fire_and_ice, sonnet_18, the_raven};
use std::time::Duration;

#[test]
fn search_merges_author_then_title_results() -> Result<()> {
    let server = MockPoetryDb::serve(2, |url| match url {
        "/author/Poe" => MockResponse::poems(&[the_raven(), fire_and_ice()]),
        "/title/Poe" => MockResponse::poems(&[fire_and_ice(), sonnet_18()]),
        _ => MockResponse::status(500, "unexpected route"),
    })?;

    let client = Client::new(server.base_url(), Duration::from_secs(2))?;
    let results = client.search("  Poe ")?;
    assert_eq!(
        results.author,
        FetchOutcome::Matches(vec![the_raven(), fire_and_ice()])
    );
    assert_eq!(
        results.merged(),
        vec![the_raven(), fire_and_ice(), sonnet_18()]
    );

    assert_eq!(server.finish()?, vec!["/author/Poe", "/title/Poe"]);
    Ok(())
}

#[test]
fn search_encodes_terms_with_spaces() -> Result<()> {
    let server = MockPoetryDb::serve(2, |_| MockResponse::not_found())?;

    let client = Client::new(server.base_url(), Duration::from_secs(2))?;
    let results = client.search("Edgar Allan Poe")?;
    assert_eq!(results.author, FetchOutcome::NoMatches);
    assert_eq!(results.title, FetchOutcome::NoMatches);

    assert_eq!(
        server.finish()?,
        vec!["/author/Edgar%20Allan%20Poe", "/title/Edgar%20Allan%20Poe"]
    );
    Ok(())
}

#[test]
fn server_error_on_author_is_fail_open() -> Result<()> {
    let server = MockPoetryDb::serve(2, |url| {
        if url.starts_with("/author/") {
            MockResponse::status(500, "boom")
        } else {
            MockResponse::poems(&[the_raven()])
        }
    })?;

    let client = Client::new(server.base_url(), Duration::from_secs(2))?;
    let results = client.search("Raven")?;
    let failures = results.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, SearchScope::Author);
    assert!(failures[0].1.url.ends_with("/author/Raven"));
    assert!(failures[0].1.reason.contains("500"));
    assert_eq!(results.merged(), vec![the_raven()]);

    server.finish()?;
    Ok(())
}

#[test]
fn timed_out_author_request_still_yields_title_results() -> Result<()> {
    let server = MockPoetryDb::serve(2, |url| {
        if url.starts_with("/author/") {
            MockResponse::poems(&[sonnet_18()]).delayed(Duration::from_millis(800))
        } else {
            MockResponse::poems(&[fire_and_ice()])
        }
    })?;

    let client = Client::new(server.base_url(), Duration::from_millis(250))?;
    let results = client.search("Ice")?;
    let failure = results.author.failure().expect("author request should time out");
    assert!(failure.reason.contains("timed out"));
    assert_eq!(results.merged(), vec![fire_and_ice()]);

    server.finish()?;
    Ok(())
}

#[test]
fn malformed_record_fails_only_that_request() -> Result<()> {
    let server = MockPoetryDb::serve(2, |url| {
        if url.starts_with("/title/") {
            MockResponse::json(r#"[{"title":"Broken","author":"Nobody"}]"#)
        } else {
            MockResponse::poems(&[fire_and_ice()])
        }
    })?;

    let client = Client::new(server.base_url(), Duration::from_secs(2))?;
    let results = client.search("Frost")?;
    let failure = results.title.failure().expect("title request should fail");
    assert!(failure.reason.contains("malformed poem record"));
    assert_eq!(results.merged(), vec![fire_and_ice()]);

    server.finish()?;
    Ok(())
}

#[test]
fn unreachable_service_fails_both_requests_without_erroring() -> Result<()> {
    let client = Client::new("http://127.0.0.1:1", Duration::from_millis(200))?;
    let results = client.search("Keats")?;
    assert_eq!(results.failures().len(), 2);
    assert!(results.merged().is_empty());
    Ok(())
}

#[test]
fn fetch_poems_reports_the_requested_url() -> Result<()> {
    let server = MockPoetryDb::serve(1, |_| MockResponse::json("not json"))?;

    let client = Client::new(server.base_url(), Duration::from_secs(2))?;
    let url = client.search_url(SearchScope::Title, "Spring")?;
    let outcome = client.fetch_poems(&url);
    let failure = outcome.failure().expect("non-JSON body should fail");
    assert_eq!(failure.url, url);
    assert!(failure.reason.contains("decode response body"));

    server.finish()?;
    Ok(())
}

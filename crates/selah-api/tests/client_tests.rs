// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use selah_api::{Client, PassageOptions, RetryPolicy};
use selah_app::{BookId, ChapterNumber, ChapterRef, TranslationId, VerseKey};
use selah_testkit::{
    CHAPTER_HTML, KJV_ID, MockResponse, MockServer, VERSE_HTML, books_envelope,
    chapter_envelope, chapters_envelope, envelope, verse_envelope,
};
use serde_json::json;
use std::time::{Duration, Instant};

const FAST_RETRY: RetryPolicy = RetryPolicy::new(3, Duration::from_millis(20));

fn client(server: &MockServer) -> Result<Client> {
    Client::new(
        server.base_url(),
        "test-key",
        Duration::from_secs(2),
        FAST_RETRY,
    )
}

fn kjv() -> TranslationId {
    TranslationId::from(KJV_ID)
}

#[test]
fn new_rejects_blank_api_key() {
    let error = Client::new(
        "https://api.scripture.api.bible/v1",
        "  ",
        Duration::from_secs(1),
        RetryPolicy::default(),
    )
    .expect_err("blank key");
    assert!(error.to_string().contains("BIBLE_API_KEY"));
}

#[test]
fn new_rejects_malformed_base_url() {
    let error = Client::new(
        "not a url",
        "key",
        Duration::from_secs(1),
        RetryPolicy::default(),
    )
    .expect_err("bad url");
    assert!(format!("{error:#}").contains("api.base_url"));
}

#[test]
fn new_trims_base_url_and_keeps_settings() -> Result<()> {
    let client = Client::new(
        "https://api.scripture.api.bible/v1//",
        " key ",
        Duration::from_secs(4),
        FAST_RETRY,
    )?;
    assert_eq!(client.base_url(), "https://api.scripture.api.bible/v1");
    assert_eq!(client.timeout(), Duration::from_secs(4));
    assert_eq!(client.retry_policy(), FAST_RETRY);
    Ok(())
}

#[test]
fn sends_api_key_header_and_unwraps_data() -> Result<()> {
    let server = MockServer::start(vec![MockResponse::ok(books_envelope())])?;
    let client = client(&server)?;

    let books = client.books(&kjv())?;
    assert_eq!(books.len(), 3);
    assert_eq!(books[0].id, BookId::from("GEN"));
    assert_eq!(books[2].name_long, "The Gospel According to St. John");

    let requests = server.finish()?;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, format!("/v1/bibles/{KJV_ID}/books"));
    assert_eq!(requests[0].api_key.as_deref(), Some("test-key"));
    Ok(())
}

#[test]
fn two_transient_failures_then_success() -> Result<()> {
    let server = MockServer::start(vec![
        MockResponse::status(503, "unavailable"),
        MockResponse::status(500, r#"{"message":"try later"}"#),
        MockResponse::ok(chapter_envelope("GEN.1", CHAPTER_HTML)),
    ])?;
    let client = client(&server)?;

    let chapter = client.chapter(&kjv(), &ChapterRef::new("GEN", ChapterNumber::Numbered(1)))?;
    assert_eq!(chapter.id, "GEN.1");
    assert_eq!(chapter.content.as_deref(), Some(CHAPTER_HTML));

    assert_eq!(server.finish()?.len(), 3);
    Ok(())
}

#[test]
fn three_failures_surface_fetch_error_in_bounded_time() -> Result<()> {
    let server = MockServer::start(vec![
        MockResponse::status(500, "boom"),
        MockResponse::status(502, "bad gateway"),
        MockResponse::status(503, "still down"),
    ])?;
    let client = client(&server)?;

    let started = Instant::now();
    let error = client.books(&kjv()).expect_err("all attempts fail");
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(error.is_fetch());
    assert!(error.to_string().contains("server error (503): still down"));
    assert!(client.cache().is_empty());

    assert_eq!(server.finish()?.len(), 3);
    Ok(())
}

#[test]
fn unreachable_server_is_a_fetch_error() -> Result<()> {
    let client = Client::new(
        "http://127.0.0.1:1/v1",
        "key",
        Duration::from_millis(200),
        RetryPolicy::new(2, Duration::from_millis(5)),
    )?;
    let error = client.list_bibles().expect_err("nothing listening");
    assert!(error.is_fetch());
    assert!(error.to_string().contains("127.0.0.1:1"));
    Ok(())
}

#[test]
fn repeated_fetches_hit_the_server_once() -> Result<()> {
    let server = MockServer::start(vec![MockResponse::ok(verse_envelope(
        "JHN.3.16", VERSE_HTML,
    ))])?;
    let client = client(&server)?;
    let verse = VerseKey::new("JHN", 3, 16);

    let first = client.verse(&kjv(), &verse)?;
    let second = client.verse(&kjv(), &verse)?;
    assert_eq!(first, second);
    assert_eq!(client.cache().len(), 1);

    let requests = server.finish()?;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, format!("/v1/bibles/{KJV_ID}/verses/JHN.3.16"));
    Ok(())
}

#[test]
fn different_query_arguments_are_distinct_cache_entries() -> Result<()> {
    let results = |query: &str| {
        envelope(json!({
            "query": query,
            "total": 1,
            "verses": [{"id": "JHN.3.16", "reference": "John 3:16", "text": "For God so loved"}],
        }))
    };
    let server = MockServer::start(vec![
        MockResponse::ok(results("love")),
        MockResponse::ok(results("love")),
    ])?;
    let client = client(&server)?;

    let first = client.search(&kjv(), "love", 10, 0)?;
    let second = client.search(&kjv(), "love", 10, 10)?;
    assert_eq!(first.total, 1);
    assert_eq!(second.verses[0].reference, "John 3:16");
    assert_eq!(client.cache().len(), 2);

    let requests = server.finish()?;
    assert_eq!(requests.len(), 2);
    assert!(requests[0].url.contains("query=love"));
    assert!(requests[0].url.contains("offset=0"));
    assert!(requests[1].url.contains("offset=10"));
    Ok(())
}

#[test]
fn blank_search_query_is_rejected_before_fetching() -> Result<()> {
    let client = Client::new(
        "http://127.0.0.1:1/v1",
        "key",
        Duration::from_millis(50),
        RetryPolicy::default(),
    )?;
    let error = client.search(&kjv(), "   ", 10, 0).expect_err("blank");
    assert!(error.is_invalid_input());
    Ok(())
}

#[test]
fn missing_data_field_is_not_retried() -> Result<()> {
    let server = MockServer::start(vec![MockResponse::ok(r#"{"meta":{}}"#)])?;
    let client = client(&server)?;

    let error = client
        .fetch_json("bibles", &[])
        .expect_err("no data member");
    assert!(error.is_fetch());
    assert!(error.to_string().contains("no data field"));
    assert!(client.cache().is_empty());

    assert_eq!(server.finish()?.len(), 1);
    Ok(())
}

#[test]
fn chapter_lists_include_the_intro() -> Result<()> {
    let server = MockServer::start(vec![MockResponse::ok(chapters_envelope("GEN", 2))])?;
    let client = client(&server)?;

    let chapters = client.chapters(&kjv(), &BookId::from("GEN"))?;
    let numbers: Vec<&str> = chapters.iter().map(|c| c.number.as_str()).collect();
    assert_eq!(numbers, vec!["intro", "1", "2"]);

    server.finish()?;
    Ok(())
}

#[test]
fn chapter_verses_returns_verse_keys() -> Result<()> {
    let server = MockServer::start(vec![MockResponse::ok(envelope(json!([
        {"id": "GEN.1.1", "orgId": "GEN.1.1", "bibleId": KJV_ID, "bookId": "GEN", "chapterId": "GEN.1", "reference": "Genesis 1:1"},
        {"id": "GEN.1.2", "orgId": "GEN.1.2", "bibleId": KJV_ID, "bookId": "GEN", "chapterId": "GEN.1", "reference": "Genesis 1:2"},
    ])))])?;
    let client = client(&server)?;

    let keys = client.chapter_verses(
        &kjv(),
        &ChapterRef::new("GEN", ChapterNumber::Numbered(1)),
    )?;
    assert_eq!(keys, vec!["GEN.1.1".to_owned(), "GEN.1.2".to_owned()]);

    let requests = server.finish()?;
    assert_eq!(requests[0].url, format!("/v1/bibles/{KJV_ID}/chapters/GEN.1/verses"));
    Ok(())
}

#[test]
fn passage_sends_every_switch() -> Result<()> {
    let server = MockServer::start(vec![MockResponse::ok(envelope(json!({
        "id": "GEN.1",
        "reference": "Genesis 1",
        "content": CHAPTER_HTML,
        "verseCount": 31,
    })))])?;
    let client = client(&server)?;

    let passage = client.passage(&kjv(), "GEN.1", &PassageOptions::default())?;
    assert_eq!(passage.verse_count, Some(31));

    let requests = server.finish()?;
    let url = &requests[0].url;
    for switch in [
        "content-type=html",
        "include-notes=true",
        "include-titles=true",
        "include-chapter-numbers=true",
        "include-verse-numbers=true",
        "include-verse-spans=true",
    ] {
        assert!(url.contains(switch), "{url} lacks {switch}");
    }
    assert!(!url.contains("parallels"));
    Ok(())
}

#[test]
fn bible_fetches_one_translation() -> Result<()> {
    let server = MockServer::start(vec![MockResponse::ok(envelope(json!({
        "id": KJV_ID,
        "name": "King James (Authorised) Version",
        "abbreviation": "engKJV",
        "nameLocal": "King James Version",
        "language": {"id": "eng", "name": "English", "script": "Latin"},
    })))])?;
    let client = client(&server)?;

    let bible = client.bible(&kjv())?;
    assert_eq!(bible.id, kjv());
    assert_eq!(bible.name_local, "King James Version");
    assert_eq!(
        bible.language.as_ref().map(|language| language.name.as_str()),
        Some("English")
    );

    let requests = server.finish()?;
    assert_eq!(requests[0].url, format!("/v1/bibles/{KJV_ID}"));
    Ok(())
}

#[test]
fn unexpected_payload_shape_is_a_fetch_error() -> Result<()> {
    let server = MockServer::start(vec![MockResponse::ok(envelope(json!("not a list")))])?;
    let client = client(&server)?;

    let error = client.list_bibles().expect_err("wrong shape");
    assert!(error.is_fetch());
    assert!(error.to_string().contains("unexpected payload"));

    server.finish()?;
    Ok(())
}

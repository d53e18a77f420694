// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use serde_json::json;
use std::fs;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tempfile::TempDir;
use tiny_http::{Header, Response, Server};

pub const KJV_ID: &str = "de4e12af7f28f599-02";
pub const WEB_ID: &str = "9879dbb7cfe39e4d-04";
pub const ASV_ID: &str = "06125adad2d5898a-01";
pub const RV1909_ID: &str = "592420522e16049f-01";

pub const TRANSLATIONS_JSON: &str = r#"{
  "King James Version": {"id": "de4e12af7f28f599-02", "abbreviation": "KJV", "language": "English", "script": "Latin"},
  "World English Bible": {"id": "9879dbb7cfe39e4d-04", "abbreviation": "WEB", "language": "English", "script": "Latin"},
  "American Standard Version": {"id": "06125adad2d5898a-01", "abbreviation": "ASV", "language": "English", "script": "Latin"},
  "Reina Valera 1909": {"id": "592420522e16049f-01", "abbreviation": "RV1909", "language": "Spanish", "script": "Latin"}
}"#;

pub const ABBREVIATIONS_JSON: &str = r#"{
  "Genesis": {"id": "GEN"},
  "Gen": {"id": "GEN"},
  "Exodus": {"id": "EXO"},
  "Psalms": {"id": "PSA"},
  "John": {"id": "JHN"},
  "1 John": {"id": "1JN"},
  "Revelation": {"id": "REV"}
}"#;

pub const CROSS_REFS_JSON: &str = r#"{
  "GEN.1.1": ["JHN.1.1", "HEB.11.3", "PSA.33.6"],
  "GEN.1.2": ["PSA.104.30"],
  "GEN.1.3": ["2CO.4.6"],
  "GEN.1.10": ["PSA.95.5"],
  "GEN.2.7": ["1CO.15.45"],
  "GEN.10.1": ["1CH.1.4"],
  "JHN.3.16": ["ROM.5.8", "1JN.4.9"]
}"#;

/// Genesis 1:1-3 with every inline class the renderer knows about.
pub const CHAPTER_HTML: &str = concat!(
    r#"<p class="p"><span data-number="1" data-sid="GEN 1:1" class="v">1</span>"#,
    r#"In the beginning <span class="nd">Lord</span> God created the heaven and the earth.</p>"#,
    r#"<p class="p"><span data-number="2" data-sid="GEN 1:2" class="v">2</span>"#,
    r#"And the earth was without form, and void; and darkness <span class="add">was</span> "#,
    r#"upon the face of the deep.</p>"#,
    r#"<p class="p"><span data-number="3" data-sid="GEN 1:3" class="v">3</span>"#,
    r#"And God said, <span class="wj">Let there be light</span>: and there was light "#,
    r#"<span class="add">for</span> <span class="add">all</span>.</p>"#,
);

pub const INTRO_HTML: &str = concat!(
    r#"<p class="imt1">The Gospel According to John</p>"#,
    r#"<p class="ip">John wrote so that readers might believe &amp; have life.</p>"#,
    r#"<p class="ip">It opens with the <span class="bk">Word</span>.</p>"#,
);

pub const VERSE_HTML: &str = concat!(
    r#"<p class="p"><span data-number="16" data-sid="JHN 3:16" class="v">16</span>"#,
    r#"For God so loved the world, that he gave his only begotten Son.</p>"#,
);

/// Writes the three reference tables into a fresh temporary directory.
pub fn write_reference_dir() -> Result<TempDir> {
    let dir = tempfile::tempdir().context("create reference data dir")?;
    for (file, body) in [
        ("bible-id.json", TRANSLATIONS_JSON),
        ("abbreviations.json", ABBREVIATIONS_JSON),
        ("cross_ref.json", CROSS_REFS_JSON),
    ] {
        fs::write(dir.path().join(file), body).with_context(|| format!("write {file}"))?;
    }
    Ok(dir)
}

/// `{"data": ...}` envelope the scripture service wraps every payload in.
pub fn envelope(data: serde_json::Value) -> String {
    json!({ "data": data }).to_string()
}

pub fn chapter_envelope(chapter_id: &str, html: &str) -> String {
    let book_id = chapter_id.split('.').next().unwrap_or_default();
    let number = chapter_id.rsplit('.').next().unwrap_or_default();
    envelope(json!({
        "id": chapter_id,
        "bibleId": KJV_ID,
        "bookId": book_id,
        "number": number,
        "reference": format!("{book_id} {number}"),
        "content": html,
        "copyright": "PUBLIC DOMAIN",
    }))
}

pub fn verse_envelope(verse_id: &str, html: &str) -> String {
    let chapter_id = verse_id
        .rsplit_once('.')
        .map(|(chapter, _)| chapter)
        .unwrap_or(verse_id);
    let book_id = verse_id.split('.').next().unwrap_or_default();
    envelope(json!({
        "id": verse_id,
        "bibleId": KJV_ID,
        "bookId": book_id,
        "chapterId": chapter_id,
        "reference": verse_id,
        "content": html,
    }))
}

pub fn books_envelope() -> String {
    envelope(json!([
        {"id": "GEN", "bibleId": KJV_ID, "abbreviation": "Gen", "name": "Genesis", "nameLong": "The First Book of Moses, called Genesis"},
        {"id": "EXO", "bibleId": KJV_ID, "abbreviation": "Exo", "name": "Exodus", "nameLong": "The Second Book of Moses, called Exodus"},
        {"id": "JHN", "bibleId": KJV_ID, "abbreviation": "Jhn", "name": "John", "nameLong": "The Gospel According to St. John"},
    ]))
}

pub fn chapters_envelope(book_id: &str, count: u32) -> String {
    let mut chapters = vec![json!({
        "id": format!("{book_id}.intro"),
        "bookId": book_id,
        "number": "intro",
        "reference": format!("{book_id} Introduction"),
    })];
    chapters.extend((1..=count).map(|number| {
        json!({
            "id": format!("{book_id}.{number}"),
            "bookId": book_id,
            "number": number.to_string(),
            "reference": format!("{book_id} {number}"),
        })
    }));
    envelope(serde_json::Value::Array(chapters))
}

/// One scripted reply from [`MockServer`].
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
}

impl MockResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// What the client sent, as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub api_key: Option<String>,
}

/// Local HTTP server that answers with the scripted responses in order, then
/// shuts down. Requests beyond the script are refused.
pub struct MockServer {
    base_url: String,
    handle: JoinHandle<Vec<RecordedRequest>>,
}

const IDLE_TIMEOUT: Duration = Duration::from_secs(5);

impl MockServer {
    pub fn start(responses: Vec<MockResponse>) -> Result<Self> {
        let server =
            Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
        let base_url = format!("http://{}/v1", server.server_addr());
        let content_type = Header::from_bytes("Content-Type", "application/json")
            .map_err(|()| anyhow!("build content type header"))?;

        let handle = thread::spawn(move || {
            let mut recorded = Vec::new();
            for scripted in responses {
                let request = match server.recv_timeout(IDLE_TIMEOUT) {
                    Ok(Some(request)) => request,
                    _ => break,
                };
                let api_key = request
                    .headers()
                    .iter()
                    .find(|header| header.field.equiv("api-key"))
                    .map(|header| header.value.as_str().to_owned());
                recorded.push(RecordedRequest {
                    url: request.url().to_owned(),
                    api_key,
                });
                let response = Response::from_string(scripted.body)
                    .with_status_code(scripted.status)
                    .with_header(content_type.clone());
                if request.respond(response).is_err() {
                    break;
                }
            }
            recorded
        });

        Ok(Self { base_url, handle })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Waits for the script to run out and returns every request received.
    pub fn finish(self) -> Result<Vec<RecordedRequest>> {
        self.handle
            .join()
            .map_err(|_| anyhow!("mock server thread panicked"))
    }
}

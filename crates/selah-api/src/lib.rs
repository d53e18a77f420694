// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod cache;
mod retry;

pub use cache::{RequestKey, ResponseCache};
pub use retry::{AttemptError, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, RetryPolicy};

use anyhow::{Context, Result, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use selah_app::{
    BibleSummary, BookId, BookSummary, ChapterContent, ChapterRef, ChapterSummary,
    PassageContent, SearchResults, TranslationId, VerseContent, VerseKey, VerseListing,
    ViewerError, ViewerResult,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.scripture.api.bible/v1";
pub const API_KEY_HEADER: &str = "api-key";
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Query switches for the passage endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassageOptions {
    pub content_type: String,
    pub include_notes: bool,
    pub include_titles: bool,
    pub include_chapter_numbers: bool,
    pub include_verse_numbers: bool,
    pub include_verse_spans: bool,
    pub parallels: Option<String>,
}

impl Default for PassageOptions {
    fn default() -> Self {
        Self {
            content_type: "html".to_owned(),
            include_notes: true,
            include_titles: true,
            include_chapter_numbers: true,
            include_verse_numbers: true,
            include_verse_spans: true,
            parallels: None,
        }
    }
}

impl PassageOptions {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("content-type", self.content_type.clone()),
            ("include-notes", self.include_notes.to_string()),
            ("include-titles", self.include_titles.to_string()),
            (
                "include-chapter-numbers",
                self.include_chapter_numbers.to_string(),
            ),
            (
                "include-verse-numbers",
                self.include_verse_numbers.to_string(),
            ),
            ("include-verse-spans", self.include_verse_spans.to_string()),
        ];
        if let Some(parallels) = &self.parallels {
            params.push(("parallels", parallels.clone()));
        }
        params
    }
}

/// Blocking client for the scripture REST service. Every successful response
/// is memoized for the client's lifetime.
#[derive(Debug)]
pub struct Client {
    base_url: String,
    api_key: String,
    timeout: Duration,
    retry: RetryPolicy,
    http: HttpClient,
    cache: ResponseCache,
}

impl Client {
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }
        Url::parse(&base_url).with_context(|| format!("api.base_url {base_url:?} is not a URL"))?;
        if api_key.trim().is_empty() {
            bail!("BIBLE_API_KEY must not be empty");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            api_key: api_key.trim().to_owned(),
            timeout,
            retry,
            http,
            cache: ResponseCache::default(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// GET `path` relative to the base URL and return the top-level `data`
    /// member. Transport failures and non-success statuses are retried per
    /// the client's policy; a body without `data` is not.
    pub fn fetch_json(&self, path: &str, params: &[(&str, String)]) -> ViewerResult<Value> {
        let key = RequestKey::new(path, params);
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(path = key.path(), "cache hit");
            return Ok(hit);
        }

        let url = self.endpoint(key.path(), params)?;
        let data = self.retry.run(url.as_str(), |_| self.fetch_once(&url))?;
        self.cache.insert(key, data.clone());
        Ok(data)
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> ViewerResult<Url> {
        let raw = format!("{}/{}", self.base_url, path);
        let mut url = Url::parse(&raw).map_err(|error| ViewerError::Fetch {
            url: raw.clone(),
            message: format!("invalid URL: {error}"),
        })?;
        if !params.is_empty() {
            let mut query = url.query_pairs_mut();
            for (name, value) in params {
                query.append_pair(name, value);
            }
        }
        Ok(url)
    }

    fn fetch_once(&self, url: &Url) -> Result<Value, AttemptError> {
        let response = self
            .http
            .get(url.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .map_err(|error| AttemptError::Transient(connection_error(&error)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AttemptError::Transient(clean_error_response(status, &body)));
        }

        let mut body: Value = response
            .json()
            .map_err(|error| AttemptError::Transient(format!("decode response: {error}")))?;
        match body.get_mut("data").map(Value::take) {
            Some(data) => Ok(data),
            None => Err(AttemptError::Fatal(ViewerError::Fetch {
                url: url.to_string(),
                message: "response has no data field".to_owned(),
            })),
        }
    }

    fn fetch_typed<T>(&self, path: &str, params: &[(&str, String)]) -> ViewerResult<T>
    where
        T: DeserializeOwned,
    {
        let data = self.fetch_json(path, params)?;
        serde_json::from_value(data).map_err(|error| ViewerError::Fetch {
            url: format!("{}/{}", self.base_url, path.trim_matches('/')),
            message: format!("unexpected payload: {error}"),
        })
    }

    pub fn list_bibles(&self) -> ViewerResult<Vec<BibleSummary>> {
        self.fetch_typed("bibles", &[])
    }

    pub fn search_bibles(&self, query: &str) -> ViewerResult<Vec<BibleSummary>> {
        self.fetch_typed("bibles", &[("query", query.trim().to_owned())])
    }

    pub fn bible(&self, id: &TranslationId) -> ViewerResult<BibleSummary> {
        self.fetch_typed(&format!("bibles/{id}"), &[])
    }

    pub fn books(&self, id: &TranslationId) -> ViewerResult<Vec<BookSummary>> {
        self.fetch_typed(&format!("bibles/{id}/books"), &[])
    }

    pub fn chapters(
        &self,
        id: &TranslationId,
        book: &BookId,
    ) -> ViewerResult<Vec<ChapterSummary>> {
        self.fetch_typed(&format!("bibles/{id}/books/{book}/chapters"), &[])
    }

    pub fn chapter(
        &self,
        id: &TranslationId,
        chapter: &ChapterRef,
    ) -> ViewerResult<ChapterContent> {
        self.fetch_typed(&format!("bibles/{id}/chapters/{}", chapter.id()), &[])
    }

    /// Verse keys of one chapter, in service order.
    pub fn chapter_verses(
        &self,
        id: &TranslationId,
        chapter: &ChapterRef,
    ) -> ViewerResult<Vec<String>> {
        let listings: Vec<VerseListing> =
            self.fetch_typed(&format!("bibles/{id}/chapters/{}/verses", chapter.id()), &[])?;
        Ok(listings.into_iter().map(|listing| listing.id).collect())
    }

    pub fn verse(&self, id: &TranslationId, verse: &VerseKey) -> ViewerResult<VerseContent> {
        self.fetch_typed(&format!("bibles/{id}/verses/{verse}"), &[])
    }

    pub fn search(
        &self,
        id: &TranslationId,
        query: &str,
        limit: u32,
        offset: u32,
    ) -> ViewerResult<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ViewerError::invalid_input("Invalid search query provided."));
        }
        self.fetch_typed(
            &format!("bibles/{id}/search"),
            &[
                ("query", query.to_owned()),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
            ],
        )
    }

    pub fn passage(
        &self,
        id: &TranslationId,
        chapter_id: &str,
        options: &PassageOptions,
    ) -> ViewerResult<PassageContent> {
        self.fetch_typed(
            &format!("bibles/{id}/passages/{}", chapter_id.trim()),
            &options.params(),
        )
    }
}

fn connection_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out ({error})")
    } else {
        format!("cannot reach scripture service ({error})")
    }
}

fn clean_error_response(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<Value>(body)
        && let Some(message) = parsed.get("message").and_then(Value::as_str)
        && !message.is_empty()
    {
        return format!("server error ({}): {message}", status.as_u16());
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return format!("server error ({}): {}", status.as_u16(), body.trim());
    }

    format!("server returned {}", status.as_u16())
}

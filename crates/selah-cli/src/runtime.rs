// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use selah_api::{Client, DEFAULT_SEARCH_LIMIT, PassageOptions};
use selah_app::{
    BibleSummary, BookSummary, ButtonGrid, ChapterNumber, ChapterRef, ChapterSummary,
    DisplayFormat, DisplaySettings, DisplayToggle, SearchResults, TranslationId, VerseKey,
    VerseRef, ViewerCommand, ViewerError, ViewerEvent, ViewerResult, ViewerState,
    parse_chapter_and_verse,
};
use selah_data::{ReferenceData, filter_by_substring};
use selah_render::{
    Rendered, extract_verse_text, format_verse_line, render_chapter_as, render_verse,
};
use std::sync::Arc;

/// One reading session: static tables, the API client, and the current
/// selections. Every operation returns a [`ViewerError`] the caller can show
/// inline; nothing here ends the session.
pub struct Session {
    data: Arc<ReferenceData>,
    client: Client,
    state: ViewerState,
}

/// Verses of one chapter that have cross references, plus one grid of
/// targets per verse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossReferences {
    pub translation: TranslationId,
    pub chapter: ChapterRef,
    pub verses: ButtonGrid,
    pub references: Vec<(String, ButtonGrid)>,
}

impl CrossReferences {
    /// The verse a reference button opens, in the chapter's translation.
    pub fn verse_ref(&self, target: &str) -> ViewerResult<VerseRef> {
        let key = VerseKey::parse(target)?;
        Ok(VerseRef::new(self.translation.clone(), key))
    }

    /// `(label, token)` for each button in `grid`. Buttons whose target is not
    /// a verse key are skipped.
    pub fn tokens(&self, grid: &ButtonGrid) -> Vec<(String, String)> {
        grid.buttons()
            .filter_map(|button| match self.verse_ref(&button.target) {
                Ok(verse) => Some((button.label.clone(), verse.to_token())),
                Err(error) => {
                    tracing::warn!(%error, key = %button.target, "skipping cross reference");
                    None
                }
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }
}

impl Session {
    pub fn new(data: Arc<ReferenceData>, client: Client, state: ViewerState) -> Self {
        Self {
            data,
            client,
            state,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn dispatch(&mut self, command: ViewerCommand) -> Vec<ViewerEvent> {
        self.state.dispatch(command)
    }

    pub fn toggle(&mut self, toggle: DisplayToggle) -> Vec<ViewerEvent> {
        self.dispatch(ViewerCommand::Toggle(toggle))
    }

    pub fn set_format(&mut self, format: DisplayFormat) -> Vec<ViewerEvent> {
        self.dispatch(ViewerCommand::SetFormat(format))
    }

    /// `(name, id)` pairs for the translation picker, in name order.
    pub fn translations(&self) -> Vec<(String, TranslationId)> {
        self.data
            .translations()
            .map(|translation| (translation.name.clone(), translation.id.clone()))
            .collect()
    }

    pub fn translations_by_language(&self, language: &str) -> Vec<(String, TranslationId)> {
        self.data.translations_by_language(language)
    }

    pub fn translations_by_script(&self, script: &str) -> Vec<(String, TranslationId)> {
        self.data.translations_by_script(script)
    }

    pub fn find_translation(&self, term: &str) -> ViewerResult<(String, TranslationId)> {
        self.data.find_translation(term)
    }

    pub fn select_translation(&mut self, input: &str) -> ViewerResult<TranslationId> {
        let id = self.data.resolve_translation_id(input)?;
        self.dispatch(ViewerCommand::SelectTranslation(id.clone()));
        Ok(id)
    }

    pub fn books(&mut self, translation: &str) -> ViewerResult<Vec<BookSummary>> {
        let id = self.select_translation(translation)?;
        self.client.books(&id)
    }

    pub fn chapters(
        &mut self,
        translation: &str,
        book: &str,
    ) -> ViewerResult<Vec<ChapterSummary>> {
        let id = self.select_translation(translation)?;
        let book = self.data.resolve_book_abbreviation(book)?;
        self.dispatch(ViewerCommand::SelectBook(book.clone()));
        self.client.chapters(&id, &book)
    }

    /// Fetches and renders one chapter with the session's settings and format.
    pub fn read_chapter(
        &mut self,
        translation: &str,
        book: &str,
        chapter: &str,
    ) -> ViewerResult<Rendered> {
        let id = self.select_translation(translation)?;
        let book = self.data.resolve_book_abbreviation(book)?;
        let chapter = ChapterNumber::parse(chapter)?;
        self.dispatch(ViewerCommand::SelectBook(book.clone()));
        self.dispatch(ViewerCommand::SelectChapter(chapter));

        let content = self.client.chapter(&id, &ChapterRef::new(book, chapter))?;
        let html = content
            .content
            .ok_or_else(|| ViewerError::content_unavailable("chapter"))?;
        render_chapter_as(&html, self.state.settings, self.state.format)
    }

    /// `"**{book} {chapter}:{verse}** - {text}"` for one verse.
    pub fn read_verse(
        &mut self,
        translation: &str,
        book: &str,
        chapter: &str,
        verse: &str,
    ) -> ViewerResult<String> {
        let id = self.data.resolve_translation_id(translation)?;
        let book = self.data.resolve_book_abbreviation(book)?;
        let (chapter, verse) = parse_chapter_and_verse(chapter, verse)?;
        self.verse_line(&VerseRef::new(id, VerseKey::new(book, chapter, verse)))
    }

    /// Opens a `translation_book_chapter_verse` token from a reference grid.
    /// Translation and book may be ids or names; both go through the resolver.
    pub fn open_reference(&mut self, token: &str) -> ViewerResult<String> {
        let parsed = VerseRef::parse_token(token)?;
        let translation = self
            .data
            .resolve_translation_id(parsed.translation.as_str())?;
        let book = self.data.resolve_book_abbreviation(parsed.key.book.as_str())?;
        let verse = VerseRef::new(
            translation,
            VerseKey::new(book, parsed.key.chapter, parsed.key.verse),
        );
        let line = self.verse_line(&verse)?;
        self.dispatch(ViewerCommand::OpenReference(verse));
        Ok(line)
    }

    /// `"**{book} {chapter}:{verse}** - {text}"`. With every display toggle
    /// off the text is the verse's plain text; otherwise it is the styled
    /// single-verse markup.
    pub fn verse_line(&self, verse: &VerseRef) -> ViewerResult<String> {
        let content = self.client.verse(&verse.translation, &verse.key)?;
        let html = content
            .content
            .ok_or_else(|| ViewerError::content_unavailable("verse"))?;
        let text = if self.state.settings == DisplaySettings::default() {
            extract_verse_text(&html)?
        } else {
            render_verse(&html, self.state.settings)?.markup
        };
        Ok(format_verse_line(&verse.key, &text))
    }

    /// Cross references for a chapter, optionally narrowed to verse keys
    /// containing `filter`. Served from the static table; nothing is fetched.
    pub fn cross_references(
        &mut self,
        translation: &str,
        book: &str,
        chapter: &str,
        filter: Option<&str>,
    ) -> ViewerResult<CrossReferences> {
        let id = self.select_translation(translation)?;
        let book = self.data.resolve_book_abbreviation(book)?;
        let chapter = ChapterRef::new(book, ChapterNumber::parse(chapter)?);

        let mut refs = self.data.cross_refs().lookup(&chapter);
        if let Some(term) = filter {
            self.dispatch(ViewerCommand::SetSearchTerm(term.to_owned()));
            refs = filter_by_substring(&refs, term);
        }
        tracing::debug!(chapter = %chapter, verses = refs.len(), "cross references");

        let verses = ButtonGrid::for_chapter_verses(refs.keys());
        let references = refs
            .iter()
            .map(|(key, targets)| (key.to_owned(), ButtonGrid::for_references(key, targets)))
            .collect();
        Ok(CrossReferences {
            translation: id,
            chapter,
            verses,
            references,
        })
    }

    /// Full-text search. The translation is taken as an id and corrected to
    /// the closest known id.
    pub fn search(
        &mut self,
        translation: &str,
        query: &str,
        offset: u32,
    ) -> ViewerResult<SearchResults> {
        let id = self.data.correct_translation_id(translation)?;
        self.dispatch(ViewerCommand::SetSearchTerm(query.trim().to_owned()));
        self.client.search(&id, query, DEFAULT_SEARCH_LIMIT, offset)
    }

    pub fn read_passage(&mut self, translation: &str, passage_id: &str) -> ViewerResult<Rendered> {
        let id = self.data.correct_translation_id(translation)?;
        let passage = self
            .client
            .passage(&id, passage_id, &PassageOptions::default())?;
        let html = passage
            .content
            .ok_or_else(|| ViewerError::content_unavailable("passage"))?;
        render_chapter_as(&html, self.state.settings, self.state.format)
    }

    /// Translations offered by the service itself, optionally filtered by a
    /// service-side query.
    pub fn bibles(&self, query: Option<&str>) -> ViewerResult<Vec<BibleSummary>> {
        match query.map(str::trim) {
            Some(query) if !query.is_empty() => self.client.search_bibles(query),
            _ => self.client.list_bibles(),
        }
    }

    /// The service's description of one known translation.
    pub fn bible(&self, translation: &str) -> ViewerResult<BibleSummary> {
        let id = self.data.resolve_translation_id(translation)?;
        self.client.bible(&id)
    }
}

/// Inline message for an interaction that failed.
pub fn describe(error: &ViewerError) -> String {
    match error {
        ViewerError::Fetch { .. } => {
            tracing::warn!(%error, "request failed");
            format!("error: {}", error.user_message())
        }
        ViewerError::ContentUnavailable { .. } => format!("warning: {}", error.user_message()),
        ViewerError::NotFound { .. } | ViewerError::InvalidInput(_) => error.user_message(),
    }
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    BookId, ChapterNumber, DisplayFormat, DisplaySettings, DisplayToggle, TranslationId, VerseRef,
};

/// Selections for one reading session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewerState {
    pub translation: Option<TranslationId>,
    pub book: Option<BookId>,
    pub chapter: Option<ChapterNumber>,
    pub format: DisplayFormat,
    pub search_term: String,
    pub settings: DisplaySettings,
    pub opened_refs: Vec<VerseRef>,
    pub status_line: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerCommand {
    SelectTranslation(TranslationId),
    SelectBook(BookId),
    SelectChapter(ChapterNumber),
    SetFormat(DisplayFormat),
    SetSearchTerm(String),
    Toggle(DisplayToggle),
    OpenReference(VerseRef),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    TranslationChanged(TranslationId),
    BookChanged(BookId),
    ChapterChanged(ChapterNumber),
    SelectionCleared,
    FormatChanged(DisplayFormat),
    SearchTermChanged(String),
    SettingsChanged(DisplaySettings),
    ReferenceOpened(VerseRef),
    StatusUpdated(String),
}

impl ViewerState {
    pub fn with_settings(settings: DisplaySettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn dispatch(&mut self, command: ViewerCommand) -> Vec<ViewerEvent> {
        match command {
            ViewerCommand::SelectTranslation(id) => {
                if self.translation.as_ref() == Some(&id) {
                    return Vec::new();
                }
                self.translation = Some(id.clone());
                let mut events = vec![ViewerEvent::TranslationChanged(id)];
                let cleared_book = self.book.take().is_some();
                let cleared_chapter = self.chapter.take().is_some();
                if cleared_book || cleared_chapter {
                    events.push(ViewerEvent::SelectionCleared);
                }
                self.opened_refs.clear();
                events
            }
            ViewerCommand::SelectBook(id) => {
                if self.book.as_ref() == Some(&id) {
                    return Vec::new();
                }
                self.book = Some(id.clone());
                let mut events = vec![ViewerEvent::BookChanged(id)];
                if self.chapter.take().is_some() {
                    events.push(ViewerEvent::SelectionCleared);
                }
                events
            }
            ViewerCommand::SelectChapter(chapter) => {
                if self.book.is_none() {
                    return vec![self.set_status("select a book first")];
                }
                self.chapter = Some(chapter);
                self.search_term.clear();
                vec![ViewerEvent::ChapterChanged(chapter)]
            }
            ViewerCommand::SetFormat(format) => {
                self.format = format;
                vec![ViewerEvent::FormatChanged(format)]
            }
            ViewerCommand::SetSearchTerm(term) => {
                self.search_term = term.clone();
                vec![ViewerEvent::SearchTermChanged(term)]
            }
            ViewerCommand::Toggle(toggle) => {
                self.settings = self.settings.toggled(toggle);
                let label = format!(
                    "{} {}",
                    toggle.label(),
                    if self.settings.get(toggle) { "on" } else { "off" }
                );
                vec![
                    ViewerEvent::SettingsChanged(self.settings),
                    self.set_status(&label),
                ]
            }
            ViewerCommand::OpenReference(verse) => {
                if !self.opened_refs.contains(&verse) {
                    self.opened_refs.push(verse.clone());
                }
                vec![ViewerEvent::ReferenceOpened(verse)]
            }
        }
    }

    fn set_status(&mut self, message: &str) -> ViewerEvent {
        self.status_line = Some(message.to_owned());
        ViewerEvent::StatusUpdated(message.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{ViewerCommand, ViewerEvent, ViewerState};
    use crate::{BookId, ChapterNumber, DisplayToggle, TranslationId, VerseKey, VerseRef};

    fn reading_genesis_one() -> ViewerState {
        let mut state = ViewerState::default();
        state.dispatch(ViewerCommand::SelectTranslation(TranslationId::from("kjv")));
        state.dispatch(ViewerCommand::SelectBook(BookId::from("GEN")));
        state.dispatch(ViewerCommand::SelectChapter(ChapterNumber::Numbered(1)));
        state
    }

    #[test]
    fn changing_translation_clears_book_and_chapter() {
        let mut state = reading_genesis_one();
        let events = state.dispatch(ViewerCommand::SelectTranslation(TranslationId::from("web")));
        assert_eq!(
            events,
            vec![
                ViewerEvent::TranslationChanged(TranslationId::from("web")),
                ViewerEvent::SelectionCleared,
            ]
        );
        assert!(state.book.is_none());
        assert!(state.chapter.is_none());
    }

    #[test]
    fn reselecting_the_same_book_is_a_no_op() {
        let mut state = reading_genesis_one();
        let events = state.dispatch(ViewerCommand::SelectBook(BookId::from("GEN")));
        assert!(events.is_empty());
        assert_eq!(state.chapter, Some(ChapterNumber::Numbered(1)));
    }

    #[test]
    fn chapter_requires_a_book() {
        let mut state = ViewerState::default();
        let events = state.dispatch(ViewerCommand::SelectChapter(ChapterNumber::Numbered(3)));
        assert_eq!(
            events,
            vec![ViewerEvent::StatusUpdated("select a book first".to_owned())]
        );
        assert!(state.chapter.is_none());
    }

    #[test]
    fn toggle_updates_settings_and_status() {
        let mut state = ViewerState::default();
        let events = state.dispatch(ViewerCommand::Toggle(DisplayToggle::BoldVerseNumbers));
        assert!(state.settings.bold_verse_numbers);
        assert_eq!(events[0], ViewerEvent::SettingsChanged(state.settings));
        assert_eq!(state.status_line.as_deref(), Some("Bold Verse Numbers on"));
    }

    #[test]
    fn opened_references_are_deduplicated() {
        let mut state = reading_genesis_one();
        let verse = VerseRef::new("kjv", VerseKey::new("EXO", 1, 1));
        state.dispatch(ViewerCommand::OpenReference(verse.clone()));
        state.dispatch(ViewerCommand::OpenReference(verse.clone()));
        assert_eq!(state.opened_refs, vec![verse]);
    }
}

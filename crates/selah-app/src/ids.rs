// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ViewerError, ViewerResult};

pub const VERSE_TOKEN_SEPARATOR: char = '_';

macro_rules! string_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(TranslationId);
string_id!(BookId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChapterNumber {
    Intro,
    Numbered(u32),
}

impl ChapterNumber {
    pub fn parse(raw: &str) -> ViewerResult<Self> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("intro") {
            return Ok(Self::Intro);
        }
        parse_positive(trimmed, "chapter").map(Self::Numbered)
    }

    pub const fn number(self) -> Option<u32> {
        match self {
            Self::Intro => None,
            Self::Numbered(value) => Some(value),
        }
    }
}

impl fmt::Display for ChapterNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intro => f.write_str("intro"),
            Self::Numbered(value) => write!(f, "{value}"),
        }
    }
}

/// Accepts `"7"`, `" 07 "`; rejects zero, signs, and anything non-numeric.
pub fn parse_verse_number(raw: &str) -> ViewerResult<u32> {
    parse_positive(raw.trim(), "verse")
}

/// Normalizes a chapter/verse pair the way selection widgets hand them over.
pub fn parse_chapter_and_verse(chapter: &str, verse: &str) -> ViewerResult<(u32, u32)> {
    let chapter = parse_positive(chapter.trim(), "chapter")?;
    let verse = parse_verse_number(verse)?;
    Ok((chapter, verse))
}

fn parse_positive(raw: &str, label: &str) -> ViewerResult<u32> {
    let invalid = || ViewerError::invalid_input(format!("Invalid {label} number {raw:?}."));
    if raw.is_empty() || !raw.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(invalid());
    }
    match raw.parse::<u32>() {
        Ok(0) | Err(_) => Err(invalid()),
        Ok(value) => Ok(value),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChapterRef {
    pub book: BookId,
    pub chapter: ChapterNumber,
}

impl ChapterRef {
    pub fn new(book: impl Into<BookId>, chapter: ChapterNumber) -> Self {
        Self {
            book: book.into(),
            chapter,
        }
    }

    /// API chapter id, e.g. `GEN.1` or `GEN.intro`.
    pub fn id(&self) -> String {
        format!("{}.{}", self.book, self.chapter)
    }

    /// Prefix shared by every verse key in this chapter.
    pub fn verse_prefix(&self) -> String {
        format!("{}.{}.", self.book, self.chapter)
    }

    pub fn parse(raw: &str) -> ViewerResult<Self> {
        let (book, chapter) = raw
            .trim()
            .split_once('.')
            .ok_or_else(|| ViewerError::invalid_input(format!("Invalid chapter id {raw:?}.")))?;
        if book.is_empty() {
            return Err(ViewerError::invalid_input(format!(
                "Invalid chapter id {raw:?}."
            )));
        }
        Ok(Self::new(book, ChapterNumber::parse(chapter)?))
    }
}

impl fmt::Display for ChapterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.book, self.chapter)
    }
}

/// `"{book}.{chapter}.{verse}"`, the API verse id and cross-reference key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VerseKey {
    pub book: BookId,
    pub chapter: u32,
    pub verse: u32,
}

impl VerseKey {
    pub fn new(book: impl Into<BookId>, chapter: u32, verse: u32) -> Self {
        Self {
            book: book.into(),
            chapter,
            verse,
        }
    }

    pub fn parse(raw: &str) -> ViewerResult<Self> {
        let invalid = || ViewerError::invalid_input(format!("Invalid verse key {raw:?}."));
        let mut parts = raw.trim().split('.');
        let (Some(book), Some(chapter), Some(verse), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        if book.is_empty() {
            return Err(invalid());
        }
        let (chapter, verse) = parse_chapter_and_verse(chapter, verse)?;
        Ok(Self::new(book, chapter, verse))
    }

    pub fn chapter_ref(&self) -> ChapterRef {
        ChapterRef::new(self.book.clone(), ChapterNumber::Numbered(self.chapter))
    }
}

impl fmt::Display for VerseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.book, self.chapter, self.verse)
    }
}

/// A verse in a specific translation. Serialized as
/// `"{translation}_{book}_{chapter}_{verse}"` when passed between actions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VerseRef {
    pub translation: TranslationId,
    pub key: VerseKey,
}

impl VerseRef {
    pub fn new(translation: impl Into<TranslationId>, key: VerseKey) -> Self {
        Self {
            translation: translation.into(),
            key,
        }
    }

    pub fn to_token(&self) -> String {
        let sep = VERSE_TOKEN_SEPARATOR;
        format!(
            "{}{sep}{}{sep}{}{sep}{}",
            self.translation, self.key.book, self.key.chapter, self.key.verse
        )
    }

    pub fn parse_token(token: &str) -> ViewerResult<Self> {
        let parts: Vec<&str> = token.trim().split(VERSE_TOKEN_SEPARATOR).collect();
        let [translation, book, chapter, verse] = parts.as_slice() else {
            return Err(ViewerError::invalid_input(format!(
                "Invalid verse reference {token:?}; expected translation_book_chapter_verse."
            )));
        };
        if translation.is_empty() || book.is_empty() {
            return Err(ViewerError::invalid_input(format!(
                "Invalid verse reference {token:?}."
            )));
        }
        let (chapter, verse) = parse_chapter_and_verse(chapter, verse)?;
        Ok(Self::new(*translation, VerseKey::new(*book, chapter, verse)))
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_token())
    }
}

#[cfg(test)]
mod tests {
    use super::{ChapterNumber, ChapterRef, VerseKey, VerseRef, parse_chapter_and_verse};

    #[test]
    fn chapter_numbers_normalize_leading_zeros() {
        assert_eq!(ChapterNumber::parse("01"), Ok(ChapterNumber::Numbered(1)));
        assert_eq!(ChapterNumber::parse(" 12 "), Ok(ChapterNumber::Numbered(12)));
        assert_eq!(ChapterNumber::parse("INTRO"), Ok(ChapterNumber::Intro));
    }

    #[test]
    fn chapter_numbers_reject_garbage() {
        for raw in ["", "0", "-1", "1a", "one", "+3"] {
            let error = ChapterNumber::parse(raw).expect_err("should reject");
            assert!(error.is_invalid_input(), "{raw:?} gave {error}");
        }
    }

    #[test]
    fn chapter_and_verse_pair_parses() {
        assert_eq!(parse_chapter_and_verse("3", "016"), Ok((3, 16)));
        assert!(parse_chapter_and_verse("3", "x").is_err());
    }

    #[test]
    fn chapter_ref_formats_api_id_and_prefix() {
        let chapter = ChapterRef::new("JHN", ChapterNumber::Numbered(3));
        assert_eq!(chapter.id(), "JHN.3");
        assert_eq!(chapter.verse_prefix(), "JHN.3.");
        assert_eq!(ChapterRef::parse("JHN.intro").map(|c| c.chapter), Ok(ChapterNumber::Intro));
    }

    #[test]
    fn verse_key_parses_and_displays() {
        let key = VerseKey::parse("GEN.1.10").expect("valid key");
        assert_eq!(key, VerseKey::new("GEN", 1, 10));
        assert_eq!(key.to_string(), "GEN.1.10");
        assert!(VerseKey::parse("GEN.1").is_err());
        assert!(VerseKey::parse("GEN.1.2.3").is_err());
    }

    #[test]
    fn verse_token_round_trips() {
        let verse = VerseRef::new("de4e12af7f28f599-02", VerseKey::new("JHN", 3, 16));
        let token = verse.to_token();
        assert_eq!(token, "de4e12af7f28f599-02_JHN_3_16");
        assert_eq!(VerseRef::parse_token(&token), Ok(verse));
    }

    #[test]
    fn malformed_verse_token_is_invalid_input() {
        for token in ["", "abc_JHN_3", "abc_JHN_three_16", "_JHN_3_16", "a_b_c_d_e"] {
            let error = VerseRef::parse_token(token).expect_err("should reject");
            assert!(error.is_invalid_input(), "{token:?} gave {error}");
        }
    }
}

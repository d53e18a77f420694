// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::*;

/// One row of the static translation directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub id: TranslationId,
    pub name: String,
    pub abbreviation: String,
    pub language: String,
    pub script: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub name_local: String,
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub script_direction: String,
}

/// A translation as the scripture service describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BibleSummary {
    pub id: TranslationId,
    pub name: String,
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default)]
    pub name_local: String,
    #[serde(default)]
    pub description: Option<String>,
    pub language: Option<LanguageInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub id: BookId,
    pub name: String,
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default)]
    pub name_long: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSummary {
    pub id: String,
    pub book_id: BookId,
    pub number: String,
    #[serde(default)]
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterContent {
    pub id: String,
    pub book_id: BookId,
    pub number: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub copyright: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseContent {
    pub id: String,
    pub book_id: BookId,
    pub chapter_id: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseListing {
    pub id: String,
    #[serde(default)]
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassageContent {
    pub id: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub verse_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub verses: Vec<SearchHit>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayFormat {
    #[default]
    Paragraph,
    VerseByVerse,
}

impl DisplayFormat {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Paragraph => "Chapter (Paragraph View)",
            Self::VerseByVerse => "Verse by Verse",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "paragraph" | "chapter" => Some(Self::Paragraph),
            "verse" | "verses" | "verse-by-verse" => Some(Self::VerseByVerse),
            _ => None,
        }
    }
}

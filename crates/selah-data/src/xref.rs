// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use selah_app::ChapterRef;
use std::collections::{BTreeMap, HashMap};

/// Static verse-key to related-verse-keys table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossRefIndex {
    entries: BTreeMap<String, Vec<String>>,
}

impl CrossRefIndex {
    pub fn new(entries: HashMap<String, Vec<String>>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, verse_key: &str) -> Option<&[String]> {
        self.entries.get(verse_key).map(Vec::as_slice)
    }

    /// Entries whose key starts with `"{book}.{chapter}."`, in verse order.
    pub fn lookup_chapter(&self, book_id: &str, chapter: &str) -> ChapterRefs {
        let prefix = format!("{}.{}.", book_id.trim(), chapter.trim());
        self.lookup_prefix(&prefix)
    }

    pub fn lookup(&self, chapter: &ChapterRef) -> ChapterRefs {
        self.lookup_prefix(&chapter.verse_prefix())
    }

    fn lookup_prefix(&self, prefix: &str) -> ChapterRefs {
        let mut entries: Vec<(String, Vec<String>)> = self
            .entries
            .range(prefix.to_owned()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, refs)| (key.clone(), refs.clone()))
            .collect();
        entries.sort_by_key(|(key, _)| verse_sort_key(&key[prefix.len()..]));
        ChapterRefs { entries }
    }
}

/// Numeric verses first in numeric order, then anything else lexically.
fn verse_sort_key(verse: &str) -> (u8, u32, String) {
    match verse.parse::<u32>() {
        Ok(number) => (0, number, String::new()),
        Err(_) => (1, 0, verse.to_owned()),
    }
}

/// Cross references for one chapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterRefs {
    entries: Vec<(String, Vec<String>)>,
}

impl ChapterRefs {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn get(&self, verse_key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(key, _)| key == verse_key)
            .map(|(_, refs)| refs.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, refs)| (key.as_str(), refs.as_slice()))
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.entries.into_iter().collect()
    }
}

/// Keeps entries whose verse key contains `term`, ignoring case. Referenced
/// verse keys are not searched.
pub fn filter_by_substring(refs: &ChapterRefs, term: &str) -> ChapterRefs {
    let needle = term.trim().to_lowercase();
    let entries = refs
        .entries
        .iter()
        .filter(|(key, _)| key.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    ChapterRefs { entries }
}

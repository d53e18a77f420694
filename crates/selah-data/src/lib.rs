// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod resolve;
mod xref;

pub use resolve::{RESOLVE_CUTOFF, SUGGEST_CUTOFF, similarity};
pub use xref::{ChapterRefs, CrossRefIndex, filter_by_substring};

use anyhow::{Context, Result, anyhow, bail};
use selah_app::{BookId, Translation, TranslationId};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "selah";
pub const TRANSLATIONS_FILE: &str = "bible-id.json";
pub const ABBREVIATIONS_FILE: &str = "abbreviations.json";
pub const CROSS_REFS_FILE: &str = "cross_ref.json";

#[derive(Debug, Deserialize)]
struct RawTranslation {
    id: String,
    #[serde(default)]
    abbreviation: String,
    #[serde(default)]
    language: String,
    #[serde(default)]
    script: String,
}

#[derive(Debug, Deserialize)]
struct RawBook {
    id: String,
}

/// The three static lookup tables, loaded once and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    translations: BTreeMap<String, Translation>,
    books: BTreeMap<String, BookId>,
    cross_refs: CrossRefIndex,
}

impl ReferenceData {
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            bail!(
                "reference data directory {} does not exist; set [data].dir or SELAH_DATA_DIR",
                dir.display()
            );
        }

        let translations = read_table(&dir.join(TRANSLATIONS_FILE))?;
        let abbreviations = read_table(&dir.join(ABBREVIATIONS_FILE))?;
        let cross_refs = read_table(&dir.join(CROSS_REFS_FILE))?;
        let data = Self::from_json(&translations, &abbreviations, &cross_refs)
            .with_context(|| format!("decode reference data in {}", dir.display()))?;

        tracing::debug!(
            translations = data.translations.len(),
            books = data.books.len(),
            cross_refs = data.cross_refs.len(),
            "loaded reference data"
        );
        Ok(data)
    }

    pub fn from_json(translations: &str, abbreviations: &str, cross_refs: &str) -> Result<Self> {
        let raw_translations: BTreeMap<String, RawTranslation> = serde_json::from_str(translations)
            .with_context(|| format!("parse {TRANSLATIONS_FILE}"))?;
        let raw_books: BTreeMap<String, RawBook> = serde_json::from_str(abbreviations)
            .with_context(|| format!("parse {ABBREVIATIONS_FILE}"))?;
        let raw_refs: HashMap<String, Vec<String>> = serde_json::from_str(cross_refs)
            .with_context(|| format!("parse {CROSS_REFS_FILE}"))?;

        let translations = raw_translations
            .into_iter()
            .map(|(name, raw)| {
                let translation = Translation {
                    id: TranslationId::new(raw.id),
                    name: name.clone(),
                    abbreviation: raw.abbreviation,
                    language: raw.language,
                    script: raw.script,
                };
                (name, translation)
            })
            .collect();
        let books = raw_books
            .into_iter()
            .map(|(name, raw)| (name, BookId::new(raw.id)))
            .collect();

        Ok(Self {
            translations,
            books,
            cross_refs: CrossRefIndex::new(raw_refs),
        })
    }

    /// Translations keyed by display name, in name order.
    pub fn translations(&self) -> impl Iterator<Item = &Translation> {
        self.translations.values()
    }

    pub fn translation(&self, name: &str) -> Option<&Translation> {
        self.translations.get(name)
    }

    pub fn translation_by_id(&self, id: &str) -> Option<&Translation> {
        self.translations
            .values()
            .find(|translation| translation.id.as_str() == id)
    }

    /// Book-name or abbreviation keys mapped to canonical book ids.
    pub fn books(&self) -> impl Iterator<Item = (&str, &BookId)> {
        self.books.iter().map(|(name, id)| (name.as_str(), id))
    }

    pub fn cross_refs(&self) -> &CrossRefIndex {
        &self.cross_refs
    }
}

fn read_table(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read reference table {}", path.display()))
}

pub fn default_data_dir() -> Result<PathBuf> {
    if let Some(override_dir) = env::var_os("SELAH_DATA_DIR") {
        return Ok(PathBuf::from(override_dir));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set SELAH_DATA_DIR to the reference table folder")
    })?;
    Ok(data_root.join(APP_NAME).join("reference"))
}

#[cfg(test)]
mod tests {
    use super::ReferenceData;

    #[test]
    fn from_json_fills_translation_names_from_keys() -> anyhow::Result<()> {
        let data = ReferenceData::from_json(
            r#"{"World English Bible":{"id":"web-id","abbreviation":"WEB","language":"English","script":"Latin"}}"#,
            r#"{"Genesis":{"id":"GEN"}}"#,
            r#"{"GEN.1.1":["JHN.1.1"]}"#,
        )?;
        let translation = data
            .translation("World English Bible")
            .expect("translation present");
        assert_eq!(translation.name, "World English Bible");
        assert_eq!(translation.id.as_str(), "web-id");
        assert_eq!(
            data.translation_by_id("web-id").map(|t| t.abbreviation.as_str()),
            Some("WEB")
        );
        assert_eq!(data.cross_refs().len(), 1);
        Ok(())
    }

    #[test]
    fn from_json_rejects_malformed_tables() {
        let error = ReferenceData::from_json("{}", "[1,2]", "{}").expect_err("bad table");
        assert!(error.to_string().contains("abbreviations.json"));
    }

    #[test]
    fn translation_rows_without_optional_fields_still_load() -> anyhow::Result<()> {
        let data = ReferenceData::from_json(r#"{"Bare":{"id":"bare"}}"#, "{}", "{}")?;
        let translation = data.translation("Bare").expect("present");
        assert!(translation.language.is_empty());
        Ok(())
    }
}

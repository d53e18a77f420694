// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use selah_app::{BookId, LookupKind, TranslationId, ViewerError, ViewerResult};

use crate::ReferenceData;

/// Minimum similarity for a fuzzy candidate to stand in for the input.
pub const RESOLVE_CUTOFF: f64 = 0.6;
/// Minimum similarity for a candidate to be offered as "Did you mean".
pub const SUGGEST_CUTOFF: f64 = 0.4;

/// Normalized indel similarity in `0.0..=1.0`, case-insensitive.
pub fn similarity(left: &str, right: &str) -> f64 {
    let left = left.to_lowercase();
    let right = right.to_lowercase();
    rapidfuzz::fuzz::ratio(left.chars(), right.chars())
}

/// Best-scoring candidate; ties keep the earliest candidate.
fn closest<'a, I>(input: &str, candidates: I) -> Option<(&'a str, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, f64)> = None;
    for candidate in candidates {
        let score = similarity(input, candidate);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((candidate, score));
        }
    }
    best
}

enum FuzzyOutcome<'a> {
    Resolved(&'a str),
    Suggest(&'a str),
    Nothing,
}

fn fuzzy<'a, I>(input: &str, candidates: I) -> FuzzyOutcome<'a>
where
    I: IntoIterator<Item = &'a str>,
{
    match closest(input, candidates) {
        Some((candidate, score)) if score >= RESOLVE_CUTOFF => FuzzyOutcome::Resolved(candidate),
        Some((candidate, score)) if score >= SUGGEST_CUTOFF => FuzzyOutcome::Suggest(candidate),
        _ => FuzzyOutcome::Nothing,
    }
}

fn require_term(input: &str, what: &str) -> ViewerResult<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ViewerError::invalid_input(format!("Invalid {what} provided.")));
    }
    Ok(trimmed.to_owned())
}

impl ReferenceData {
    /// Translation id for an exact id, an exact name, or a close name.
    pub fn resolve_translation_id(&self, input: &str) -> ViewerResult<TranslationId> {
        let input = require_term(input, "translation")?;

        if let Some(translation) = self.translation_by_id(&input) {
            return Ok(translation.id.clone());
        }
        if let Some(translation) = self.translation(&input) {
            return Ok(translation.id.clone());
        }

        let names = self.translations().map(|translation| translation.name.as_str());
        match fuzzy(&input, names) {
            FuzzyOutcome::Resolved(name) => {
                tracing::debug!(input = %input, matched = name, "fuzzy translation match");
                self.translation(name)
                    .map(|translation| translation.id.clone())
                    .ok_or_else(|| ViewerError::not_found(LookupKind::Translation, &input, None))
            }
            FuzzyOutcome::Suggest(name) => Err(ViewerError::not_found(
                LookupKind::Translation,
                &input,
                Some(name.to_owned()),
            )),
            FuzzyOutcome::Nothing => Err(ViewerError::not_found(
                LookupKind::Translation,
                &input,
                None,
            )),
        }
    }

    /// Exact id, else the closest id. Names are not consulted.
    pub fn correct_translation_id(&self, input: &str) -> ViewerResult<TranslationId> {
        let input = require_term(input, "translation id")?;
        if let Some(translation) = self.translation_by_id(&input) {
            return Ok(translation.id.clone());
        }

        let ids = self.translations().map(|translation| translation.id.as_str());
        match fuzzy(&input, ids) {
            FuzzyOutcome::Resolved(id) => Ok(TranslationId::from(id)),
            FuzzyOutcome::Suggest(id) => Err(ViewerError::not_found(
                LookupKind::Translation,
                &input,
                Some(id.to_owned()),
            )),
            FuzzyOutcome::Nothing => Err(ViewerError::not_found(
                LookupKind::Translation,
                &input,
                None,
            )),
        }
    }

    /// Canonical book id for a book name, a canonical id, or a close name.
    pub fn resolve_book_abbreviation(&self, name: &str) -> ViewerResult<BookId> {
        let name = require_term(name, "book name")?;

        if let Some((_, id)) = self.books().find(|(key, _)| *key == name) {
            return Ok(id.clone());
        }
        if let Some((_, id)) = self.books().find(|(_, id)| id.as_str() == name) {
            return Ok(id.clone());
        }

        match fuzzy(&name, self.books().map(|(key, _)| key)) {
            FuzzyOutcome::Resolved(key) => {
                tracing::debug!(input = %name, matched = key, "fuzzy book match");
                self.books()
                    .find(|(candidate, _)| *candidate == key)
                    .map(|(_, id)| id.clone())
                    .ok_or_else(|| ViewerError::not_found(LookupKind::Book, &name, None))
            }
            FuzzyOutcome::Suggest(key) => Err(ViewerError::not_found(
                LookupKind::Book,
                &name,
                Some(key.to_owned()),
            )),
            FuzzyOutcome::Nothing => Err(ViewerError::not_found(LookupKind::Book, &name, None)),
        }
    }

    /// Closest book key worth offering in a "Did you mean" prompt.
    pub fn suggest_book(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        closest(name, self.books().map(|(key, _)| key))
            .filter(|(_, score)| *score >= SUGGEST_CUTOFF)
            .map(|(key, _)| key)
    }

    /// First translation whose name, abbreviation, language, or script
    /// contains `term`, ignoring case.
    pub fn find_translation(&self, term: &str) -> ViewerResult<(String, TranslationId)> {
        let raw = require_term(term, "search term")?;
        let term = raw.to_lowercase();
        self.translations()
            .find(|translation| {
                [
                    translation.name.as_str(),
                    translation.abbreviation.as_str(),
                    translation.language.as_str(),
                    translation.script.as_str(),
                ]
                .iter()
                .any(|value| value.to_lowercase().contains(&term))
            })
            .map(|translation| (translation.name.clone(), translation.id.clone()))
            .ok_or_else(|| ViewerError::not_found(LookupKind::Translation, &raw, None))
    }

    pub fn translations_by_language(&self, language: &str) -> Vec<(String, TranslationId)> {
        self.filter_translations(language, |translation| &translation.language)
    }

    pub fn translations_by_script(&self, script: &str) -> Vec<(String, TranslationId)> {
        self.filter_translations(script, |translation| &translation.script)
    }

    fn filter_translations<F>(&self, term: &str, field: F) -> Vec<(String, TranslationId)>
    where
        F: Fn(&selah_app::Translation) -> &String,
    {
        let term = term.trim().to_lowercase();
        self.translations()
            .filter(|translation| field(translation).to_lowercase().contains(&term))
            .map(|translation| (translation.name.clone(), translation.id.clone()))
            .collect()
    }
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Inline span classes the renderer styles. Anything else passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupClass {
    VerseNumber,
    SpeakerHighlight,
    AddedWord,
    DivineName,
    Other,
}

impl MarkupClass {
    const RULES: [(&'static str, Self); 4] = [
        ("v", Self::VerseNumber),
        ("wj", Self::SpeakerHighlight),
        ("add", Self::AddedWord),
        ("nd", Self::DivineName),
    ];

    /// Classifies a whitespace-separated `class` attribute. When several known
    /// classes are present the verse marker wins, then speaker, added, divine.
    pub fn from_class_attr(class: Option<&str>) -> Self {
        let Some(class) = class else {
            return Self::Other;
        };
        Self::RULES
            .iter()
            .find(|(name, _)| class.split_whitespace().any(|token| token == *name))
            .map_or(Self::Other, |(_, kind)| *kind)
    }
}

const INTRO_EXACT: [&str; 5] = ["ip", "ipr", "ipi", "im", "iot"];
const INTRO_NUMBERED: [&str; 4] = ["imt", "is", "io", "mt"];

/// Introduction and title paragraph classes (`ip`, `imt1`, `is2`, `mt`, ...).
pub fn is_intro_class(class: &str) -> bool {
    class.split_whitespace().any(|token| {
        INTRO_EXACT.contains(&token)
            || INTRO_NUMBERED.iter().any(|stem| {
                token
                    .strip_prefix(stem)
                    .is_some_and(|level| level.chars().all(|c| c.is_ascii_digit()))
            })
    })
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

/// Reader-facing toggles consulted at render time. Values are copied into each
/// render call; nothing here is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub color_jesus_words: bool,
    pub bold_verse_numbers: bool,
    pub show_clarifications: bool,
    pub capitalize_divine_names: bool,
    pub show_original_divine_names: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayToggle {
    ColorJesusWords,
    BoldVerseNumbers,
    ShowClarifications,
    CapitalizeDivineNames,
    ShowOriginalDivineNames,
}

impl DisplayToggle {
    pub const ALL: [Self; 5] = [
        Self::ColorJesusWords,
        Self::ShowClarifications,
        Self::BoldVerseNumbers,
        Self::CapitalizeDivineNames,
        Self::ShowOriginalDivineNames,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::ColorJesusWords => "Color Jesus' words in Red",
            Self::BoldVerseNumbers => "Bold Verse Numbers",
            Self::ShowClarifications => "Show Clarifications for Added Words",
            Self::CapitalizeDivineNames => "Capitalize All Divine Names",
            Self::ShowOriginalDivineNames => "Show Hebrew/Greek Divine Names in Parentheses",
        }
    }

    pub const fn flag(self) -> &'static str {
        match self {
            Self::ColorJesusWords => "--red-letters",
            Self::BoldVerseNumbers => "--bold-numbers",
            Self::ShowClarifications => "--clarifications",
            Self::CapitalizeDivineNames => "--capitalize-divine",
            Self::ShowOriginalDivineNames => "--original-divine",
        }
    }

    pub fn from_flag(flag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|toggle| toggle.flag() == flag)
    }
}

impl DisplaySettings {
    pub const fn get(self, toggle: DisplayToggle) -> bool {
        match toggle {
            DisplayToggle::ColorJesusWords => self.color_jesus_words,
            DisplayToggle::BoldVerseNumbers => self.bold_verse_numbers,
            DisplayToggle::ShowClarifications => self.show_clarifications,
            DisplayToggle::CapitalizeDivineNames => self.capitalize_divine_names,
            DisplayToggle::ShowOriginalDivineNames => self.show_original_divine_names,
        }
    }

    /// Returns a copy with one toggle set.
    #[must_use]
    pub const fn with(mut self, toggle: DisplayToggle, value: bool) -> Self {
        match toggle {
            DisplayToggle::ColorJesusWords => self.color_jesus_words = value,
            DisplayToggle::BoldVerseNumbers => self.bold_verse_numbers = value,
            DisplayToggle::ShowClarifications => self.show_clarifications = value,
            DisplayToggle::CapitalizeDivineNames => self.capitalize_divine_names = value,
            DisplayToggle::ShowOriginalDivineNames => self.show_original_divine_names = value,
        }
        self
    }

    #[must_use]
    pub const fn toggled(self, toggle: DisplayToggle) -> Self {
        let current = self.get(toggle);
        self.with(toggle, !current)
    }
}

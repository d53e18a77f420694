// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub const DEFAULT_GRID_COLUMNS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridButton {
    /// Unique widget key within one view.
    pub id: String,
    pub label: String,
    /// Verse key the button navigates to.
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ButtonGrid {
    pub rows: Vec<Vec<GridButton>>,
}

impl ButtonGrid {
    /// Lays out one button per verse key, `columns` per row.
    pub fn from_keys<I, S, F>(keys: I, columns: usize, mut make: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(&str) -> GridButton,
    {
        let columns = columns.max(1);
        let buttons: Vec<GridButton> = keys.into_iter().map(|key| make(key.as_ref())).collect();
        let rows = buttons
            .chunks(columns)
            .map(<[GridButton]>::to_vec)
            .collect();
        Self { rows }
    }

    /// Grid of the verses in a chapter that have cross references.
    pub fn for_chapter_verses<I, S>(verse_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_keys(verse_keys, DEFAULT_GRID_COLUMNS, |key| GridButton {
            id: format!("grid_{key}"),
            label: format!("Verse {key}"),
            target: key.to_owned(),
        })
    }

    /// Grid of the references attached to one verse.
    pub fn for_references<I, S>(verse_key: &str, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_keys(references, DEFAULT_GRID_COLUMNS, |reference| GridButton {
            id: format!("{verse_key}_{reference}"),
            label: reference.to_owned(),
            target: reference.to_owned(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn buttons(&self) -> impl Iterator<Item = &GridButton> {
        self.rows.iter().flatten()
    }

    pub fn find(&self, target: &str) -> Option<&GridButton> {
        self.buttons().find(|button| button.target == target)
    }
}

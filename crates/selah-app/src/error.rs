// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Translation,
    Book,
}

impl LookupKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Translation => "translation",
            Self::Book => "book",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerError {
    /// Identifier resolution failed. `suggestion` holds the closest key when
    /// one was near enough to show, but not near enough to resolve.
    NotFound {
        kind: LookupKind,
        input: String,
        suggestion: Option<String>,
    },
    /// Network or HTTP failure after the retry budget was spent.
    Fetch { url: String, message: String },
    ContentUnavailable { what: String },
    InvalidInput(String),
}

impl ViewerError {
    pub fn not_found(kind: LookupKind, input: &str, suggestion: Option<String>) -> Self {
        Self::NotFound {
            kind,
            input: input.to_owned(),
            suggestion,
        }
    }

    pub fn content_unavailable(what: impl Into<String>) -> Self {
        Self::ContentUnavailable { what: what.into() }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::NotFound { suggestion, .. } => suggestion.as_deref(),
            _ => None,
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub const fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }

    pub const fn is_content_unavailable(&self) -> bool {
        matches!(self, Self::ContentUnavailable { .. })
    }

    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Short inline message for the reader. Never includes transport details.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound {
                suggestion: Some(suggestion),
                ..
            } => format!("Did you mean: {suggestion}"),
            Self::NotFound { kind, input, .. } => {
                format!(
                    "No {} matches {input:?}. Please try a different term.",
                    kind.as_str()
                )
            }
            Self::Fetch { .. } => {
                "Could not fetch data from the scripture service. Please try again.".to_owned()
            }
            Self::ContentUnavailable { what } => {
                format!("Content for the selected {what} is not available.")
            }
            Self::InvalidInput(message) => message.clone(),
        }
    }
}

impl std::fmt::Display for ViewerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound {
                kind,
                input,
                suggestion: Some(suggestion),
            } => write!(
                f,
                "{} {input:?} not found; did you mean {suggestion:?}?",
                kind.as_str()
            ),
            Self::NotFound { kind, input, .. } => {
                write!(f, "{} {input:?} not found", kind.as_str())
            }
            Self::Fetch { url, message } => write!(f, "fetch {url} failed: {message}"),
            Self::ContentUnavailable { what } => write!(f, "{what} content is not available"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
        }
    }
}

impl std::error::Error for ViewerError {}

pub type ViewerResult<T> = std::result::Result<T, ViewerError>;

#[cfg(test)]
mod tests {
    use super::{LookupKind, ViewerError};

    #[test]
    fn not_found_with_suggestion_reads_as_did_you_mean() {
        let error = ViewerError::not_found(LookupKind::Book, "Genesys", Some("Genesis".to_owned()));
        assert_eq!(error.user_message(), "Did you mean: Genesis");
        assert_eq!(error.suggestion(), Some("Genesis"));
        assert!(error.to_string().contains("did you mean \"Genesis\""));
    }

    #[test]
    fn fetch_message_hides_transport_details() {
        let error = ViewerError::Fetch {
            url: "https://api.example/bibles".to_owned(),
            message: "connection refused".to_owned(),
        };
        assert!(!error.user_message().contains("connection refused"));
        assert!(error.to_string().contains("connection refused"));
        assert!(error.is_fetch());
    }

    #[test]
    fn content_unavailable_names_the_missing_thing() {
        let error = ViewerError::content_unavailable("chapter");
        assert_eq!(
            error.user_message(),
            "Content for the selected chapter is not available."
        );
    }
}

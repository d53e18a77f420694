// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod class;
mod tree;
mod verse;

pub use class::{MarkupClass, is_intro_class};
pub use verse::{extract_verse_text, format_verse_line};

use quick_xml::escape::partial_escape;
use selah_app::{DisplayFormat, DisplaySettings, ViewerError, ViewerResult};
use tree::{Element, Node};

pub const PARAGRAPH_SEPARATOR: &str = "\n \n";
pub const INTRO_SEPARATOR: &str = "\n\n";
pub const DIVINE_NAME_GLOSS: &str = " (YHWH)";
pub const CLARIFICATIONS_NOTE: &str =
    "Words in italics are added for clarity and were not present in the original text.";

/// Verse label used for added words that appear before any verse marker.
pub const PRELUDE_VERSE: &str = "0";

/// Added words per verse, in the order the verses appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClarificationIndex {
    entries: Vec<(String, Vec<String>)>,
}

impl ClarificationIndex {
    fn record(&mut self, verse: &str, word: &str) {
        match self.entries.iter_mut().find(|(label, _)| label == verse) {
            Some((_, words)) => words.push(word.to_owned()),
            None => self
                .entries
                .push((verse.to_owned(), vec![word.to_owned()])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of verses with at least one added word.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, verse: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(label, _)| label == verse)
            .map(|(_, words)| words.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(verse, words)| (verse.as_str(), words.as_slice()))
    }
}

/// Styled markup plus the added words found while producing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub markup: String,
    pub clarifications: ClarificationIndex,
}

/// Renders a chapter fragment. Each `<p>` becomes one block preceded by
/// [`PARAGRAPH_SEPARATOR`]; introduction chapters render as plain text.
pub fn render_chapter(html: &str, settings: DisplaySettings) -> ViewerResult<Rendered> {
    render_chapter_as(html, settings, DisplayFormat::Paragraph)
}

/// Like [`render_chapter`], but in verse-by-verse format every verse marker
/// starts a new block instead of every paragraph.
pub fn render_chapter_as(
    html: &str,
    settings: DisplaySettings,
    format: DisplayFormat,
) -> ViewerResult<Rendered> {
    let nodes = parse_content(html, "chapter")?;
    let mut paragraphs = Vec::new();
    collect_paragraphs(&nodes, &mut paragraphs);
    let Some(first) = paragraphs.first() else {
        return Err(ViewerError::content_unavailable("chapter"));
    };

    if first.class().is_some_and(is_intro_class) {
        tracing::debug!(paragraphs = paragraphs.len(), "rendering introduction");
        return Ok(Rendered {
            markup: render_intro(&paragraphs),
            clarifications: ClarificationIndex::default(),
        });
    }

    let mut renderer = InlineRenderer::new(settings, format);
    for paragraph in &paragraphs {
        match format {
            DisplayFormat::Paragraph => renderer.out.push_str(PARAGRAPH_SEPARATOR),
            DisplayFormat::VerseByVerse => {
                if !renderer.out.is_empty() && !renderer.out.ends_with(char::is_whitespace) {
                    renderer.out.push(' ');
                }
            }
        }
        renderer.render(&paragraph.children);
    }
    Ok(renderer.finish())
}

/// Renders a single-verse fragment with the chapter rules but without
/// paragraph separators. Paragraphs are joined with a newline.
pub fn render_verse(html: &str, settings: DisplaySettings) -> ViewerResult<Rendered> {
    let nodes = parse_content(html, "verse")?;
    let mut paragraphs = Vec::new();
    collect_paragraphs(&nodes, &mut paragraphs);

    let mut renderer = InlineRenderer::new(settings, DisplayFormat::Paragraph);
    if paragraphs.is_empty() {
        renderer.render(&nodes);
    } else {
        for (index, paragraph) in paragraphs.iter().enumerate() {
            if index > 0 {
                renderer.out.push('\n');
            }
            renderer.render(&paragraph.children);
        }
    }

    let rendered = renderer.finish();
    if rendered.markup.trim().is_empty() {
        return Err(ViewerError::content_unavailable("verse"));
    }
    Ok(rendered)
}

/// The "show clarifications" view: an explanatory line, then one
/// `"{verse}: word, word"` line per verse. Empty when nothing was added.
pub fn render_clarifications(index: &ClarificationIndex) -> String {
    if index.is_empty() {
        return String::new();
    }
    let mut lines = vec![CLARIFICATIONS_NOTE.to_owned()];
    lines.extend(
        index
            .iter()
            .map(|(verse, words)| format!("{verse}: {}", words.join(", "))),
    );
    lines.join("\n")
}

pub(crate) fn parse_content(html: &str, what: &str) -> ViewerResult<Vec<Node>> {
    if html.trim().is_empty() {
        return Err(ViewerError::content_unavailable(what));
    }
    tree::parse_fragment(html).map_err(|error| {
        tracing::warn!(%error, "unreadable {what} markup");
        ViewerError::content_unavailable(what)
    })
}

/// Outermost `<p>` elements in document order.
fn collect_paragraphs<'a>(nodes: &'a [Node], out: &mut Vec<&'a Element>) {
    for element in nodes.iter().filter_map(Node::as_element) {
        if element.name == "p" {
            out.push(element);
        } else {
            collect_paragraphs(&element.children, out);
        }
    }
}

fn render_intro(paragraphs: &[&Element]) -> String {
    paragraphs
        .iter()
        .map(|paragraph| paragraph.text().trim().to_owned())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(INTRO_SEPARATOR)
}

struct InlineRenderer {
    settings: DisplaySettings,
    format: DisplayFormat,
    current_verse: Option<String>,
    clarifications: ClarificationIndex,
    out: String,
}

impl InlineRenderer {
    fn new(settings: DisplaySettings, format: DisplayFormat) -> Self {
        Self {
            settings,
            format,
            current_verse: None,
            clarifications: ClarificationIndex::default(),
            out: String::new(),
        }
    }

    fn render(&mut self, nodes: &[Node]) {
        for node in nodes {
            match node {
                Node::Text(text) => self.out.push_str(&partial_escape(text.as_str())),
                Node::Element(element) => self.render_element(element),
            }
        }
    }

    fn render_element(&mut self, element: &Element) {
        let text = element.text();
        match MarkupClass::from_class_attr(element.class()) {
            MarkupClass::VerseNumber => {
                let label = text.trim();
                if self.format == DisplayFormat::VerseByVerse {
                    self.out.push_str(PARAGRAPH_SEPARATOR);
                }
                let weight = if self.settings.bold_verse_numbers {
                    "bold"
                } else {
                    "normal"
                };
                self.out.push_str(&format!(
                    r#"<sub style="font-weight: {weight}">[{}]</sub>"#,
                    partial_escape(label)
                ));
                self.current_verse = Some(label.to_owned());
            }
            MarkupClass::SpeakerHighlight => {
                let color = if self.settings.color_jesus_words {
                    "red"
                } else {
                    "inherit"
                };
                self.out.push_str(&format!(
                    r#"<span style="color: {color}">{}</span>"#,
                    partial_escape(text.as_str())
                ));
            }
            MarkupClass::AddedWord => {
                let verse = self.current_verse.as_deref().unwrap_or(PRELUDE_VERSE);
                self.out.push_str(&format!(
                    r#"<span id="{}_add" style="font-style: italic;">{}</span>"#,
                    partial_escape(verse),
                    partial_escape(text.as_str())
                ));
                let word = text.trim();
                if !word.is_empty() {
                    self.clarifications.record(verse, word);
                }
            }
            MarkupClass::DivineName => {
                let mut name = if self.settings.capitalize_divine_names {
                    text.to_uppercase()
                } else {
                    text
                };
                if self.settings.show_original_divine_names {
                    name.push_str(DIVINE_NAME_GLOSS);
                }
                self.out
                    .push_str(&format!("<span>{}</span>", partial_escape(name.as_str())));
            }
            MarkupClass::Other => self.out.push_str(&element.inner_markup()),
        }
    }

    fn finish(self) -> Rendered {
        Rendered {
            markup: self.out,
            clarifications: self.clarifications,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ClarificationIndex, render_clarifications};

    #[test]
    fn clarification_index_groups_words_by_verse() {
        let mut index = ClarificationIndex::default();
        index.record("2", "was");
        index.record("3", "for");
        index.record("2", "it");
        assert_eq!(index.len(), 2);
        assert_eq!(
            index.get("2"),
            Some(&["was".to_owned(), "it".to_owned()][..])
        );
        let verses: Vec<&str> = index.iter().map(|(verse, _)| verse).collect();
        assert_eq!(verses, vec!["2", "3"]);
    }

    #[test]
    fn empty_index_renders_nothing() {
        assert!(render_clarifications(&ClarificationIndex::default()).is_empty());
    }
}

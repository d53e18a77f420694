// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use selah_app::{VerseKey, ViewerError, ViewerResult};

use crate::MarkupClass;
use crate::tree::{Node, collect_text};

/// Plain text of a verse fragment: whatever follows the first verse-number
/// marker up to the next one, or the whole fragment when there is no marker.
pub fn extract_verse_text(html: &str) -> ViewerResult<String> {
    let nodes = crate::parse_content(html, "verse")?;
    let text = match text_after_marker(&nodes) {
        Some(text) => text,
        None => {
            let mut all = String::new();
            collect_text(&nodes, &mut all);
            all
        }
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(ViewerError::content_unavailable("verse"));
    }
    Ok(text.to_owned())
}

fn is_marker(node: &Node) -> bool {
    node.as_element().is_some_and(|element| {
        MarkupClass::from_class_attr(element.class()) == MarkupClass::VerseNumber
    })
}

fn text_after_marker(nodes: &[Node]) -> Option<String> {
    for (index, node) in nodes.iter().enumerate() {
        if is_marker(node) {
            let mut text = String::new();
            let following = nodes[index + 1..]
                .iter()
                .take_while(|sibling| !is_marker(sibling));
            for sibling in following {
                collect_text(std::slice::from_ref(sibling), &mut text);
            }
            return Some(text);
        }
        if let Some(element) = node.as_element()
            && let Some(text) = text_after_marker(&element.children)
        {
            return Some(text);
        }
    }
    None
}

/// `"**{book} {chapter}:{verse}** - {text}"`.
pub fn format_verse_line(key: &VerseKey, text: &str) -> String {
    format!(
        "**{} {}:{}** - {}",
        key.book,
        key.chapter,
        key.verse,
        text.trim()
    )
}

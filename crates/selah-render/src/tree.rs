// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use quick_xml::Reader;
use std::borrow::Cow;
use quick_xml::escape::{escape, partial_escape, resolve_html5_entity, unescape};
use quick_xml::events::{BytesStart, Event};

/// Parsed markup fragment node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
    self_closing: bool,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn class(&self) -> Option<&str> {
        self.attr("class")
    }

    /// Concatenated text of every descendant.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Children re-serialized as markup.
    pub fn inner_markup(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_markup(&mut out);
        }
        out
    }
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    fn write_markup(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(&partial_escape(text.as_str())),
            Self::Element(element) => {
                out.push('<');
                out.push_str(&element.name);
                for (key, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    out.push_str(&escape(value.as_str()));
                    out.push('"');
                }
                if element.self_closing && element.children.is_empty() {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                for child in &element.children {
                    child.write_markup(out);
                }
                out.push_str("</");
                out.push_str(&element.name);
                out.push('>');
            }
        }
    }
}

pub(crate) fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => collect_text(&element.children, out),
        }
    }
}

/// Parses an HTML-ish fragment. Mismatched or missing end tags are tolerated:
/// an end tag closes the nearest open element with the same name, and
/// anything still open at the end is closed implicitly. A bare `&` or a `<`
/// that does not open a tag is kept as literal text.
pub(crate) fn parse_fragment(html: &str) -> Result<Vec<Node>, quick_xml::Error> {
    let source = escape_stray_markup(html);
    let mut reader = Reader::from_str(&source);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut roots: Vec<Node> = Vec::new();
    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(element_from_start(&reader, &e, false)),
            Event::Empty(e) => {
                let element = element_from_start(&reader, &e, true);
                append(&mut stack, &mut roots, Node::Element(element));
            }
            Event::End(e) => {
                let name = decode_name(&reader, e.name().as_ref());
                if let Some(position) = stack.iter().rposition(|open| open.name == name) {
                    while stack.len() > position {
                        if let Some(closed) = stack.pop() {
                            append(&mut stack, &mut roots, Node::Element(closed));
                        }
                    }
                }
            }
            Event::Text(e) => {
                let text = e.decode()?;
                append_text(&mut stack, &mut roots, &text);
            }
            Event::CData(e) => {
                let text = reader.decoder().decode(&e)?;
                append_text(&mut stack, &mut roots, &text);
            }
            Event::GeneralRef(e) => {
                let name = e.decode()?;
                append_text(&mut stack, &mut roots, &resolve_entity(&name));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    while let Some(unclosed) = stack.pop() {
        append(&mut stack, &mut roots, Node::Element(unclosed));
    }
    Ok(roots)
}

fn escape_stray_markup(html: &str) -> Cow<'_, str> {
    if !html.contains(['&', '<']) {
        return Cow::Borrowed(html);
    }
    let mut out = String::with_capacity(html.len() + 8);
    for (index, c) in html.char_indices() {
        let rest = &html[index + c.len_utf8()..];
        match c {
            '&' if !starts_reference(rest) => out.push_str("&amp;"),
            '<' if !starts_tag(rest) => out.push_str("&lt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// `name;`, `#123;` or `#x1F;` follows the ampersand.
fn starts_reference(rest: &str) -> bool {
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '#'))
        .unwrap_or(rest.len());
    if !rest[end..].starts_with(';') {
        return false;
    }
    let name = &rest[..end];
    if let Some(number) = name.strip_prefix('#') {
        let (digits, radix) = match number.strip_prefix(['x', 'X']) {
            Some(hex) => (hex, 16),
            None => (number, 10),
        };
        return !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
    }
    name.starts_with(|c: char| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric())
}

fn starts_tag(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        Some('/') => chars.next().is_some_and(|c| c.is_ascii_alphabetic()),
        Some(c) => c.is_ascii_alphabetic() || c == '!' || c == '?',
        None => false,
    }
}

fn element_from_start(reader: &Reader<&[u8]>, e: &BytesStart<'_>, self_closing: bool) -> Element {
    let attrs = e
        .html_attributes()
        .flatten()
        .map(|attr| {
            let key = decode_name(reader, attr.key.as_ref());
            let raw = reader.decoder().decode(&attr.value).unwrap_or_default();
            let value = unescape(&raw)
                .map(|value| value.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            (key, value)
        })
        .collect();
    Element {
        name: decode_name(reader, e.name().as_ref()),
        attrs,
        children: Vec::new(),
        self_closing,
    }
}

fn decode_name(reader: &Reader<&[u8]>, raw: &[u8]) -> String {
    reader
        .decoder()
        .decode(raw)
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Character references and XML entities first, then the HTML5 table. Unknown
/// names are kept literally.
fn resolve_entity(name: &str) -> String {
    let reference = format!("&{name};");
    if let Ok(resolved) = unescape(&reference) {
        return resolved.into_owned();
    }
    match resolve_html5_entity(name) {
        Some(resolved) => resolved.to_owned(),
        None => reference,
    }
}

fn append(stack: &mut [Element], roots: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

fn append_text(stack: &mut [Element], roots: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    let siblings = match stack.last_mut() {
        Some(parent) => &mut parent.children,
        None => roots,
    };
    if let Some(Node::Text(previous)) = siblings.last_mut() {
        previous.push_str(text);
    } else {
        siblings.push(Node::Text(text.to_owned()));
    }
}

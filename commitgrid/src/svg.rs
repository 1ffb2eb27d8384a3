// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Minimal SVG element tree.
//!
//! Documents are assembled as [`Element`] values and serialized once. All
//! attribute values and text content pass through [`escape_xml`], so display
//! names and free-form banner text cannot break the markup.

use std::{borrow::Cow, fmt::Display};

/// SVG namespace declared on root documents.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// A single XML element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name:       &'static str,
    attributes: Vec<(&'static str, String)>,
    text:       Option<String>,
    children:   Vec<Element>
}

impl Element {
    /// Creates an empty element.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            text: None,
            children: Vec::new()
        }
    }

    /// Creates a root `<svg>` element with namespace, size and viewBox.
    pub fn svg(width: u32, height: u32) -> Self {
        Self::new("svg")
            .attr("xmlns", SVG_NAMESPACE)
            .attr("width", width)
            .attr("height", height)
            .attr("viewBox", format!("0 0 {width} {height}"))
    }

    /// Appends an attribute. Later duplicates replace earlier values.
    pub fn attr(mut self, name: &'static str, value: impl Display) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Sets an attribute in place.
    pub fn set_attr(&mut self, name: &'static str, value: impl Display) {
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value))
        }
    }

    /// Sets the text content.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Appends a child element.
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Appends a child element in place.
    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Appends several children in place.
    pub fn extend<I>(&mut self, children: I)
    where
        I: IntoIterator<Item = Element>
    {
        self.children.extend(children);
    }

    /// Element name.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Value of an attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Direct children.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Serializes the element and its subtree.
    pub fn render(&self) -> String {
        let mut output = String::with_capacity(4096);
        self.write_into(&mut output, 0);
        output
    }

    /// Serializes the element as a standalone document with an XML
    /// declaration.
    pub fn render_document(&self) -> String {
        let mut output = String::with_capacity(16 * 1024);
        output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        self.write_into(&mut output, 0);
        output
    }

    fn write_into(&self, output: &mut String, depth: usize) {
        for _ in 0..depth {
            output.push_str("  ");
        }
        output.push('<');
        output.push_str(self.name);
        for (name, value) in &self.attributes {
            output.push(' ');
            output.push_str(name);
            output.push_str("=\"");
            output.push_str(&escape_xml(value));
            output.push('"');
        }

        match (&self.text, self.children.is_empty()) {
            (None, true) => output.push_str("/>\n"),
            (Some(text), true) => {
                output.push('>');
                output.push_str(&escape_xml(text));
                self.write_close(output);
            }
            (text, false) => {
                output.push('>');
                if let Some(text) = text {
                    output.push_str(&escape_xml(text));
                }
                output.push('\n');
                for child in &self.children {
                    child.write_into(output, depth + 1);
                }
                for _ in 0..depth {
                    output.push_str("  ");
                }
                self.write_close(output);
            }
        }
    }

    fn write_close(&self, output: &mut String) {
        output.push_str("</");
        output.push_str(self.name);
        output.push_str(">\n");
    }
}

/// Escapes the five XML special characters.
///
/// Borrows the input when nothing needs escaping.
pub fn escape_xml(value: &str) -> Cow<'_, str> {
    if value
        .chars()
        .any(|character| matches!(character, '&' | '<' | '>' | '"' | '\''))
    {
        let mut escaped = String::with_capacity(value.len() + 8);
        for character in value.chars() {
            match character {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&apos;"),
                other => escaped.push(other)
            }
        }
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(value)
    }
}

//! XML element tree

use indexmap::IndexMap;

/// Parsed XML document
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub root: Element,
}

/// XML element
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Content>,
}

/// XML content node
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Element(Element),
    Text(String),
    CData(String),
}

impl Element {
    /// Creates an element with no attributes or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Iterates over child elements, skipping text
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Content::Element(element) => Some(element),
            Content::Text(_) | Content::CData(_) => None,
        })
    }

    /// Concatenated character data of this element, excluding descendants.
    ///
    /// Returns `None` when the element carries no text at all.
    pub fn text(&self) -> Option<String> {
        let mut parts = self.children.iter().filter_map(|child| match child {
            Content::Text(text) | Content::CData(text) => Some(text.as_str()),
            Content::Element(_) => None,
        });
        let first = parts.next()?;
        let mut text = first.to_string();
        for part in parts {
            text.push_str(part);
        }
        Some(text)
    }
}

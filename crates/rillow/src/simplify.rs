//! XML element tree to [`Node`] tree conversion

use crate::node::{Mapping, Node, Sequence};
use crate::xml::model::{Document as XmlDocument, Element};

/// Default key for element text that sits next to attributes or children
pub const DEFAULT_CONTENT_KEY: &str = "content";

/// What an element with no attributes, children or text turns into
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmptyElement {
    /// An empty scalar
    #[default]
    EmptyString,
    /// An empty mapping
    Mapping,
    /// Nothing; the element is left out of its parent
    Skip,
}

/// Controls how elements are folded into mappings, sequences and scalars
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimplifyOptions {
    /// Keep the root element as the single top-level key
    pub keep_root: bool,
    /// Store every child element as a sequence, even when it occurs once
    pub force_array: bool,
    /// Key for text of elements that also carry attributes or children
    pub content_key: String,
    pub empty_element: EmptyElement,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            keep_root: false,
            force_array: false,
            content_key: DEFAULT_CONTENT_KEY.to_string(),
            empty_element: EmptyElement::default(),
        }
    }
}

/// Fold a parsed XML document into a document tree
pub fn simplify(doc: &XmlDocument, options: &SimplifyOptions) -> Node {
    let root = element_to_node(&doc.root, options).unwrap_or_else(|| Node::Mapping(Mapping::new()));
    if !options.keep_root {
        return root;
    }

    let mut top = Mapping::with_capacity(1);
    top.insert(&doc.root.name, wrap(root, options));
    Node::Mapping(top)
}

/// Returns `None` only for empty elements under [`EmptyElement::Skip`]
fn element_to_node(element: &Element, options: &SimplifyOptions) -> Option<Node> {
    let text = element
        .text()
        .filter(|text| !text.trim().is_empty());
    let has_children = element.elements().next().is_some();

    if element.attributes.is_empty() && !has_children {
        return match (text, options.empty_element) {
            (Some(text), _) => Some(Node::Scalar(text)),
            (None, EmptyElement::EmptyString) => Some(Node::Scalar(String::new())),
            (None, EmptyElement::Mapping) => Some(Node::Mapping(Mapping::new())),
            (None, EmptyElement::Skip) => None,
        };
    }

    let mut mapping = Mapping::with_capacity(element.attributes.len());
    for (name, value) in &element.attributes {
        mapping.append(name.as_str(), value.as_str());
    }

    for child in element.elements() {
        let Some(value) = element_to_node(child, options) else {
            continue;
        };
        if options.force_array && !mapping.contains_key(&child.name) {
            mapping.insert(&child.name, Node::Sequence(Sequence::from(vec![value])));
        } else {
            mapping.append(child.name.as_str(), value);
        }
    }

    if let Some(text) = text {
        mapping.append(options.content_key.as_str(), text);
    }

    Some(Node::Mapping(mapping))
}

fn wrap(node: Node, options: &SimplifyOptions) -> Node {
    if options.force_array {
        Node::Sequence(Sequence::from(vec![node]))
    } else {
        node
    }
}

//! Document tree built from a web service response
//!
//! A response becomes a tree of [`Node`]s: mappings keyed by attribute and
//! element names, sequences for repeated elements, and string scalars for
//! attribute values and element text. Mappings keep parse order, which is
//! the order [`Node::find`] visits siblings in.

use indexmap::map::{Entry, IntoIter, Iter, Keys, Values};
use indexmap::IndexMap;
use std::ops::Index;

/// A node of the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Attribute/element names to nodes, in parse order
    Mapping(Mapping),
    /// Repeated elements, in document order
    Sequence(Sequence),
    /// Attribute value or element text
    Scalar(String),
}

impl Default for Node {
    fn default() -> Self {
        Self::Scalar(String::new())
    }
}

impl Node {
    /// Returns true if this node is a mapping
    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    /// Returns true if this node is a sequence
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    /// Returns true if this node is a scalar
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Returns the mapping if this is a mapping, None otherwise
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the sequence if this is a sequence, None otherwise
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Self::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the text if this is a scalar, None otherwise
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a direct child of a mapping
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Finds the value of the first `key` reachable from this node.
    ///
    /// Depth-first and pre-order: a mapping's own keys are checked before any
    /// of its children are entered, siblings are visited in parse order and
    /// sequence items by index. `None` means the key occurs nowhere, which is
    /// distinct from finding an empty scalar.
    pub fn find(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Mapping(mapping) => mapping.find(key),
            Self::Sequence(sequence) => sequence.find(key),
            Self::Scalar(_) => None,
        }
    }

    /// Like [`Node::find`], but only succeeds when the match is a scalar
    pub fn find_str(&self, key: &str) -> Option<&str> {
        self.find(key).and_then(Self::as_str)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_owned())
    }
}

impl From<Mapping> for Node {
    fn from(value: Mapping) -> Self {
        Self::Mapping(value)
    }
}

impl From<Sequence> for Node {
    fn from(value: Sequence) -> Self {
        Self::Sequence(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(nodes: Vec<Node>) -> Self {
        Self::Sequence(Sequence(nodes))
    }
}

impl From<IndexMap<String, Node>> for Node {
    fn from(map: IndexMap<String, Node>) -> Self {
        Self::Mapping(Mapping(map))
    }
}

/// An order-preserving mapping of names to nodes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mapping(pub(crate) IndexMap<String, Node>);

impl Mapping {
    /// Creates a new empty mapping
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Creates a new mapping with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    /// Returns the number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the mapping has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the node stored under `key`
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.0.get(key)
    }

    /// Returns true if the mapping contains `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Inserts a node, replacing and returning any previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Node>) -> Option<Node> {
        self.0.insert(key.into(), value.into())
    }

    /// Inserts a node, turning an existing entry under the same key into a
    /// sequence that holds both
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<Node>) {
        let value = value.into();
        match self.0.entry(key.into()) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(mut entry) => match entry.get_mut() {
                Node::Sequence(items) => items.push(value),
                existing => {
                    let first = std::mem::take(existing);
                    *existing = Node::Sequence(Sequence(vec![first, value]));
                }
            },
        }
    }

    /// Returns an iterator over the keys in parse order
    pub fn keys(&self) -> Keys<'_, String, Node> {
        self.0.keys()
    }

    /// Returns an iterator over the values in parse order
    pub fn values(&self) -> Values<'_, String, Node> {
        self.0.values()
    }

    /// Returns an iterator over entries in parse order
    pub fn iter(&self) -> Iter<'_, String, Node> {
        self.0.iter()
    }

    /// See [`Node::find`]
    pub fn find(&self, key: &str) -> Option<&Node> {
        self.get(key)
            .or_else(|| self.values().find_map(|child| child.find(key)))
    }
}

impl Index<&str> for Mapping {
    type Output = Node;

    #[allow(clippy::indexing_slicing)]
    fn index(&self, key: &str) -> &Self::Output {
        &self.0[key]
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = (&'a String, &'a Node);
    type IntoIter = Iter<'a, String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Node);
    type IntoIter = IntoIter<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<IndexMap<String, Node>> for Mapping {
    fn from(map: IndexMap<String, Node>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Node>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Repeated elements in document order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sequence(pub(crate) Vec<Node>);

impl Sequence {
    /// Creates a new empty sequence
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns the number of items
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the sequence has no items
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the item at `index`
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.0.get(index)
    }

    /// Appends an item
    pub fn push(&mut self, value: impl Into<Node>) {
        self.0.push(value.into());
    }

    /// Returns an iterator over the items
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.0.iter()
    }

    /// See [`Node::find`]
    pub fn find(&self, key: &str) -> Option<&Node> {
        self.iter().find_map(|item| item.find(key))
    }
}

impl Index<usize> for Sequence {
    type Output = Node;

    #[allow(clippy::indexing_slicing)]
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Sequence {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<Vec<Node>> for Sequence {
    fn from(nodes: Vec<Node>) -> Self {
        Self(nodes)
    }
}

impl<V: Into<Node>> FromIterator<V> for Sequence {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(feature = "serde")]
mod ser {
    use super::{Mapping, Node, Sequence};
    use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

    impl Serialize for Node {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::Mapping(mapping) => mapping.serialize(serializer),
                Self::Sequence(sequence) => sequence.serialize(serializer),
                Self::Scalar(text) => serializer.serialize_str(text),
            }
        }
    }

    impl Serialize for Mapping {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (key, value) in self {
                map.serialize_entry(key, value)?;
            }
            map.end()
        }
    }

    impl Serialize for Sequence {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for item in self {
                seq.serialize_element(item)?;
            }
            seq.end()
        }
    }
}

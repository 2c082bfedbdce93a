//! Read-only access to a parsed response

use crate::node::Node;

/// A parsed web service response.
///
/// Wraps the document tree of exactly one response. The tree is never
/// modified after construction.
///
/// ```
/// use rillow::{Document, Mapping, Node};
///
/// let result: Mapping = [("zpid", "48749425")].into_iter().collect();
/// let response: Mapping = [("result", Node::from(result))].into_iter().collect();
/// let doc = Document::new(Node::from(response));
///
/// assert_eq!(doc.find_text("zpid"), Some("48749425"));
/// assert!(doc.find_attribute("valuationRange").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    tree: Node,
}

impl Document {
    pub fn new(tree: Node) -> Self {
        Self { tree }
    }

    /// The wrapped tree itself, not a copy
    pub fn to_plain_structure(&self) -> &Node {
        &self.tree
    }

    /// Gives up the accessor and returns the owned tree
    pub fn into_plain_structure(self) -> Node {
        self.tree
    }

    /// First value stored under `name` anywhere in the tree.
    ///
    /// See [`Node::find`] for the visiting order. `None` means `name` is not
    /// present; a present but empty value is `Some(Node::Scalar(""))`.
    pub fn find_attribute(&self, name: &str) -> Option<&Node> {
        self.tree.find(name)
    }

    /// Like [`Document::find_attribute`], but only for scalar values
    pub fn find_text(&self, name: &str) -> Option<&str> {
        self.tree.find_str(name)
    }
}

impl From<Node> for Document {
    fn from(tree: Node) -> Self {
        Self::new(tree)
    }
}

impl AsRef<Node> for Document {
    fn as_ref(&self) -> &Node {
        &self.tree
    }
}

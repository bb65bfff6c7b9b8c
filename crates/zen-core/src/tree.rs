//! Expanded node tree produced by the builder
//!
//! Every node except the virtual root has exactly one parent; children are
//! owned in order, so the tree is acyclic by construction.

use indexmap::IndexMap;

/// Position of a node among the copies produced by a multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repetition {
    /// Zero-based copy index
    pub index: usize,
    /// Total number of copies
    pub count: usize,
}

impl Repetition {
    pub fn new(index: usize, count: usize) -> Self {
        Self { index, count }
    }
}

impl Default for Repetition {
    fn default() -> Self {
        Self { index: 0, count: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Virtual root holding the top-level siblings
    Root,
    /// Element with its (unresolved) tag name
    Element(String),
    /// Text literal from the abbreviation, subject to `$` numbering
    Text(String),
    /// Caller-supplied text inserted as-is
    Verbatim(String),
    /// Explicit caret position
    Caret,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    /// Attributes in insertion order
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Node>,
    /// Set on copies made by a multiplier; descendants inherit it
    pub repetition: Option<Repetition>,
    /// Childless and either void or explicitly closed with `/`
    pub self_closing: bool,
}

impl Node {
    fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            attributes: IndexMap::new(),
            children: Vec::new(),
            repetition: None,
            self_closing: false,
        }
    }

    pub fn root() -> Self {
        Self::with_kind(NodeKind::Root)
    }

    pub fn element(name: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Element(name.into()))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Text(text.into()))
    }

    pub fn verbatim(text: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Verbatim(text.into()))
    }

    pub fn caret() -> Self {
        Self::with_kind(NodeKind::Caret)
    }

    /// Tag name, absent for everything but elements
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Follow the last element child down as far as it goes
    ///
    /// Returns `None` when this node has no element children.
    pub fn innermost_last_element_mut(&mut self) -> Option<&mut Node> {
        let index = self.children.iter().rposition(Node::is_element)?;
        let child = &mut self.children[index];
        if child.children.iter().any(Node::is_element) {
            child.innermost_last_element_mut()
        } else {
            Some(child)
        }
    }
}

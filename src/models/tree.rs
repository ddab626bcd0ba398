//! Arena-backed text tree
//!
//! One tree per managed container; the root node is the container element.
//! Nodes live in a slot vector and are referenced by [`NodeId`]. Parent and
//! child links are kept consistent by the mutation methods so the materializer
//! can split and merge text runs in place.

use super::style::InlineStyle;
use crate::error::{Result, TabstopsError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Handle to a node in a [`TextTree`]
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Who created an element
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Provenance {
    /// Part of the content as supplied; never removed by tab layout
    #[default]
    Authored,
    /// Created from a literal tab; reversible
    Materialized,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub style: InlineStyle,
    pub provenance: Provenance,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            style: InlineStyle::default(),
            provenance: Provenance::Authored,
        }
    }

    /// An empty tab-marker unit created from a literal tab
    pub fn tab_marker(tag: &str, class: &str) -> Self {
        let mut element = Self::new(tag);
        element.classes.push(class.to_string());
        element.provenance = Provenance::Materialized;
        element
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// `tag.class` selector match; tag names compare case-insensitively
    pub fn matches(&self, tag: &str, class: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag) && self.has_class(class)
    }

    pub fn is_materialized(&self) -> bool {
        self.provenance == Provenance::Materialized
    }
}

/// Value of the attribute that identifies bar overlays
pub const OVERLAY_MARKER: &str = "bar";

/// Full-height vertical rule drawn for a `bar` tab stop
///
/// Anchored at the container's top-left and sized in container pixels.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BarOverlay {
    /// Value of the `data-tabstops` attribute
    pub marker: String,
    pub offset: f32,
    pub width: f32,
    pub height: f32,
    pub view_box: String,
    pub path: String,
    pub stroke: String,
}

impl BarOverlay {
    pub fn new(offset: f32, height: f32) -> Self {
        let width = offset + 1.0;
        Self {
            marker: OVERLAY_MARKER.to_string(),
            offset,
            width,
            height,
            view_box: format!("0 0 {} {}", width, height),
            path: format!("M{},0 v {}", offset, height),
            stroke: "#000".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Text(String),
    Element(Element),
    /// Decorative overlay; absolutely positioned, takes no inline space
    Overlay(BarOverlay),
    /// Zero-width measurement point, present only for one measurement
    Probe,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Arena of nodes rooted at the container element
#[derive(Clone, Debug)]
pub struct TextTree {
    slots: Vec<Option<Node>>,
    root: NodeId,
    revision: u64,
}

impl TextTree {
    /// Create a tree holding only the container element
    pub fn new(container: Element) -> Self {
        Self {
            slots: vec![Some(Node {
                kind: NodeKind::Element(container),
                parent: None,
                children: Vec::new(),
            })],
            root: NodeId(0),
            revision: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Incremented on every mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The container element
    pub fn container(&self) -> &Element {
        match self.kind(self.root) {
            Some(NodeKind::Element(element)) => element,
            _ => unreachable!("tree root is always an element"),
        }
    }

    pub fn container_mut(&mut self) -> &mut Element {
        let root = self.root;
        match self.element_mut(root) {
            Some(element) => element,
            None => unreachable!("tree root is always an element"),
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(TabstopsError::UnknownNode(id.0))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|n| &n.kind)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.kind(id) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.revision += 1;
        match self.slots.get_mut(id.0).and_then(Option::as_mut) {
            Some(Node {
                kind: NodeKind::Element(element),
                ..
            }) => Some(element),
            _ => None,
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        self.text(id).is_some()
    }

    pub fn set_text(&mut self, id: NodeId, value: String) -> Result<()> {
        self.revision += 1;
        match &mut self.node_mut(id)?.kind {
            NodeKind::Text(text) => {
                *text = value;
                Ok(())
            }
            _ => Err(TabstopsError::UnknownNode(id.0)),
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    fn index_in_parent(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id)?;
        let index = self.children(parent).iter().position(|&c| c == id)?;
        Some((parent, index))
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.index_in_parent(id)?;
        index.checked_sub(1).map(|i| self.children(parent)[i])
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.index_in_parent(id)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Allocate a detached node
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        self.revision += 1;
        self.slots.push(Some(Node {
            kind,
            parent: None,
            children: Vec::new(),
        }));
        NodeId(self.slots.len() - 1)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.detach(child)?;
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.detach(child)?;
        self.node_mut(parent)?.children.insert(0, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Insert `child` immediately before `reference` under the same parent
    pub fn insert_before(&mut self, reference: NodeId, child: NodeId) -> Result<()> {
        self.detach(child)?;
        let (parent, index) = self
            .index_in_parent(reference)
            .ok_or(TabstopsError::UnknownNode(reference.0))?;
        self.node_mut(parent)?.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn detach(&mut self, id: NodeId) -> Result<()> {
        self.revision += 1;
        if let Some((parent, index)) = self.index_in_parent(id) {
            self.node_mut(parent)?.children.remove(index);
        }
        self.node_mut(id)?.parent = None;
        Ok(())
    }

    /// Detach a node and free it together with its subtree
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(TabstopsError::UnknownNode(id.0));
        }
        self.detach(id)?;
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.slots.get_mut(next.0).and_then(Option::take) {
                pending.extend(node.children);
            }
        }
        Ok(())
    }

    pub fn clear_children(&mut self, id: NodeId) -> Result<()> {
        for child in self.children(id).to_vec() {
            self.remove(child)?;
        }
        Ok(())
    }

    /// Pre-order descendants of `id`, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// True when `ancestor` is a proper ancestor of `id`
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Child-index path from the root to `id`
    pub fn path_to(&self, id: NodeId) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        let mut current = id;
        while current != self.root {
            let (parent, index) = self.index_in_parent(current)?;
            path.push(index);
            current = parent;
        }
        path.reverse();
        Some(path)
    }

    /// Concatenated text of every text node under `id`
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|n| self.text(n))
            .collect()
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph() -> (TextTree, NodeId, NodeId) {
        let mut tree = TextTree::new(Element::new("p"));
        let a = tree.create(NodeKind::Text("a".into()));
        let b = tree.create(NodeKind::Text("b".into()));
        tree.append_child(tree.root(), a).unwrap();
        tree.append_child(tree.root(), b).unwrap();
        (tree, a, b)
    }

    #[test]
    fn test_insert_before_keeps_order() {
        let (mut tree, a, b) = paragraph();
        let marker = tree.create(NodeKind::Element(Element::tab_marker("span", "tab")));
        tree.insert_before(b, marker).unwrap();

        assert_eq!(tree.children(tree.root()), &[a, marker, b]);
        assert_eq!(tree.previous_sibling(marker), Some(a));
        assert_eq!(tree.next_sibling(marker), Some(b));
        assert_eq!(tree.path_to(b), Some(vec![2]));
    }

    #[test]
    fn test_remove_frees_subtree() {
        let (mut tree, a, _) = paragraph();
        let span = tree.create(NodeKind::Element(Element::new("span")));
        let inner = tree.create(NodeKind::Text("x".into()));
        tree.append_child(span, inner).unwrap();
        tree.append_child(tree.root(), span).unwrap();
        assert_eq!(tree.text_content(tree.root()), "abx");

        tree.remove(span).unwrap();

        assert!(!tree.contains(inner));
        assert_eq!(tree.text_content(tree.root()), "ab");
        assert!(tree.contains(a));
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let (mut tree, _, _) = paragraph();
        let root = tree.root();
        assert!(tree.remove(root).is_err());
    }

    #[test]
    fn test_mutations_bump_revision() {
        let (mut tree, a, _) = paragraph();
        let before = tree.revision();
        tree.set_text(a, "z".into()).unwrap();
        assert!(tree.revision() > before);
    }
}

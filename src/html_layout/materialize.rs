//! Tab-marker materialization
//!
//! Literal tab characters become empty marker elements (`span.tab` by default)
//! that layout can size, and materialized markers turn back into tabs on
//! teardown. Markers already present in the content are sized like the others
//! but never reverted.

use crate::error::Result;
use crate::models::{Configuration, Element, NodeId, NodeKind, TextTree};

/// `tag.class` selector identifying tab markers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkerSelector<'a> {
    pub tag: &'a str,
    pub class: &'a str,
}

impl<'a> MarkerSelector<'a> {
    pub fn new(tag: &'a str, class: &'a str) -> Self {
        Self { tag, class }
    }

    pub fn matches(&self, element: &Element) -> bool {
        element.matches(self.tag, self.class)
    }

    pub fn matches_node(&self, tree: &TextTree, node: NodeId) -> bool {
        tree.element(node).map_or(false, |e| self.matches(e))
    }
}

impl<'a> From<&'a Configuration> for MarkerSelector<'a> {
    fn from(config: &'a Configuration) -> Self {
        Self::new(&config.tab_element_tag, &config.tab_marker_class)
    }
}

/// What a reset pass does besides clearing prior layout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetMode {
    /// Only clear styles and fills
    Clear,
    /// Also convert literal tabs into markers
    Materialize,
    /// Also turn materialized markers back into literal tabs
    Dematerialize,
}

/// Text nodes under `root` in document order
///
/// Whitespace-only nodes are included when `include_whitespace` is set.
pub fn collect_text_nodes(tree: &TextTree, root: NodeId, include_whitespace: bool) -> Vec<NodeId> {
    tree.descendants(root)
        .into_iter()
        .filter(|&node| match tree.text(node) {
            Some(text) => include_whitespace || text.chars().any(|c| !c.is_whitespace()),
            None => false,
        })
        .collect()
}

/// Tab markers under the container, in document order
pub fn find_markers(tree: &TextTree, selector: &MarkerSelector<'_>) -> Vec<NodeId> {
    tree.descendants(tree.root())
        .into_iter()
        .filter(|&node| selector.matches_node(tree, node))
        .collect()
}

/// Remove every bar overlay; returns how many were removed
pub fn remove_overlays(tree: &mut TextTree) -> Result<usize> {
    let overlays: Vec<NodeId> = tree
        .descendants(tree.root())
        .into_iter()
        .filter(|&node| matches!(tree.kind(node), Some(NodeKind::Overlay(_))))
        .collect();
    for &overlay in &overlays {
        tree.remove(overlay)?;
    }
    Ok(overlays.len())
}

/// Split every literal tab out of the text into a new marker
///
/// Returns the number of markers created.
pub fn materialize(tree: &mut TextTree, selector: &MarkerSelector<'_>) -> Result<usize> {
    let mut created = 0;
    for node in collect_text_nodes(tree, tree.root(), true) {
        let mut rest = tree.text(node).unwrap_or_default().to_string();
        while let Some(pos) = rest.find('\t') {
            let before = tree.create(NodeKind::Text(rest[..pos].to_string()));
            tree.insert_before(node, before)?;
            let marker = tree.create(NodeKind::Element(Element::tab_marker(selector.tag, selector.class)));
            tree.insert_before(node, marker)?;
            rest = rest[pos + 1..].to_string();
            tree.set_text(node, rest.clone())?;
            created += 1;
        }
    }
    Ok(created)
}

/// Turn materialized markers back into literal tabs
///
/// Returns the number of markers reverted.
pub fn dematerialize(tree: &mut TextTree, selector: &MarkerSelector<'_>) -> Result<usize> {
    let mut reverted = 0;
    for marker in find_markers(tree, selector) {
        if !tree.element(marker).map_or(false, Element::is_materialized) {
            continue;
        }
        let prev = tree.previous_sibling(marker).filter(|&n| tree.is_text(n));
        let next = tree.next_sibling(marker).filter(|&n| tree.is_text(n));
        match (prev, next) {
            (Some(prev), Some(next)) => {
                let merged = format!(
                    "{}\t{}",
                    tree.text(prev).unwrap_or_default(),
                    tree.text(next).unwrap_or_default()
                );
                tree.set_text(next, merged)?;
                tree.remove(prev)?;
            }
            (Some(prev), None) => {
                let text = format!("{}\t", tree.text(prev).unwrap_or_default());
                tree.set_text(prev, text)?;
            }
            (None, Some(next)) => {
                let text = format!("\t{}", tree.text(next).unwrap_or_default());
                tree.set_text(next, text)?;
            }
            (None, None) => {
                let tab = tree.create(NodeKind::Text("\t".to_string()));
                tree.insert_before(marker, tab)?;
            }
        }
        tree.remove(marker)?;
        reverted += 1;
    }
    Ok(reverted)
}

/// Clear all prior tab layout and return the markers in document order
///
/// Overlays are removed unconditionally since layout always redraws them.
pub fn reset_markers(tree: &mut TextTree, selector: &MarkerSelector<'_>, mode: ResetMode) -> Result<Vec<NodeId>> {
    let removed = remove_overlays(tree)?;
    for marker in find_markers(tree, selector) {
        if let Some(element) = tree.element_mut(marker) {
            element.style.clear_tab_layout();
        }
        tree.clear_children(marker)?;
    }
    match mode {
        ResetMode::Clear => {}
        ResetMode::Materialize => {
            let created = materialize(tree, selector)?;
            log::debug!("materialized {} tab markers", created);
        }
        ResetMode::Dematerialize => {
            let reverted = dematerialize(tree, selector)?;
            log::debug!("reverted {} tab markers", reverted);
        }
    }
    if removed > 0 {
        log::debug!("removed {} bar overlays", removed);
    }
    Ok(find_markers(tree, selector))
}

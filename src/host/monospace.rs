//! Fixed-advance host
//!
//! Lays content out on a single line where every character advances by the
//! same width. Deterministic, so layouts can be checked exactly; also usable
//! for plain-text rendering of tabbed content.

use super::LayoutHost;
use crate::models::{Display, NodeId, NodeKind, TextDecoration, TextTree};
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub struct MonospaceHost {
    pub char_width: f32,
    pub font_size: f32,
    pub line_height: f32,
    /// Page position of the container's left edge, before scaling
    pub container_left: f32,
    pub container_width: f32,
    pub parent_width: f32,
    pub margin_bottom: f32,
    /// Rendered-to-layout ratio applied to page positions
    pub scale: f32,
    /// Custom properties as resolved by the stylesheet
    pub computed_properties: BTreeMap<String, String>,
}

impl MonospaceHost {
    pub fn new(container_width: f32) -> Self {
        Self {
            char_width: 8.0,
            font_size: 16.0,
            line_height: 20.0,
            container_left: 0.0,
            container_width,
            parent_width: container_width,
            margin_bottom: 0.0,
            scale: 1.0,
            computed_properties: BTreeMap::new(),
        }
    }

    pub fn with_char_width(mut self, char_width: f32) -> Self {
        self.char_width = char_width;
        self
    }

    pub fn with_container_left(mut self, left: f32) -> Self {
        self.container_left = left;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_margin_bottom(mut self, margin: f32) -> Self {
        self.margin_bottom = margin;
        self
    }

    pub fn with_computed_property(mut self, name: &str, value: &str) -> Self {
        self.computed_properties.insert(name.to_string(), value.to_string());
        self
    }

    fn margin(&self, tree: &TextTree, node: NodeId) -> f32 {
        tree.element(node)
            .and_then(|e| e.style.margin_x)
            .unwrap_or(0.0)
    }

    /// Content-box width
    fn box_width(&self, tree: &TextTree, node: NodeId) -> f32 {
        match tree.kind(node) {
            Some(NodeKind::Text(text)) => text.chars().count() as f32 * self.char_width,
            Some(NodeKind::Element(element)) => {
                let content: f32 = tree
                    .children(node)
                    .iter()
                    .map(|&child| self.advance(tree, child))
                    .sum();
                match element.style.display {
                    Display::Inline => content,
                    Display::InlineBlock => element
                        .style
                        .width
                        .unwrap_or_else(|| element.style.min_width.unwrap_or(0.0).max(content)),
                }
            }
            Some(NodeKind::Overlay(_)) | Some(NodeKind::Probe) | None => 0.0,
        }
    }

    /// Horizontal space a node takes in the line, margins included
    fn advance(&self, tree: &TextTree, node: NodeId) -> f32 {
        self.box_width(tree, node) + 2.0 * self.margin(tree, node)
    }

    /// Layout-pixel position of `target` relative to the container's content box
    fn inline_position(&self, tree: &TextTree, target: NodeId) -> f32 {
        let mut x = 0.0;
        let mut scope = tree.root();
        'descend: loop {
            for &child in tree.children(scope) {
                if child == target {
                    return x + self.margin(tree, child);
                }
                if tree.is_ancestor(child, target) {
                    x += self.margin(tree, child);
                    scope = child;
                    continue 'descend;
                }
                x += self.advance(tree, child);
            }
            return x;
        }
    }
}

impl LayoutHost for MonospaceHost {
    fn container_left(&self, _tree: &TextTree) -> f32 {
        self.container_left * self.scale
    }

    fn container_width(&self, _tree: &TextTree) -> f32 {
        self.container_width
    }

    fn content_height(&self, _tree: &TextTree) -> f32 {
        self.line_height
    }

    fn margin_bottom(&self, _tree: &TextTree) -> f32 {
        self.margin_bottom
    }

    fn parent_width(&self, _tree: &TextTree) -> f32 {
        self.parent_width
    }

    fn font_size(&self, _tree: &TextTree) -> f32 {
        self.font_size
    }

    fn offset_left(&self, tree: &TextTree, node: NodeId) -> f32 {
        (self.container_left + self.inline_position(tree, node)) * self.scale
    }

    fn rendered_width(&self, tree: &TextTree, node: NodeId) -> f32 {
        self.box_width(tree, node)
    }

    fn text_decoration(&self, tree: &TextTree, node: NodeId) -> Option<TextDecoration> {
        let mut current = Some(node);
        while let Some(id) = current {
            if let Some(decoration) = tree.element(id).and_then(|e| e.style.text_decoration) {
                return Some(decoration);
            }
            current = tree.parent(id);
        }
        None
    }

    fn computed_custom_property(&self, _tree: &TextTree, name: &str) -> Option<String> {
        self.computed_properties.get(name).cloned()
    }

    fn measure_length(&self, tree: &TextTree, expr: &str) -> Option<f32> {
        let length = crate::parse::Length::parse(expr).ok()?;
        let ctx = crate::parse::LengthContext {
            font_size: self.font_size,
            root_font_size: 16.0,
            char_width: self.char_width,
            percent_base: self.parent_width,
        };
        let lookup = |name: &str| super::custom_property(self, tree, name);
        length.to_px(&ctx, &lookup).ok()
    }
}

//! Serializable description of a container's content
//!
//! JavaScript hands content over as [`Markup`] and gets the laid-out result
//! back in the same shape. Tests build trees with the same builders.

use super::style::{InlineStyle, TextDecoration};
use super::tree::{BarOverlay, Element, NodeId, NodeKind, Provenance, TextTree};
use crate::error::{Result, TabstopsError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Markup {
    Text {
        text: String,
    },
    Element(ElementMarkup),
    Bar(BarOverlay),
    Probe,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElementMarkup {
    pub tag: String,

    /// Space-separated class list
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub class: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "InlineStyle::is_default")]
    pub style: InlineStyle,

    #[serde(default, skip_serializing_if = "is_authored")]
    pub provenance: Provenance,

    #[serde(default)]
    pub children: Vec<Markup>,
}

fn is_authored(provenance: &Provenance) -> bool {
    *provenance == Provenance::Authored
}

impl Markup {
    pub fn text(text: &str) -> Self {
        Markup::Text {
            text: text.to_string(),
        }
    }

    pub fn element(tag: &str) -> Self {
        Markup::Element(ElementMarkup {
            tag: tag.to_string(),
            class: String::new(),
            attributes: BTreeMap::new(),
            style: InlineStyle::default(),
            provenance: Provenance::Authored,
            children: Vec::new(),
        })
    }

    /// Builder: add a class (elements only)
    pub fn with_class(mut self, class: &str) -> Self {
        if let Markup::Element(element) = &mut self {
            if !element.class.is_empty() {
                element.class.push(' ');
            }
            element.class.push_str(class);
        }
        self
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        if let Markup::Element(element) = &mut self {
            element.attributes.insert(name.to_string(), value.to_string());
        }
        self
    }

    pub fn with_custom_property(mut self, name: &str, value: &str) -> Self {
        if let Markup::Element(element) = &mut self {
            element
                .style
                .custom_properties
                .insert(name.to_string(), value.to_string());
        }
        self
    }

    pub fn with_decoration(mut self, decoration: TextDecoration) -> Self {
        if let Markup::Element(element) = &mut self {
            element.style.text_decoration = Some(decoration);
        }
        self
    }

    pub fn with_child(mut self, child: Markup) -> Self {
        if let Markup::Element(element) = &mut self {
            element.children.push(child);
        }
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.with_child(Markup::text(text))
    }
}

impl ElementMarkup {
    fn to_element(&self) -> Element {
        Element {
            tag: self.tag.clone(),
            classes: self.class.split_whitespace().map(String::from).collect(),
            attributes: self.attributes.clone(),
            style: self.style.clone(),
            provenance: self.provenance,
        }
    }
}

impl TextTree {
    /// Build a tree from markup whose root is the container element
    pub fn from_markup(markup: &Markup) -> Result<TextTree> {
        let Markup::Element(root) = markup else {
            return Err(TabstopsError::InvalidMarkup(
                "the container must be an element".to_string(),
            ));
        };
        let mut tree = TextTree::new(root.to_element());
        let container = tree.root();
        for child in &root.children {
            tree.build_node(container, child)?;
        }
        Ok(tree)
    }

    fn build_node(&mut self, parent: NodeId, markup: &Markup) -> Result<()> {
        let kind = match markup {
            Markup::Text { text } => NodeKind::Text(text.clone()),
            Markup::Element(element) => NodeKind::Element(element.to_element()),
            Markup::Bar(overlay) => NodeKind::Overlay(overlay.clone()),
            Markup::Probe => NodeKind::Probe,
        };
        let id = self.create(kind);
        self.append_child(parent, id)?;
        if let Markup::Element(element) = markup {
            for child in &element.children {
                self.build_node(id, child)?;
            }
        }
        Ok(())
    }

    /// Describe the subtree rooted at `id`
    pub fn to_markup(&self, id: NodeId) -> Option<Markup> {
        let markup = match self.kind(id)? {
            NodeKind::Text(text) => Markup::Text { text: text.clone() },
            NodeKind::Overlay(overlay) => Markup::Bar(overlay.clone()),
            NodeKind::Probe => Markup::Probe,
            NodeKind::Element(element) => Markup::Element(ElementMarkup {
                tag: element.tag.clone(),
                class: element.classes.join(" "),
                attributes: element.attributes.clone(),
                style: element.style.clone(),
                provenance: element.provenance,
                children: self
                    .children(id)
                    .iter()
                    .filter_map(|&child| self.to_markup(child))
                    .collect(),
            }),
        };
        Some(markup)
    }
}

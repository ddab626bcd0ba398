//! Display List for tab layout
//!
//! Summary of one layout pass, returned to JavaScript alongside the mutated
//! tree: which stop each marker resolved to, the width it was given, and the
//! bar rules drawn.

use crate::models::{Alignment, BarOverlay, Leader, NodeId};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    /// One entry per tab marker, in document order
    pub tabs: Vec<RenderTab>,

    /// Bar rules, in declaration order
    pub bars: Vec<BarOverlay>,
}

/// Layout of a single tab marker
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderTab {
    pub node: NodeId,

    /// Marker offset from the container's left edge, in layout pixels
    pub span_left: f32,

    /// `None` when no stop applies and the marker was left unstyled
    pub stop: Option<ResolvedStop>,

    /// Width assigned to the marker
    #[serde(default)]
    pub width: Option<f32>,

    /// Text-mode leader fill
    #[serde(default)]
    pub fill: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStop {
    pub offset: f32,

    /// Alignment actually applied; a decimal stop without a decimal point
    /// reports `right`
    pub alignment: Alignment,

    pub leader: Leader,

    /// Index into the configured tab stops; `None` for a default stop
    pub declared_index: Option<usize>,
}

impl RenderTab {
    pub fn skipped(node: NodeId, span_left: f32) -> Self {
        Self {
            node,
            span_left,
            stop: None,
            width: None,
            fill: None,
        }
    }

    /// Position the text after this marker starts at
    pub fn end(&self) -> Option<f32> {
        self.width.map(|w| self.span_left + w)
    }
}

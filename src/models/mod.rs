//! Data model for tab-stop layout
//!
//! This module contains the text tree a container's content lives in, the
//! tab-stop records, and the configuration types.

pub mod config;
pub mod markup;
pub mod style;
pub mod tabstop;
pub mod tree;

// Re-export commonly used types
pub use config::{ConfigLayer, Configuration, LeaderMode, LengthValue, TabStopEntry, TabStopRecord, TabStopsSpec};
pub use markup::{ElementMarkup, Markup};
pub use style::{DecorationLine, DecorationStyle, Display, InlineStyle, TextAlign, TextDecoration};
pub use tabstop::{Alignment, Leader, RuleStyle, TabStop};
pub use tree::{BarOverlay, Element, NodeId, NodeKind, Provenance, TextTree};

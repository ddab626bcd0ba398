//! Tab Layout Engine
//!
//! This module resolves a container's configuration, materializes its tab
//! markers and sizes them against the tab stops, producing a DisplayList that
//! summarizes the pass for JavaScript.

pub mod display_list;
pub mod engine;
pub mod materialize;
pub mod measure;
pub mod options;

pub use display_list::{DisplayList, RenderTab, ResolvedStop};
pub use engine::{next_default_stop, TabLayoutEngine, FILL_REPETITION_LIMIT};
pub use materialize::{dematerialize, find_markers, materialize, reset_markers, MarkerSelector, ResetMode};
pub use measure::{resolve_length, resolve_length_value};
pub use options::{merge_layers, resolve_configuration, validate_scale_factor, Overrides};

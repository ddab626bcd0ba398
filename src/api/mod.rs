//! Tab-stops container API
//!
//! - `container`: per-container lifecycle (refresh, option, destroy, resize)
//! - `helpers`: logging macros and JS value conversions for the WASM boundary
//! - `wasm`: the `TabstopsContainer` class exported to JavaScript

pub mod helpers;
pub mod container;
pub mod wasm;

pub use container::{Container, OptionArgs};
pub use wasm::{JsLayoutHost, TabstopsContainer};

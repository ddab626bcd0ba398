//! Tab-stop layout for inline text
//!
//! Positions text after tab characters against declared tab stops (left,
//! right, center, decimal and bar alignment, with leaders), the way a word
//! processor does, inside a container rendered by the browser. Measurement is
//! delegated to a [`host::LayoutHost`], so the same layout runs headless.

pub mod api;
pub mod error;
pub mod host;
pub mod html_layout;
pub mod models;
pub mod parse;

// Re-export commonly used types
pub use api::{Container, OptionArgs, TabstopsContainer};
pub use error::{Result, TabstopsError};
pub use host::{LayoutHost, MonospaceHost, ResizeSubscription};
pub use html_layout::{DisplayList, Overrides, RenderTab, ResolvedStop, TabLayoutEngine};
pub use models::*;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    console_log::init_with_level(log::Level::Debug).ok();

    log::info!("tabstops WASM module initialized");
}

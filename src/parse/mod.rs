//! Parsing module for tab-stop declarations
//!
//! This module contains the CSS length parser and the tab-stop declaration
//! parser.

pub mod length;
pub mod tabstops;

// Re-export commonly used types
pub use length::{parse_pixels, Length, LengthContext, LengthUnit};
pub use tabstops::{parse_entry, parse_records, parse_tab_stops, split_declaration, tokenize};

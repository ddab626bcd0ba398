//! Error types for tab-stop layout
//!
//! Every failure is synchronous and surfaces through the call that detected it.
//! Conditions the layout tolerates (no qualifying stop, the fill repetition cap)
//! are not errors and never appear here.

use thiserror::Error;

/// Top-level error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TabstopsError {
    /// Malformed tab-stop declaration; aborts the refresh that parsed it
    #[error("invalid tab-stop declaration: {0}")]
    InvalidSpecFormat(String),

    /// A length expression neither the resolver nor the host could measure
    #[error("cannot resolve length '{0}'")]
    InvalidLength(String),

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value for option '{key}': {reason}")]
    InvalidOptionValue { key: String, reason: String },

    /// `option` was asked to modify a container that was never refreshed
    #[error("container has no stored configuration; call refresh first")]
    NotInitialized,

    #[error("invalid markup: {0}")]
    InvalidMarkup(String),

    /// A node handle that no longer refers to a live node
    #[error("node {0} is not part of the tree")]
    UnknownNode(usize),
}

pub type Result<T> = std::result::Result<T, TabstopsError>;

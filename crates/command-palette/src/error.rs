//! Error types surfaced by the palette

use thiserror::Error;

/// Upper bound on rendered suggestion rows
pub const MAX_DISPLAYED_LIMIT: usize = 500;

/// Rejected palette configuration
///
/// Raised eagerly when a palette is constructed or reconfigured; the
/// palette instance is never built from an invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Display is limited to a maximum of 500 items to prevent performance issues")]
    DisplayLimitExceeded { requested: usize },

    #[error("max_displayed must be at least 1")]
    ZeroDisplayed,

    #[error("invalid hotkey {chord:?}: {reason}")]
    InvalidHotKey { chord: String, reason: String },

    #[error("failed to parse palette config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A selection that could not be carried out
///
/// The palette state is left untouched when one of these is returned, so
/// the caller can keep using it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("command must be a function")]
    NotCallable { name: String },

    #[error("no suggestion at index {index} ({available} available)")]
    NoSuggestion { index: usize, available: usize },
}

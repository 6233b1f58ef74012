//! Error types for tree construction.
//!
//! Only building a tree can fail; stepping a built tree cannot.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    /// A growth parameter is outside its valid range.
    #[error("Invalid growth configuration: {0}")]
    InvalidConfig(String),

    /// Growth was still adding nodes when the pass limit was reached.
    #[error("Growth did not reach a fixed point after {passes} passes")]
    GrowthDidNotConverge { passes: usize },

    /// A TOML growth configuration could not be parsed.
    #[error("Failed to parse growth configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Convenience alias for `Result<T, TreeError>`.
pub type TreeResult<T> = Result<T, TreeError>;

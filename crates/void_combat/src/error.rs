//! Error types for the combat system

use thiserror::Error;

/// Combat system errors
#[derive(Debug, Error)]
pub enum CombatError {
    /// Configuration that can never produce a valid character
    #[error("Invalid combat configuration: {0}")]
    InvalidConfig(String),

    /// Configuration document could not be parsed
    #[error("Failed to parse combat configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for combat operations
pub type Result<T> = std::result::Result<T, CombatError>;

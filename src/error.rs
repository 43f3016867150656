//! Error types for the org chart engine.
//!
//! Only caller bugs and configuration problems are errors. Missing people,
//! unresolvable identities and malformed hierarchy data degrade to restrictive
//! defaults instead (see `hierarchy::validate` for the non-fatal reporting path).

use thiserror::Error;

/// Main error type for the engine.
#[derive(Error, Debug)]
pub enum OrgChartError {
    /// A stage number outside 1..=3 reached the access policy.
    #[error("Unknown survey stage {0} (expected 1, 2 or 3)")]
    UnknownStage(i64),

    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Invalid blue-collar pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl OrgChartError {
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownStage(_) => "UNKNOWN_STAGE",
            Self::InvalidConfig { .. } => "INVALID_CONFIG",
            Self::InvalidPattern(_) => "INVALID_PATTERN",
            Self::Io(_) => "IO",
            Self::Json(_) => "JSON",
            Self::Yaml(_) => "YAML",
        }
    }
}

pub type Result<T> = std::result::Result<T, OrgChartError>;

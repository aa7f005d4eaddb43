//! Error types for Lighting Lab
//!
//! The simulation itself never fails; errors only come from the outer
//! surfaces (mode selection by id, configuration parsing).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LabError {
    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LabError>;

//! Error types for LeadPulse

use thiserror::Error;

/// Errors that can occur at validation and storage boundaries.
///
/// Scoring functions are total and never return errors; anything that can go
/// wrong lives at the edges (form validation, document store, local storage).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Failed to parse stored record: {0}")]
    Parse(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Store rejected write to '{collection}': {reason}")]
    StoreRejected { collection: String, reason: String },

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Authentication failed: {0}")]
    Auth(String),
}

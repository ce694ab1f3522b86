//! Error types for the nutrition planner
//!
//! The target engine itself never fails: incomplete input yields sentinel
//! results. These errors belong to the boundaries around it, where text
//! becomes typed profile data or stored snapshots are read back.

use thiserror::Error;

/// Profile input errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    #[error("Unknown {kind}: {value}")]
    UnknownValue { kind: &'static str, value: String },

    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

/// Errors reading a stored target snapshot back into typed targets
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    #[error("Missing stored field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: f64 },
}

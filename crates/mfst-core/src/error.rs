//! # Error Types
//!
//! Error enums shared by every `mfst` crate. All use `thiserror`.
//!
//! Per-request problems (unknown keys, failed validators, missing fields)
//! are *not* errors: they are [`Diagnostic`](crate::Diagnostic)s. The types
//! here cover the remaining failure classes: canonicalization of a rendered
//! body and malformed identifiers supplied by the host.

use thiserror::Error;

/// Top-level error type for `mfst-core`.
#[derive(Error, Debug)]
pub enum MfstError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A document identifier could not be parsed.
    #[error("invalid document id {value:?}: {reason}")]
    InvalidDocumentId {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Error during canonical serialization of a rendered body.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values never appear in a document tree; seeing one means the
    /// body was not produced by the renderer.
    #[error("float values are not permitted in canonical documents: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

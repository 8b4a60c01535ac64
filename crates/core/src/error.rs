//! Domain error model.

use thiserror::Error;

/// Domain-level error.
///
/// The shared vocabulary every use case reports in: bad input, a missing
/// record, a uniqueness clash, or a failure of the backing store. Crates with
/// richer error types convert into this one at their boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("{0}")]
    Validation(String),

    /// A requested resource was not found.
    #[error("{0}")]
    NotFound(String),

    /// A conflict occurred (e.g. duplicate identifier).
    #[error("{0}")]
    Conflict(String),

    /// The backing store failed; the reason is opaque to the domain.
    #[error("{0}")]
    Persistence(String),
}

impl DomainError {
    /// Whether the failure happened before anything was written.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_) | Self::Conflict(_))
    }
}

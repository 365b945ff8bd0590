//! Mutant generation errors.

/// Mutant generation result type
pub type CrfResult<T> = Result<T, CrfError>;

/// Mutant generation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CrfError {
    /// Kind name is not one of WM, WP or MM
    #[error("Unknown CRF type: {0}")]
    UnknownKind(String),
}

//! Domain-level errors (no external dependencies)

use generational_arena::Index;
use thiserror::Error;

/// Domain errors represent violations of the element tree invariants.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found in tree: {0:?}")]
    UnknownNode(Index),

    #[error("tree already has a root node")]
    RootAlreadySet,

    #[error("element tag must not be empty")]
    EmptyTag,

    #[error("invalid text scope: {0} (expected 'exclusive' or 'nested')")]
    InvalidTextScope(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

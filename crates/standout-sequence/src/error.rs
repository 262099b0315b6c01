//! Error types for the sequence crate.

use thiserror::Error;

/// Broad classification of a [`QueryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller passed an invalid count or index.
    Usage,
    /// The data observed during traversal does not satisfy the operator.
    State,
    /// An index, count or sum exceeded the representable range.
    Overflow,
}

/// Errors raised by terminal operators and sequence constructors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The sequence was empty where an element was required.
    #[error("sequence contains no elements")]
    NoElements,

    /// No element satisfied the predicate.
    #[error("sequence contains no matching element")]
    NoMatch,

    /// More than one element where exactly one was required.
    #[error("sequence contains more than one element")]
    MoreThanOneElement,

    /// More than one element satisfied the predicate.
    #[error("sequence contains more than one matching element")]
    MoreThanOneMatch,

    /// An argument was outside its valid range.
    #[error("argument '{argument}' is out of range")]
    OutOfRange { argument: &'static str },

    /// Two elements produced the same key for a unique-key collection.
    #[error("an element with the same key has already been added")]
    DuplicateKey,

    /// Arithmetic overflow while accumulating an index, count or sum.
    #[error("arithmetic operation resulted in an overflow")]
    Overflow,
}

impl QueryError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::OutOfRange { .. } => ErrorKind::Usage,
            QueryError::Overflow => ErrorKind::Overflow,
            QueryError::NoElements
            | QueryError::NoMatch
            | QueryError::MoreThanOneElement
            | QueryError::MoreThanOneMatch
            | QueryError::DuplicateKey => ErrorKind::State,
        }
    }
}

/// Result type for sequence operations.
pub type Result<T> = std::result::Result<T, QueryError>;

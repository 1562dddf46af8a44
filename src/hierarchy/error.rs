//! Errors raised while building or compiling a hierarchy request.
//!
//! Every variant is a construction- or compile-time failure. Nothing here is
//! produced while the emitted SQL runs; engine faults (such as Oracle's
//! CONNECT BY loop detection) belong to whoever executes the statement.

use super::capability::Version;

/// Errors that can occur while resolving or compiling a hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    #[error("table '{table}' has no self-referential foreign key")]
    MissingForeignKey { table: String },

    #[error("hierarchical queries are not implemented for dialect '{dialect}'")]
    UnsupportedDialect { dialect: String },

    #[error("{dialect} {actual} is too old for hierarchical queries (requires {required} or later)")]
    DialectVersionTooLow {
        dialect: String,
        required: Version,
        actual: Version,
    },

    #[error("table '{table}' has no column '{column}'")]
    UnknownColumn { table: String, column: String },

    #[error("invalid identifier {identifier:?}")]
    InvalidIdentifier { identifier: String },

    #[error("column '{column}' collides with a generated hierarchy column")]
    ReservedColumn { column: String },

    #[error("invalid option {option}: {reason}")]
    InvalidOption { option: String, reason: String },
}

pub type HierarchyResult<T> = Result<T, HierarchyError>;

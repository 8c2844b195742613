//! Error types for the mounttab layer.
//!
//! Session-layer failures (open, lens, save) pass through unchanged; this
//! layer only adds the record-level conditions. Nothing is retried here — the
//! caller's reconciliation loop decides whether to run the operation again.

use thiserror::Error;

/// Errors from mount-table operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Error from the tree session layer.
    #[error(transparent)]
    Tree(#[from] treetab_tree::Error),

    /// A mutation expected an entry that is not in the file.
    #[error("no mount entry named '{name}' in {file}")]
    NotFound { name: String, file: String },

    /// The mountpoint name cannot be represented as a query literal.
    #[error("mountpoint name '{name}' contains both quote characters and cannot be queried")]
    UnquotableName { name: String },

    /// An entry was handed to `create` without a field every record needs.
    #[error("mount entry '{name}' is missing required field '{field}'")]
    MissingField { name: String, field: &'static str },
}

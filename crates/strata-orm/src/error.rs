//! Error types for the persistence engine.

use strata_core::schema::SchemaError;
use thiserror::Error;

use crate::state::Lifecycle;

/// Persistence engine errors.
#[derive(Debug, Error)]
pub enum OrmError {
    /// A generator was invoked on an object in the wrong lifecycle state.
    #[error("invalid object state: expected {expected}, found {actual}")]
    InvalidState {
        /// The lifecycle the operation requires.
        expected: Lifecycle,
        /// The lifecycle the object is actually in.
        actual: Lifecycle,
    },

    /// The metadata chain is inconsistent for the requested mapping.
    /// Never corrected silently: guessing would corrupt data.
    #[error("ambiguous mapping: {0}")]
    AmbiguousMapping(String),

    /// A primary-key or join-key property has no value at generation time.
    #[error("missing key value for property '{property}' of class '{class}'")]
    MissingKeyValue {
        /// The class being persisted.
        class: String,
        /// The key property with no value.
        property: String,
    },

    /// A property name not declared anywhere in the class's chain.
    #[error("class '{class}' declares no property '{property}'")]
    UnknownProperty {
        /// The class whose state was mutated.
        class: String,
        /// The unknown property name.
        property: String,
    },

    /// Metadata construction or lookup error.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Database error from sqlx while executing a statement batch.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, OrmError>;

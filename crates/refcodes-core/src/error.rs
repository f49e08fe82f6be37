// crates/refcodes-core/src/error.rs
use thiserror::Error;

/// Crate-wide error type.
///
/// The split between [`RefError::NotFound`] and a plain `None` return is
/// deliberate: `Store::get` is the "maybe" accessor and never fails on a
/// miss, while `lookup`, `remove_entry` and fuzzy search signal a miss as
/// an error.
#[derive(Debug, Error)]
pub enum RefError {
    /// No record matched the query anywhere.
    #[error("could not find a record for {0:?}")]
    NotFound(String),

    /// The call shape was wrong (e.g. a criterion on a field the dataset
    /// does not index). Distinct from `NotFound`: this is a programming
    /// error on the caller's side, not a data miss.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A record was asked for a field it does not carry.
    #[error("record has no field {0:?}")]
    MissingField(String),

    /// The dataset file could not be opened or read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The dataset file was not valid JSON of the expected shape.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The dataset file parsed but did not contain the configured root key.
    #[error("dataset is missing root key {0:?}")]
    MissingRootKey(String),
}

/// Convenient result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RefError>;

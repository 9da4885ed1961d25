//! Error types for catalog loading, fitting and model persistence.
//!
//! Query-time misses ("no such product", "nothing matched") are not errors:
//! the recommend operations return an empty `Vec` for those.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for recommender operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RecommenderError {
    /// The catalog could not be turned into items.
    #[error("catalog load error: {0}")]
    CatalogLoad(#[from] CatalogLoadError),

    /// Fitting was attempted on a corpus with no usable text.
    #[error("empty corpus: no usable vocabulary could be built from {items} item(s)")]
    EmptyCorpus { items: usize },

    /// The persisted model is missing, corrupt or inconsistent.
    #[error("model load error: {0}")]
    ModelLoad(#[from] ModelLoadError),

    /// The model could not be written.
    #[error("model save error ({path}): {message}")]
    ModelSave { path: PathBuf, message: String },

    /// Invalid or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Failure while reading the catalog source.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CatalogLoadError {
    #[error("cannot read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column `{0}` is missing")]
    MissingColumn(&'static str),

    /// A data row has more fields than the header. `row` is 1-based.
    #[error("row {row}: {found} fields, header has {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// `row` is 1-based and counts data rows only.
    #[error("row {row}: invalid value {value:?} in column `{column}`")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// Failure while reading a persisted model.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ModelLoadError {
    #[error("cannot read model {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode model: {0}")]
    Decode(#[from] serde_cbor::Error),

    #[error("unsupported model format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("inconsistent model: {0}")]
    Corrupt(String),
}

/// Result type alias for recommender operations.
pub type Result<T> = std::result::Result<T, RecommenderError>;

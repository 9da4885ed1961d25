//! This crate is a content-based product recommender built on TF-IDF vectors
//! and cosine similarity.

pub mod catalog;
pub mod config;
pub mod error;
pub mod recommend;
pub mod utils;
pub mod vectorizer;

/// Fitted Model
/// The top-level struct of this crate. It turns a product catalog into one
/// L2-normalized TF-IDF vector per item and answers similarity queries
/// against those vectors.
///
/// Internally, it holds:
/// - The analyzer settings (tokenizer and stop-words)
/// - The vocabulary and its IDF weights
/// - One sparse TF-IDF vector per catalog row
/// - The catalog rows themselves
///
/// `FittedModel<N, E>` has the following generic parameters:
/// - `N`: Vector weight type (f32 or f64)
/// - `E`: TF-IDF calculation engine type (e.g., DefaultTFIDFEngine)
///
/// The model is read-only after fitting and can be shared among threads.
///
/// # Serialization
/// Supported through `save` / `load`, as a versioned CBOR document.
/// Loading validates the version and the shape of the model.
pub use vectorizer::FittedModel;

/// Model fitting helpers
/// `fit_model` fits the default model with a vocabulary cap.
/// `fit_model_with` takes a full `ModelConfig` (cap and stop-words).
pub use vectorizer::{fit_model, fit_model_with};

/// Token Frequency structure
/// A struct for analyzing/managing token occurrence frequency within a document.
/// It manages:
/// - The count of occurrences of each token
/// - The total number of tokens in the document
///
/// Used as base data for TF (Term Frequency) calculation.
pub use vectorizer::token::TokenFrequency;

/// TF IDF Calculation Engine Trait
/// A trait that defines the behavior of a TF-IDF calculation engine.
///
/// By implementing this trait, you can plug different TF-IDF calculation strategies
/// into `FittedModel<N, E>`.
/// A default implementation, `DefaultTFIDFEngine`, is provided and computes
/// raw-count TF, smoothed IDF and L2-normalized rows.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Search Hits and Hit Entry structures
/// Data structures for managing ranked results.
/// - `Hits`: holds scored catalog rows and provides sorting/filtering by score
/// - `HitEntry`: a single row with its cosine score
pub use vectorizer::evaluate::scoring::{HitEntry, Hits};

/// Catalog loading
/// `CatalogItem` is one product row; `load_catalog` reads a CSV file into rows,
/// keeping file order.
pub use catalog::{load_catalog, CatalogItem};

/// Recommendation output and query handle
/// - `Recommendation`: the record every recommend operation returns
/// - `Recommender`: cheap-to-clone handle over a model and its config
/// - `recommend_similar` / `recommend_from_text`: free-function queries
pub use recommend::{recommend_from_text, recommend_similar, Recommendation, Recommender};

/// Configuration
pub use config::{ModelConfig, RecommenderConfig};
pub use vectorizer::analyzer::StopWords;

/// Error types
pub use error::{RecommenderError, Result};

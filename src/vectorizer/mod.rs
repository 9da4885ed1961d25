pub mod analyzer;
pub mod compare;
pub mod corpus;
pub mod evaluate;
pub mod serde;
pub mod stop_words;
pub mod tfidf;
pub mod token;
pub mod vocabulary;

use std::fmt;
use std::marker::PhantomData;

use ::serde::{Deserialize, Serialize};
use num::Float;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::{
    catalog::CatalogItem,
    config::ModelConfig,
    error::{RecommenderError, Result},
    utils::math::vector::ZeroSpVec,
    vectorizer::{
        analyzer::Analyzer,
        corpus::Corpus,
        tfidf::{DefaultTFIDFEngine, TFIDFEngine},
        token::TokenFrequency,
        vocabulary::Vocabulary,
    },
};

/// Numeric type of vector weights (`f32` or `f64`).
pub trait Weight: Float + Default + Into<f64> + Send + Sync + 'static {}

impl<T> Weight for T where T: Float + Default + Into<f64> + Send + Sync + 'static {}

/// One row of the vector space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TFVector<N> {
    /// L2-normalized TF-IDF weights
    pub tf_vec: ZeroSpVec<N>,
    /// L2 norm of `tf_vec`, 1 or 0 for a blank row
    pub norm: f64,
    /// number of in-vocabulary tokens of the row's blob
    pub token_sum: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IDFVector<N> {
    /// IDF per vocabulary dimension. Dense: every term has one.
    pub idf_vec: Vec<N>,
    /// number of documents the weights were computed from
    pub doc_num: u64,
}

/// Fitted TF-IDF model over a product catalog.
///
/// The unit every query runs against. It holds:
/// - the analyzer settings used on the corpus (reused for text queries)
/// - the vocabulary and its IDF weights
/// - one sparse, L2-normalized TF-IDF vector per catalog row
/// - the catalog rows themselves
///
/// `documents()[i]` always belongs to `items()[i]`. The parts are only
/// readable from outside; a model is built by [`FittedModel::fit`] or
/// [`FittedModel::load`].
///
/// `FittedModel<N, E>` has two generic parameters:
/// - `N`: weight type (`f32` by default, or `f64`)
/// - `E`: TF-IDF engine (`DefaultTFIDFEngine` by default)
///
/// The model never changes after fitting; share it across threads behind an
/// `Arc` and query through `&self`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "N: Serialize", deserialize = "N: Deserialize<'de>"))]
pub struct FittedModel<N = f32, E = DefaultTFIDFEngine> {
    analyzer: Analyzer,
    vocabulary: Vocabulary,
    idf: IDFVector<N>,
    documents: Vec<TFVector<N>>,
    items: Vec<CatalogItem>,
    #[serde(skip)]
    _marker: PhantomData<E>,
}

/// Size figures of a fitted model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSummary {
    pub items: usize,
    pub vocabulary: usize,
    pub non_zeros: usize,
    /// in-vocabulary tokens over all rows
    pub tokens: u64,
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} items, {} terms, {} non-zero weights, {} tokens",
            self.items, self.vocabulary, self.non_zeros, self.tokens
        )
    }
}

impl<N, E> FittedModel<N, E>
where
    N: Weight,
    E: TFIDFEngine<N> + Send + Sync,
{
    /// Fit a model over `items`.
    ///
    /// Fails with `EmptyCorpus` when there are no items or no term survives
    /// tokenization and stop-word removal.
    pub fn fit(items: Vec<CatalogItem>, config: &ModelConfig) -> Result<Self> {
        config.validate()?;
        if items.is_empty() {
            return Err(RecommenderError::EmptyCorpus { items: 0 });
        }

        let analyzer = Analyzer::new(&config.stop_words);
        let freqs: Vec<TokenFrequency> = items
            .par_iter()
            .map(|item| analyzer.analyze(&item.blob()))
            .collect();

        let corpus = Corpus::from_docs(&freqs);
        let vocabulary = Vocabulary::build(&corpus, config.max_terms);
        if vocabulary.is_empty() {
            return Err(RecommenderError::EmptyCorpus { items: items.len() });
        }

        let idf = IDFVector {
            idf_vec: E::idf_vec(&corpus, &vocabulary),
            doc_num: corpus.get_doc_num(),
        };

        let documents: Vec<TFVector<N>> = freqs
            .par_iter()
            .map(|freq| {
                let mut tf_vec = E::tfidf_vec(freq, &vocabulary, &idf.idf_vec);
                tf_vec.shrink_to_fit();
                let token_sum = tf_vec
                    .raw_iter()
                    .filter_map(|(i, _)| vocabulary.term(i))
                    .map(|term| freq.token_count(term) as u64)
                    .sum();
                let norm = tf_vec.norm();
                TFVector { tf_vec, norm, token_sum }
            })
            .collect();

        let blank = documents.iter().filter(|d| d.tf_vec.nnz() == 0).count();
        if blank > 0 {
            warn!(rows = blank, "catalog rows without any vocabulary term; they score 0 against everything");
        }

        let model = Self::from_parts(analyzer, vocabulary, idf, documents, items);
        info!(
            items = model.items.len(),
            terms = model.vocabulary().len(),
            non_zeros = model.summary().non_zeros,
            "model fitted"
        );
        Ok(model)
    }

    /// Project free text into the fitted space.
    ///
    /// Out-of-vocabulary tokens contribute nothing; the model is never
    /// refitted.
    pub fn encode(&self, text: &str) -> ZeroSpVec<N> {
        let freq = self.analyzer.analyze(text);
        E::tfidf_vec(&freq, &self.vocabulary, &self.idf.idf_vec)
    }
}

impl<N, E> FittedModel<N, E> {
    pub(crate) fn from_parts(
        analyzer: Analyzer,
        vocabulary: Vocabulary,
        idf: IDFVector<N>,
        documents: Vec<TFVector<N>>,
        items: Vec<CatalogItem>,
    ) -> Self {
        Self {
            analyzer,
            vocabulary,
            idf,
            documents,
            items,
            _marker: PhantomData,
        }
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn idf(&self) -> &IDFVector<N> {
        &self.idf
    }

    /// one vector per catalog row, in row order
    pub fn documents(&self) -> &[TFVector<N>] {
        &self.documents
    }

    /// catalog rows in load order
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// number of catalog rows
    pub fn doc_num(&self) -> usize {
        self.items.len()
    }

    /// First row whose `product_id` matches.
    pub fn row_of(&self, product_id: i64) -> Option<usize> {
        self.items.iter().position(|item| item.product_id == product_id)
    }

    pub fn item(&self, row: usize) -> Option<&CatalogItem> {
        self.items.get(row)
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            items: self.items.len(),
            vocabulary: self.vocabulary.len(),
            non_zeros: self.documents.iter().map(|d| d.tf_vec.nnz()).sum(),
            tokens: self.documents.iter().map(|d| d.token_sum).sum(),
        }
    }
}

impl<N, E> fmt::Debug for FittedModel<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FittedModel")
            .field("summary", &self.summary())
            .finish()
    }
}

/// Fit the default model (`f32` weights, default engine, English stop-words)
/// keeping at most `max_terms` terms.
pub fn fit_model(items: Vec<CatalogItem>, max_terms: usize) -> Result<FittedModel> {
    FittedModel::fit(items, &ModelConfig::with_max_terms(max_terms))
}

/// Fit the default model with explicit settings.
pub fn fit_model_with(items: Vec<CatalogItem>, config: &ModelConfig) -> Result<FittedModel> {
    FittedModel::fit(items, config)
}

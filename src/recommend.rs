//! Recommendation queries over a fitted model.
//!
//! "Nothing found" is always an empty `Vec`, never an error: an unknown or
//! unparseable product id, `top_n <= 0`, or an empty catalog.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    catalog::{load_catalog, parse_product_id, CatalogItem},
    config::RecommenderConfig,
    error::Result,
    vectorizer::{
        evaluate::scoring::{Hits, EXCLUDED_SCORE},
        tfidf::{DefaultTFIDFEngine, TFIDFEngine},
        FittedModel, Weight,
    },
};

/// Output record of every recommend operation.
///
/// Carries exactly these fields; downstream layers rely on the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub product_id: i64,
    pub name: String,
    pub category: String,
    pub carbon_footprint: Option<f64>,
    pub price: Option<f64>,
    pub image_path: Option<String>,
}

impl From<&CatalogItem> for Recommendation {
    fn from(item: &CatalogItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name.clone(),
            category: item.category.clone(),
            carbon_footprint: item.carbon_footprint,
            price: item.price,
            image_path: item.image_path.clone(),
        }
    }
}

impl<N, E> FittedModel<N, E>
where
    N: Weight,
    E: TFIDFEngine<N> + Send + Sync,
{
    /// Ranked hits for "items like `product_id`", without the item itself.
    ///
    /// Every row carrying `product_id` gets the minimum score before the
    /// sort and is dropped after it. Unknown ids give no hits.
    pub fn similar_hits(&self, product_id: i64) -> Hits {
        let Some(doc) = self.row_of(product_id).and_then(|row| self.documents().get(row)) else {
            debug!(product_id, "product not in catalog");
            return Hits::default();
        };
        let mut hits = self.similarity(&doc.tf_vec);
        let is_self = |r: usize| self.item(r).is_some_and(|item| item.product_id == product_id);
        hits.force_score(EXCLUDED_SCORE, is_self)
            .sort_by_score_desc()
            .remove_rows(is_self);
        hits
    }

    /// Ranked hits for a free-text query, every row included.
    pub fn text_hits(&self, query: &str) -> Hits {
        let query_vec = self.encode(query);
        debug!(terms = query_vec.nnz(), "text query encoded");
        let mut hits = self.similarity(&query_vec);
        hits.sort_by_score_desc();
        hits
    }

    /// Up to `top_n` items most similar to `product_id`, best first.
    pub fn recommend_similar(&self, product_id: i64, top_n: i64) -> Vec<Recommendation> {
        if top_n <= 0 {
            return Vec::new();
        }
        let mut hits = self.similar_hits(product_id);
        self.records(hits.truncate_top(top_n))
    }

    /// Like [`recommend_similar`](Self::recommend_similar) with the id as
    /// caller-supplied text; an id that does not parse gives no results.
    pub fn recommend_similar_raw(&self, product_id: &str, top_n: i64) -> Vec<Recommendation> {
        match parse_product_id(product_id) {
            Some(id) => self.recommend_similar(id, top_n),
            None => {
                debug!(product_id, "unparseable product id");
                Vec::new()
            }
        }
    }

    /// Up to `top_n` items most similar to `query`, best first.
    ///
    /// A query sharing no term with the vocabulary scores 0 everywhere and
    /// returns the first `top_n` catalog rows.
    pub fn recommend_from_text(&self, query: &str, top_n: i64) -> Vec<Recommendation> {
        if top_n <= 0 {
            return Vec::new();
        }
        let mut hits = self.text_hits(query);
        self.records(hits.truncate_top(top_n))
    }

    fn records(&self, hits: &Hits) -> Vec<Recommendation> {
        hits.iter()
            .filter_map(|hit| self.item(hit.row))
            .map(Recommendation::from)
            .collect()
    }
}

/// Free-function form of [`FittedModel::recommend_similar`].
pub fn recommend_similar<N, E>(model: &FittedModel<N, E>, product_id: i64, top_n: i64) -> Vec<Recommendation>
where
    N: Weight,
    E: TFIDFEngine<N> + Send + Sync,
{
    model.recommend_similar(product_id, top_n)
}

/// Free-function form of [`FittedModel::recommend_from_text`].
pub fn recommend_from_text<N, E>(model: &FittedModel<N, E>, query: &str, top_n: i64) -> Vec<Recommendation>
where
    N: Weight,
    E: TFIDFEngine<N> + Send + Sync,
{
    model.recommend_from_text(query, top_n)
}

/// Shared, read-only handle for serving queries.
///
/// Clones share the same model; hand one to each worker thread.
#[derive(Debug, Clone)]
pub struct Recommender {
    model: Arc<FittedModel<f32, DefaultTFIDFEngine>>,
    config: Arc<RecommenderConfig>,
}

impl Recommender {
    pub fn new(model: FittedModel, config: RecommenderConfig) -> Self {
        Self {
            model: Arc::new(model),
            config: Arc::new(config),
        }
    }

    /// Load the model at `config.model_path`.
    pub fn open(config: RecommenderConfig) -> Result<Self> {
        config.validate()?;
        let model: FittedModel = FittedModel::load(&config.model_path)?;
        Ok(Self::new(model, config))
    }

    /// Load the catalog, fit, save the model, and return a handle on it.
    pub fn train(config: RecommenderConfig) -> Result<Self> {
        config.validate()?;
        let items = load_catalog(&config.catalog_path)?;
        let model: FittedModel = FittedModel::fit(items, &config.model)?;
        model.save(&config.model_path)?;
        Ok(Self::new(model, config))
    }

    pub fn model(&self) -> &FittedModel {
        &self.model
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// `top_n` falls back to `default_top_n`.
    pub fn similar(&self, product_id: &str, top_n: Option<i64>) -> Vec<Recommendation> {
        self.model
            .recommend_similar_raw(product_id, top_n.unwrap_or(self.config.default_top_n))
    }

    /// `top_n` falls back to `default_top_n`.
    pub fn from_text(&self, query: &str, top_n: Option<i64>) -> Vec<Recommendation> {
        self.model
            .recommend_from_text(query, top_n.unwrap_or(self.config.default_top_n))
    }

    /// Homepage picks: the configured featured query.
    pub fn featured(&self, top_n: Option<i64>) -> Vec<Recommendation> {
        self.model.recommend_from_text(
            &self.config.featured_query,
            top_n.unwrap_or(self.config.featured_top_n),
        )
    }
}

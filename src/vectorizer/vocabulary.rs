use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::vectorizer::corpus::Corpus;

/// Term → dimension mapping of a fitted vector space.
///
/// Dimension `i` is the `i`-th term in alphabetical order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: IndexSet<Box<str>>,
}

impl Vocabulary {
    /// Select at most `max_terms` terms from the corpus.
    ///
    /// Terms with the highest total occurrence count win; equal counts are
    /// decided alphabetically so the cut is reproducible.
    pub fn build(corpus: &Corpus, max_terms: Option<usize>) -> Self {
        let mut ranked: Vec<(&str, u64)> = corpus.term_totals().collect();
        if let Some(limit) = max_terms {
            if ranked.len() > limit {
                ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
                info!(
                    terms = ranked.len(),
                    kept = limit,
                    "vocabulary cap reached, dropping least frequent terms"
                );
                ranked.truncate(limit);
            }
        }
        let mut terms: Vec<&str> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort_unstable();
        Self {
            terms: terms.into_iter().map(Box::from).collect(),
        }
    }

    #[inline]
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.terms.get_index_of(term)
    }

    #[inline]
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get_index(index).map(|t| &**t)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// terms in dimension order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|t| &**t)
    }
}

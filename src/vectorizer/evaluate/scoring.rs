use std::fmt::{self, Debug};

use rayon::prelude::*;

use crate::{
    utils::math::vector::ZeroSpVec,
    vectorizer::{compare::cosine_from_norms, tfidf::TFIDFEngine, FittedModel, Weight},
};

/// Score forced onto the queried item before ranking; the bottom of the
/// cosine range.
pub const EXCLUDED_SCORE: f64 = -1.0;

/// One scored catalog row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEntry {
    /// row in the model's item table
    pub row: usize,
    pub score: f64,
}

/// Scored rows of a query, one per catalog row until ranked.
#[derive(Clone, Default, PartialEq)]
pub struct Hits {
    pub list: Vec<HitEntry>,
}

impl Hits {
    pub fn new(list: Vec<HitEntry>) -> Self {
        Hits { list }
    }

    /// Sort by descending score.
    ///
    /// The sort is stable: equal scores keep catalog row order.
    pub fn sort_by_score_desc(&mut self) -> &mut Self {
        self.list.sort_by(|a, b| b.score.total_cmp(&a.score));
        self
    }

    /// Overwrite the score of every row matching `pred`.
    pub fn force_score(&mut self, score: f64, mut pred: impl FnMut(usize) -> bool) -> &mut Self {
        for hit in self.list.iter_mut().filter(|h| pred(h.row)) {
            hit.score = score;
        }
        self
    }

    /// Drop every row matching `pred`, keeping order.
    pub fn remove_rows(&mut self, mut pred: impl FnMut(usize) -> bool) -> &mut Self {
        self.list.retain(|h| !pred(h.row));
        self
    }

    /// Keep the first `top_n` entries. `top_n <= 0` empties the list.
    pub fn truncate_top(&mut self, top_n: i64) -> &mut Self {
        let keep = usize::try_from(top_n).unwrap_or(0);
        self.list.truncate(keep);
        self
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HitEntry> {
        self.list.iter()
    }
}

impl Debug for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // one hit per line
            writeln!(f, "Hits [")?;
            for hit in &self.list {
                writeln!(f, "    row {}: {:.6}", hit.row, hit.score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list()
                .entries(self.list.iter().map(|h| (h.row, h.score)))
                .finish()
        }
    }
}

impl<N, E> FittedModel<N, E>
where
    N: Weight,
    E: TFIDFEngine<N> + Send + Sync,
{
    /// Cosine similarity of `query` against every row, in row order.
    ///
    /// Rows are scored in parallel; the collected list keeps row order.
    /// Row norms come from fit time, so only the query norm is computed here.
    pub fn similarity(&self, query: &ZeroSpVec<N>) -> Hits {
        let query_norm = query.norm();
        let list = self
            .documents()
            .par_iter()
            .enumerate()
            .map(|(row, doc)| HitEntry {
                row,
                score: cosine_from_norms(query.dot(&doc.tf_vec), query_norm, doc.norm),
            })
            .collect();
        Hits { list }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::{compare::cosine_similarity, fit_model, tests::sample_items};

    fn hits(scores: &[f64]) -> Hits {
        Hits::new(
            scores
                .iter()
                .enumerate()
                .map(|(row, &score)| HitEntry { row, score })
                .collect(),
        )
    }

    fn rows(hits: &Hits) -> Vec<usize> {
        hits.iter().map(|h| h.row).collect()
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let mut h = hits(&[0.1, 0.5, 0.1, 0.9, 0.5]);
        h.sort_by_score_desc();
        assert_eq!(rows(&h), vec![3, 1, 4, 0, 2]);
    }

    #[test]
    fn forced_rows_sink_to_bottom() {
        let mut h = hits(&[0.9, 0.0, 0.3]);
        h.force_score(EXCLUDED_SCORE, |row| row == 0).sort_by_score_desc();
        assert_eq!(rows(&h), vec![2, 1, 0]);
        h.remove_rows(|row| row == 0);
        assert_eq!(rows(&h), vec![2, 1]);
    }

    #[test]
    fn truncate_top_bounds() {
        let mut h = hits(&[0.1, 0.2, 0.3]);
        h.truncate_top(10);
        assert_eq!(h.len(), 3);
        h.truncate_top(2);
        assert_eq!(h.len(), 2);
        h.truncate_top(0);
        assert!(h.is_empty());

        let mut h = hits(&[0.1]);
        h.truncate_top(-4);
        assert!(h.is_empty());
    }

    #[test]
    fn cached_norms_score_like_plain_cosine() {
        let model = fit_model(sample_items(), 5000).unwrap();
        for query in [model.encode("bamboo eco steel"), model.documents()[2].tf_vec.clone()] {
            let hits = model.similarity(&query);
            for (hit, doc) in hits.iter().zip(model.documents()) {
                assert_eq!(hit.score.to_bits(), cosine_similarity(&query, &doc.tf_vec).to_bits());
            }
        }
    }
}

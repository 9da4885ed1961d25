use num::{Float, NumCast};

use crate::{
    utils::math::vector::ZeroSpVec,
    vectorizer::{corpus::Corpus, token::TokenFrequency, vocabulary::Vocabulary},
};

/// TF-IDF weighting strategy.
///
/// `FittedModel` is generic over the engine, so other weighting schemes can
/// be plugged in without touching fitting or scoring.
pub trait TFIDFEngine<N>
where
    N: Float + Default + Into<f64>,
{
    /// IDF weight per vocabulary dimension.
    fn idf_vec(corpus: &Corpus, vocabulary: &Vocabulary) -> Vec<N>;

    /// TF weights of a document over the vocabulary.
    /// Tokens outside the vocabulary are ignored.
    fn tf_vec(freq: &TokenFrequency, vocabulary: &Vocabulary) -> ZeroSpVec<N>;

    /// TF × IDF, L2-normalized.
    fn tfidf_vec(freq: &TokenFrequency, vocabulary: &Vocabulary, idf: &[N]) -> ZeroSpVec<N> {
        let mut vec = Self::tf_vec(freq, vocabulary);
        vec.scale_by(idf);
        vec.l2_normalize();
        vec
    }
}

/// Default engine: raw counts for TF and smoothed IDF,
/// `idf(t) = ln((1 + n) / (1 + df(t))) + 1`.
///
/// The `+ 1` keeps terms that occur in every document from vanishing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl<N> TFIDFEngine<N> for DefaultTFIDFEngine
where
    N: Float + Default + Into<f64>,
{
    fn idf_vec(corpus: &Corpus, vocabulary: &Vocabulary) -> Vec<N> {
        let doc_num = corpus.get_doc_num() as f64;
        vocabulary
            .iter()
            .map(|term| {
                let doc_freq = corpus.get_term_count(term) as f64;
                let idf = ((1.0 + doc_num) / (1.0 + doc_freq)).ln() + 1.0;
                <N as NumCast>::from(idf).unwrap_or_else(N::one)
            })
            .collect()
    }

    fn tf_vec(freq: &TokenFrequency, vocabulary: &Vocabulary) -> ZeroSpVec<N> {
        let entries = freq.iter().filter_map(|(token, count)| {
            let index = vocabulary.index_of(token)?;
            let count = <N as NumCast>::from(count)?;
            Some((index as u32, count))
        });
        ZeroSpVec::from_entries(vocabulary.len(), entries)
    }
}

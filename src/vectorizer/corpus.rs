use indexmap::IndexMap;

use crate::vectorizer::token::TokenFrequency;

/// Corpus-wide term statistics gathered while fitting.
///
/// Only counts are kept, not document text:
/// - the number of documents
/// - per term, how many documents contain it (document frequency)
/// - per term, how often it occurs overall (used for the vocabulary cap)
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    doc_num: u64,
    doc_freq: IndexMap<Box<str>, u64>,
    term_total: IndexMap<Box<str>, u64>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from every document of the catalog, in row order.
    pub fn from_docs(docs: &[TokenFrequency]) -> Self {
        let mut corpus = Self::new();
        for doc in docs {
            corpus.add_doc(doc);
        }
        corpus
    }

    /// Add one document's tokens.
    pub fn add_doc(&mut self, doc: &TokenFrequency) {
        self.doc_num += 1;
        for (token, count) in doc.iter() {
            match self.doc_freq.get_mut(token) {
                Some(df) => *df += 1,
                None => {
                    self.doc_freq.insert(token.into(), 1);
                }
            }
            match self.term_total.get_mut(token) {
                Some(total) => *total += count as u64,
                None => {
                    self.term_total.insert(token.into(), count as u64);
                }
            }
        }
    }

    /// Get the number of documents in the corpus
    #[inline]
    pub fn get_doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Number of documents containing `term`
    #[inline]
    pub fn get_term_count(&self, term: &str) -> u64 {
        self.doc_freq.get(term).copied().unwrap_or(0)
    }

    /// `(term, total occurrences)` in first-seen order
    pub fn term_totals(&self) -> impl Iterator<Item = (&str, u64)> {
        self.term_total.iter().map(|(term, &total)| (&**term, total))
    }
}

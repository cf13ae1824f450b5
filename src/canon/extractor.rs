use super::corpus::Corpus;
use super::scorer::SimilarityScorer;
use crate::error::{CanonError, Result};

/// Default similarity threshold for matching and clustering
pub const DEFAULT_CUTOFF: u8 = 85;

/// Similarity threshold, guaranteed to lie in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cutoff(u8);

impl Cutoff {
    pub fn new(value: i64) -> Result<Self> {
        if !(0..=100).contains(&value) {
            return Err(CanonError::InvalidConfiguration(format!(
                "cutoff must be within 0..=100, got {}",
                value
            )));
        }
        Ok(Cutoff(value as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Cutoff {
    fn default() -> Self {
        Cutoff(DEFAULT_CUTOFF)
    }
}

/// A corpus entry that cleared the cutoff for one query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchCandidate<'c> {
    pub value: &'c str,
    pub score: u8,
    /// Position in the corpus, used for tie-breaking
    pub index: usize,
}

/// Finds every corpus entry similar enough to a query
pub struct CandidateExtractor<'a> {
    scorer: &'a dyn SimilarityScorer,
    cutoff: Cutoff,
    limit: Option<usize>,
}

impl<'a> CandidateExtractor<'a> {
    pub fn new(scorer: &'a dyn SimilarityScorer, cutoff: Cutoff) -> Self {
        Self {
            scorer,
            cutoff,
            limit: None,
        }
    }

    /// Keep only the best `limit` candidates after ranking
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn cutoff(&self) -> Cutoff {
        self.cutoff
    }

    /// Score `query` against every corpus entry and keep those at or above
    /// the cutoff, best first. Equal scores keep corpus order. The query's
    /// own entry is not filtered out: self-matches take part in the vote.
    pub fn extract<'c>(&self, query: &str, corpus: &'c Corpus) -> Vec<MatchCandidate<'c>> {
        let cutoff = self.cutoff.value();

        let mut matches: Vec<MatchCandidate<'c>> = corpus
            .iter()
            .enumerate()
            .filter_map(|(index, value)| {
                let score = self.scorer.score(query, value);
                (score >= cutoff).then_some(MatchCandidate { value, score, index })
            })
            .collect();

        // Stable sort: ties stay in corpus order
        matches.sort_by(|a, b| b.score.cmp(&a.score));

        if let Some(limit) = self.limit {
            matches.truncate(limit);
        }

        matches
    }
}

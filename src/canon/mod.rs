//! Fuzzy entity canonicalization
//!
//! Normalizes free-text company names and clusters near-duplicate variants
//! under a consensus representative.

pub mod corpus;
pub mod extractor;
pub mod normalizer;
pub mod pass;
pub mod resolver;
pub mod scorer;

pub use corpus::Corpus;
pub use extractor::{CandidateExtractor, Cutoff, MatchCandidate, DEFAULT_CUTOFF};
pub use normalizer::{TextNormalizer, DEFAULT_SUFFIX_STOPWORDS};
pub use pass::{canonicalize_column, Canonicalizer, PassReport};
pub use resolver::{ConsensusResolver, Resolution};
pub use scorer::{ScorerKind, SimilarityScorer, TokenSortJaroWinkler, TokenSortLevenshtein, TokenSortRatio};

use crate::error::Result;
use lazy_static::lazy_static;

lazy_static! {
    static ref DEFAULT_NORMALIZER: TextNormalizer = TextNormalizer::default();
}

/// Normalize with the built-in suffix stop-list
pub fn normalize(raw: &str) -> String {
    DEFAULT_NORMALIZER.normalize(raw)
}

/// Token-sort ratio between two normalized strings
pub fn score(a: &str, b: &str) -> u8 {
    TokenSortRatio.score(a, b)
}

/// Candidates for `query` at `cutoff`, scored with the token-sort ratio
pub fn extract<'c>(query: &str, corpus: &'c Corpus, cutoff: i64) -> Result<Vec<MatchCandidate<'c>>> {
    let scorer = TokenSortRatio;
    let extractor = CandidateExtractor::new(&scorer, Cutoff::new(cutoff)?);
    Ok(extractor.extract(query, corpus))
}

/// Consensus label for `query` at `cutoff`, scored with the token-sort ratio
pub fn resolve(query: &str, corpus: &Corpus, cutoff: i64) -> Result<String> {
    let scorer = TokenSortRatio;
    let extractor = CandidateExtractor::new(&scorer, Cutoff::new(cutoff)?);
    Ok(ConsensusResolver::new(extractor).resolve(query, corpus))
}

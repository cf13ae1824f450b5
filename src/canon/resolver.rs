use super::corpus::Corpus;
use super::extractor::{CandidateExtractor, MatchCandidate};

/// Outcome of resolving one query against the corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub label: String,
    /// Occurrences of `label` among the matches (0 on fallback)
    pub votes: usize,
    /// Total candidates that cleared the cutoff
    pub match_count: usize,
    /// True when nothing cleared the cutoff and the query was kept
    pub fallback: bool,
}

/// Picks a canonical label by majority vote over match results
pub struct ConsensusResolver<'a> {
    extractor: CandidateExtractor<'a>,
}

impl<'a> ConsensusResolver<'a> {
    pub fn new(extractor: CandidateExtractor<'a>) -> Self {
        Self { extractor }
    }

    pub fn resolve(&self, query: &str, corpus: &Corpus) -> String {
        self.resolve_detailed(query, corpus).label
    }

    /// Resolve `query` and report how the label was chosen.
    ///
    /// Counts occurrences of each distinct candidate string among the
    /// matches (a string repeated in the corpus contributes once per
    /// repetition). Highest count wins; ties go to the string seen first in
    /// match order. With no matches the query itself is returned.
    pub fn resolve_detailed(&self, query: &str, corpus: &Corpus) -> Resolution {
        let matches = self.extractor.extract(query, corpus);

        match most_common(&matches) {
            Some((label, votes)) => Resolution {
                label: label.to_string(),
                votes,
                match_count: matches.len(),
                fallback: false,
            },
            None => Resolution {
                label: query.to_string(),
                votes: 0,
                match_count: 0,
                fallback: true,
            },
        }
    }
}

/// Most frequent candidate string, first-seen wins ties
fn most_common<'c>(matches: &[MatchCandidate<'c>]) -> Option<(&'c str, usize)> {
    // Insertion-ordered tally keeps the result independent of hash order
    let mut tally: Vec<(&'c str, usize)> = Vec::new();
    for candidate in matches {
        match tally.iter_mut().find(|(value, _)| *value == candidate.value) {
            Some((_, count)) => *count += 1,
            None => tally.push((candidate.value, 1)),
        }
    }

    let mut best: Option<(&'c str, usize)> = None;
    for (value, count) in tally {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((value, count)),
        }
    }
    best
}

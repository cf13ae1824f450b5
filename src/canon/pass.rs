//! Canonicalization Pass
//!
//! Runs normalizer, extractor and resolver over an entire column:
//! 1. Normalize every value into the corpus
//! 2. Resolve each distinct non-empty value against the full corpus
//! 3. Map every row to its resolved label (empties get the missing label)

use super::corpus::Corpus;
use super::extractor::{CandidateExtractor, Cutoff};
use super::normalizer::TextNormalizer;
use super::resolver::{ConsensusResolver, Resolution};
use super::scorer::SimilarityScorer;
use crate::config::CanonConfig;
use crate::error::Result;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Summary of one pass over a column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub rows: usize,
    /// Rows that were null or normalized to empty
    pub missing_rows: usize,
    /// Distinct non-empty normalized values
    pub distinct_values: usize,
    /// Distinct labels in the output, the missing label included
    pub distinct_labels: usize,
    /// Rows whose label differs from their own normalized value
    pub relabelled_rows: usize,
}

/// Column-level canonicalization engine
pub struct Canonicalizer {
    normalizer: TextNormalizer,
    scorer: Box<dyn SimilarityScorer>,
    cutoff: Cutoff,
    match_limit: Option<usize>,
    missing_label: String,
    parallel: bool,
}

impl Canonicalizer {
    /// Build from configuration, rejecting invalid settings before any row
    /// is touched.
    pub fn new(config: &CanonConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            normalizer: TextNormalizer::with_stopwords(&config.suffix_stopwords)?,
            scorer: config.scorer.build(),
            cutoff: Cutoff::new(config.cutoff)?,
            match_limit: config.match_limit,
            missing_label: config.missing_label.clone(),
            parallel: config.parallel,
        })
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    pub fn cutoff(&self) -> Cutoff {
        self.cutoff
    }

    pub fn resolver(&self) -> ConsensusResolver<'_> {
        let extractor =
            CandidateExtractor::new(self.scorer.as_ref(), self.cutoff).with_limit(self.match_limit);
        ConsensusResolver::new(extractor)
    }

    pub fn canonicalize_column<S: AsRef<str>>(&self, values: &[Option<S>]) -> Vec<String> {
        self.canonicalize_column_with_report(values).0
    }

    /// Canonicalize a column, returning one label per input row in input order.
    pub fn canonicalize_column_with_report<S: AsRef<str>>(
        &self,
        values: &[Option<S>],
    ) -> (Vec<String>, PassReport) {
        let corpus = Corpus::build(&self.normalizer, values);

        // Resolution depends only on the query, so each distinct value is
        // resolved once. BTreeMap keeps the pass free of hash ordering.
        let mut seen = BTreeSet::new();
        let distinct: Vec<&str> = corpus
            .iter()
            .filter(|value| !value.is_empty() && seen.insert(*value))
            .collect();

        info!(
            "Canonicalizing {} rows ({} distinct values) with {} at cutoff {}",
            corpus.len(),
            distinct.len(),
            self.scorer.name(),
            self.cutoff.value()
        );

        let resolver = self.resolver();
        let resolutions: BTreeMap<&str, Resolution> = if self.parallel {
            distinct
                .par_iter()
                .map(|query| (*query, resolver.resolve_detailed(query, &corpus)))
                .collect::<Vec<_>>()
                .into_iter()
                .collect()
        } else {
            distinct
                .iter()
                .map(|query| (*query, resolver.resolve_detailed(query, &corpus)))
                .collect()
        };

        let mut report = PassReport {
            rows: corpus.len(),
            distinct_values: distinct.len(),
            ..Default::default()
        };

        let labels: Vec<String> = corpus
            .iter()
            .map(|value| match resolutions.get(value) {
                Some(resolution) => {
                    if resolution.label != value {
                        report.relabelled_rows += 1;
                    }
                    resolution.label.clone()
                }
                None => {
                    report.missing_rows += 1;
                    self.missing_label.clone()
                }
            })
            .collect();

        report.distinct_labels = labels.iter().collect::<BTreeSet<_>>().len();

        for (value, resolution) in &resolutions {
            if resolution.label != *value {
                debug!(
                    "'{}' -> '{}' ({} of {} matches)",
                    value, resolution.label, resolution.votes, resolution.match_count
                );
            }
        }

        info!(
            "Canonicalization complete: {} rows, {} missing, {} relabelled, {} distinct labels",
            report.rows, report.missing_rows, report.relabelled_rows, report.distinct_labels
        );

        (labels, report)
    }
}

/// Canonicalize a column with the default engine and the given cutoff.
///
/// Fails with `InvalidConfiguration` when `cutoff` is outside 0..=100.
pub fn canonicalize_column<S: AsRef<str>>(values: &[Option<S>], cutoff: i64) -> Result<Vec<String>> {
    let config = CanonConfig {
        cutoff,
        ..CanonConfig::default()
    };
    let canonicalizer = Canonicalizer::new(&config)?;
    Ok(canonicalizer.canonicalize_column(values))
}

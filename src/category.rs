use crate::canon::SimilarityScorer;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

/// Default similarity needed to snap a value onto a vocabulary entry
pub const DEFAULT_CATEGORY_THRESHOLD: u8 = 80;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").unwrap();
}

/// Known vocabularies of the movie dataset's categorical columns
pub fn default_vocabularies() -> BTreeMap<String, Vec<String>> {
    let entries: [(&str, &[&str]); 3] = [
        ("content_rating", &["g", "nc17", "nr", "pg", "pg13", "r"]),
        ("tomatometer_status", &["rotten", "fresh", "certified-fresh", "nr"]),
        ("audience_status", &["spilled", "upright", "nr"]),
    ];

    entries
        .iter()
        .map(|(column, vocabulary)| {
            (column.to_string(), vocabulary.iter().map(|v| v.to_string()).collect())
        })
        .collect()
}

/// Maps free-form categorical values onto a fixed vocabulary
pub struct CategorySnapper<'a> {
    scorer: &'a dyn SimilarityScorer,
    /// (entry as written, comparable form)
    vocabulary: Vec<(String, String)>,
    threshold: u8,
    missing_label: String,
}

impl<'a> CategorySnapper<'a> {
    pub fn new<S: AsRef<str>>(
        scorer: &'a dyn SimilarityScorer,
        vocabulary: &[S],
        threshold: u8,
        missing_label: impl Into<String>,
    ) -> Self {
        let vocabulary = vocabulary
            .iter()
            .map(|entry| (entry.as_ref().to_string(), comparable(entry.as_ref())))
            .collect();

        Self {
            scorer,
            vocabulary,
            threshold,
            missing_label: missing_label.into(),
        }
    }

    /// Best vocabulary entry scoring at least the threshold, else the
    /// missing label. Earlier entries win ties.
    pub fn snap(&self, value: Option<&str>) -> String {
        let Some(value) = value else {
            return self.missing_label.clone();
        };
        let value = comparable(value);
        if value.is_empty() {
            return self.missing_label.clone();
        }

        let mut best: Option<(&str, u8)> = None;
        for (entry, key) in &self.vocabulary {
            let score = self.scorer.score(&value, key);
            if score >= self.threshold && best.map_or(true, |(_, s)| score > s) {
                best = Some((entry.as_str(), score));
            }
        }

        match best {
            Some((entry, _)) => entry.to_string(),
            None => self.missing_label.clone(),
        }
    }
}

/// Lowercase, drop punctuation, single-space
fn comparable(value: &str) -> String {
    let lowered = value.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::TokenSortRatio;

    #[test]
    fn test_snaps_formatting_variants() {
        let scorer = TokenSortRatio;
        let vocabularies = default_vocabularies();
        let snapper = CategorySnapper::new(&scorer, &vocabularies["content_rating"], 80, "nr");

        assert_eq!(snapper.snap(Some("PG-13")), "pg13");
        assert_eq!(snapper.snap(Some("NC17")), "nc17");
        assert_eq!(snapper.snap(Some("R")), "r");
    }

    #[test]
    fn test_keeps_vocabulary_spelling() {
        let scorer = TokenSortRatio;
        let vocabularies = default_vocabularies();
        let snapper = CategorySnapper::new(&scorer, &vocabularies["tomatometer_status"], 80, "nr");

        assert_eq!(snapper.snap(Some("Certified-Fresh")), "certified-fresh");
        assert_eq!(snapper.snap(Some("Rotten")), "rotten");
    }

    #[test]
    fn test_unknown_and_missing_values() {
        let scorer = TokenSortRatio;
        let vocabularies = default_vocabularies();
        let snapper = CategorySnapper::new(&scorer, &vocabularies["audience_status"], 80, "nr");

        assert_eq!(snapper.snap(None), "nr");
        assert_eq!(snapper.snap(Some("")), "nr");
        assert_eq!(snapper.snap(Some("lukewarm")), "nr");
    }
}

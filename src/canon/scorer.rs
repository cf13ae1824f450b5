//! Similarity Scorer
//!
//! Token-order-insensitive similarity between two normalized strings,
//! bounded to [0, 100]. Tokens are sorted before comparison, so
//! "sony pictures" and "pictures sony" score 100.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strsim::{jaro_winkler, normalized_levenshtein};

/// Similarity between two normalized strings, 0 (no resemblance) to 100 (identical)
pub trait SimilarityScorer: Send + Sync {
    fn score(&self, a: &str, b: &str) -> u8;

    fn name(&self) -> &'static str;
}

/// Available scoring algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    #[default]
    TokenSortRatio,
    TokenSortLevenshtein,
    TokenSortJaroWinkler,
}

impl ScorerKind {
    pub fn build(self) -> Box<dyn SimilarityScorer> {
        match self {
            ScorerKind::TokenSortRatio => Box::new(TokenSortRatio),
            ScorerKind::TokenSortLevenshtein => Box::new(TokenSortLevenshtein),
            ScorerKind::TokenSortJaroWinkler => Box::new(TokenSortJaroWinkler),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "token_sort_ratio" | "ratio" => Some(ScorerKind::TokenSortRatio),
            "token_sort_levenshtein" | "levenshtein" => Some(ScorerKind::TokenSortLevenshtein),
            "token_sort_jaro_winkler" | "jaro_winkler" => Some(ScorerKind::TokenSortJaroWinkler),
            _ => None,
        }
    }
}

/// Indel-based ratio over sorted tokens: `2 * LCS / (len(a) + len(b))`
///
/// This is the normalized Indel similarity used by rapidfuzz's `ratio`;
/// strsim has no Indel metric, so the LCS is computed here.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSortRatio;

impl SimilarityScorer for TokenSortRatio {
    fn score(&self, a: &str, b: &str) -> u8 {
        token_sort_score(a, b, |a, b| {
            let a: Vec<char> = a.chars().collect();
            let b: Vec<char> = b.chars().collect();
            let total = a.len() + b.len();
            2.0 * lcs_len(&a, &b) as f64 / total as f64
        })
    }

    fn name(&self) -> &'static str {
        "token_sort_ratio"
    }
}

/// Normalized Levenshtein over sorted tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSortLevenshtein;

impl SimilarityScorer for TokenSortLevenshtein {
    fn score(&self, a: &str, b: &str) -> u8 {
        token_sort_score(a, b, normalized_levenshtein)
    }

    fn name(&self) -> &'static str {
        "token_sort_levenshtein"
    }
}

/// Jaro-Winkler over sorted tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSortJaroWinkler;

impl SimilarityScorer for TokenSortJaroWinkler {
    fn score(&self, a: &str, b: &str) -> u8 {
        token_sort_score(a, b, jaro_winkler)
    }

    fn name(&self) -> &'static str {
        "token_sort_jaro_winkler"
    }
}

/// Sort whitespace-separated tokens and rejoin with single spaces
pub fn sort_tokens(s: &str) -> String {
    s.split_whitespace().sorted().join(" ")
}

const SCORE_EPSILON: f64 = 1e-9;

/// Shared shell for all token-sort scorers.
///
/// Two empty strings score 100, empty vs non-empty scores 0; otherwise
/// `similarity` (in [0, 1]) is applied to the sorted forms and scaled.
/// Scores are truncated, never rounded up, so `score >= cutoff` holds
/// exactly when the unrounded similarity reaches an integer cutoff.
fn token_sort_score<F>(a: &str, b: &str, similarity: F) -> u8
where
    F: Fn(&str, &str) -> f64,
{
    let a = sort_tokens(a);
    let b = sort_tokens(b);

    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 100,
        (true, false) | (false, true) => return 0,
        _ => {}
    }
    if a == b {
        return 100;
    }

    // Nudge before flooring so exact ratios like 17/20 land on 85, not 84
    (similarity(&a, &b) * 100.0 + SCORE_EPSILON).floor().clamp(0.0, 100.0) as u8
}

/// Length of the longest common subsequence, two-row dynamic programming
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_order_is_irrelevant() {
        let scorer = TokenSortRatio;

        assert_eq!(scorer.score("sony pictures", "pictures sony"), 100);
        assert_eq!(scorer.score("a b c", "c  b a"), 100);
    }

    #[test]
    fn test_empty_strings() {
        for kind in [
            ScorerKind::TokenSortRatio,
            ScorerKind::TokenSortLevenshtein,
            ScorerKind::TokenSortJaroWinkler,
        ] {
            let scorer = kind.build();
            assert_eq!(scorer.score("", ""), 100, "{}", scorer.name());
            assert_eq!(scorer.score("", "sony"), 0, "{}", scorer.name());
            assert_eq!(scorer.score("sony", ""), 0, "{}", scorer.name());
        }
    }

    #[test]
    fn test_ratio_values() {
        let scorer = TokenSortRatio;

        // LCS("sony", "sonny") = 4 -> 8 / 9 = 88.9
        assert_eq!(scorer.score("sony", "sonny"), 88);
        assert_eq!(scorer.score("sony", "sony"), 100);
        assert_eq!(scorer.score("abc", "xyz"), 0);
        assert!(scorer.score("sonny", "warner") < 50);
    }

    #[test]
    fn test_scores_are_symmetric_and_bounded() {
        let pairs = [
            ("universal", "univrsal"),
            ("warner bros", "warner brothers"),
            ("mgm", "metro goldwyn mayer"),
        ];
        for kind in [
            ScorerKind::TokenSortRatio,
            ScorerKind::TokenSortLevenshtein,
            ScorerKind::TokenSortJaroWinkler,
        ] {
            let scorer = kind.build();
            for (a, b) in pairs {
                let s = scorer.score(a, b);
                assert!(s <= 100);
                assert_eq!(s, scorer.score(b, a), "{} {:?}", scorer.name(), (a, b));
            }
        }
    }

    #[test]
    fn test_scores_truncate_below_cutoff() {
        let scorer = TokenSortRatio;

        // 2 * 11 / 26 = 84.6 stays below 85
        assert_eq!(scorer.score("abcdefghijklm", "abcdefghijkxy"), 84);
        // 2 * 17 / 40 = 85.0 exactly
        assert_eq!(scorer.score("abcdefghijklmnopqrs", "abcdefghijklmnopqxyzw"), 85);
    }

    #[test]
    fn test_lcs_len() {
        let a: Vec<char> = "abcbdab".chars().collect();
        let b: Vec<char> = "bdcaba".chars().collect();
        assert_eq!(lcs_len(&a, &b), 4);
        assert_eq!(lcs_len(&a, &[]), 0);
    }

    #[test]
    fn test_parse_scorer_kind() {
        assert_eq!(ScorerKind::parse("token-sort-ratio"), Some(ScorerKind::TokenSortRatio));
        assert_eq!(ScorerKind::parse("Levenshtein"), Some(ScorerKind::TokenSortLevenshtein));
        assert_eq!(ScorerKind::parse("jaro_winkler"), Some(ScorerKind::TokenSortJaroWinkler));
        assert_eq!(ScorerKind::parse("soundex"), None);
    }
}

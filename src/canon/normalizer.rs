//! Text Normalizer
//!
//! Rule-based cleanup of free-text company names before fuzzy matching:
//! - Lowercases and trims
//! - Removes whole-word corporate suffixes ("inc", "ltd", "studios", ...)
//! - Strips punctuation
//! - Collapses whitespace

use crate::error::{CanonError, Result};
use lazy_static::lazy_static;
use regex::Regex;

/// Corporate suffix vocabulary for media/entertainment company names
pub const DEFAULT_SUFFIX_STOPWORDS: &[&str] = &[
    "inc",
    "corp",
    "corporation",
    "limited",
    "ltd",
    "plc",
    "pictures",
    "picture",
    "co",
    "entertainment",
    "films",
    "film",
    "studios",
    "corporat",
];

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Normalizer for company-name strings
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    /// Alternation over the stop-list; `None` when the list is empty
    suffix_pattern: Option<Regex>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        // The built-in list is plain ASCII words, so this cannot fail
        Self::with_stopwords(DEFAULT_SUFFIX_STOPWORDS).unwrap_or(Self {
            suffix_pattern: None,
        })
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a normalizer with a custom suffix stop-list.
    ///
    /// Tokens are matched as whole words after lowercasing, so they are
    /// lowercased and regex-escaped here. Blank tokens are ignored.
    pub fn with_stopwords<S: AsRef<str>>(stopwords: &[S]) -> Result<Self> {
        let tokens: Vec<String> = stopwords
            .iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .map(|s| regex::escape(&s))
            .collect();

        if tokens.is_empty() {
            return Ok(Self { suffix_pattern: None });
        }

        let pattern = format!(r"\b(?:{})\b", tokens.join("|"));
        let suffix_pattern = Regex::new(&pattern).map_err(|e| {
            CanonError::InvalidConfiguration(format!("Invalid suffix stop-list: {}", e))
        })?;

        Ok(Self {
            suffix_pattern: Some(suffix_pattern),
        })
    }

    /// Normalize a raw value. Never fails; empty input yields empty output.
    ///
    /// Repeats the cleanup until the value is stable so that the result is
    /// idempotent even when punctuation removal fuses a new suffix token
    /// (e.g. "c.o" -> "co").
    pub fn normalize(&self, raw: &str) -> String {
        let mut current = self.normalize_once(raw);
        loop {
            let next = self.normalize_once(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn normalize_once(&self, raw: &str) -> String {
        let lowered = raw.to_lowercase();
        let mut value = lowered.trim().to_string();

        if let Some(pattern) = &self.suffix_pattern {
            value = pattern.replace_all(&value, "").into_owned();
        }

        let value = NON_WORD.replace_all(&value, "");
        let value = WHITESPACE.replace_all(&value, " ");

        value.trim().to_string()
    }
}

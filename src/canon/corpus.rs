use super::normalizer::TextNormalizer;

/// Normalized values of one column, one entry per input row.
///
/// Built once per pass and read-only afterwards; duplicates and empty
/// strings are kept so that repeated variants carry their weight in the vote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    values: Vec<String>,
}

impl Corpus {
    /// Normalize every raw value, preserving row order
    pub fn build<S: AsRef<str>>(normalizer: &TextNormalizer, raw: &[Option<S>]) -> Self {
        let values = raw
            .iter()
            .map(|value| match value {
                Some(s) => normalizer.normalize(s.as_ref()),
                None => String::new(),
            })
            .collect();
        Self { values }
    }

    /// Wrap values that are already normalized
    pub fn from_normalized<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.values
    }
}

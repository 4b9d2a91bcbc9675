//! Collection exclusion patterns.

use anyhow::{Context, Result};
use glob::Pattern;
use value::CollectionPath;

/// Glob patterns naming collections to leave out of a run.
///
/// A pattern matches either the collection's full slash path
/// (`users/*/sessions`) or its bare id (`sessions`). Excluding a collection
/// excludes everything below it.
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
    patterns: Vec<Pattern>,
}

impl Exclusions {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Pattern::new(pattern)
                    .with_context(|| format!("invalid exclusion pattern {pattern:?}"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    #[must_use]
    pub fn is_excluded(&self, collection: &CollectionPath) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let path = collection.to_string();
        self.patterns
            .iter()
            .any(|pattern| pattern.matches(&path) || pattern.matches(collection.id()))
    }
}

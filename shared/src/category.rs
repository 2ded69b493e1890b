//! Label categories
//!
//! A category is the short uppercase word printed above the barcode
//! ("CPU", "MOBO", ...). The list is ordered and never holds duplicates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Categories seeded when the store has no entry yet.
pub const DEFAULT_CATEGORIES: [&str; 3] = ["CPU", "MOBO", "SCREEN"];

/// Category errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    /// Input was empty after trimming
    #[error("Please enter a label type")]
    Empty,

    /// Category already present (case-insensitive)
    #[error("Label type already exists")]
    Duplicate(LabelCategory),
}

/// A single, normalised label category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelCategory(String);

impl LabelCategory {
    /// Trim and uppercase raw user input.
    pub fn parse(raw: &str) -> Result<Self, CategoryError> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(CategoryError::Empty);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LabelCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for LabelCategory {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered, duplicate-free category list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelCategories(Vec<LabelCategory>);

impl LabelCategories {
    /// Build from stored strings.
    ///
    /// Entries are normalised on the way in; blanks and repeats are dropped
    /// so a hand-edited store can never break the no-duplicate invariant.
    pub fn from_stored<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self(Vec::new());
        for entry in entries {
            // Blank and duplicate entries are skipped silently
            let _ = list.add(entry.as_ref());
        }
        list
    }

    /// Append a new category.
    ///
    /// Returns the normalised category, or an error leaving the list untouched.
    pub fn add(&mut self, raw: &str) -> Result<LabelCategory, CategoryError> {
        let category = LabelCategory::parse(raw)?;
        if self.contains(category.as_str()) {
            return Err(CategoryError::Duplicate(category));
        }
        self.0.push(category.clone());
        Ok(category)
    }

    /// Case-insensitive membership test
    pub fn contains(&self, name: &str) -> bool {
        let needle = name.trim().to_uppercase();
        self.0.iter().any(|c| c.as_str() == needle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabelCategory> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Plain strings, in order, as written to the store
    pub fn to_stored(&self) -> Vec<String> {
        self.0.iter().map(|c| c.0.clone()).collect()
    }
}

impl Default for LabelCategories {
    fn default() -> Self {
        Self::from_stored(DEFAULT_CATEGORIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let list = LabelCategories::default();
        assert_eq!(list.to_stored(), vec!["CPU", "MOBO", "SCREEN"]);
    }

    #[test]
    fn test_parse_normalizes() {
        let c = LabelCategory::parse("  ram ").unwrap();
        assert_eq!(c.as_str(), "RAM");
        assert_eq!(LabelCategory::parse("   "), Err(CategoryError::Empty));
    }

    #[test]
    fn test_add_is_idempotent_case_insensitive() {
        let mut list = LabelCategories::default();
        assert_eq!(list.add("psu").unwrap().as_str(), "PSU");
        assert_eq!(list.len(), 4);

        let err = list.add("Psu").unwrap_err();
        assert!(matches!(err, CategoryError::Duplicate(ref c) if c.as_str() == "PSU"));
        assert_eq!(list.len(), 4);

        assert!(matches!(list.add("cpu"), Err(CategoryError::Duplicate(_))));
        assert_eq!(list.to_stored(), vec!["CPU", "MOBO", "SCREEN", "PSU"]);
    }

    #[test]
    fn test_from_stored_drops_blanks_and_repeats() {
        let list = LabelCategories::from_stored(["cpu", "", "CPU", "Screen", "  "]);
        assert_eq!(list.to_stored(), vec!["CPU", "SCREEN"]);
    }

    #[test]
    fn test_serde_transparent() {
        let list = LabelCategories::from_stored(["CPU", "GPU"]);
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, r#"["CPU","GPU"]"#);
    }
}

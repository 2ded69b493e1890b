//! Common types for the shared crate
//!
//! Selector values and status severities shared by the workflow and the UI.

use serde::{Deserialize, Serialize};

use crate::category::LabelCategory;

/// Selector value of the trailing "add a new category" entry
pub const ADD_NEW_SENTINEL: &str = "add-new";

/// What the category selector currently points at
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategorySelection {
    /// Leading "select a label type" entry
    #[default]
    Placeholder,
    /// A concrete stored category
    Category(LabelCategory),
    /// Trailing entry that reveals the add form
    AddNew,
}

impl CategorySelection {
    /// The raw selector value ("" / category / "add-new")
    pub fn value(&self) -> &str {
        match self {
            Self::Placeholder => "",
            Self::Category(c) => c.as_str(),
            Self::AddNew => ADD_NEW_SENTINEL,
        }
    }

    /// Display text for the selector row
    pub fn label(&self) -> &str {
        match self {
            Self::Placeholder => "Select label type...",
            Self::Category(c) => c.as_str(),
            Self::AddNew => "+ Add new label type",
        }
    }

    pub fn is_add_new(&self) -> bool {
        matches!(self, Self::AddNew)
    }
}

/// Status banner severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Error,
}

impl Severity {
    /// Success and info banners hide themselves; errors stay up.
    pub fn auto_hides(&self) -> bool {
        !matches!(self, Self::Error)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Error => "error",
        };
        write!(f, "{}", s)
    }
}

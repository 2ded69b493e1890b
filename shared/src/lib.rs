//! Shared types for the label printer
//!
//! Domain value types used by both the print workflow and the popup:
//! label categories, the selector sentinels and status severities.

pub mod category;
pub mod types;

// Re-exports
pub use category::{CategoryError, DEFAULT_CATEGORIES, LabelCategories, LabelCategory};
pub use serde::{Deserialize, Serialize};
pub use types::{ADD_NEW_SENTINEL, CategorySelection, Severity};

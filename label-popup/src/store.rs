// label-popup/src/store.rs
// Category storage - a JSON object file used as a key/value store

use serde_json::{Map, Value};
use shared::LabelCategories;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Key holding the category list
pub const CATEGORIES_KEY: &str = "labelTypes";

/// Key the desktop printer app uses for the same list in the same file
pub const LEGACY_CATEGORIES_KEY: &str = "label_types";

/// File name used when no store path is configured
pub const DEFAULT_STORE_FILE: &str = ".dymo_label_printer.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid store layout: {0}")]
    Layout(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistent home of the category list
pub trait CategoryStore {
    /// `Ok(None)` when nothing has been stored yet
    fn load(&self) -> StoreResult<Option<Vec<String>>>;

    fn save(&self, categories: &[String]) -> StoreResult<()>;
}

/// JSON object file store
///
/// Other keys found in the file are preserved on save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.dymo_label_printer.json`, or the working directory without `HOME`
    pub fn default_path() -> PathBuf {
        match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(DEFAULT_STORE_FILE),
            None => PathBuf::from(DEFAULT_STORE_FILE),
        }
    }

    /// 确保目录存在
    fn ensure_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn read_object(&self) -> StoreResult<Option<Map<String, Value>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<Value>(&json)? {
            Value::Object(map) => Ok(Some(map)),
            other => Err(StoreError::Layout(format!(
                "expected an object, found {}",
                type_name(&other)
            ))),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CategoryStore for JsonFileStore {
    fn load(&self) -> StoreResult<Option<Vec<String>>> {
        let Some(map) = self.read_object()? else {
            return Ok(None);
        };
        let stored = [CATEGORIES_KEY, LEGACY_CATEGORIES_KEY]
            .into_iter()
            .filter_map(|key| map.get(key))
            .find(|value| !value.is_null());
        match stored {
            None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
        }
    }

    fn save(&self, categories: &[String]) -> StoreResult<()> {
        // A corrupt file is replaced rather than blocking the save
        let mut map = self.read_object().ok().flatten().unwrap_or_default();
        let list = serde_json::to_value(categories)?;
        // Keep the desktop app's copy in step so the two never diverge
        if map.contains_key(LEGACY_CATEGORIES_KEY) {
            map.insert(LEGACY_CATEGORIES_KEY.to_string(), list.clone());
        }
        map.insert(CATEGORIES_KEY.to_string(), list);

        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(&Value::Object(map))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Load the category list, falling back to the defaults on any failure.
pub fn load_categories(store: &dyn CategoryStore) -> LabelCategories {
    match store.load() {
        Ok(Some(stored)) => {
            let categories = LabelCategories::from_stored(stored);
            debug!(count = categories.len(), "Loaded label types");
            categories
        }
        Ok(None) => LabelCategories::default(),
        Err(e) => {
            warn!(error = %e, "Error loading label types, using defaults");
            LabelCategories::default()
        }
    }
}

/// Persist the category list. Failures are logged and otherwise ignored.
pub fn save_categories(store: &dyn CategoryStore, categories: &LabelCategories) {
    match store.save(&categories.to_stored()) {
        Ok(()) => debug!(count = categories.len(), "Saved label types"),
        Err(e) => warn!(error = %e, "Error saving label types"),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

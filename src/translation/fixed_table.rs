/*!
 * Fixed translation table.
 *
 * A JSON object mapping exact source strings to approved translations.
 * Lookups use the trimmed text; entries with an empty value count as absent.
 */

use anyhow::{Context, Result};
use log::{info, warn};
use std::collections::HashMap;
use std::path::Path;

use crate::file_utils::FileManager;

/// Exact-match translation overrides, immutable for a run
#[derive(Debug, Clone, Default)]
pub struct FixedTranslationTable {
    entries: HashMap<String, String>,
}

impl FixedTranslationTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from in-memory pairs
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parse a table from a JSON object
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: HashMap<String, String> =
            serde_json::from_str(json).context("Fixed translation table must be a JSON object of strings")?;
        Ok(Self { entries })
    }

    /// Load the table from disk. A missing file yields an empty table.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !FileManager::file_exists(path) {
            warn!("Fixed translation table not found at {:?}, continuing without it", path);
            return Ok(Self::new());
        }

        let content = FileManager::read_to_string(path)?;
        let table = Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse fixed translation table: {:?}", path))?;
        info!("Loaded fixed translation table with {} entries", table.len());

        Ok(table)
    }

    /// Approved translation of `text`, matched on its trimmed form
    pub fn lookup(&self, text: &str) -> Option<&str> {
        self.entries
            .get(text.trim())
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

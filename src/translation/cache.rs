/*!
 * Translation memo cache.
 *
 * Documents repeat the same short strings many times (table headings,
 * labels in the header of every section). The cache lives for one run and
 * makes sure each distinct string reaches the remote service once.
 */

use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Cache key combining source text, source language, and target language
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    /// Source text to translate
    source_text: String,

    /// Source language code
    source_language: String,

    /// Target language code
    target_language: String,
}

impl CacheKey {
    fn new(source_text: &str, source_language: &str, target_language: &str) -> Self {
        Self {
            source_text: source_text.to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        }
    }
}

/// Translation cache for storing and retrieving translations
#[derive(Debug, Default)]
pub struct TranslationCache {
    /// Internal cache storage
    cache: RwLock<HashMap<CacheKey, String>>,
}

impl TranslationCache {
    /// Create a new, empty translation cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a translation from the cache
    pub fn get(&self, source_text: &str, source_language: &str, target_language: &str) -> Option<String> {
        let key = CacheKey::new(source_text, source_language, target_language);
        let translation = self.cache.read().get(&key).cloned();

        if translation.is_some() {
            debug!("Cache hit for '{}'", truncate_text(source_text, 30));
        }
        translation
    }

    /// Store a translation in the cache
    pub fn store(&self, source_text: &str, source_language: &str, target_language: &str, translation: &str) {
        let key = CacheKey::new(source_text, source_language, target_language);
        self.cache.write().insert(key, translation.to_string());
    }
}

/// Truncate text to a maximum number of characters with ellipsis
pub(crate) fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

/*!
 * Translation dispatch.
 *
 * Every string the augmentation engine wants translated goes through the
 * `Dispatcher`: the fixed table is consulted first, then the memo cache,
 * then the remote translator. Long inputs are cut on line boundaries and
 * sent one chunk at a time with a pacing delay.
 *
 * Dispatch never fails. When the translator errors the original text is
 * returned so the document keeps its source text at that position.
 */

use log::{debug, warn};
use parking_lot::Mutex;
use std::time::Duration;

use crate::app_config::Config;
use crate::language_utils::contains_source_script;
use crate::translation::cache::{truncate_text, TranslationCache};
use crate::translation::core::Translator;
use crate::translation::fixed_table::FixedTranslationTable;

/// Language pair and limits used by the dispatcher
#[derive(Debug, Clone)]
pub struct DispatcherSettings {
    pub source_language: String,
    pub target_language: String,
    /// Longest input, in characters, sent in one request
    pub max_chars_per_request: usize,
    /// Delay between chunk requests
    pub pacing: Duration,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            source_language: "zh-TW".to_string(),
            target_language: "en".to_string(),
            max_chars_per_request: 4500,
            pacing: Duration::from_millis(100),
        }
    }
}

impl DispatcherSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            source_language: config.source_language.clone(),
            target_language: config.target_language.clone(),
            max_chars_per_request: config.translation.common.max_chars_per_request,
            pacing: Duration::from_millis(config.translation.common.rate_limit_delay_ms),
        }
    }
}

/// Counters for one run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    /// Answered by the fixed table
    pub fixed_hits: usize,
    /// Answered by the memo cache
    pub cache_hits: usize,
    /// Requests sent to the translator
    pub remote_calls: usize,
    /// Inputs returned unchanged because they had nothing to translate
    pub skipped: usize,
    /// Inputs returned unchanged because the translator failed
    pub failures: usize,
}

/// Split `text` into the largest runs of whole lines not exceeding `max_chars`.
///
/// A single line longer than the limit becomes its own chunk. Chunks are
/// trimmed and blank chunks are dropped.
pub fn chunk_by_lines(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        let joined_len = if current.is_empty() {
            line_len
        } else {
            current_len + 1 + line_len
        };

        if current.is_empty() || joined_len <= max_chars {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
            current_len = joined_len;
        } else {
            chunks.push(std::mem::take(&mut current));
            current.push_str(line);
            current_len = line_len;
        }
    }
    chunks.push(current);

    chunks
        .into_iter()
        .map(|chunk| chunk.trim().to_string())
        .filter(|chunk| !chunk.is_empty())
        .collect()
}

/// Fixed table first, translator second, never failing
pub struct Dispatcher<T: Translator> {
    translator: T,
    fixed_table: FixedTranslationTable,
    cache: TranslationCache,
    settings: DispatcherSettings,
    stats: Mutex<DispatchStats>,
}

impl<T: Translator> Dispatcher<T> {
    pub fn new(translator: T, fixed_table: FixedTranslationTable, settings: DispatcherSettings) -> Self {
        Self {
            translator,
            fixed_table,
            cache: TranslationCache::new(),
            settings,
            stats: Mutex::new(DispatchStats::default()),
        }
    }

    pub fn settings(&self) -> &DispatcherSettings {
        &self.settings
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }

    /// Snapshot of the counters
    pub fn stats(&self) -> DispatchStats {
        *self.stats.lock()
    }

    /// Fixed-table translation of `text`, or the translator's answer
    pub async fn resolve(&self, text: &str) -> String {
        if let Some(fixed) = self.fixed_table.lookup(text) {
            self.stats.lock().fixed_hits += 1;
            debug!("Fixed translation used for '{}'", truncate_text(text.trim(), 30));
            return fixed.to_string();
        }
        self.translate(text).await
    }

    /// Translate `text`, returning it unchanged when there is nothing to do
    /// or the translator fails
    pub async fn translate(&self, text: &str) -> String {
        if text.trim().is_empty() || !contains_source_script(text) {
            self.stats.lock().skipped += 1;
            return text.to_string();
        }

        let source = self.settings.source_language.as_str();
        let target = self.settings.target_language.as_str();

        if let Some(cached) = self.cache.get(text, source, target) {
            self.stats.lock().cache_hits += 1;
            return cached;
        }

        let result = if text.chars().count() > self.settings.max_chars_per_request {
            self.translate_chunked(text).await
        } else {
            self.stats.lock().remote_calls += 1;
            self.translator.translate(text, source, target).await
        };

        match result {
            Ok(translated) => {
                self.cache.store(text, source, target, &translated);
                translated
            }
            Err(e) => {
                warn!("Translation failed for '{}': {}", truncate_text(text.trim(), 50), e);
                self.stats.lock().failures += 1;
                text.to_string()
            }
        }
    }

    async fn translate_chunked(&self, text: &str) -> Result<String, crate::errors::TranslationError> {
        let chunks = chunk_by_lines(text, self.settings.max_chars_per_request);
        debug!("Splitting {} chars into {} chunks", text.chars().count(), chunks.len());

        let mut translated = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            if i > 0 && !self.settings.pacing.is_zero() {
                tokio::time::sleep(self.settings.pacing).await;
            }
            self.stats.lock().remote_calls += 1;
            let part = self
                .translator
                .translate(chunk, &self.settings.source_language, &self.settings.target_language)
                .await?;
            translated.push(part);
        }

        Ok(translated.join("\n"))
    }
}

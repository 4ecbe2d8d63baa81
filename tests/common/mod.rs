/*!
 * Common test utilities for the dualdoc test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;

use anyhow::Result;
use tempfile::TempDir;

use dualdoc::augment::{AugmentStyle, Augmenter};
use dualdoc::document::{Cell, Paragraph, Row, Table};
use dualdoc::providers::mock::MockProvider;
use dualdoc::translation::{Dispatcher, DispatcherSettings, FixedTranslationTable};

static INIT_LOGGER: Once = Once::new();

/// Route `log` output through env_logger once per test binary
pub fn init_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Dispatcher settings without pacing delays
pub fn fast_settings() -> DispatcherSettings {
    DispatcherSettings {
        pacing: Duration::ZERO,
        ..Default::default()
    }
}

/// Mock provider answering `EN<n>` where n is the character count of the request
pub fn counting_provider() -> MockProvider {
    MockProvider::working().with_custom_response(|req| format!("EN{}", req.text.chars().count()))
}

/// Mock provider answering from a fixed list of pairs, `???` otherwise
pub fn dictionary_provider(pairs: &'static [(&'static str, &'static str)]) -> MockProvider {
    MockProvider::working().with_custom_response(move |req| {
        pairs
            .iter()
            .find(|(source, _)| *source == req.text)
            .map(|(_, target)| target.to_string())
            .unwrap_or_else(|| "???".to_string())
    })
}

/// Augmenter over `provider` with an optional fixed table
pub fn augmenter_with(provider: MockProvider, fixed_table: FixedTranslationTable) -> Augmenter<MockProvider> {
    init_logging();
    Augmenter::new(
        Dispatcher::new(provider, fixed_table, fast_settings()),
        AugmentStyle::default(),
    )
}

/// One-column table where each row holds one paragraph per text
pub fn single_cell_table(texts: &[&str]) -> Table {
    let paragraphs = texts.iter().map(|text| Paragraph::from_text(*text)).collect();
    Table::from_rows(vec![Row::new(vec![Cell::from_paragraphs(paragraphs)])])
}

/// Texts of the first cell of `table`
pub fn first_cell_texts(table: &Table) -> Vec<String> {
    table
        .cells()
        .next()
        .map(|cell| cell.content.paragraphs().map(Paragraph::text).collect())
        .unwrap_or_default()
}

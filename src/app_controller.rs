use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::augment::{normalize, AugmentReport, AugmentStyle, Augmenter, NormalizeReport, NormalizeSettings};
use crate::document::Document;
use crate::file_utils::FileManager;
use crate::translation::{Dispatcher, DispatcherSettings, FixedTranslationTable, TranslationService, Translator};

// @module: Application controller for bilingual document augmentation

/// Outcome of one document run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub augment: AugmentReport,
    pub normalize: NormalizeReport,
    pub elapsed: Duration,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Create a controller with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate `input_file` with the configured provider and write the
    /// bilingual document to `output_file`.
    pub async fn run(&self, input_file: PathBuf, output_file: PathBuf) -> Result<RunSummary> {
        let service = TranslationService::new(self.config.translation.clone())
            .context("Failed to create translation service")?;

        self.run_with_translator(service, &input_file, &output_file).await
    }

    /// Same as [`run`](Self::run) with an explicit translator.
    pub async fn run_with_translator<T: Translator>(
        &self,
        translator: T,
        input_file: &Path,
        output_file: &Path,
    ) -> Result<RunSummary> {
        let start_time = Instant::now();
        let provider_name = translator.name().to_string();

        info!("Processing document: {:?}", input_file);
        let mut document = Document::load(input_file)
            .with_context(|| format!("Failed to load document: {:?}", input_file))?;

        let fixed_table = FixedTranslationTable::load(&self.config.fixed_table_path)?;
        let dispatcher = Dispatcher::new(translator, fixed_table, DispatcherSettings::from_config(&self.config));
        let augmenter = Augmenter::new(dispatcher, AugmentStyle::from(&self.config.formatting));

        let progress_bar = Self::phase_spinner();
        let augment = augmenter
            .translate_document_with_progress(&mut document, |phase| {
                debug!("Phase: {}", phase);
                progress_bar.set_message(phase.to_string());
            })
            .await;
        progress_bar.finish_and_clear();

        let normalize = normalize(&mut document, &NormalizeSettings::from(&self.config.formatting));

        document
            .save(output_file)
            .with_context(|| format!("Failed to save document: {:?}", output_file))?;

        if augment.dispatch.failures > 0 {
            warn!(
                "{} translation requests failed, source text kept in place",
                augment.dispatch.failures
            );
        }
        if augment.detached_nodes > 0 {
            warn!("{} insertions skipped on missing nodes", augment.detached_nodes);
        }

        let elapsed = start_time.elapsed();
        info!(
            "Success: {:?} ({} translations inserted, {} groups merged) in {}",
            output_file,
            augment.translations_inserted,
            augment.groups_merged,
            Self::format_duration(elapsed)
        );
        self.write_run_log(&provider_name, elapsed)?;

        Ok(RunSummary {
            output_path: output_file.to_path_buf(),
            augment,
            normalize,
            elapsed,
        })
    }

    fn phase_spinner() -> ProgressBar {
        let progress_bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .or_else(|_| ProgressStyle::default_spinner().template("{spinner} {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        progress_bar.set_style(style);
        progress_bar.enable_steady_tick(Duration::from_millis(120));
        progress_bar
    }

    /// Append the run duration line to the run log
    fn write_run_log(&self, provider_name: &str, elapsed: Duration) -> Result<()> {
        let line = Self::run_log_line(provider_name, elapsed);
        FileManager::append_to_log_file(&self.config.run_log_path, &line)
            .context("Failed to write run log")
    }

    pub fn run_log_line(provider_name: &str, elapsed: Duration) -> String {
        format!("[{}-Bilingual] | total: {:.2} min", provider_name, elapsed.as_secs_f64() / 60.0)
    }

    /// Format a duration as `1h 2m 3s`, `2m 3s` or `3.2s`
    fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{:.1}s", duration.as_secs_f64())
        }
    }
}

use anyhow::{anyhow, Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::file_utils::FileManager;
use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language tag (e.g. `zh-TW`)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language tag (e.g. `en`)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Path of the fixed translation table (JSON object)
    #[serde(default = "default_fixed_table_path")]
    pub fixed_table_path: String,

    /// File receiving one line per completed run
    #[serde(default = "default_run_log_path")]
    pub run_log_path: String,

    /// Font and size rules applied to the bilingual document
    #[serde(default)]
    pub formatting: FormattingConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google web translate
    #[default]
    Google,
    // @provider: Ollama
    Ollama,
    // @provider: Anthropic
    Anthropic,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google",
            Self::Ollama => "Ollama",
            Self::Anthropic => "Anthropic",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
            Self::Ollama => "ollama".to_string(),
            Self::Anthropic => "anthropic".to_string(),
        }
    }

    // @returns: Whether the provider needs an API key
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::Anthropic)
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "ollama" => Ok(Self::Ollama),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds, overrides the common value
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::Google => Self {
                provider_type: "google".to_string(),
                model: String::new(),
                api_key: String::new(),
                endpoint: default_google_endpoint(),
                timeout_secs: None,
            },
            TranslationProvider::Ollama => Self {
                provider_type: "ollama".to_string(),
                model: default_ollama_model(),
                api_key: String::new(),
                endpoint: default_ollama_endpoint(),
                timeout_secs: None,
            },
            TranslationProvider::Anthropic => Self {
                provider_type: "anthropic".to_string(),
                model: default_anthropic_model(),
                api_key: String::new(),
                endpoint: default_anthropic_endpoint(),
                timeout_secs: Some(default_anthropic_timeout_secs()),
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt template for LLM providers
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Delay in milliseconds between consecutive chunk requests
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,

    /// Longest text, in characters, sent in a single request
    #[serde(default = "default_max_chars_per_request")]
    pub max_chars_per_request: usize,

    /// Temperature parameter for text generation (0.0 to 1.0)
    /// Lower values make output more deterministic, higher values more creative
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
            max_chars_per_request: default_max_chars_per_request(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Font and size rules for the bilingual output
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FormattingConfig {
    /// Font applied to translated text
    #[serde(default = "default_target_font")]
    pub target_font: String,

    /// Size of inserted translations when the source size is unknown
    #[serde(default = "default_size_pt")]
    pub default_size_pt: f32,

    /// Size applied to source text in headers and footers
    #[serde(default = "default_header_source_size_pt")]
    pub header_source_size_pt: f32,

    /// Size of translations below header/footer paragraphs
    #[serde(default = "default_header_translation_size_pt")]
    pub header_translation_size_pt: f32,

    /// Size of translations below header/footer table cells
    #[serde(default = "default_header_table_translation_size_pt")]
    pub header_table_translation_size_pt: f32,

    /// Run size inside translated diagram text boxes
    #[serde(default = "default_diagram_half_points")]
    pub diagram_half_points: u32,

    /// Exact line height inside translated diagram text boxes
    #[serde(default = "default_diagram_line_twips")]
    pub diagram_line_twips: u32,

    /// Scale applied to target-language table text
    #[serde(default = "default_table_shrink_ratio")]
    pub table_shrink_ratio: f64,

    /// Smallest size table scaling may produce
    #[serde(default = "default_table_min_half_points")]
    pub table_min_half_points: u32,

    /// Size assumed for table runs without an explicit size
    #[serde(default = "default_table_default_half_points")]
    pub table_default_half_points: u32,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            target_font: default_target_font(),
            default_size_pt: default_size_pt(),
            header_source_size_pt: default_header_source_size_pt(),
            header_translation_size_pt: default_header_translation_size_pt(),
            header_table_translation_size_pt: default_header_table_translation_size_pt(),
            diagram_half_points: default_diagram_half_points(),
            diagram_line_twips: default_diagram_line_twips(),
            table_shrink_ratio: default_table_shrink_ratio(),
            table_min_half_points: default_table_min_half_points(),
            table_default_half_points: default_table_default_half_points(),
        }
    }
}

/// Convert a point size to half-points
pub fn pt_to_half_points(pt: f32) -> u32 {
    (pt * 2.0).round().max(0.0) as u32
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "zh-TW".to_string()
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_fixed_table_path() -> String {
    "data/fixed_translation.json".to_string()
}

fn default_run_log_path() -> String {
    "translation_log.txt".to_string()
}

fn default_max_chars_per_request() -> usize {
    4500
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_anthropic_timeout_secs() -> u64 {
    60
}

fn default_rate_limit_delay_ms() -> u64 {
    100
}

fn default_temperature() -> f32 {
    0.3
}

fn default_google_endpoint() -> String {
    crate::providers::google::DEFAULT_GOOGLE_ENDPOINT.to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_system_prompt() -> String {
    "You are a professional translator of technical documents. Translate the following text from {source_language} to {target_language}. Keep numbers, units and line breaks. Only respond with the translated text, without any explanations or notes.".to_string()
}

fn default_target_font() -> String {
    "Times New Roman".to_string()
}

fn default_size_pt() -> f32 {
    11.0
}

fn default_header_source_size_pt() -> f32 {
    10.0
}

fn default_header_translation_size_pt() -> f32 {
    6.0
}

fn default_header_table_translation_size_pt() -> f32 {
    8.0
}

fn default_diagram_half_points() -> u32 {
    11
}

fn default_diagram_line_twips() -> u32 {
    130
}

fn default_table_shrink_ratio() -> f64 {
    0.82
}

fn default_table_min_half_points() -> u32 {
    20
}

fn default_table_default_half_points() -> u32 {
    22
}

impl Config {
    /// Load the configuration from `path`, creating a default file when missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if FileManager::file_exists(path) {
            let content = FileManager::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok(config);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        FileManager::write_to_file(path, &config_json)
            .with_context(|| format!("Failed to write default config to file: {:?}", path))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        language_utils::validate_language_code(&self.source_language)
            .context("Invalid source language")?;
        language_utils::validate_language_code(&self.target_language)
            .context("Invalid target language")?;
        let _source_name = language_utils::get_language_name(&self.source_language)?;
        let _target_name = language_utils::get_language_name(&self.target_language)?;

        if self.translation.provider.requires_api_key() && self.translation.get_api_key().is_empty() {
            return Err(anyhow!(
                "Translation API key is required for {} provider",
                self.translation.provider.display_name()
            ));
        }

        if self.translation.common.max_chars_per_request == 0 {
            return Err(anyhow!("max_chars_per_request must be greater than zero"));
        }

        let ratio = self.formatting.table_shrink_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(anyhow!("table_shrink_ratio must be in (0, 1], got {}", ratio));
        }

        if self.formatting.target_font.trim().is_empty() {
            return Err(anyhow!("target_font cannot be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            fixed_table_path: default_fixed_table_path(),
            run_log_path: default_run_log_path(),
            formatting: FormattingConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get a mutable provider configuration by type
    pub fn get_provider_config_mut(&mut self, provider_type: &TranslationProvider) -> Option<&mut ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers
            .iter_mut()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::Google => String::new(),
            TranslationProvider::Ollama => default_ollama_model(),
            TranslationProvider::Anthropic => default_anthropic_model(),
        }
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|provider_config| provider_config.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::Google => default_google_endpoint(),
            TranslationProvider::Ollama => default_ollama_endpoint(),
            TranslationProvider::Anthropic => default_anthropic_endpoint(),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        self.get_active_provider_config()
            .and_then(|provider_config| provider_config.timeout_secs)
            .unwrap_or(self.common.timeout_secs)
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::Google),
                ProviderConfig::new(TranslationProvider::Ollama),
                ProviderConfig::new(TranslationProvider::Anthropic),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}

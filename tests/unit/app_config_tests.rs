/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use dualdoc::app_config::{pt_to_half_points, Config, LogLevel, ProviderConfig, TranslationProvider};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "zh-TW");
    assert_eq!(config.target_language, "en");
    assert_eq!(config.translation.provider, TranslationProvider::Google);
    assert_eq!(config.translation.common.max_chars_per_request, 4500);
    assert_eq!(config.translation.common.rate_limit_delay_ms, 100);
    assert_eq!(config.fixed_table_path, "data/fixed_translation.json");
    assert_eq!(config.formatting.target_font, "Times New Roman");
    assert_eq!(config.formatting.table_min_half_points, 20);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    // Invalid source language
    config.source_language = "xyz".to_string();
    assert!(config.validate().is_err());
    config.source_language = "zh-TW".to_string();

    // Shrink ratio out of range
    config.formatting.table_shrink_ratio = 1.5;
    assert!(config.validate().is_err());
    config.formatting.table_shrink_ratio = 0.82;

    // Anthropic requires an API key
    config.translation.provider = TranslationProvider::Anthropic;
    assert!(config.validate().is_err());
    if let Some(provider_config) = config
        .translation
        .get_provider_config_mut(&TranslationProvider::Anthropic)
    {
        provider_config.api_key = "test-key".to_string();
    }
    assert!(config.validate().is_ok());
}

/// Test that partial JSON fills the remaining fields with defaults
#[test]
fn test_config_fromPartialJson_shouldUseDefaults() -> Result<()> {
    let config: Config = serde_json::from_str(
        r#"{"target_language": "fr", "formatting": {"target_font": "Arial"}}"#,
    )?;

    assert_eq!(config.source_language, "zh-TW");
    assert_eq!(config.target_language, "fr");
    assert_eq!(config.formatting.target_font, "Arial");
    assert_eq!(config.formatting.diagram_line_twips, 130);
    Ok(())
}

/// Test that a missing config file is created with defaults
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());

    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.source_language, created.source_language);
    assert_eq!(reloaded.translation.available_providers.len(), 3);
    Ok(())
}

/// Test provider name parsing and display
#[test]
fn test_translationProvider_fromStr_shouldParseKnownNames() -> Result<()> {
    assert_eq!("google".parse::<TranslationProvider>()?, TranslationProvider::Google);
    assert_eq!("Ollama".parse::<TranslationProvider>()?, TranslationProvider::Ollama);
    assert!("openai".parse::<TranslationProvider>().is_err());
    assert_eq!(TranslationProvider::Anthropic.to_string(), "anthropic");
    assert!(!TranslationProvider::Google.requires_api_key());
    Ok(())
}

/// Test that provider overrides fall back to common values
#[test]
fn test_translationConfig_timeout_shouldPreferProviderOverride() {
    let mut config = Config::default();
    assert_eq!(config.translation.get_timeout_secs(), 30);

    let mut google = ProviderConfig::new(TranslationProvider::Google);
    google.timeout_secs = Some(5);
    config.translation.available_providers = vec![google];
    assert_eq!(config.translation.get_timeout_secs(), 5);
}

/// Test point to half-point conversion
#[test]
fn test_ptToHalfPoints_shouldDoubleAndRound() {
    assert_eq!(pt_to_half_points(10.0), 20);
    assert_eq!(pt_to_half_points(6.0), 12);
    assert_eq!(pt_to_half_points(10.5), 21);
}

/*!
 * Tests for provider implementations and the provider-backed service
 */

use dualdoc::app_config::{TranslationConfig, TranslationProvider};
use dualdoc::errors::TranslationError;
use dualdoc::providers::Provider;
use dualdoc::providers::anthropic::AnthropicRequest;
use dualdoc::providers::mock::{MockProvider, MockRequest};
use dualdoc::providers::ollama::Ollama;
use dualdoc::translation::{TranslationService, Translator};

fn config_for(provider: TranslationProvider) -> TranslationConfig {
    let mut config = TranslationConfig::default();
    config.provider = provider;
    config
}

/// Test that the service can be built for every provider
#[test]
fn test_translationService_new_withEachProvider_shouldSucceed() {
    for provider in [
        TranslationProvider::Google,
        TranslationProvider::Ollama,
        TranslationProvider::Anthropic,
    ] {
        let expected = provider.display_name().to_string();
        let service = TranslationService::new(config_for(provider)).expect("service should build");
        assert_eq!(service.name(), expected);
    }
}

/// Test that an unreachable Ollama server surfaces a provider error
#[test]
fn test_translate_withUnreachableOllama_shouldReturnProviderError() {
    let mut config = config_for(TranslationProvider::Ollama);
    if let Some(ollama) = config.get_provider_config_mut(&TranslationProvider::Ollama) {
        ollama.endpoint = "http://127.0.0.1:9".to_string();
        ollama.timeout_secs = Some(2);
    }
    let service = TranslationService::new(config).expect("service should build");

    let result = tokio_test::block_on(service.translate("請先開機", "zh-TW", "en"));

    assert!(matches!(result, Err(TranslationError::Provider(_))));
}

/// Test that the Ollama client keeps an explicit port in its base URL
#[test]
fn test_ollama_fromUrl_shouldKeepBaseUrl() {
    let client = Ollama::from_url("http://gpu.local:11434");
    assert_eq!(client.base_url(), "http://gpu.local:11434");
}

/// Test that the Anthropic request builder keeps the system prompt out of messages
#[test]
fn test_anthropicRequest_builder_shouldSerializeSystemSeparately() {
    let request = AnthropicRequest::new("claude-3-haiku-20240307", 256)
        .system("Translate to English")
        .add_message("user", "請先開機");

    let json = serde_json::to_value(&request).expect("request should serialize");

    assert_eq!(json["system"], "Translate to English");
    assert_eq!(json["messages"][0]["role"], "user");
    assert_eq!(json["messages"][0]["content"], "請先開機");
}

/// Test that the mock provider records requests through the provider seam
#[tokio::test]
async fn test_mockProvider_complete_shouldRecordRequest() {
    let provider = MockProvider::working();

    let response = provider
        .complete(MockRequest::new("步驟", "zh-TW", "en"))
        .await
        .expect("mock should answer");

    assert_eq!(MockProvider::extract_text(&response), "[TRANSLATED to en] 步驟");
    assert_eq!(provider.requested_texts(), vec!["步驟"]);
}

/*!
 * Google web translate client.
 *
 * Uses the public `translate_a/single` endpoint (client `gtx`) that needs no
 * API key. The endpoint answers with nested JSON arrays; the first element
 * holds one `[translated, original, ...]` entry per sentence.
 */

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Default endpoint of the web translate API
pub const DEFAULT_GOOGLE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Google web translate client
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Endpoint URL
    endpoint: String,
}

/// Translation request
#[derive(Debug, Clone)]
pub struct GoogleRequest {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
}

impl GoogleRequest {
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }
}

/// Parsed translation response
#[derive(Debug, Clone, PartialEq)]
pub struct GoogleResponse {
    /// Translated sentence segments in order
    pub segments: Vec<String>,
    /// Source language reported by the service
    pub detected_source: Option<String>,
}

impl GoogleTranslate {
    /// Create a new client
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        let endpoint = endpoint.into();
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: if endpoint.is_empty() {
                DEFAULT_GOOGLE_ENDPOINT.to_string()
            } else {
                endpoint
            },
        }
    }

    /// Build the request URL for a translation
    pub fn request_url(&self, request: &GoogleRequest) -> Result<Url, ProviderError> {
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("client", "gtx"),
                ("sl", request.source_language.as_str()),
                ("tl", request.target_language.as_str()),
                ("dt", "t"),
                ("q", request.text.as_str()),
            ],
        )
        .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint {}: {}", self.endpoint, e)))
    }

    /// Parse the nested-array response body
    pub fn parse_response(body: &str) -> Result<GoogleResponse, ProviderError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(format!("Invalid JSON: {}", e)))?;

        let sentences = value
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::ParseError("Missing sentence array".to_string()))?;

        let segments = sentences
            .iter()
            .filter_map(|sentence| sentence.get(0).and_then(Value::as_str))
            .map(str::to_string)
            .collect();

        let detected_source = value.get(2).and_then(Value::as_str).map(str::to_string);

        Ok(GoogleResponse {
            segments,
            detected_source,
        })
    }
}

#[async_trait]
impl Provider for GoogleTranslate {
    type Request = GoogleRequest;
    type Response = GoogleResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let url = self.request_url(&request)?;
        debug!(
            "Google translate request ({} -> {}, {} chars)",
            request.source_language,
            request.target_language,
            request.text.chars().count()
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to reach Google translate: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Google translate error ({}): {}", status, error_text);
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to read response body: {}", e)))?;

        Self::parse_response(&body)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.complete(GoogleRequest::new("測試", "zh-TW", "en")).await?;
        Ok(())
    }

    fn extract_text(response: &Self::Response) -> String {
        response.segments.concat()
    }
}

/*!
 * Tests for error types and conversions
 */

use dualdoc::errors::{AppError, DocumentError, ProviderError, TranslationError};

/// Test that HTTP statuses map to specific provider errors
#[test]
fn test_providerError_fromStatus_shouldPickVariant() {
    assert!(matches!(ProviderError::from_status(401, "no"), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(429, "slow"), ProviderError::RateLimitExceeded(_)));
    assert!(matches!(
        ProviderError::from_status(502, "bad gateway"),
        ProviderError::ApiError { status_code: 502, .. }
    ));
}

/// Test that lower-level errors convert into the application error
#[test]
fn test_appError_from_shouldWrapSourceErrors() {
    let translation: AppError = TranslationError::EmptyResponse.into();
    assert!(matches!(translation, AppError::Translation(TranslationError::EmptyResponse)));

    let document: AppError = DocumentError::DetachedNode(7).into();
    assert_eq!(document.to_string(), "Document error: Paragraph node 7 is not attached to this container");

    let io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(io, AppError::File(_)));
}

/// Test that provider errors surface through translation errors
#[test]
fn test_translationError_fromProviderError_shouldKeepMessage() {
    let error: TranslationError = ProviderError::ConnectionError("refused".to_string()).into();
    assert_eq!(error.to_string(), "Provider error: Connection error: refused");
}

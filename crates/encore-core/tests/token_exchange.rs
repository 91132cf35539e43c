//! Token exchange against a mock token endpoint

use encore_core::auth::{
    AuthError, CodeVerifier, OAuthClient, OAuthConfig, SessionStore, TokenExchangeHandler,
    TokenPair,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn handler(server: &MockServer, store: &SessionStore) -> TokenExchangeHandler {
    let config = OAuthConfig::new(
        format!("{}/authorize", server.uri()),
        format!("{}/api/token", server.uri()),
        "test-client",
        "http://127.0.0.1:5173/callback",
    );
    let client = OAuthClient::new(config, Duration::from_secs(5)).expect("client builds");
    TokenExchangeHandler::new(client, store.clone())
}

#[tokio::test]
async fn test_missing_verifier_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = SessionStore::in_memory();
    let result = handler(&server, &store).exchange("abc123").await;

    assert_eq!(result.unwrap_err(), AuthError::MissingVerifier);
    assert_eq!(store.access_token().unwrap(), None);
}

#[tokio::test]
async fn test_successful_exchange_posts_code_and_verifier() {
    let server = MockServer::start().await;
    let store = SessionStore::in_memory();
    // Alphanumeric so the form-encoded body contains it verbatim
    let verifier = CodeVerifier::from_string("V1".repeat(32)).unwrap();
    store.save_verifier(&verifier).unwrap();

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=abc123"))
        .and(body_string_contains("client_id=test-client"))
        .and(body_string_contains(format!("code_verifier={}", verifier.as_str())))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "T",
            "token_type": "Bearer",
            "scope": "user-read-private user-read-email",
            "expires_in": 3600,
            "refresh_token": "R"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pair = handler(&server, &store).exchange("abc123").await.unwrap();

    assert_eq!(pair.access_token, "T");
    assert_eq!(pair.refresh_token.as_deref(), Some("R"));
    assert!(pair.expires_at.is_some());
    assert_eq!(store.access_token().unwrap().as_deref(), Some("T"));
    assert!(!store.has_verifier().unwrap());
}

#[tokio::test]
async fn test_consumed_verifier_cannot_be_reused() {
    let server = MockServer::start().await;
    let store = SessionStore::in_memory();
    store
        .save_verifier(&CodeVerifier::generate(64).unwrap())
        .unwrap();

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "T", "refresh_token": "R"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let handler = handler(&server, &store);
    assert!(handler.exchange("abc123").await.is_ok());
    assert_eq!(
        handler.exchange("abc123").await.unwrap_err(),
        AuthError::MissingVerifier
    );
}

#[tokio::test]
async fn test_rejected_code_discards_verifier() {
    let server = MockServer::start().await;
    let store = SessionStore::in_memory();
    store
        .save_verifier(&CodeVerifier::generate(64).unwrap())
        .unwrap();

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid authorization code"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = handler(&server, &store)
        .exchange("expired-code")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::ExchangeFailed { status: Some(400), .. }));
    assert!(!store.has_verifier().unwrap());
    assert_eq!(store.access_token().unwrap(), None);
}

#[tokio::test]
async fn test_malformed_success_body_fails_fast() {
    let server = MockServer::start().await;
    let store = SessionStore::in_memory();
    store
        .save_verifier(&CodeVerifier::generate(64).unwrap())
        .unwrap();

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "T"})))
        .mount(&server)
        .await;

    let err = handler(&server, &store).exchange("abc123").await.unwrap_err();

    assert!(matches!(err, AuthError::InvalidResponse(_)));
    assert_eq!(store.access_token().unwrap(), None);
}

#[tokio::test]
async fn test_refresh_keeps_refresh_token() {
    let server = MockServer::start().await;
    let store = SessionStore::in_memory();

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=R"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "T2", "expires_in": 3600})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let current = TokenPair::new("T", Some("R".to_string()));
    let refreshed = handler(&server, &store).refresh(&current).await.unwrap();

    assert_eq!(refreshed.access_token, "T2");
    assert_eq!(refreshed.refresh_token.as_deref(), Some("R"));
    assert_eq!(store.tokens().unwrap(), Some(refreshed));
}

#[tokio::test]
async fn test_out_of_range_lifetime_is_invalid_response() {
    let server = MockServer::start().await;
    let store = SessionStore::in_memory();
    store
        .save_verifier(&CodeVerifier::generate(64).unwrap())
        .unwrap();

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "T", "expires_in": i64::MAX})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = handler(&server, &store).exchange("abc123").await.unwrap_err();

    assert!(matches!(err, AuthError::InvalidResponse(_)));
    assert_eq!(store.access_token().unwrap(), None);
    assert!(!store.has_verifier().unwrap());
}

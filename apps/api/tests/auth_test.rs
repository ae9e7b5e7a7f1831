//! Integration tests for the authentication flow
//!
//! - Registration (valid, duplicate email, invalid input)
//! - Login (valid credentials, wrong password, unknown email)
//! - Token verification (tampered, expired, foreign issuer)

mod common;

use assert_matches::assert_matches;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use rstest::rstest;

use eventhub_api::models::{Caller, Claims};
use eventhub_api::ApiError;

use common::{TestApp, TEST_JWT_SECRET, TEST_PASSWORD};

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::new();
    let (user, token) = app
        .auth
        .register("  Alice ", "Alice@Example.com", TEST_PASSWORD)
        .await
        .unwrap();

    assert_eq!(user.name, "Alice");
    assert_eq!(user.email, "alice@example.com");
    assert_ne!(user.password_hash, TEST_PASSWORD);
    assert_eq!(app.auth.verify_token(&token).map(|c| c.id), Some(user.id));

    let (logged_in, token) = app
        .auth
        .login("ALICE@example.com", TEST_PASSWORD)
        .await
        .unwrap();
    assert_eq!(logged_in.id, user.id);
    assert_eq!(
        app.auth.verify_token(&format!("Bearer {token}")),
        Some(Caller::from(&user))
    );
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = TestApp::new();
    app.register("Alice").await;

    let result = app
        .auth
        .register("Other Alice", "ALICE@example.com", TEST_PASSWORD)
        .await;
    assert_matches!(result, Err(ApiError::Conflict { .. }));
}

#[rstest]
#[case("", "a@example.com", "secret1")]
#[case("Alice", "not-an-email", "secret1")]
#[case("Alice", "a@example.com", "short")]
#[tokio::test]
async fn test_register_validation(
    #[case] name: &str,
    #[case] email: &str,
    #[case] password: &str,
) {
    let app = TestApp::new();
    assert_matches!(
        app.auth.register(name, email, password).await,
        Err(ApiError::ValidationError(_))
    );
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let app = TestApp::new();
    app.register("Alice").await;

    let wrong_password = app.auth.login("alice@example.com", "wrong password").await;
    let unknown_email = app.auth.login("nobody@example.com", TEST_PASSWORD).await;

    assert_matches!(wrong_password, Err(ApiError::InvalidCredentials));
    assert_matches!(unknown_email, Err(ApiError::InvalidCredentials));
}

fn sign(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_rejected_tokens() {
    let app = TestApp::new();
    let (user, token) = app.register("Alice").await;
    let caller = Caller::from(&user);
    let now = Utc::now().timestamp();

    let expired = sign(&Claims::new(&caller, now - 7200, 3600), TEST_JWT_SECRET);
    let mut foreign = Claims::new(&caller, now, 3600);
    foreign.iss = "someone-else".to_string();
    let foreign = sign(&foreign, TEST_JWT_SECRET);
    let wrong_key = sign(
        &Claims::new(&caller, now, 3600),
        "a-different-secret-of-sufficient-length",
    );
    let tampered = format!("{token}x");

    for raw in [expired, foreign, wrong_key, tampered] {
        assert_eq!(app.auth.verify_token(&raw), None, "accepted {raw}");
    }
    assert_eq!(app.auth.verify_token(""), None);
    assert_eq!(app.auth.verify_token("garbage"), None);
}

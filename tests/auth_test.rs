///! Integration test for access token validation.
///!
///! Mints tokens locally with the same HS256 project secret the server would
///! be configured with, then validates them through `validate_token` and the
///! `TokenVerifier`. No running server or database is needed.
///!
///! Run with: `cargo test --test auth_test`
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use portfolio_backend::auth::jwt::{Claims, TokenVerifier, validate_token};

/// A fake secret for testing, never the real one.
const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

fn claims_for(sub: &str, email: Option<&str>, exp: usize) -> Claims {
    Claims {
        sub: sub.to_string(),
        exp,
        iat: Some(Utc::now().timestamp() as usize),
        iss: Some("https://example.supabase.co/auth/v1".to_string()),
        email: email.map(str::to_string),
        role: Some("authenticated".to_string()),
        session_id: Some(Uuid::new_v4().to_string()),
    }
}

fn mint(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to encode test JWT")
}

fn in_one_hour() -> usize {
    Utc::now().timestamp() as usize + 3600
}

#[test]
fn test_valid_token_decodes_correctly() {
    let user_id = Uuid::new_v4();
    let exp = in_one_hour();
    let token = mint(
        &claims_for(&user_id.to_string(), Some("admin@example.com"), exp),
        TEST_SECRET,
    );

    let claims = validate_token(&token, TEST_SECRET).expect("Token should be valid");

    assert_eq!(claims.user_id().unwrap(), user_id);
    assert_eq!(claims.user_email().unwrap(), "admin@example.com");
    assert_eq!(claims.exp, exp);
}

#[test]
fn test_expired_token_is_rejected() {
    // Expired 5 minutes ago, well past the 60s default leeway.
    let exp = Utc::now().timestamp() as usize - 300;
    let token = mint(
        &claims_for(&Uuid::new_v4().to_string(), Some("late@example.com"), exp),
        TEST_SECRET,
    );

    let result = validate_token(&token, TEST_SECRET);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("ExpiredSignature"));
}

#[test]
fn test_wrong_secret_is_rejected() {
    let token = mint(
        &claims_for(&Uuid::new_v4().to_string(), Some("bob@example.com"), in_one_hour()),
        "completely-wrong-secret-xxxxxxxxxxxxxxxxxxx",
    );

    let result = validate_token(&token, TEST_SECRET);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("InvalidSignature"));
}

#[test]
fn test_garbage_token_is_rejected() {
    assert!(validate_token("not.a.valid.jwt", TEST_SECRET).is_err());
}

#[test]
fn test_blank_email_and_bad_sub_are_reported() {
    let claims = claims_for("not-a-uuid", Some(""), in_one_hour());

    assert!(claims.user_email().is_none());
    assert!(claims.user_id().is_err());
}

#[tokio::test]
async fn test_secret_verifier_uses_hs256() {
    let verifier = TokenVerifier::Secret(TEST_SECRET.to_string());
    let token = mint(
        &claims_for(&Uuid::new_v4().to_string(), Some("ops@example.com"), in_one_hour()),
        TEST_SECRET,
    );

    let claims = verifier.verify(&token).await.expect("Token should verify");
    assert_eq!(claims.email.as_deref(), Some("ops@example.com"));
}

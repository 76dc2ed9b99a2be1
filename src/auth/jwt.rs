use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::jwks::JwksCache;

/// Claims of a Supabase access token.
///
/// `sub` is the user's UUID in `auth.users`; `exp` is the session expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    /// Expiry (Unix timestamp).
    pub exp: usize,
    pub iat: Option<usize>,
    pub iss: Option<String>,
    pub email: Option<String>,
    /// Supabase role, normally "authenticated".
    pub role: Option<String>,
    pub session_id: Option<String>,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, String> {
        Uuid::parse_str(&self.sub).map_err(|e| format!("Invalid UUID in sub claim: {e}"))
    }

    pub fn user_email(&self) -> Option<String> {
        self.email.clone().filter(|e| !e.is_empty())
    }
}

/// Validate a token signed with the project's legacy HS256 JWT secret.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| format!("Token validation failed: {e}"))
}

/// How access tokens are checked: against the published JWKS, or against
/// the shared project secret when one is configured.
#[derive(Clone)]
pub enum TokenVerifier {
    Jwks(Arc<JwksCache>),
    Secret(String),
}

impl TokenVerifier {
    pub async fn verify(&self, token: &str) -> Result<Claims, String> {
        match self {
            TokenVerifier::Jwks(cache) => cache.validate_token(token).await,
            TokenVerifier::Secret(secret) => validate_token(token, secret),
        }
    }
}

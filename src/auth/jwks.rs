use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::jwt::Claims;

/// Public EC key material for one `kid`.
#[derive(Clone)]
struct SigningKey {
    x: String,
    y: String,
    algorithm: Algorithm,
}

/// Verifies Supabase access tokens against the project's published JWKS.
/// Keys are cached per `kid` for an hour.
#[derive(Clone)]
pub struct JwksCache {
    keys: Arc<Cache<String, SigningKey>>,
    jwks_url: String,
    client: reqwest::Client,
    anon_key: String,
}

impl JwksCache {
    pub fn new(supabase_url: &str, anon_key: &str) -> Self {
        let keys = Arc::new(
            Cache::builder()
                .time_to_live(Duration::from_secs(3600))
                .max_capacity(10)
                .build(),
        );

        Self {
            keys,
            jwks_url: format!("{supabase_url}/auth/v1/.well-known/jwks.json"),
            client: reqwest::Client::new(),
            anon_key: anon_key.to_string(),
        }
    }

    async fn fetch_jwks(&self) -> Result<serde_json::Value, String> {
        debug!("Fetching JWKS from {}", self.jwks_url);

        let response = self
            .client
            .get(&self.jwks_url)
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| format!("Failed to fetch JWKS: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Failed to fetch JWKS: HTTP {status}"));
        }

        response
            .json()
            .await
            .map_err(|e| format!("Failed to parse JWKS JSON: {e}"))
    }

    async fn signing_key(&self, kid: &str) -> Result<SigningKey, String> {
        if let Some(cached) = self.keys.get(kid).await {
            return Ok(cached);
        }

        let jwks = self.fetch_jwks().await?;
        let jwk = jwks["keys"]
            .as_array()
            .ok_or("No keys in JWKS")?
            .iter()
            .find(|k| k["kid"].as_str() == Some(kid))
            .ok_or_else(|| format!("Key with kid={kid} not found in JWKS"))?;

        let component = |name: &str| {
            jwk[name]
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| format!("Missing '{name}' in JWK"))
        };

        let algorithm = match jwk["alg"].as_str() {
            Some("ES384") => Algorithm::ES384,
            _ => Algorithm::ES256,
        };

        let key = SigningKey {
            x: component("x")?,
            y: component("y")?,
            algorithm,
        };

        self.keys.insert(kid.to_string(), key.clone()).await;
        Ok(key)
    }

    pub async fn validate_token(&self, token: &str) -> Result<Claims, String> {
        let header = decode_header(token).map_err(|e| format!("Failed to decode header: {e}"))?;
        let kid = header.kid.ok_or("No 'kid' in token header")?;

        let key = self.signing_key(&kid).await?;
        let decoding_key = DecodingKey::from_ec_components(&key.x, &key.y)
            .map_err(|e| format!("Failed to create decoding key: {e}"))?;

        let mut validation = Validation::new(key.algorithm);
        validation.validate_aud = false;

        decode::<Claims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| format!("Token validation failed: {e}"))
    }
}

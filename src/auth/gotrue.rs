//! Minimal client for Supabase Auth (GoTrue): password sign-in and sign-out.

use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoTrueSession {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    expires_at: Option<i64>,
    user: GoTrueUser,
}

/// What the admin client keeps after signing in.
#[derive(Debug, Serialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub email: Option<String>,
}

pub struct SupabaseAuth {
    client: reqwest::Client,
    auth_url: String,
    anon_key: String,
}

impl SupabaseAuth {
    pub fn new(supabase_url: &str, anon_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            auth_url: format!("{supabase_url}/auth/v1"),
            anon_key: anon_key.to_string(),
        }
    }

    /// Exchange e-mail and password for a session.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthSession, ServiceError> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(ServiceError::Validation(
                "Email and password are required".into(),
            ));
        }

        let response = self
            .client
            .post(format!("{}/token?grant_type=password", self.auth_url))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({
                "email": credentials.email.trim(),
                "password": credentials.password,
            }))
            .send()
            .await
            .map_err(|e| ServiceError::Storage(format!("Failed to reach auth service: {e}")))?;

        let status = response.status();
        if status.is_client_error() {
            return Err(ServiceError::Auth("Invalid login credentials".into()));
        }
        if !status.is_success() {
            return Err(ServiceError::Storage(format!("Auth service returned {status}")));
        }

        let session: GoTrueSession = response
            .json()
            .await
            .map_err(|e| ServiceError::Storage(format!("Invalid auth response: {e}")))?;

        tracing::info!("Admin signed in: {:?}", session.user.email);

        Ok(AuthSession {
            expires_at: session
                .expires_at
                .unwrap_or_else(|| chrono::Utc::now().timestamp() + session.expires_in),
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            email: session.user.email,
        })
    }

    /// Revoke the session behind `access_token`.
    pub async fn logout(&self, access_token: &str) -> Result<(), ServiceError> {
        let response = self
            .client
            .post(format!("{}/logout", self.auth_url))
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {access_token}"))
            .send()
            .await
            .map_err(|e| ServiceError::Storage(format!("Failed to reach auth service: {e}")))?;

        if !response.status().is_success() {
            return Err(ServiceError::Storage(format!(
                "Sign-out failed: HTTP {}",
                response.status()
            )));
        }
        Ok(())
    }
}

use actix_web::FromRequest;
use actix_web::{Error, HttpRequest, dev::Payload, web};
use std::future::Future;
use std::pin::Pin;
use uuid::Uuid;

use crate::auth::authorization::AdminAllowList;
use crate::auth::jwt::TokenVerifier;

/// A verified admin session. Extracting it runs before the handler body, so
/// a rejected request never reaches the store.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub user_id: Uuid,
    pub email: String,
    /// Unix timestamp taken from the token's `exp`.
    pub expires_at: usize,
    /// The raw bearer token, forwarded to Supabase Storage and logout.
    pub access_token: String,
}

impl FromRequest for AdminSession {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // 1. Extract the Bearer token from the Authorization header.
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| actix_web::error::ErrorUnauthorized("Missing Authorization header"))?
                .strip_prefix("Bearer ")
                .ok_or_else(|| {
                    actix_web::error::ErrorUnauthorized("Authorization header must be: Bearer <token>")
                })?
                .to_string();

            // 2. Verify it.
            let verifier = req.app_data::<web::Data<TokenVerifier>>().ok_or_else(|| {
                actix_web::error::ErrorInternalServerError("Token verifier not configured")
            })?;

            let claims = verifier
                .verify(&token)
                .await
                .map_err(|e| actix_web::error::ErrorUnauthorized(format!("Invalid token: {e}")))?;

            let user_id = claims
                .user_id()
                .map_err(actix_web::error::ErrorUnauthorized)?;
            let email = claims
                .user_email()
                .ok_or_else(|| actix_web::error::ErrorUnauthorized("No email in token claims"))?;

            // 3. Check the allow-list.
            let allow_list = req.app_data::<web::Data<AdminAllowList>>().ok_or_else(|| {
                actix_web::error::ErrorInternalServerError("Admin allow-list not configured")
            })?;
            if !allow_list.permits(&email) {
                tracing::warn!("Rejected admin request from {email}");
                return Err(actix_web::error::ErrorUnauthorized("Not an administrator"));
            }

            Ok(AdminSession {
                user_id,
                email,
                expires_at: claims.exp,
                access_token: token,
            })
        })
    }
}

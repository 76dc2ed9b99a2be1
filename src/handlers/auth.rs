use actix_web::{HttpResponse, Responder, web};

use crate::auth::gotrue::{LoginRequest, SupabaseAuth};
use crate::auth::middleware::AdminSession;
use crate::errors::ServiceError;

/// POST /api/auth/login: exchange e-mail and password for a session.
pub async fn login(
    auth: web::Data<SupabaseAuth>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ServiceError> {
    let session = auth.login(&body).await?;
    Ok(HttpResponse::Ok().json(session))
}

/// POST /api/auth/logout: revoke the caller's session.
pub async fn logout(
    session: AdminSession,
    auth: web::Data<SupabaseAuth>,
) -> Result<HttpResponse, ServiceError> {
    auth.logout(&session.access_token).await?;
    tracing::info!("Admin signed out: {}", session.email);
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/auth/session: who the bearer token belongs to and when it expires.
pub async fn session(session: AdminSession) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "authenticated": true,
        "user_id": session.user_id,
        "email": session.email,
        "expires_at": session.expires_at,
    }))
}

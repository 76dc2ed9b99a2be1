use actix_web::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::StreamExt;
use serde::Deserialize;

use crate::auth::middleware::AdminSession;
use crate::errors::ServiceError;
use crate::services::uploads::{self, SharedStorage, UploadPolicy, UploadRequest};

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub folder: Option<String>,
    pub filename: Option<String>,
}

/// POST /api/admin/uploads?folder=&filename=: raw image body, returns its public URL.
pub async fn upload_image(
    session: AdminSession,
    req: HttpRequest,
    query: web::Query<UploadQuery>,
    storage: web::Data<SharedStorage>,
    policy: web::Data<UploadPolicy>,
    payload: web::Payload,
) -> Result<HttpResponse, ServiceError> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    policy.check_type(&content_type)?;

    if let Some(length) = req
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
    {
        policy.check_size(length)?;
    }
    let bytes = read_capped(payload, &policy).await?;

    let UploadQuery { folder, filename } = query.into_inner();
    let url = uploads::upload(
        storage.get_ref().as_ref(),
        &policy,
        UploadRequest {
            folder,
            filename,
            content_type,
            bytes,
        },
        &session.access_token,
    )
    .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({ "url": url })))
}

/// Read the body, giving up as soon as it passes the policy's size limit.
async fn read_capped(
    mut payload: web::Payload,
    policy: &UploadPolicy,
) -> Result<Vec<u8>, ServiceError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk
            .map_err(|e| ServiceError::InvalidInput(format!("Failed to read upload: {e}")))?;
        policy.check_size(body.len() + chunk.len())?;
        body.extend_from_slice(&chunk);
    }
    Ok(body.to_vec())
}

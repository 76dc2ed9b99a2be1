use actix_web::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::Deserialize;
use std::time::Instant;
use uuid::Uuid;

use crate::auth::middleware::AdminSession;
use crate::db::SharedStore;
use crate::errors::ServiceError;
use crate::services::journal::{QueryHistory, QueryHistoryEntry};
use crate::services::sql_console;

#[derive(Debug, Deserialize)]
pub struct SqlRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SqlFormat {
    pub format: Option<String>,
}

/// POST /api/admin/sql: run a SELECT through the console shim.
/// Every attempt lands in the history, successful or not.
pub async fn run_query(
    _session: AdminSession,
    store: web::Data<SharedStore>,
    history: web::Data<QueryHistory>,
    format: web::Query<SqlFormat>,
    body: web::Json<SqlRequest>,
) -> Result<HttpResponse, ServiceError> {
    let started = Instant::now();
    let outcome = sql_console::execute(store.get_ref().as_ref(), &body.query).await;

    let (duration_ms, row_count) = match &outcome {
        Ok(result) => (result.duration_ms, result.row_count),
        Err(_) => (started.elapsed().as_secs_f64() * 1000.0, 0),
    };
    history
        .push(QueryHistoryEntry {
            id: Uuid::new_v4(),
            query: body.query.clone(),
            timestamp: Utc::now(),
            duration_ms,
            row_count,
            success: outcome.is_ok(),
        })
        .await;

    let result = outcome?;
    if format.format.as_deref() == Some("csv") {
        return Ok(HttpResponse::Ok()
            .insert_header((CONTENT_TYPE, "text/csv"))
            .insert_header((
                CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"query-results-{}.csv\"",
                    Utc::now().timestamp_millis()
                ),
            ))
            .body(sql_console::to_csv(&result)));
    }

    Ok(HttpResponse::Ok().json(result))
}

/// GET /api/admin/sql/history
pub async fn get_history(_session: AdminSession, history: web::Data<QueryHistory>) -> impl Responder {
    HttpResponse::Ok().json(history.entries().await)
}

/// DELETE /api/admin/sql/history
pub async fn clear_history(_session: AdminSession, history: web::Data<QueryHistory>) -> impl Responder {
    history.clear().await;
    HttpResponse::NoContent().finish()
}

use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::middleware::AdminSession;
use crate::db::SharedStore;
use crate::errors::ServiceError;
use crate::models::AdminListQuery;
use crate::services::authoring::{self, DraftEdit, PortfolioDraft};
use crate::services::journal::{ActivityAction, ActivityEntry, ActivityLog};
use crate::services::{admin, aggregation};

#[derive(Debug, Deserialize)]
pub struct FeaturedBody {
    pub is_featured: bool,
}

#[derive(Debug, Deserialize)]
pub struct DraftEditRequest {
    pub draft: PortfolioDraft,
    pub edit: DraftEdit,
}

/// GET /api/admin/dashboard
pub async fn dashboard(
    _session: AdminSession,
    store: web::Data<SharedStore>,
) -> Result<HttpResponse, ServiceError> {
    let stats = admin::dashboard(store.get_ref().as_ref()).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// GET /api/admin/portfolios?search=&category=
pub async fn list_portfolios(
    _session: AdminSession,
    store: web::Data<SharedStore>,
    query: web::Query<AdminListQuery>,
) -> Result<HttpResponse, ServiceError> {
    let portfolios = admin::list(store.get_ref().as_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(portfolios))
}

/// GET /api/admin/portfolios/new: a blank draft with defaults filled in.
pub async fn new_draft(_session: AdminSession) -> impl Responder {
    HttpResponse::Ok().json(PortfolioDraft::new())
}

/// GET /api/admin/portfolios/{id}/draft: a draft seeded from the stored portfolio.
pub async fn get_draft(
    _session: AdminSession,
    store: web::Data<SharedStore>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();
    match aggregation::get_by_id(store.get_ref().as_ref(), id).await {
        Some(view) => HttpResponse::Ok().json(PortfolioDraft::from_view(&view)),
        None => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Portfolio {id} not found"),
        })),
    }
}

/// POST /api/admin/drafts/edit: apply one form edit and return the new draft.
pub async fn edit_draft(
    _session: AdminSession,
    body: web::Json<DraftEditRequest>,
) -> Result<HttpResponse, ServiceError> {
    let DraftEditRequest { mut draft, edit } = body.into_inner();
    draft.apply(edit)?;
    Ok(HttpResponse::Ok().json(draft))
}

/// POST /api/admin/portfolios
pub async fn create_portfolio(
    _session: AdminSession,
    store: web::Data<SharedStore>,
    activity: web::Data<ActivityLog>,
    body: web::Json<PortfolioDraft>,
) -> Result<HttpResponse, ServiceError> {
    let saved = authoring::save(store.get_ref().as_ref(), &body, None).await?;
    activity
        .push(ActivityEntry::new(ActivityAction::Create, &saved.portfolio.title))
        .await;
    Ok(HttpResponse::Created().json(saved))
}

/// PUT /api/admin/portfolios/{id}
pub async fn update_portfolio(
    _session: AdminSession,
    store: web::Data<SharedStore>,
    activity: web::Data<ActivityLog>,
    path: web::Path<Uuid>,
    body: web::Json<PortfolioDraft>,
) -> Result<HttpResponse, ServiceError> {
    let id = path.into_inner();
    let saved = authoring::save(store.get_ref().as_ref(), &body, Some(id)).await?;
    activity
        .push(ActivityEntry::new(ActivityAction::Update, &saved.portfolio.title))
        .await;
    Ok(HttpResponse::Ok().json(saved))
}

/// DELETE /api/admin/portfolios/{id}
pub async fn delete_portfolio(
    _session: AdminSession,
    store: web::Data<SharedStore>,
    activity: web::Data<ActivityLog>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let id = path.into_inner();
    let deleted = admin::delete(store.get_ref().as_ref(), id).await?;
    activity
        .push(ActivityEntry::new(ActivityAction::Delete, &deleted.title))
        .await;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Portfolio {id} deleted"),
    })))
}

/// PUT /api/admin/portfolios/{id}/featured
pub async fn set_featured(
    _session: AdminSession,
    store: web::Data<SharedStore>,
    activity: web::Data<ActivityLog>,
    path: web::Path<Uuid>,
    body: web::Json<FeaturedBody>,
) -> Result<HttpResponse, ServiceError> {
    let updated = admin::set_featured(store.get_ref().as_ref(), path.into_inner(), body.is_featured).await?;
    let action = if updated.is_featured {
        ActivityAction::Feature
    } else {
        ActivityAction::Unfeature
    };
    activity.push(ActivityEntry::new(action, &updated.title)).await;
    Ok(HttpResponse::Ok().json(updated))
}

/// GET /api/admin/activity
pub async fn get_activity(_session: AdminSession, activity: web::Data<ActivityLog>) -> impl Responder {
    HttpResponse::Ok().json(activity.entries().await)
}

/// DELETE /api/admin/activity
pub async fn clear_activity(_session: AdminSession, activity: web::Data<ActivityLog>) -> impl Responder {
    activity.clear().await;
    HttpResponse::NoContent().finish()
}

use actix_web::{HttpResponse, Responder, web};
use uuid::Uuid;

use crate::db::SharedStore;
use crate::services::aggregation;

/// GET /api/portfolios: every portfolio with its relations, newest first.
pub async fn get_portfolios(store: web::Data<SharedStore>) -> impl Responder {
    HttpResponse::Ok().json(aggregation::get_all(store.get_ref().as_ref()).await)
}

/// GET /api/portfolios/featured: featured portfolios only.
pub async fn get_featured(store: web::Data<SharedStore>) -> impl Responder {
    HttpResponse::Ok().json(aggregation::get_featured(store.get_ref().as_ref()).await)
}

/// GET /api/portfolios/{id}: a single portfolio with its relations.
pub async fn get_portfolio(store: web::Data<SharedStore>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();
    match aggregation::get_by_id(store.get_ref().as_ref(), id).await {
        Some(view) => HttpResponse::Ok().json(view),
        None => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Portfolio {id} not found"),
        })),
    }
}

use serde::Serialize;
use uuid::Uuid;

use crate::db::ContentStore;
use crate::errors::ServiceError;
use crate::models::{AdminListQuery, portfolio};

/// Numbers shown on the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_portfolios: u64,
    pub featured_portfolios: u64,
    pub recent_portfolios: Vec<portfolio::Model>,
}

const RECENT_LIMIT: u64 = 5;

/// Totals plus the five newest portfolios.
pub async fn dashboard(store: &dyn ContentStore) -> Result<DashboardStats, ServiceError> {
    let (total, featured, recent) = tokio::try_join!(
        store.count_portfolios(false),
        store.count_portfolios(true),
        store.recent_portfolios(RECENT_LIMIT),
    )?;

    Ok(DashboardStats {
        total_portfolios: total,
        featured_portfolios: featured,
        recent_portfolios: recent,
    })
}

/// Base rows for the admin list, filtered by a case-insensitive search over
/// title and subtitle and by exact category ("All" matches everything).
pub async fn list(
    store: &dyn ContentStore,
    query: &AdminListQuery,
) -> Result<Vec<portfolio::Model>, ServiceError> {
    let portfolios = store.list_portfolios(false).await?;
    Ok(portfolios
        .into_iter()
        .filter(|p| matches_query(p, query))
        .collect())
}

fn matches_query(p: &portfolio::Model, query: &AdminListQuery) -> bool {
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_lowercase();
    let matches_search = search.is_empty()
        || p.title.to_lowercase().contains(&search)
        || p.subtitle.to_lowercase().contains(&search);

    let matches_category = match query.category.as_deref() {
        None | Some("") | Some("All") => true,
        Some(category) => p.category == category,
    };

    matches_search && matches_category
}

pub async fn set_featured(
    store: &dyn ContentStore,
    id: Uuid,
    is_featured: bool,
) -> Result<portfolio::Model, ServiceError> {
    store
        .set_featured(id, is_featured)
        .await
        .map_err(ServiceError::from_store)
}

/// Delete a portfolio; its children go with it through the store's cascade.
/// Returns the deleted row so callers can log its title.
pub async fn delete(store: &dyn ContentStore, id: Uuid) -> Result<portfolio::Model, ServiceError> {
    let existing = store
        .find_portfolio(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Portfolio {id} not found")))?;

    match store.delete_portfolio(id).await? {
        0 => Err(ServiceError::NotFound(format!("Portfolio {id} not found"))),
        _ => Ok(existing),
    }
}

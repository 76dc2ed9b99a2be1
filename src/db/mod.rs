pub mod memory;
pub mod portfolio;

use async_trait::async_trait;
use sea_orm::{Database, DatabaseConnection, DbErr};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::portfolio::{Model as Portfolio, PortfolioFields};
use crate::models::portfolio_media::{self, NewMedia};
use crate::models::portfolio_stats::{self, NewStat};
use crate::models::portfolio_testimonials::{self, NewTestimonial};
use crate::models::{ChildTable, portfolio_tags, portfolio_technologies};

/// Create a SeaORM database connection pool for the given URL.
pub async fn create_pool(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Table-oriented access to the hosted content store.
///
/// Mirrors what the hosted client offers: filtered/ordered selects, inserts,
/// updates and deletes against the six portfolio tables. No transactions.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Portfolios newest first, optionally only featured ones.
    async fn list_portfolios(&self, featured_only: bool) -> Result<Vec<Portfolio>, DbErr>;

    async fn recent_portfolios(&self, limit: u64) -> Result<Vec<Portfolio>, DbErr>;

    async fn count_portfolios(&self, featured_only: bool) -> Result<u64, DbErr>;

    async fn find_portfolio(&self, id: Uuid) -> Result<Option<Portfolio>, DbErr>;

    /// Insert a portfolio; the store assigns `id` and timestamps.
    async fn insert_portfolio(&self, fields: PortfolioFields) -> Result<Portfolio, DbErr>;

    /// Fails with `DbErr::RecordNotFound` when `id` does not exist.
    async fn update_portfolio(&self, id: Uuid, fields: PortfolioFields)
    -> Result<Portfolio, DbErr>;

    async fn set_featured(&self, id: Uuid, is_featured: bool) -> Result<Portfolio, DbErr>;

    /// Returns the number of portfolio rows removed. Children cascade.
    async fn delete_portfolio(&self, id: Uuid) -> Result<u64, DbErr>;

    /// Media ordered by `order_index`.
    async fn media_for(&self, portfolio_id: Uuid) -> Result<Vec<portfolio_media::Model>, DbErr>;

    /// Stats ordered by `order_index`.
    async fn stats_for(&self, portfolio_id: Uuid) -> Result<Vec<portfolio_stats::Model>, DbErr>;

    async fn tags_for(&self, portfolio_id: Uuid) -> Result<Vec<portfolio_tags::Model>, DbErr>;

    async fn technologies_for(
        &self,
        portfolio_id: Uuid,
    ) -> Result<Vec<portfolio_technologies::Model>, DbErr>;

    async fn testimonial_for(
        &self,
        portfolio_id: Uuid,
    ) -> Result<Option<portfolio_testimonials::Model>, DbErr>;

    /// Returns the number of rows removed.
    async fn delete_children(&self, table: ChildTable, portfolio_id: Uuid) -> Result<u64, DbErr>;

    async fn insert_media(&self, rows: Vec<NewMedia>) -> Result<u64, DbErr>;

    async fn insert_stats(&self, rows: Vec<NewStat>) -> Result<u64, DbErr>;

    async fn insert_tags(&self, portfolio_id: Uuid, names: Vec<String>) -> Result<u64, DbErr>;

    async fn insert_technologies(&self, portfolio_id: Uuid, names: Vec<String>)
    -> Result<u64, DbErr>;

    async fn insert_testimonial(&self, row: NewTestimonial) -> Result<(), DbErr>;

    /// Every row of `table` as a JSON object.
    async fn select_all(&self, table: &str) -> Result<Vec<serde_json::Value>, DbErr>;
}

/// Shared handle stored in actix app data.
pub type SharedStore = Arc<dyn ContentStore>;

#[async_trait]
impl ContentStore for DatabaseConnection {
    async fn list_portfolios(&self, featured_only: bool) -> Result<Vec<Portfolio>, DbErr> {
        portfolio::get_portfolios(self, featured_only).await
    }

    async fn recent_portfolios(&self, limit: u64) -> Result<Vec<Portfolio>, DbErr> {
        portfolio::get_recent_portfolios(self, limit).await
    }

    async fn count_portfolios(&self, featured_only: bool) -> Result<u64, DbErr> {
        portfolio::count_portfolios(self, featured_only).await
    }

    async fn find_portfolio(&self, id: Uuid) -> Result<Option<Portfolio>, DbErr> {
        portfolio::get_portfolio_by_id(self, id).await
    }

    async fn insert_portfolio(&self, fields: PortfolioFields) -> Result<Portfolio, DbErr> {
        portfolio::insert_portfolio(self, fields).await
    }

    async fn update_portfolio(
        &self,
        id: Uuid,
        fields: PortfolioFields,
    ) -> Result<Portfolio, DbErr> {
        portfolio::update_portfolio(self, id, fields).await
    }

    async fn set_featured(&self, id: Uuid, is_featured: bool) -> Result<Portfolio, DbErr> {
        portfolio::set_featured(self, id, is_featured).await
    }

    async fn delete_portfolio(&self, id: Uuid) -> Result<u64, DbErr> {
        portfolio::delete_portfolio(self, id)
            .await
            .map(|result| result.rows_affected)
    }

    async fn media_for(&self, portfolio_id: Uuid) -> Result<Vec<portfolio_media::Model>, DbErr> {
        portfolio::get_media(self, portfolio_id).await
    }

    async fn stats_for(&self, portfolio_id: Uuid) -> Result<Vec<portfolio_stats::Model>, DbErr> {
        portfolio::get_stats(self, portfolio_id).await
    }

    async fn tags_for(&self, portfolio_id: Uuid) -> Result<Vec<portfolio_tags::Model>, DbErr> {
        portfolio::get_tags(self, portfolio_id).await
    }

    async fn technologies_for(
        &self,
        portfolio_id: Uuid,
    ) -> Result<Vec<portfolio_technologies::Model>, DbErr> {
        portfolio::get_technologies(self, portfolio_id).await
    }

    async fn testimonial_for(
        &self,
        portfolio_id: Uuid,
    ) -> Result<Option<portfolio_testimonials::Model>, DbErr> {
        portfolio::get_testimonial(self, portfolio_id).await
    }

    async fn delete_children(&self, table: ChildTable, portfolio_id: Uuid) -> Result<u64, DbErr> {
        portfolio::delete_children(self, table, portfolio_id)
            .await
            .map(|result| result.rows_affected)
    }

    async fn insert_media(&self, rows: Vec<NewMedia>) -> Result<u64, DbErr> {
        portfolio::insert_media(self, rows).await
    }

    async fn insert_stats(&self, rows: Vec<NewStat>) -> Result<u64, DbErr> {
        portfolio::insert_stats(self, rows).await
    }

    async fn insert_tags(&self, portfolio_id: Uuid, names: Vec<String>) -> Result<u64, DbErr> {
        portfolio::insert_tags(self, portfolio_id, names).await
    }

    async fn insert_technologies(
        &self,
        portfolio_id: Uuid,
        names: Vec<String>,
    ) -> Result<u64, DbErr> {
        portfolio::insert_technologies(self, portfolio_id, names).await
    }

    async fn insert_testimonial(&self, row: NewTestimonial) -> Result<(), DbErr> {
        portfolio::insert_testimonial(self, row).await.map(|_| ())
    }

    async fn select_all(&self, table: &str) -> Result<Vec<serde_json::Value>, DbErr> {
        portfolio::select_all_json(self, table).await
    }
}

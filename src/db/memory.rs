//! In-memory content store.
//!
//! Vec backed implementation of [`ContentStore`] used by the tests. Every call
//! is recorded so tests can assert on the exact request sequence, and
//! individual tables can be made to fail.

use async_trait::async_trait;
use sea_orm::DbErr;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::ContentStore;
use crate::models::portfolio::{Model as Portfolio, PortfolioFields};
use crate::models::portfolio_media::{self, NewMedia};
use crate::models::portfolio_stats::{self, NewStat};
use crate::models::portfolio_testimonials::{self, NewTestimonial};
use crate::models::{ChildTable, portfolio_tags, portfolio_technologies};

/// One request issued against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
    pub op: &'static str,
    pub table: &'static str,
    pub rows: u64,
}

#[derive(Default)]
struct State {
    portfolios: Vec<Portfolio>,
    media: Vec<portfolio_media::Model>,
    stats: Vec<portfolio_stats::Model>,
    tags: Vec<portfolio_tags::Model>,
    technologies: Vec<portfolio_technologies::Model>,
    testimonials: Vec<portfolio_testimonials::Model>,
    calls: Vec<StoreCall>,
    failing: HashSet<&'static str>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent request against `table` fail.
    pub fn fail_table(&self, table: &'static str) {
        if let Ok(mut state) = self.state.lock() {
            state.failing.insert(table);
        }
    }

    /// Requests issued so far, in order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.state
            .lock()
            .map(|state| state.calls.clone())
            .unwrap_or_default()
    }

    pub fn clear_calls(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.calls.clear();
        }
    }

    /// Number of rows currently held in `table`.
    pub fn row_count(&self, table: &str) -> usize {
        let Ok(state) = self.state.lock() else {
            return 0;
        };
        match table {
            "portfolios" => state.portfolios.len(),
            "portfolio_media" => state.media.len(),
            "portfolio_stats" => state.stats.len(),
            "portfolio_tags" => state.tags.len(),
            "portfolio_technologies" => state.technologies.len(),
            "portfolio_testimonials" => state.testimonials.len(),
            _ => 0,
        }
    }

    /// Record a call and check the failure switch for its table.
    fn begin(
        &self,
        op: &'static str,
        table: &'static str,
        rows: u64,
    ) -> Result<MutexGuard<'_, State>, DbErr> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| DbErr::Custom("memory store lock poisoned".to_string()))?;
        state.calls.push(StoreCall { op, table, rows });
        if state.failing.contains(table) {
            return Err(DbErr::Custom(format!("{op} on {table} failed")));
        }
        Ok(state)
    }
}

fn sorted_newest_first(portfolios: &[Portfolio]) -> Vec<Portfolio> {
    // Later inserts win ties on created_at.
    let mut items: Vec<Portfolio> = portfolios.iter().rev().cloned().collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items
}

fn not_found() -> DbErr {
    DbErr::RecordNotFound("Portfolio not found".to_string())
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn list_portfolios(&self, featured_only: bool) -> Result<Vec<Portfolio>, DbErr> {
        let state = self.begin("select", "portfolios", 0)?;
        Ok(sorted_newest_first(&state.portfolios)
            .into_iter()
            .filter(|p| !featured_only || p.is_featured)
            .collect())
    }

    async fn recent_portfolios(&self, limit: u64) -> Result<Vec<Portfolio>, DbErr> {
        let state = self.begin("select", "portfolios", 0)?;
        Ok(sorted_newest_first(&state.portfolios)
            .into_iter()
            .take(limit as usize)
            .collect())
    }

    async fn count_portfolios(&self, featured_only: bool) -> Result<u64, DbErr> {
        let state = self.begin("count", "portfolios", 0)?;
        Ok(state
            .portfolios
            .iter()
            .filter(|p| !featured_only || p.is_featured)
            .count() as u64)
    }

    async fn find_portfolio(&self, id: Uuid) -> Result<Option<Portfolio>, DbErr> {
        let state = self.begin("select", "portfolios", 0)?;
        Ok(state.portfolios.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_portfolio(&self, fields: PortfolioFields) -> Result<Portfolio, DbErr> {
        let mut state = self.begin("insert", "portfolios", 1)?;
        let now = chrono::Utc::now();
        let item = Portfolio {
            id: Uuid::new_v4(),
            title: fields.title,
            subtitle: fields.subtitle,
            description: fields.description,
            thumbnail_url: fields.thumbnail_url,
            category: fields.category,
            industry: fields.industry,
            year: fields.year,
            client: fields.client,
            duration: fields.duration,
            challenge: fields.challenge,
            solution: fields.solution,
            result: fields.result,
            is_featured: fields.is_featured,
            created_at: now,
            updated_at: now,
        };
        state.portfolios.push(item.clone());
        Ok(item)
    }

    async fn update_portfolio(
        &self,
        id: Uuid,
        fields: PortfolioFields,
    ) -> Result<Portfolio, DbErr> {
        let mut state = self.begin("update", "portfolios", 1)?;
        let item = state
            .portfolios
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(not_found)?;
        item.title = fields.title;
        item.subtitle = fields.subtitle;
        item.description = fields.description;
        item.thumbnail_url = fields.thumbnail_url;
        item.category = fields.category;
        item.industry = fields.industry;
        item.year = fields.year;
        item.client = fields.client;
        item.duration = fields.duration;
        item.challenge = fields.challenge;
        item.solution = fields.solution;
        item.result = fields.result;
        item.is_featured = fields.is_featured;
        item.updated_at = chrono::Utc::now();
        Ok(item.clone())
    }

    async fn set_featured(&self, id: Uuid, is_featured: bool) -> Result<Portfolio, DbErr> {
        let mut state = self.begin("update", "portfolios", 1)?;
        let item = state
            .portfolios
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(not_found)?;
        item.is_featured = is_featured;
        item.updated_at = chrono::Utc::now();
        Ok(item.clone())
    }

    async fn delete_portfolio(&self, id: Uuid) -> Result<u64, DbErr> {
        let mut state = self.begin("delete", "portfolios", 0)?;
        let before = state.portfolios.len();
        state.portfolios.retain(|p| p.id != id);
        let removed = (before - state.portfolios.len()) as u64;
        if removed > 0 {
            // ON DELETE CASCADE
            state.media.retain(|m| m.portfolio_id != id);
            state.stats.retain(|s| s.portfolio_id != id);
            state.tags.retain(|t| t.portfolio_id != id);
            state.technologies.retain(|t| t.portfolio_id != id);
            state.testimonials.retain(|t| t.portfolio_id != id);
        }
        Ok(removed)
    }

    async fn media_for(&self, portfolio_id: Uuid) -> Result<Vec<portfolio_media::Model>, DbErr> {
        let state = self.begin("select", "portfolio_media", 0)?;
        let mut rows: Vec<_> = state
            .media
            .iter()
            .filter(|m| m.portfolio_id == portfolio_id)
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.order_index);
        Ok(rows)
    }

    async fn stats_for(&self, portfolio_id: Uuid) -> Result<Vec<portfolio_stats::Model>, DbErr> {
        let state = self.begin("select", "portfolio_stats", 0)?;
        let mut rows: Vec<_> = state
            .stats
            .iter()
            .filter(|s| s.portfolio_id == portfolio_id)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.order_index);
        Ok(rows)
    }

    async fn tags_for(&self, portfolio_id: Uuid) -> Result<Vec<portfolio_tags::Model>, DbErr> {
        let state = self.begin("select", "portfolio_tags", 0)?;
        Ok(state
            .tags
            .iter()
            .filter(|t| t.portfolio_id == portfolio_id)
            .cloned()
            .collect())
    }

    async fn technologies_for(
        &self,
        portfolio_id: Uuid,
    ) -> Result<Vec<portfolio_technologies::Model>, DbErr> {
        let state = self.begin("select", "portfolio_technologies", 0)?;
        Ok(state
            .technologies
            .iter()
            .filter(|t| t.portfolio_id == portfolio_id)
            .cloned()
            .collect())
    }

    async fn testimonial_for(
        &self,
        portfolio_id: Uuid,
    ) -> Result<Option<portfolio_testimonials::Model>, DbErr> {
        let state = self.begin("select", "portfolio_testimonials", 0)?;
        Ok(state
            .testimonials
            .iter()
            .find(|t| t.portfolio_id == portfolio_id)
            .cloned())
    }

    async fn delete_children(&self, table: ChildTable, portfolio_id: Uuid) -> Result<u64, DbErr> {
        let mut state = self.begin("delete", table.table_name(), 0)?;
        let removed = match table {
            ChildTable::Media => {
                let before = state.media.len();
                state.media.retain(|m| m.portfolio_id != portfolio_id);
                before - state.media.len()
            }
            ChildTable::Stats => {
                let before = state.stats.len();
                state.stats.retain(|s| s.portfolio_id != portfolio_id);
                before - state.stats.len()
            }
            ChildTable::Tags => {
                let before = state.tags.len();
                state.tags.retain(|t| t.portfolio_id != portfolio_id);
                before - state.tags.len()
            }
            ChildTable::Technologies => {
                let before = state.technologies.len();
                state.technologies.retain(|t| t.portfolio_id != portfolio_id);
                before - state.technologies.len()
            }
            ChildTable::Testimonials => {
                let before = state.testimonials.len();
                state.testimonials.retain(|t| t.portfolio_id != portfolio_id);
                before - state.testimonials.len()
            }
        };
        if let Some(call) = state.calls.last_mut() {
            call.rows = removed as u64;
        }
        Ok(removed as u64)
    }

    async fn insert_media(&self, rows: Vec<NewMedia>) -> Result<u64, DbErr> {
        let count = rows.len() as u64;
        let mut state = self.begin("insert", "portfolio_media", count)?;
        let now = chrono::Utc::now();
        state
            .media
            .extend(rows.into_iter().map(|row| portfolio_media::Model {
                id: Uuid::new_v4(),
                portfolio_id: row.portfolio_id,
                kind: row.kind,
                url: row.url,
                order_index: row.order_index,
                created_at: now,
            }));
        Ok(count)
    }

    async fn insert_stats(&self, rows: Vec<NewStat>) -> Result<u64, DbErr> {
        let count = rows.len() as u64;
        let mut state = self.begin("insert", "portfolio_stats", count)?;
        state
            .stats
            .extend(rows.into_iter().map(|row| portfolio_stats::Model {
                id: Uuid::new_v4(),
                portfolio_id: row.portfolio_id,
                icon: row.icon,
                value: row.value,
                label: row.label,
                order_index: row.order_index,
            }));
        Ok(count)
    }

    async fn insert_tags(&self, portfolio_id: Uuid, names: Vec<String>) -> Result<u64, DbErr> {
        let count = names.len() as u64;
        let mut state = self.begin("insert", "portfolio_tags", count)?;
        state
            .tags
            .extend(names.into_iter().map(|name| portfolio_tags::Model {
                id: Uuid::new_v4(),
                portfolio_id,
                name,
            }));
        Ok(count)
    }

    async fn insert_technologies(
        &self,
        portfolio_id: Uuid,
        names: Vec<String>,
    ) -> Result<u64, DbErr> {
        let count = names.len() as u64;
        let mut state = self.begin("insert", "portfolio_technologies", count)?;
        state.technologies.extend(
            names
                .into_iter()
                .map(|name| portfolio_technologies::Model {
                    id: Uuid::new_v4(),
                    portfolio_id,
                    name,
                }),
        );
        Ok(count)
    }

    async fn insert_testimonial(&self, row: NewTestimonial) -> Result<(), DbErr> {
        let mut state = self.begin("insert", "portfolio_testimonials", 1)?;
        state.testimonials.push(portfolio_testimonials::Model {
            id: Uuid::new_v4(),
            portfolio_id: row.portfolio_id,
            quote: row.quote,
            author: row.author,
            role: row.role,
        });
        Ok(())
    }

    async fn select_all(&self, table: &str) -> Result<Vec<serde_json::Value>, DbErr> {
        let table: &'static str = match table {
            "portfolios" => "portfolios",
            "portfolio_media" => "portfolio_media",
            "portfolio_stats" => "portfolio_stats",
            "portfolio_tags" => "portfolio_tags",
            "portfolio_technologies" => "portfolio_technologies",
            "portfolio_testimonials" => "portfolio_testimonials",
            other => return Err(DbErr::Custom(format!("Unknown table {other}"))),
        };
        let state = self.begin("select", table, 0)?;
        let rows: Result<Vec<serde_json::Value>, serde_json::Error> = match table {
            "portfolios" => state.portfolios.iter().map(serde_json::to_value).collect(),
            "portfolio_media" => state.media.iter().map(serde_json::to_value).collect(),
            "portfolio_stats" => state.stats.iter().map(serde_json::to_value).collect(),
            "portfolio_tags" => state.tags.iter().map(serde_json::to_value).collect(),
            "portfolio_technologies" => state
                .technologies
                .iter()
                .map(serde_json::to_value)
                .collect(),
            _ => state
                .testimonials
                .iter()
                .map(serde_json::to_value)
                .collect(),
        };
        rows.map_err(|e| DbErr::Json(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: &str, featured: bool) -> PortfolioFields {
        PortfolioFields {
            title: title.to_string(),
            subtitle: String::new(),
            description: String::new(),
            thumbnail_url: None,
            category: "Web Development".to_string(),
            industry: String::new(),
            year: "2024".to_string(),
            client: String::new(),
            duration: String::new(),
            challenge: String::new(),
            solution: String::new(),
            result: String::new(),
            is_featured: featured,
        }
    }

    #[tokio::test]
    async fn deleting_a_portfolio_cascades_to_children() {
        let store = MemoryStore::new();
        let p = store.insert_portfolio(fields("A", false)).await.unwrap();
        store
            .insert_tags(p.id, vec!["vr".to_string(), "unity".to_string()])
            .await
            .unwrap();

        assert_eq!(store.delete_portfolio(p.id).await.unwrap(), 1);
        assert_eq!(store.row_count("portfolio_tags"), 0);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_filters_featured() {
        let store = MemoryStore::new();
        store.insert_portfolio(fields("old", true)).await.unwrap();
        store.insert_portfolio(fields("new", false)).await.unwrap();

        let all = store.list_portfolios(false).await.unwrap();
        assert_eq!(all[0].title, "new");
        assert_eq!(all[1].title, "old");

        let featured = store.list_portfolios(true).await.unwrap();
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].title, "old");
    }

    #[tokio::test]
    async fn failing_table_records_the_call_and_errors() {
        let store = MemoryStore::new();
        store.fail_table("portfolio_media");

        assert!(store.media_for(Uuid::new_v4()).await.is_err());
        assert_eq!(store.calls().len(), 1);
        assert_eq!(store.calls()[0].table, "portfolio_media");
    }
}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `portfolios` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "portfolios")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub subtitle: String,
    /// Rich HTML produced by the admin editor.
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub category: String,
    pub industry: String,
    pub year: String,
    pub client: String,
    pub duration: String,
    #[sea_orm(column_type = "Text")]
    pub challenge: String,
    #[sea_orm(column_type = "Text")]
    pub solution: String,
    #[sea_orm(column_type = "Text")]
    pub result: String,
    pub is_featured: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::portfolio_media::Entity")]
    Media,
    #[sea_orm(has_many = "super::portfolio_stats::Entity")]
    Stats,
    #[sea_orm(has_many = "super::portfolio_tags::Entity")]
    Tags,
    #[sea_orm(has_many = "super::portfolio_technologies::Entity")]
    Technologies,
    #[sea_orm(has_one = "super::portfolio_testimonials::Entity")]
    Testimonial,
}

impl Related<super::portfolio_media::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Media.def()
    }
}

impl Related<super::portfolio_stats::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stats.def()
    }
}

impl Related<super::portfolio_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tags.def()
    }
}

impl Related<super::portfolio_technologies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Technologies.def()
    }
}

impl Related<super::portfolio_testimonials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Testimonial.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Every writable column of a portfolio row. Used for both insert and update;
/// the store layer assigns `id` and the timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioFields {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub category: String,
    pub industry: String,
    pub year: String,
    pub client: String,
    pub duration: String,
    pub challenge: String,
    pub solution: String,
    pub result: String,
    pub is_featured: bool,
}

use sea_orm::*;
use uuid::Uuid;

use crate::models::portfolio::{self, PortfolioFields};
use crate::models::portfolio_media::{self, NewMedia};
use crate::models::portfolio_stats::{self, NewStat};
use crate::models::portfolio_testimonials::{self, NewTestimonial};
use crate::models::{ChildTable, portfolio_tags, portfolio_technologies};

/// Insert a new portfolio row.
pub async fn insert_portfolio(
    db: &DatabaseConnection,
    input: PortfolioFields,
) -> Result<portfolio::Model, DbErr> {
    let now = chrono::Utc::now();
    let new_portfolio = portfolio::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title),
        subtitle: Set(input.subtitle),
        description: Set(input.description),
        thumbnail_url: Set(input.thumbnail_url),
        category: Set(input.category),
        industry: Set(input.industry),
        year: Set(input.year),
        client: Set(input.client),
        duration: Set(input.duration),
        challenge: Set(input.challenge),
        solution: Set(input.solution),
        result: Set(input.result),
        is_featured: Set(input.is_featured),
        created_at: Set(now),
        updated_at: Set(now),
    };

    new_portfolio.insert(db).await
}

/// Fetch portfolios newest first, optionally only the featured ones.
pub async fn get_portfolios(
    db: &DatabaseConnection,
    featured_only: bool,
) -> Result<Vec<portfolio::Model>, DbErr> {
    let mut query = portfolio::Entity::find();
    if featured_only {
        query = query.filter(portfolio::Column::IsFeatured.eq(true));
    }
    query
        .order_by_desc(portfolio::Column::CreatedAt)
        .all(db)
        .await
}

/// Fetch the `limit` most recently created portfolios.
pub async fn get_recent_portfolios(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<portfolio::Model>, DbErr> {
    portfolio::Entity::find()
        .order_by_desc(portfolio::Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await
}

/// Count portfolios, optionally only the featured ones.
pub async fn count_portfolios(db: &DatabaseConnection, featured_only: bool) -> Result<u64, DbErr> {
    let mut query = portfolio::Entity::find();
    if featured_only {
        query = query.filter(portfolio::Column::IsFeatured.eq(true));
    }
    query.count(db).await
}

/// Fetch a single portfolio by ID.
pub async fn get_portfolio_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<portfolio::Model>, DbErr> {
    portfolio::Entity::find_by_id(id).one(db).await
}

/// Overwrite every writable column of an existing portfolio.
pub async fn update_portfolio(
    db: &DatabaseConnection,
    id: Uuid,
    input: PortfolioFields,
) -> Result<portfolio::Model, DbErr> {
    let item = portfolio::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Portfolio not found".to_string()))?;

    let mut active: portfolio::ActiveModel = item.into();
    active.title = Set(input.title);
    active.subtitle = Set(input.subtitle);
    active.description = Set(input.description);
    active.thumbnail_url = Set(input.thumbnail_url);
    active.category = Set(input.category);
    active.industry = Set(input.industry);
    active.year = Set(input.year);
    active.client = Set(input.client);
    active.duration = Set(input.duration);
    active.challenge = Set(input.challenge);
    active.solution = Set(input.solution);
    active.result = Set(input.result);
    active.is_featured = Set(input.is_featured);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Flip the featured flag of a portfolio.
pub async fn set_featured(
    db: &DatabaseConnection,
    id: Uuid,
    is_featured: bool,
) -> Result<portfolio::Model, DbErr> {
    let item = portfolio::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Portfolio not found".to_string()))?;

    let mut active: portfolio::ActiveModel = item.into();
    active.is_featured = Set(is_featured);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Delete a portfolio by ID. Child rows go with it through the FK cascade.
pub async fn delete_portfolio(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    portfolio::Entity::delete_by_id(id).exec(db).await
}

// ── Child relations ──

pub async fn get_media(
    db: &DatabaseConnection,
    portfolio_id: Uuid,
) -> Result<Vec<portfolio_media::Model>, DbErr> {
    portfolio_media::Entity::find()
        .filter(portfolio_media::Column::PortfolioId.eq(portfolio_id))
        .order_by_asc(portfolio_media::Column::OrderIndex)
        .all(db)
        .await
}

pub async fn get_stats(
    db: &DatabaseConnection,
    portfolio_id: Uuid,
) -> Result<Vec<portfolio_stats::Model>, DbErr> {
    portfolio_stats::Entity::find()
        .filter(portfolio_stats::Column::PortfolioId.eq(portfolio_id))
        .order_by_asc(portfolio_stats::Column::OrderIndex)
        .all(db)
        .await
}

pub async fn get_tags(
    db: &DatabaseConnection,
    portfolio_id: Uuid,
) -> Result<Vec<portfolio_tags::Model>, DbErr> {
    portfolio_tags::Entity::find()
        .filter(portfolio_tags::Column::PortfolioId.eq(portfolio_id))
        .all(db)
        .await
}

pub async fn get_technologies(
    db: &DatabaseConnection,
    portfolio_id: Uuid,
) -> Result<Vec<portfolio_technologies::Model>, DbErr> {
    portfolio_technologies::Entity::find()
        .filter(portfolio_technologies::Column::PortfolioId.eq(portfolio_id))
        .all(db)
        .await
}

pub async fn get_testimonial(
    db: &DatabaseConnection,
    portfolio_id: Uuid,
) -> Result<Option<portfolio_testimonials::Model>, DbErr> {
    portfolio_testimonials::Entity::find()
        .filter(portfolio_testimonials::Column::PortfolioId.eq(portfolio_id))
        .one(db)
        .await
}

/// Delete every row of one child relation that belongs to `portfolio_id`.
pub async fn delete_children(
    db: &DatabaseConnection,
    table: ChildTable,
    portfolio_id: Uuid,
) -> Result<DeleteResult, DbErr> {
    match table {
        ChildTable::Media => {
            portfolio_media::Entity::delete_many()
                .filter(portfolio_media::Column::PortfolioId.eq(portfolio_id))
                .exec(db)
                .await
        }
        ChildTable::Stats => {
            portfolio_stats::Entity::delete_many()
                .filter(portfolio_stats::Column::PortfolioId.eq(portfolio_id))
                .exec(db)
                .await
        }
        ChildTable::Tags => {
            portfolio_tags::Entity::delete_many()
                .filter(portfolio_tags::Column::PortfolioId.eq(portfolio_id))
                .exec(db)
                .await
        }
        ChildTable::Technologies => {
            portfolio_technologies::Entity::delete_many()
                .filter(portfolio_technologies::Column::PortfolioId.eq(portfolio_id))
                .exec(db)
                .await
        }
        ChildTable::Testimonials => {
            portfolio_testimonials::Entity::delete_many()
                .filter(portfolio_testimonials::Column::PortfolioId.eq(portfolio_id))
                .exec(db)
                .await
        }
    }
}

/// Insert media rows in one statement. Callers skip empty batches.
pub async fn insert_media(db: &DatabaseConnection, rows: Vec<NewMedia>) -> Result<u64, DbErr> {
    let count = rows.len() as u64;
    let now = chrono::Utc::now();
    let models = rows.into_iter().map(|row| portfolio_media::ActiveModel {
        id: Set(Uuid::new_v4()),
        portfolio_id: Set(row.portfolio_id),
        kind: Set(row.kind),
        url: Set(row.url),
        order_index: Set(row.order_index),
        created_at: Set(now),
    });

    portfolio_media::Entity::insert_many(models).exec(db).await?;
    Ok(count)
}

pub async fn insert_stats(db: &DatabaseConnection, rows: Vec<NewStat>) -> Result<u64, DbErr> {
    let count = rows.len() as u64;
    let models = rows.into_iter().map(|row| portfolio_stats::ActiveModel {
        id: Set(Uuid::new_v4()),
        portfolio_id: Set(row.portfolio_id),
        icon: Set(row.icon),
        value: Set(row.value),
        label: Set(row.label),
        order_index: Set(row.order_index),
    });

    portfolio_stats::Entity::insert_many(models).exec(db).await?;
    Ok(count)
}

pub async fn insert_tags(
    db: &DatabaseConnection,
    portfolio_id: Uuid,
    names: Vec<String>,
) -> Result<u64, DbErr> {
    let count = names.len() as u64;
    let models = names.into_iter().map(|name| portfolio_tags::ActiveModel {
        id: Set(Uuid::new_v4()),
        portfolio_id: Set(portfolio_id),
        name: Set(name),
    });

    portfolio_tags::Entity::insert_many(models).exec(db).await?;
    Ok(count)
}

pub async fn insert_technologies(
    db: &DatabaseConnection,
    portfolio_id: Uuid,
    names: Vec<String>,
) -> Result<u64, DbErr> {
    let count = names.len() as u64;
    let models = names
        .into_iter()
        .map(|name| portfolio_technologies::ActiveModel {
            id: Set(Uuid::new_v4()),
            portfolio_id: Set(portfolio_id),
            name: Set(name),
        });

    portfolio_technologies::Entity::insert_many(models)
        .exec(db)
        .await?;
    Ok(count)
}

pub async fn insert_testimonial(
    db: &DatabaseConnection,
    row: NewTestimonial,
) -> Result<portfolio_testimonials::Model, DbErr> {
    let testimonial = portfolio_testimonials::ActiveModel {
        id: Set(Uuid::new_v4()),
        portfolio_id: Set(row.portfolio_id),
        quote: Set(row.quote),
        author: Set(row.author),
        role: Set(row.role),
    };

    testimonial.insert(db).await
}

/// `select *` against one of the portfolio tables, rows rendered as JSON objects.
pub async fn select_all_json(
    db: &DatabaseConnection,
    table: &str,
) -> Result<Vec<serde_json::Value>, DbErr> {
    match table {
        "portfolios" => portfolio::Entity::find().into_json().all(db).await,
        "portfolio_media" => portfolio_media::Entity::find().into_json().all(db).await,
        "portfolio_stats" => portfolio_stats::Entity::find().into_json().all(db).await,
        "portfolio_tags" => portfolio_tags::Entity::find().into_json().all(db).await,
        "portfolio_technologies" => {
            portfolio_technologies::Entity::find()
                .into_json()
                .all(db)
                .await
        }
        "portfolio_testimonials" => {
            portfolio_testimonials::Entity::find()
                .into_json()
                .all(db)
                .await
        }
        other => Err(DbErr::Custom(format!("Unknown table {other}"))),
    }
}

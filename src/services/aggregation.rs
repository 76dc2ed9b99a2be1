use futures_util::future::join_all;
use sea_orm::DbErr;
use uuid::Uuid;

use crate::db::ContentStore;
use crate::models::PortfolioWithRelations;
use crate::models::portfolio;

/// Featured portfolios, newest first, each joined with its relations.
///
/// Never fails: a store error is logged and the result is empty.
pub async fn get_featured(store: &dyn ContentStore) -> Vec<PortfolioWithRelations> {
    match store.list_portfolios(true).await {
        Ok(portfolios) => assemble_all(store, portfolios).await,
        Err(e) => {
            tracing::error!("Error fetching featured portfolios: {e}");
            Vec::new()
        }
    }
}

/// Every portfolio, newest first, each joined with its relations.
pub async fn get_all(store: &dyn ContentStore) -> Vec<PortfolioWithRelations> {
    match store.list_portfolios(false).await {
        Ok(portfolios) => assemble_all(store, portfolios).await,
        Err(e) => {
            tracing::error!("Error fetching all portfolios: {e}");
            Vec::new()
        }
    }
}

/// One portfolio joined with its relations, `None` when missing or unreadable.
pub async fn get_by_id(store: &dyn ContentStore, id: Uuid) -> Option<PortfolioWithRelations> {
    match store.find_portfolio(id).await {
        Ok(Some(portfolio)) => Some(assemble(store, portfolio).await),
        Ok(None) => None,
        Err(e) => {
            tracing::error!("Error fetching portfolio {id}: {e}");
            None
        }
    }
}

async fn assemble_all(
    store: &dyn ContentStore,
    portfolios: Vec<portfolio::Model>,
) -> Vec<PortfolioWithRelations> {
    join_all(portfolios.into_iter().map(|p| assemble(store, p))).await
}

/// Issue the five child reads concurrently and fold them into one view.
/// A failed read degrades to an empty collection (or no testimonial).
async fn assemble(store: &dyn ContentStore, portfolio: portfolio::Model) -> PortfolioWithRelations {
    let id = portfolio.id;
    let (media, stats, tags, technologies, testimonial) = tokio::join!(
        store.media_for(id),
        store.stats_for(id),
        store.tags_for(id),
        store.technologies_for(id),
        store.testimonial_for(id),
    );

    PortfolioWithRelations {
        portfolio,
        media: or_default(media, "portfolio_media", id),
        stats: or_default(stats, "portfolio_stats", id),
        tags: or_default(tags, "portfolio_tags", id),
        technologies: or_default(technologies, "portfolio_technologies", id),
        testimonial: or_default(testimonial, "portfolio_testimonials", id),
    }
}

fn or_default<T: Default>(result: Result<T, DbErr>, table: &str, id: Uuid) -> T {
    result.unwrap_or_else(|e| {
        tracing::error!("Error fetching {table} for portfolio {id}: {e}");
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::portfolio::PortfolioFields;
    use crate::models::portfolio_media::{MediaKind, NewMedia};
    use crate::models::portfolio_testimonials::NewTestimonial;

    fn fields(title: &str, featured: bool) -> PortfolioFields {
        PortfolioFields {
            title: title.to_string(),
            subtitle: String::new(),
            description: "<p>desc</p>".to_string(),
            thumbnail_url: None,
            category: "Virtual Reality".to_string(),
            industry: "Education".to_string(),
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
    async fn portfolio_without_children_has_empty_relations() {
        let store = MemoryStore::new();
        let p = store.insert_portfolio(fields("Bare", false)).await.unwrap();

        let view = get_by_id(&store, p.id).await.expect("portfolio exists");
        assert!(view.media.is_empty());
        assert!(view.stats.is_empty());
        assert!(view.tags.is_empty());
        assert!(view.technologies.is_empty());
        assert!(view.testimonial.is_none());
    }

    #[tokio::test]
    async fn media_comes_back_in_order_index_order() {
        let store = MemoryStore::new();
        let p = store.insert_portfolio(fields("Ordered", false)).await.unwrap();
        store
            .insert_media(vec![
                NewMedia {
                    portfolio_id: p.id,
                    kind: MediaKind::Image,
                    url: "https://cdn.example.com/b.png".into(),
                    order_index: 1,
                },
                NewMedia {
                    portfolio_id: p.id,
                    kind: MediaKind::Youtube,
                    url: "dQw4w9WgXcQ".into(),
                    order_index: 0,
                },
            ])
            .await
            .unwrap();
        store
            .insert_testimonial(NewTestimonial {
                portfolio_id: p.id,
                quote: "Great".into(),
                author: "Dana".into(),
                role: "CTO".into(),
            })
            .await
            .unwrap();

        let view = get_by_id(&store, p.id).await.unwrap();
        assert_eq!(view.media[0].url, "dQw4w9WgXcQ");
        assert_eq!(view.media[1].order_index, 1);
        assert_eq!(view.testimonial.unwrap().author, "Dana");
    }

    #[tokio::test]
    async fn featured_only_returns_featured_rows() {
        let store = MemoryStore::new();
        store.insert_portfolio(fields("One", true)).await.unwrap();
        store.insert_portfolio(fields("Two", false)).await.unwrap();

        let featured = get_featured(&store).await;
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].portfolio.title, "One");
        assert_eq!(get_all(&store).await.len(), 2);
    }

    #[tokio::test]
    async fn each_portfolio_issues_five_child_reads() {
        let store = MemoryStore::new();
        store.insert_portfolio(fields("One", false)).await.unwrap();
        store.insert_portfolio(fields("Two", false)).await.unwrap();
        store.clear_calls();

        get_all(&store).await;
        // one base read plus five per portfolio
        assert_eq!(store.calls().len(), 1 + 2 * 5);
    }

    #[tokio::test]
    async fn base_read_failure_degrades_to_empty() {
        let store = MemoryStore::new();
        store.insert_portfolio(fields("Hidden", true)).await.unwrap();
        store.fail_table("portfolios");

        assert!(get_all(&store).await.is_empty());
        assert!(get_featured(&store).await.is_empty());
        assert!(get_by_id(&store, Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn child_read_failure_degrades_only_that_child() {
        let store = MemoryStore::new();
        let p = store.insert_portfolio(fields("Partial", false)).await.unwrap();
        store
            .insert_tags(p.id, vec!["xr".to_string()])
            .await
            .unwrap();
        store.fail_table("portfolio_stats");

        let view = get_by_id(&store, p.id).await.unwrap();
        assert!(view.stats.is_empty());
        assert_eq!(view.tags.len(), 1);
    }
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Portfolios {
    Table,
    IsFeatured,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PortfolioMedia {
    Table,
    PortfolioId,
}

#[derive(DeriveIden)]
enum PortfolioStats {
    Table,
    PortfolioId,
}

#[derive(DeriveIden)]
enum PortfolioTags {
    Table,
    PortfolioId,
}

#[derive(DeriveIden)]
enum PortfolioTechnologies {
    Table,
    PortfolioId,
}

#[derive(DeriveIden)]
enum PortfolioTestimonials {
    Table,
    PortfolioId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Featured listing on the public site
        manager
            .create_index(
                Index::create()
                    .name("idx_portfolios_is_featured")
                    .table(Portfolios::Table)
                    .col(Portfolios::IsFeatured)
                    .to_owned(),
            )
            .await?;

        // Newest-first ordering
        manager
            .create_index(
                Index::create()
                    .name("idx_portfolios_created_at")
                    .table(Portfolios::Table)
                    .col(Portfolios::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Child lookups by portfolio, one per relation
        manager
            .create_index(
                Index::create()
                    .name("idx_portfolio_media_portfolio_id")
                    .table(PortfolioMedia::Table)
                    .col(PortfolioMedia::PortfolioId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_portfolio_stats_portfolio_id")
                    .table(PortfolioStats::Table)
                    .col(PortfolioStats::PortfolioId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_portfolio_tags_portfolio_id")
                    .table(PortfolioTags::Table)
                    .col(PortfolioTags::PortfolioId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_portfolio_technologies_portfolio_id")
                    .table(PortfolioTechnologies::Table)
                    .col(PortfolioTechnologies::PortfolioId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_portfolio_testimonials_portfolio_id")
                    .table(PortfolioTestimonials::Table)
                    .col(PortfolioTestimonials::PortfolioId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_portfolios_is_featured",
            "idx_portfolios_created_at",
            "idx_portfolio_media_portfolio_id",
            "idx_portfolio_stats_portfolio_id",
            "idx_portfolio_tags_portfolio_id",
            "idx_portfolio_technologies_portfolio_id",
            "idx_portfolio_testimonials_portfolio_id",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}

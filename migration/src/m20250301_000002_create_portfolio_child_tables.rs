use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Portfolios {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum PortfolioMedia {
    Table,
    Id,
    PortfolioId,
    Type,
    Url,
    OrderIndex,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PortfolioStats {
    Table,
    Id,
    PortfolioId,
    Icon,
    Value,
    Label,
    OrderIndex,
}

#[derive(DeriveIden)]
enum PortfolioTags {
    Table,
    Id,
    PortfolioId,
    Name,
}

#[derive(DeriveIden)]
enum PortfolioTechnologies {
    Table,
    Id,
    PortfolioId,
    Name,
}

#[derive(DeriveIden)]
enum PortfolioTestimonials {
    Table,
    Id,
    PortfolioId,
    Quote,
    Author,
    Role,
}

fn id_column<T: IntoIden + 'static>(iden: T) -> ColumnDef {
    ColumnDef::new(iden)
        .uuid()
        .not_null()
        .primary_key()
        .extra("DEFAULT gen_random_uuid()")
        .to_owned()
}

/// Every child row goes away with its portfolio.
fn portfolio_fk<T: IntoIden + 'static, C: IntoIden + 'static>(
    name: &str,
    table: T,
    column: C,
) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(table, column)
        .to(Portfolios::Table, Portfolios::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .on_update(ForeignKeyAction::Cascade)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PortfolioMedia::Table)
                    .if_not_exists()
                    .col(id_column(PortfolioMedia::Id))
                    .col(ColumnDef::new(PortfolioMedia::PortfolioId).uuid().not_null())
                    .col(ColumnDef::new(PortfolioMedia::Type).string().not_null())
                    .col(ColumnDef::new(PortfolioMedia::Url).text().not_null())
                    .col(
                        ColumnDef::new(PortfolioMedia::OrderIndex)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PortfolioMedia::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(&mut portfolio_fk(
                        "fk_portfolio_media_portfolio_id",
                        PortfolioMedia::Table,
                        PortfolioMedia::PortfolioId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PortfolioStats::Table)
                    .if_not_exists()
                    .col(id_column(PortfolioStats::Id))
                    .col(ColumnDef::new(PortfolioStats::PortfolioId).uuid().not_null())
                    .col(ColumnDef::new(PortfolioStats::Icon).string().not_null())
                    .col(ColumnDef::new(PortfolioStats::Value).string().not_null().default(""))
                    .col(ColumnDef::new(PortfolioStats::Label).string().not_null().default(""))
                    .col(
                        ColumnDef::new(PortfolioStats::OrderIndex)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(&mut portfolio_fk(
                        "fk_portfolio_stats_portfolio_id",
                        PortfolioStats::Table,
                        PortfolioStats::PortfolioId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PortfolioTags::Table)
                    .if_not_exists()
                    .col(id_column(PortfolioTags::Id))
                    .col(ColumnDef::new(PortfolioTags::PortfolioId).uuid().not_null())
                    .col(ColumnDef::new(PortfolioTags::Name).string().not_null())
                    .foreign_key(&mut portfolio_fk(
                        "fk_portfolio_tags_portfolio_id",
                        PortfolioTags::Table,
                        PortfolioTags::PortfolioId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PortfolioTechnologies::Table)
                    .if_not_exists()
                    .col(id_column(PortfolioTechnologies::Id))
                    .col(
                        ColumnDef::new(PortfolioTechnologies::PortfolioId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PortfolioTechnologies::Name).string().not_null())
                    .foreign_key(&mut portfolio_fk(
                        "fk_portfolio_technologies_portfolio_id",
                        PortfolioTechnologies::Table,
                        PortfolioTechnologies::PortfolioId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PortfolioTestimonials::Table)
                    .if_not_exists()
                    .col(id_column(PortfolioTestimonials::Id))
                    .col(
                        ColumnDef::new(PortfolioTestimonials::PortfolioId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PortfolioTestimonials::Quote).text().not_null())
                    .col(
                        ColumnDef::new(PortfolioTestimonials::Author)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(PortfolioTestimonials::Role)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .foreign_key(&mut portfolio_fk(
                        "fk_portfolio_testimonials_portfolio_id",
                        PortfolioTestimonials::Table,
                        PortfolioTestimonials::PortfolioId,
                    ))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PortfolioTestimonials::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PortfolioTechnologies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PortfolioTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PortfolioStats::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PortfolioMedia::Table).to_owned())
            .await
    }
}

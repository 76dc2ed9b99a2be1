use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `portfolios` table and its columns.
#[derive(DeriveIden)]
enum Portfolios {
    Table,
    Id,
    Title,
    Subtitle,
    Description,
    ThumbnailUrl,
    Category,
    Industry,
    Year,
    Client,
    Duration,
    Challenge,
    Solution,
    Result,
    IsFeatured,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Portfolios::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Portfolios::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(Portfolios::Title).string().not_null())
                    .col(ColumnDef::new(Portfolios::Subtitle).text().not_null().default(""))
                    .col(ColumnDef::new(Portfolios::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Portfolios::ThumbnailUrl).text().null())
                    .col(ColumnDef::new(Portfolios::Category).string().not_null())
                    .col(ColumnDef::new(Portfolios::Industry).string().not_null().default(""))
                    .col(ColumnDef::new(Portfolios::Year).string().not_null().default(""))
                    .col(ColumnDef::new(Portfolios::Client).string().not_null().default(""))
                    .col(ColumnDef::new(Portfolios::Duration).string().not_null().default(""))
                    .col(ColumnDef::new(Portfolios::Challenge).text().not_null().default(""))
                    .col(ColumnDef::new(Portfolios::Solution).text().not_null().default(""))
                    .col(ColumnDef::new(Portfolios::Result).text().not_null().default(""))
                    .col(
                        ColumnDef::new(Portfolios::IsFeatured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Portfolios::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Portfolios::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Portfolios::Table).to_owned())
            .await
    }
}

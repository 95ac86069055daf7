use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Listings {
    Table,
    Id,
    OwnerId,
    Title,
    AltTitle,
    Description,
    Category,
    PricePerDay,
    Currency,
    City,
    Country,
    Available,
    IsActive,
    LastBumpTime,
    TrialEndsOn,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Listings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // owner is a weak reference: no foreign key, the scheduler skips orphans
                    .col(ColumnDef::new(Listings::OwnerId).big_integer().not_null())
                    .col(ColumnDef::new(Listings::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Listings::AltTitle).string_len(100).null())
                    .col(ColumnDef::new(Listings::Description).text().null())
                    .col(ColumnDef::new(Listings::Category).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Listings::PricePerDay)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Listings::Currency)
                            .string_len(8)
                            .not_null()
                            .default("EUR"),
                    )
                    .col(ColumnDef::new(Listings::City).string_len(50).not_null())
                    .col(ColumnDef::new(Listings::Country).string_len(50).null())
                    .col(
                        ColumnDef::new(Listings::Available)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Listings::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Listings::LastBumpTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Listings::TrialEndsOn)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Listings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_listings_owner")
                    .table(Listings::Table)
                    .col(Listings::OwnerId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_listings_last_bump_time")
                    .table(Listings::Table)
                    .col(Listings::LastBumpTime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Listings::Table).to_owned())
            .await?;
        Ok(())
    }
}

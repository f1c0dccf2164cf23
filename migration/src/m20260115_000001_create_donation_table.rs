use entity::donation;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(donation::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(donation::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(donation::Column::PlayerNickname)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(donation::Column::PackageName)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(donation::Column::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(donation::Column::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending".to_owned()),
                    )
                    .col(ColumnDef::new(donation::Column::Phone).text().null())
                    .col(ColumnDef::new(donation::Column::Notes).text().null())
                    .col(
                        ColumnDef::new(donation::Column::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(donation::Column::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;
        // operator list view orders by creation time descending
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_donation_created_at")
                    .col(donation::Column::CreatedAt)
                    .table(donation::Entity)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_donation_created_at").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(donation::Entity).to_owned())
            .await
    }
}

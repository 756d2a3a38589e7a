//! Initial schema migration - creates all tables from scratch.
//!
//! Complete schema for the sticker reward ledger:
//!
//! - `shoppers`: loyalty accounts with their running sticker balance
//! - `transactions`: applied purchases, keyed by the caller-supplied
//!   `transaction_id` (the idempotency key), with the reward breakdown and
//!   the post-apply balance stored for duplicate replay

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Shoppers {
    Table,
    ShopperId,
    StickerBalance,
    CreatedAt,
}

#[derive(Iden)]
enum Transactions {
    Table,
    TransactionId,
    ShopperId,
    StoreId,
    Seq,
    OccurredAt,
    Items,
    TotalAmountMinor,
    StickersEarned,
    RawTotal,
    Capped,
    BalanceAfter,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Shoppers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Shoppers::ShopperId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Shoppers::StickerBalance)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Shoppers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::TransactionId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::ShopperId).string().not_null())
                    .col(ColumnDef::new(Transactions::StoreId).string().not_null())
                    .col(ColumnDef::new(Transactions::Seq).big_integer().not_null())
                    .col(
                        ColumnDef::new(Transactions::OccurredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Items).text().not_null())
                    .col(
                        ColumnDef::new(Transactions::TotalAmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::StickersEarned)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::RawTotal)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Capped).boolean().not_null())
                    .col(
                        ColumnDef::new(Transactions::BalanceAfter)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-shopper_id")
                            .from(Transactions::Table, Transactions::ShopperId)
                            .to(Shoppers::Table, Shoppers::ShopperId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uidx-transactions-seq")
                    .table(Transactions::Table)
                    .col(Transactions::Seq)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-shopper_id")
                    .table(Transactions::Table)
                    .col(Transactions::ShopperId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-store_id")
                    .table(Transactions::Table)
                    .col(Transactions::StoreId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Shoppers::Table).to_owned())
            .await?;
        Ok(())
    }
}

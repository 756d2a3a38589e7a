//! Transaction primitives.
//!
//! A `Transaction` is an immutable ledger record: once applied it is never
//! updated, and its row stores everything needed to replay the original
//! response for a duplicate submission (reward breakdown and the balance
//! right after application).

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, LineItem, MoneyCents};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Idempotency key, caller supplied, globally unique.
    pub transaction_id: String,
    pub shopper_id: String,
    pub store_id: String,
    /// Global submission counter; per-shopper order is `seq` ascending.
    pub seq: i64,
    /// Caller-supplied purchase instant.
    pub occurred_at: DateTime<Utc>,
    pub items: Vec<LineItem>,
    pub total_amount: MoneyCents,
    pub stickers_earned: i64,
    pub raw_total: i64,
    pub capped: bool,
    /// Shopper balance right after this transaction was applied.
    pub balance_after: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub transaction_id: String,
    pub shopper_id: String,
    pub store_id: String,
    pub seq: i64,
    pub occurred_at: DateTimeUtc,
    /// Line items serialized as JSON.
    pub items: String,
    pub total_amount_minor: i64,
    pub stickers_earned: i64,
    pub raw_total: i64,
    pub capped: bool,
    pub balance_after: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shoppers::Entity",
        from = "Column::ShopperId",
        to = "super::shoppers::Column::ShopperId"
    )]
    Shoppers,
}

impl Related<super::shoppers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shoppers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<&Transaction> for ActiveModel {
    type Error = EngineError;

    fn try_from(tx: &Transaction) -> Result<Self, Self::Error> {
        let items = serde_json::to_string(&tx.items)
            .map_err(|err| EngineError::Database(DbErr::Custom(err.to_string())))?;
        Ok(Self {
            transaction_id: ActiveValue::Set(tx.transaction_id.clone()),
            shopper_id: ActiveValue::Set(tx.shopper_id.clone()),
            store_id: ActiveValue::Set(tx.store_id.clone()),
            seq: ActiveValue::Set(tx.seq),
            occurred_at: ActiveValue::Set(tx.occurred_at),
            items: ActiveValue::Set(items),
            total_amount_minor: ActiveValue::Set(tx.total_amount.cents()),
            stickers_earned: ActiveValue::Set(tx.stickers_earned),
            raw_total: ActiveValue::Set(tx.raw_total),
            capped: ActiveValue::Set(tx.capped),
            balance_after: ActiveValue::Set(tx.balance_after),
            created_at: ActiveValue::Set(tx.created_at),
        })
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let items: Vec<LineItem> = serde_json::from_str(&model.items)
            .map_err(|err| EngineError::Database(DbErr::Custom(err.to_string())))?;
        Ok(Self {
            transaction_id: model.transaction_id,
            shopper_id: model.shopper_id,
            store_id: model.store_id,
            seq: model.seq,
            occurred_at: model.occurred_at,
            items,
            total_amount: MoneyCents::new(model.total_amount_minor),
            stickers_earned: model.stickers_earned,
            raw_total: model.raw_total,
            capped: model.capped,
            balance_after: model.balance_after,
            created_at: model.created_at,
        })
    }
}

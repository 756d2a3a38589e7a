//! Shopper primitives.
//!
//! A `Shopper` accumulates a sticker balance across applied transactions. It
//! is created lazily on the first successful transaction for an unseen
//! `shopper_id` and never deleted.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shopper {
    pub shopper_id: String,
    pub sticker_balance: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "shoppers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub shopper_id: String,
    pub sticker_balance: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Shopper> for ActiveModel {
    fn from(shopper: &Shopper) -> Self {
        Self {
            shopper_id: ActiveValue::Set(shopper.shopper_id.clone()),
            sticker_balance: ActiveValue::Set(shopper.sticker_balance),
            created_at: ActiveValue::Set(shopper.created_at),
        }
    }
}

impl From<Model> for Shopper {
    fn from(model: Model) -> Self {
        Self {
            shopper_id: model.shopper_id,
            sticker_balance: model.sticker_balance,
            created_at: model.created_at,
        }
    }
}

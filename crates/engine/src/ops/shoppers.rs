//! Read-only shopper lookups.

use sea_orm::{QueryFilter, QueryOrder, prelude::*};

use crate::{EngineError, ResultEngine, Shopper, Transaction, shoppers, transactions};

use super::Engine;

/// A shopper together with its full transaction history.
#[derive(Clone, Debug)]
pub struct ShopperDetail {
    pub shopper: Shopper,
    /// Transactions in submission order.
    pub transactions: Vec<Transaction>,
}

impl Engine {
    /// Returns a shopper with its transactions in submission order.
    pub async fn shopper(&self, shopper_id: &str) -> ResultEngine<ShopperDetail> {
        let model = shoppers::Entity::find_by_id(shopper_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(shopper_id.to_string()))?;

        let rows = transactions::Entity::find()
            .filter(transactions::Column::ShopperId.eq(shopper_id.to_string()))
            .order_by_asc(transactions::Column::Seq)
            .all(&self.database)
            .await?;

        let mut history = Vec::with_capacity(rows.len());
        for row in rows {
            history.push(Transaction::try_from(row)?);
        }

        Ok(ShopperDetail {
            shopper: Shopper::from(model),
            transactions: history,
        })
    }

    /// Lists all shoppers, newest first.
    pub async fn list_shoppers(&self) -> ResultEngine<Vec<Shopper>> {
        let rows = shoppers::Entity::find()
            .order_by_desc(shoppers::Column::CreatedAt)
            .order_by_asc(shoppers::Column::ShopperId)
            .all(&self.database)
            .await?;

        Ok(rows.into_iter().map(Shopper::from).collect())
    }
}

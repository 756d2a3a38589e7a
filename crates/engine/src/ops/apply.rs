//! The apply path: idempotency guard + atomic ledger update.

use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, DatabaseTransaction, Statement, TransactionTrait, prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, ResultEngine, Shopper, Transaction, TransactionCmd, rewards, shoppers,
    transactions,
    validate::{self, ValidTransaction},
};

use super::{Engine, with_tx};

/// Outcome of applying (or replaying) a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedTransaction {
    pub transaction_id: String,
    pub shopper_id: String,
    pub stickers_earned: i64,
    /// Shopper balance right after the original application.
    pub new_balance: i64,
    pub raw_total: i64,
    pub capped: bool,
    /// `true` when this submission replayed an already-applied transaction.
    pub is_duplicate: bool,
}

impl AppliedTransaction {
    fn replay(model: &transactions::Model) -> Self {
        Self {
            transaction_id: model.transaction_id.clone(),
            shopper_id: model.shopper_id.clone(),
            stickers_earned: model.stickers_earned,
            new_balance: model.balance_after,
            raw_total: model.raw_total,
            capped: model.capped,
            is_duplicate: true,
        }
    }
}

impl Engine {
    /// Validates, calculates and applies a transaction exactly once.
    ///
    /// A resubmission of an already-applied `transaction_id` returns the
    /// stored result with `is_duplicate = true` and mutates nothing. The
    /// shopper row, the transaction record and the balance increment commit
    /// in a single DB transaction: a storage failure leaves no partial state
    /// behind, so a caller-driven retry is safe.
    pub async fn apply_transaction(&self, cmd: TransactionCmd) -> ResultEngine<AppliedTransaction> {
        let valid = validate::validate(&cmd)?;
        let breakdown = rewards::calculate(&valid.items)?;

        let _guard = self.apply_lock.lock().await;
        with_tx!(self, |db_tx| {
            self.apply_in_tx(&db_tx, valid, breakdown).await
        })
    }

    async fn apply_in_tx(
        &self,
        db_tx: &DatabaseTransaction,
        valid: ValidTransaction,
        breakdown: rewards::RewardBreakdown,
    ) -> ResultEngine<AppliedTransaction> {
        if let Some(existing) = transactions::Entity::find_by_id(valid.transaction_id.clone())
            .one(db_tx)
            .await?
        {
            return Ok(AppliedTransaction::replay(&existing));
        }

        let now = Utc::now();
        let prior_balance = match shoppers::Entity::find_by_id(valid.shopper_id.clone())
            .one(db_tx)
            .await?
        {
            Some(shopper) => shopper.sticker_balance,
            None => {
                let shopper = Shopper {
                    shopper_id: valid.shopper_id.clone(),
                    sticker_balance: 0,
                    created_at: now,
                };
                shoppers::ActiveModel::from(&shopper).insert(db_tx).await?;
                0
            }
        };

        let new_balance = prior_balance + breakdown.stickers_earned;
        let tx = Transaction {
            transaction_id: valid.transaction_id,
            shopper_id: valid.shopper_id.clone(),
            store_id: valid.store_id,
            seq: self.next_seq(db_tx).await?,
            occurred_at: valid.occurred_at,
            items: valid.items,
            total_amount: breakdown.total_amount,
            stickers_earned: breakdown.stickers_earned,
            raw_total: breakdown.raw_total,
            capped: breakdown.capped,
            balance_after: new_balance,
            created_at: now,
        };

        let row = transactions::ActiveModel::try_from(&tx)?;
        if let Err(err) = row.insert(db_tx).await {
            // Unique primary key: another writer applied the same id first.
            let existing = transactions::Entity::find_by_id(tx.transaction_id.clone())
                .one(db_tx)
                .await?;
            if let Some(existing) = existing {
                return Ok(AppliedTransaction::replay(&existing));
            }
            return Err(err.into());
        }

        shoppers::ActiveModel {
            shopper_id: ActiveValue::Set(tx.shopper_id.clone()),
            sticker_balance: ActiveValue::Set(new_balance),
            ..Default::default()
        }
        .update(db_tx)
        .await?;

        Ok(AppliedTransaction {
            transaction_id: tx.transaction_id,
            shopper_id: tx.shopper_id,
            stickers_earned: tx.stickers_earned,
            new_balance,
            raw_total: tx.raw_total,
            capped: tx.capped,
            is_duplicate: false,
        })
    }

    /// Next value of the global submission counter.
    async fn next_seq(&self, db_tx: &DatabaseTransaction) -> ResultEngine<i64> {
        let backend = self.database.get_database_backend();
        let stmt = Statement::from_string(
            backend,
            "SELECT COALESCE(MAX(seq), 0) + 1 AS next FROM transactions",
        );
        let row = db_tx.query_one(stmt).await?;
        row.and_then(|r| r.try_get("", "next").ok())
            .ok_or_else(|| EngineError::Database(DbErr::Custom("missing seq row".to_string())))
    }
}

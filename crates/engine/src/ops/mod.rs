use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;

use crate::ResultEngine;

mod apply;
mod shoppers;
mod stats;

pub use apply::AppliedTransaction;
pub use shoppers::ShopperDetail;
pub use stats::{LedgerStats, StoreStats, TopShopper, TOP_SHOPPERS_LIMIT};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The reward engine: authoritative ledger of shoppers and transactions.
///
/// Reads go straight to the connection and may run concurrently; the apply
/// path is serialized by `apply_lock` so balances and the submission counter
/// never see interleaved writers.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    apply_lock: Mutex<()>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            apply_lock: Mutex::new(()),
        })
    }
}

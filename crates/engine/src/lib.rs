//! Reward engine for the sticker loyalty campaign.
//!
//! The engine owns the authoritative ledger: shoppers, their applied
//! transactions, and the running sticker balances. Submissions flow through
//! validation, the pure reward calculation, and an idempotent, atomic apply
//! step; lookups and statistics read the ledger without mutation.

pub use commands::{LineItemInput, TransactionCmd};
pub use error::EngineError;
pub use items::{Category, LineItem};
pub use money::MoneyCents;
pub use ops::{
    AppliedTransaction, Engine, EngineBuilder, LedgerStats, ShopperDetail, StoreStats, TopShopper,
    TOP_SHOPPERS_LIMIT,
};
pub use rewards::{DOLLARS_PER_STICKER, MAX_STICKERS_PER_TRANSACTION, RewardBreakdown};
pub use shoppers::Shopper;
pub use transactions::Transaction;
pub use validate::ValidTransaction;

mod commands;
mod error;
mod items;
mod money;
mod ops;
pub mod rewards;
mod shoppers;
mod transactions;
pub mod validate;

type ResultEngine<T> = Result<T, EngineError>;

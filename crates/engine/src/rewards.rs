//! Sticker reward calculation.
//!
//! Campaign rules:
//! 1. Base earn rate: 1 sticker per $10 of total basket spend (floor division)
//! 2. Promo bonus: +1 sticker per line item with category `promo`
//! 3. Per-transaction cap: maximum 5 stickers per transaction
//!
//! The calculation is a pure function of the validated line items: identical
//! input always yields an identical breakdown, which is what makes idempotent
//! replay safe.

use serde::{Deserialize, Serialize};

use crate::{Category, EngineError, LineItem, MoneyCents};

/// Dollars of basket spend per base sticker.
pub const DOLLARS_PER_STICKER: i64 = 10;

/// Per-transaction sticker cap.
pub const MAX_STICKERS_PER_TRANSACTION: i64 = 5;

/// Result of the reward calculation for one transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardBreakdown {
    /// Basket total in cents.
    pub total_amount: MoneyCents,
    pub base_stickers: i64,
    pub promo_bonus: i64,
    /// `base_stickers + promo_bonus`, before the cap.
    pub raw_total: i64,
    /// `min(raw_total, MAX_STICKERS_PER_TRANSACTION)`.
    pub stickers_earned: i64,
    /// Whether the cap reduced the award.
    pub capped: bool,
}

/// Computes the basket total (`Σ quantity × unit_price`) in cents.
pub fn total_amount(items: &[LineItem]) -> Result<MoneyCents, EngineError> {
    let mut total = MoneyCents::ZERO;
    for item in items {
        total = total
            .checked_add(item.subtotal()?)
            .ok_or_else(|| EngineError::invalid_amount("basket total overflows"))?;
    }
    Ok(total)
}

/// Counts bonus stickers from promo lines.
///
/// The bonus is one per promo *line item*, not weighted by quantity.
fn promo_bonus(items: &[LineItem]) -> i64 {
    items
        .iter()
        .filter(|item| item.category == Category::Promo)
        .count() as i64
}

/// Calculates the stickers earned by a validated transaction.
pub fn calculate(items: &[LineItem]) -> Result<RewardBreakdown, EngineError> {
    let total = total_amount(items)?;
    let base_stickers = total.whole_major() / DOLLARS_PER_STICKER;
    let promo_bonus = promo_bonus(items);
    let raw_total = base_stickers + promo_bonus;
    let stickers_earned = raw_total.min(MAX_STICKERS_PER_TRANSACTION);

    Ok(RewardBreakdown {
        total_amount: total,
        base_stickers,
        promo_bonus,
        raw_total,
        stickers_earned,
        capped: raw_total > MAX_STICKERS_PER_TRANSACTION,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(cents: i64, quantity: i64, category: Category) -> LineItem {
        LineItem {
            sku: "SKU".to_string(),
            name: "Item".to_string(),
            quantity,
            unit_price: MoneyCents::new(cents),
            category,
        }
    }

    #[test]
    fn twenty_three_fifty_earns_two() {
        let breakdown = calculate(&[item(23_50, 1, Category::Grocery)]).unwrap();
        assert_eq!(breakdown.total_amount.cents(), 2350);
        assert_eq!(breakdown.raw_total, 2);
        assert_eq!(breakdown.stickers_earned, 2);
        assert!(!breakdown.capped);
    }

    #[test]
    fn promo_bonus_reaches_cap_without_capping() {
        // $47.00 + 1 promo line: base 4 + bonus 1 = exactly 5.
        let breakdown = calculate(&[
            item(42_00, 1, Category::Grocery),
            item(5_00, 1, Category::Promo),
        ])
        .unwrap();
        assert_eq!(breakdown.base_stickers, 4);
        assert_eq!(breakdown.promo_bonus, 1);
        assert_eq!(breakdown.raw_total, 5);
        assert_eq!(breakdown.stickers_earned, 5);
        assert!(!breakdown.capped);
    }

    #[test]
    fn cap_applies_over_five() {
        // $100.00 + 3 promo lines: raw 13, capped at 5.
        let breakdown = calculate(&[
            item(85_00, 1, Category::Electronics),
            item(5_00, 1, Category::Promo),
            item(5_00, 1, Category::Promo),
            item(5_00, 1, Category::Promo),
        ])
        .unwrap();
        assert_eq!(breakdown.total_amount.cents(), 100_00);
        assert_eq!(breakdown.raw_total, 13);
        assert_eq!(breakdown.stickers_earned, 5);
        assert!(breakdown.capped);
    }

    #[test]
    fn promo_bonus_ignores_quantity() {
        let breakdown = calculate(&[item(1_00, 4, Category::Promo)]).unwrap();
        assert_eq!(breakdown.promo_bonus, 1);
        assert_eq!(breakdown.stickers_earned, 1);
    }

    #[test]
    fn empty_spend_earns_nothing() {
        let breakdown = calculate(&[item(0, 1, Category::Other)]).unwrap();
        assert_eq!(breakdown.stickers_earned, 0);
        assert!(!breakdown.capped);
    }

    #[test]
    fn stickers_never_exceed_cap() {
        for dollars in [0, 9, 10, 49, 50, 51, 500] {
            let breakdown = calculate(&[item(dollars * 100, 1, Category::Grocery)]).unwrap();
            assert!(breakdown.stickers_earned >= 0);
            assert!(breakdown.stickers_earned <= MAX_STICKERS_PER_TRANSACTION);
            assert_eq!(
                breakdown.stickers_earned,
                breakdown.raw_total.min(MAX_STICKERS_PER_TRANSACTION)
            );
        }
    }
}

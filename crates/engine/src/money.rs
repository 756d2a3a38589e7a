use std::{
    fmt,
    ops::{Add, AddAssign, Sub, SubAssign},
};

use crate::EngineError;

/// Money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the engine (line prices,
/// basket totals) to avoid floating-point drift in the reward math.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(23_50);
/// assert_eq!(amount.cents(), 2350);
/// assert_eq!(amount.to_string(), "$23.50");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Converts a major-units amount (dollars, as submitted in JSON) to cents.
    ///
    /// Validation rules:
    /// - rejects NaN and infinities
    /// - rejects sub-cent precision (`12.345`)
    /// - rejects values outside the i64 cent range
    pub fn try_from_major(major: f64) -> Result<Self, EngineError> {
        if !major.is_finite() {
            return Err(EngineError::invalid_amount("amount must be a finite number"));
        }
        let cents = major * 100.0;
        let rounded = cents.round();
        if (cents - rounded).abs() > 1e-6 {
            return Err(EngineError::invalid_amount(
                "amount must not have more than 2 decimals",
            ));
        }
        if rounded.abs() >= i64::MAX as f64 {
            return Err(EngineError::invalid_amount("amount too large"));
        }
        Ok(Self(rounded as i64))
    }

    /// Number of whole major units (dollars), truncating cents.
    #[must_use]
    pub const fn whole_major(self) -> i64 {
        self.0 / 100
    }

    /// Formats the amount as a plain 2-decimal string, e.g. `"23.50"`.
    ///
    /// This is the wire format for `total_amount` fields.
    #[must_use]
    pub fn format_major(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{sign}{}.{:02}", abs / 100, abs % 100)
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    /// Checked multiplication by a unitless factor (quantity).
    #[must_use]
    pub fn checked_mul(self, factor: i64) -> Option<MoneyCents> {
        self.0.checked_mul(factor).map(MoneyCents)
    }
}

// MoneyCents crosses JSON columns as raw cents.
impl serde::Serialize for MoneyCents {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.cents())
    }
}

impl<'de> serde::Deserialize<'de> for MoneyCents {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <i64 as serde::Deserialize>::deserialize(deserializer).map(MoneyCents::new)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 + rhs.0)
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 += rhs.0;
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 - rhs.0)
    }
}

impl SubAssign for MoneyCents {
    fn sub_assign(&mut self, rhs: MoneyCents) {
        self.0 -= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_dollars() {
        assert_eq!(MoneyCents::new(0).to_string(), "$0.00");
        assert_eq!(MoneyCents::new(1).to_string(), "$0.01");
        assert_eq!(MoneyCents::new(10).to_string(), "$0.10");
        assert_eq!(MoneyCents::new(1050).to_string(), "$10.50");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-$10.50");
    }

    #[test]
    fn format_major_is_plain_two_decimals() {
        assert_eq!(MoneyCents::new(2350).format_major(), "23.50");
        assert_eq!(MoneyCents::new(5).format_major(), "0.05");
        assert_eq!(MoneyCents::new(10000).format_major(), "100.00");
    }

    #[test]
    fn try_from_major_accepts_two_decimals() {
        assert_eq!(MoneyCents::try_from_major(10.0).unwrap().cents(), 1000);
        assert_eq!(MoneyCents::try_from_major(10.5).unwrap().cents(), 1050);
        assert_eq!(MoneyCents::try_from_major(0.01).unwrap().cents(), 1);
        assert_eq!(MoneyCents::try_from_major(23.50).unwrap().cents(), 2350);
    }

    #[test]
    fn try_from_major_rejects_sub_cent_precision() {
        assert!(MoneyCents::try_from_major(12.345).is_err());
        assert!(MoneyCents::try_from_major(0.001).is_err());
    }

    #[test]
    fn try_from_major_rejects_non_finite() {
        assert!(MoneyCents::try_from_major(f64::NAN).is_err());
        assert!(MoneyCents::try_from_major(f64::INFINITY).is_err());
    }

    #[test]
    fn whole_major_truncates() {
        assert_eq!(MoneyCents::new(2350).whole_major(), 23);
        assert_eq!(MoneyCents::new(999).whole_major(), 9);
        assert_eq!(MoneyCents::new(1000).whole_major(), 10);
    }
}

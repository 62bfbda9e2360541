use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

/// The default settlement asset when an order does not specify one.
pub const DEFAULT_ASSET: &str = "USDT";
/// The stablecoins the gateway will reconcile against.
pub const SUPPORTED_ASSETS: [&str; 2] = ["USDT", "USDC"];

const MICRO_PER_UNIT: i64 = 1_000_000;

//--------------------------------------    AssetAmount     -----------------------------------------------------------
/// A stablecoin amount in micro-units (10⁻⁶ USDT/USDC).
///
/// Amount comparisons in the reconciliation engine are exact integer arithmetic; floating point
/// only appears at the edges, when coercing API payloads.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct AssetAmount(i64);

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as an asset amount: {0}")]
pub struct AssetAmountConversionError(String);

impl AssetAmount {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub const fn from_micro(micro: i64) -> Self {
        Self(micro)
    }

    pub fn from_units(units: i64) -> Self {
        Self(units * MICRO_PER_UNIT)
    }

    /// Coerce a floating point amount (as returned by the payment API) into micro-units, rounding
    /// to the nearest micro-unit.
    pub fn from_f64(value: f64) -> Self {
        Self((value * MICRO_PER_UNIT as f64).round() as i64)
    }

    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / MICRO_PER_UNIT as f64
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<i64> for AssetAmount {
    fn from(micro: i64) -> Self {
        Self(micro)
    }
}

impl TryFrom<u64> for AssetAmount {
    type Error = AssetAmountConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(AssetAmountConversionError(format!("{value} is too large")))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl PartialEq for AssetAmount {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for AssetAmount {}

impl Add for AssetAmount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for AssetAmount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for AssetAmount {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for AssetAmount {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for AssetAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl Display for AssetAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:06}", magnitude / MICRO_PER_UNIT as u64, magnitude % MICRO_PER_UNIT as u64)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(AssetAmount::from_units(10).value(), 10_000_000);
        assert_eq!(AssetAmount::from_f64(9.4).value(), 9_400_000);
        assert_eq!(AssetAmount::from_f64(0.4999).value(), 499_900);
        assert_eq!(AssetAmount::from_f64(0.5).value(), 500_000);
        assert_eq!(AssetAmount::from_f64(10.0).to_f64(), 10.0);
    }

    #[test]
    fn arithmetic() {
        let expected = AssetAmount::from_units(10);
        let paid = AssetAmount::from_f64(9.4);
        let diff = paid - expected;
        assert_eq!(diff.value(), -600_000);
        assert_eq!(diff.abs().value(), 600_000);
        assert_eq!((-diff).value(), 600_000);
    }

    #[test]
    fn display_six_decimals() {
        assert_eq!(AssetAmount::from_units(10).to_string(), "10.000000");
        assert_eq!(AssetAmount::from_f64(0.6).to_string(), "0.600000");
        assert_eq!(AssetAmount::from(-600_000i64).to_string(), "-0.600000");
        assert_eq!(AssetAmount::default().to_string(), "0.000000");
    }

    #[test]
    fn strict_threshold_band() {
        let threshold = AssetAmount::from_f64(0.5);
        let expected = AssetAmount::from_units(10);
        assert!((AssetAmount::from_f64(10.4999) - expected).abs() < threshold);
        assert!((AssetAmount::from_f64(10.5) - expected).abs() >= threshold);
        assert!((AssetAmount::from_f64(9.5) - expected).abs() >= threshold);
    }
}

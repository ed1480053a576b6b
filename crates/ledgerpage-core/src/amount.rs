//! Fixed-point token amounts.
//!
//! The ledger stores every amount as an unsigned integer scaled by
//! 10^[`DECIMALS`]. Conversion to and from the display form goes through
//! [`rust_decimal::Decimal`] so no value ever passes through a float, and
//! rendered text always carries exactly [`DECIMALS`] fractional digits.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// Number of fractional digits carried by ledger amounts.
pub const DECIMALS: u32 = 8;

/// 10^DECIMALS.
const SCALE: u64 = 100_000_000;

/// Converts a raw fixed-point integer into its decimal value.
pub fn to_display(raw: u64) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(raw), DECIMALS)
}

/// Converts a decimal value into the raw fixed-point integer, rounding
/// half away from zero.
///
/// # Errors
///
/// Returns an error for negative values and values that overflow `u64`.
pub fn to_raw(display: Decimal) -> Result<u64, Error> {
    let invalid = |reason: &str| -> Error {
        InvalidInputError::Amount {
            value: display.to_string(),
            reason: reason.to_string(),
        }
        .into()
    };

    let scaled = display
        .checked_mul(Decimal::from(SCALE))
        .ok_or_else(|| invalid("out of range"))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    if scaled.is_sign_negative() && !scaled.is_zero() {
        return Err(invalid("must not be negative"));
    }

    scaled.abs().to_u64().ok_or_else(|| invalid("out of range"))
}

/// A token amount in raw fixed-point units.
///
/// # Example
///
/// ```
/// use ledgerpage_core::TokenAmount;
///
/// let smallest = TokenAmount::from_raw(1);
/// assert_eq!(smallest.to_string(), "0.00000001");
///
/// let parsed: TokenAmount = "12.5".parse().unwrap();
/// assert_eq!(parsed.raw(), 1_250_000_000);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenAmount(u64);

impl TokenAmount {
    /// The zero amount.
    pub const ZERO: TokenAmount = TokenAmount(0);

    /// Wrap a raw fixed-point integer.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Build an amount from its decimal value.
    pub fn from_display(display: Decimal) -> Result<Self, Error> {
        to_raw(display).map(Self)
    }

    /// Returns the raw fixed-point integer.
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Returns the decimal value.
    pub fn to_display(self) -> Decimal {
        to_display(self.0)
    }

    pub fn checked_add(self, other: TokenAmount) -> Option<TokenAmount> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn saturating_add(self, other: TokenAmount) -> TokenAmount {
        Self(self.0.saturating_add(other.0))
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Decimal keeps the scale it was built with, so this is always
        // plain text with DECIMALS fractional digits.
        write!(f, "{}", self.to_display())
    }
}

impl FromStr for TokenAmount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let display = Decimal::from_str(s.trim()).map_err(|e| InvalidInputError::Amount {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_display(display)
    }
}

impl From<u64> for TokenAmount {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl Sum for TokenAmount {
    fn sum<I: Iterator<Item = TokenAmount>>(iter: I) -> Self {
        iter.fold(TokenAmount::ZERO, TokenAmount::saturating_add)
    }
}

impl<'a> Sum<&'a TokenAmount> for TokenAmount {
    fn sum<I: Iterator<Item = &'a TokenAmount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

//! Value types shared across the session machine: monetary amounts and the
//! names of the fields they are parsed from.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::{SessionError, SessionResult};

/// Which input an amount was parsed from. Used to word validation errors.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountField {
    BuyIn,
    Balance,
}

impl fmt::Display for AmountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::BuyIn => "buy-in amount",
            Self::Balance => "balance",
        };
        write!(f, "{repr}")
    }
}

/// A monetary amount in dollars.
///
/// Amounts carry no currency scaling: whatever decimal the players typed is
/// what gets stored and displayed. Display mimics how a float is usually
/// echoed back to people, so whole values keep one decimal (`60.0`) and
/// fractional values print as typed (`12.5`).
///
/// Settlement works in whole cents: [`Amount::to_cents`] rounds half away
/// from zero, so `0.005` settles as one cent while the balance table still
/// shows `0.005`. Parsed amounts are limited to [`Amount::MAX_ABS`] dollars
/// so their cents, and sums of them, fit comfortably in an `i64`.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
    pub const ZERO: Self = Self(0.0);

    /// Largest magnitude, in dollars, that parsing accepts.
    pub const MAX_ABS: f64 = 1e13;

    /// Parse a buy-in. Must be a finite number strictly greater than zero.
    pub fn parse_buy_in(raw: &str) -> SessionResult<Self> {
        let amount = Self::parse(raw, AmountField::BuyIn)?;
        if amount.0 > 0.0 {
            Ok(amount)
        } else {
            Err(SessionError::Validation {
                field: AmountField::BuyIn,
                input: raw.trim().to_string(),
            })
        }
    }

    /// Parse a final balance. Any finite number is accepted, negatives included.
    pub fn parse_balance(raw: &str) -> SessionResult<Self> {
        Self::parse(raw, AmountField::Balance)
    }

    fn parse(raw: &str, field: AmountField) -> SessionResult<Self> {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() && value.abs() <= Self::MAX_ABS => Ok(Self(value)),
            _ => Err(SessionError::Validation {
                field,
                input: trimmed.to_string(),
            }),
        }
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Rounded to whole cents (half away from zero) for settlement
    /// arithmetic. Saturates at the `i64` bounds.
    #[must_use]
    pub fn to_cents(self) -> i64 {
        (self.0 * 100.0).round() as i64
    }

    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(cents as f64 / 100.0)
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        // Beyond 1e16 every f64 is integral and `{:.1}` would print a wall
        // of digits.
        if value.fract() == 0.0 && value.abs() < 1e16 {
            write!(f, "{value:.1}")
        } else {
            write!(f, "{value}")
        }
    }
}

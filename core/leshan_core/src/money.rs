//! Fixed-point money.
//!
//! Amounts are kept as whole cents in an `i64`. User input arrives as text
//! (`"50"`, `"20.5"`) and is parsed exactly, without going through floating
//! point or rounding, so cumulative totals never drift.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{CoreError, Result};

/// A non-negative amount of money in cents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_cents(cents: i64) -> Self {
        Amount(cents)
    }

    pub const fn from_yuan(yuan: i64) -> Self {
        Amount(yuan * 100)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Parse a user-entered decimal string.
    ///
    /// Accepts surrounding whitespace and an optional fractional part of at
    /// most two significant digits (`"1.500"` is fine, `"1.125"` is not), so
    /// a parsed amount is always exactly what was typed. Empty, signed,
    /// non-numeric, sub-cent or zero values are rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || CoreError::InvalidAmount(raw.to_string());
        let text = raw.trim();

        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, f)) => (i, f),
            None => (text, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(invalid());
        }

        let yuan: i64 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| invalid())?
        };

        let frac = frac_part.as_bytes();
        if frac.iter().skip(2).any(|&b| b != b'0') {
            return Err(invalid());
        }
        let digit = |i: usize| frac.get(i).map(|b| i64::from(b - b'0')).unwrap_or(0);
        let cents = digit(0) * 10 + digit(1);

        let total = yuan
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .ok_or_else(invalid)?;
        if total == 0 {
            return Err(invalid());
        }
        Ok(Amount(total))
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// `part / whole` as a whole percentage, rounded.
    pub fn percent_of(self, whole: Amount) -> u32 {
        if whole.0 <= 0 {
            return 0;
        }
        let pct = (self.0 as i128 * 100 * 2 + whole.0 as i128) / (whole.0 as i128 * 2);
        pct.clamp(0, u32::MAX as i128) as u32
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.trim() == "0" || raw.trim() == "0.00" {
            return Ok(Amount::ZERO);
        }
        Amount::parse(&raw).map_err(serde::de::Error::custom)
    }
}

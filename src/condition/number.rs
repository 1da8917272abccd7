//! Precision-preserving numeric values for condition comparisons
//!
//! Every number that takes part in a comparison, whether it came from a
//! literal in the condition text or from a recorded response, is converted
//! into an [`OhmageNumber`] first. Comparisons are then done on exact
//! arbitrary-precision decimals, so `0.1` and `0.10` compare equal, long
//! literals are never rounded and there are no binary floating-point
//! artifacts.

use crate::error::{ConditionError, Result};
use bigdecimal::{BigDecimal, FromPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Largest number of digits a value may carry on either side of the point
const MAX_SCALE: i64 = 4096;

/// Decimal number used for all condition comparisons
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OhmageNumber(BigDecimal);

impl OhmageNumber {
    #[inline]
    pub fn new(value: BigDecimal) -> Self {
        Self(value)
    }

    /// Parse a decimal literal
    ///
    /// Accepts an optional sign, a bare leading or trailing point (`.5`,
    /// `5.`) and scientific notation (`1.5e3`).
    pub fn parse(text: &str) -> Result<Self> {
        let malformed = |reason: &dyn fmt::Display| {
            ConditionError::MalformedNumber(format!("{}: {}", text.trim(), reason))
        };

        let canonical = canonicalize(text.trim());
        let value = BigDecimal::from_str(&canonical).map_err(|e| malformed(&e))?;

        let (_, scale) = value.as_bigint_and_exponent();
        if scale.abs() > MAX_SCALE {
            return Err(malformed(&format!(
                "more than {} digits around the decimal point",
                MAX_SCALE
            )));
        }
        Ok(Self(value))
    }

    /// Convert a float through its shortest decimal representation
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(ConditionError::MalformedNumber(value.to_string()));
        }
        // `to_string` gives the shortest round-trip form, which avoids
        // dragging binary noise (0.1 -> 0.1000000000000000055...) along.
        Self::parse(&value.to_string()).or_else(|_| {
            BigDecimal::from_f64(value)
                .map(Self)
                .ok_or_else(|| ConditionError::MalformedNumber(value.to_string()))
        })
    }

    /// Convert a JSON number without going through `f64` when possible
    pub fn from_json(number: &serde_json::Number) -> Result<Self> {
        if let Some(i) = number.as_i64() {
            return Ok(Self::from(i));
        }
        if let Some(u) = number.as_u64() {
            return Ok(Self(BigDecimal::from(u)));
        }
        Self::parse(&number.to_string())
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn value(&self) -> &BigDecimal {
        &self.0
    }

    #[inline]
    pub fn compare_to(&self, other: &OhmageNumber) -> Ordering {
        self.0.cmp(&other.0)
    }
}

/// Rewrite `+.5e2` style literals into a form every decimal parser takes
fn canonicalize(text: &str) -> String {
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(at) => text.split_at(at),
        None => (text, ""),
    };
    let (sign, digits) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa.strip_prefix('+').unwrap_or(mantissa)),
    };
    let digits = digits.strip_suffix('.').unwrap_or(digits);
    let lead = if digits.starts_with('.') { "0" } else { "" };
    format!("{}{}{}{}", sign, lead, digits, exponent)
}

impl Default for OhmageNumber {
    fn default() -> Self {
        Self(BigDecimal::zero())
    }
}

impl From<i64> for OhmageNumber {
    fn from(value: i64) -> Self {
        Self(BigDecimal::from(value))
    }
}

impl From<i32> for OhmageNumber {
    fn from(value: i32) -> Self {
        Self(BigDecimal::from(value))
    }
}

impl From<BigDecimal> for OhmageNumber {
    fn from(value: BigDecimal) -> Self {
        Self(value)
    }
}

impl FromStr for OhmageNumber {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for OhmageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalized())
    }
}

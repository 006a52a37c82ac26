//! Fixed-point numbers for attribute values.
//!
//! Every number the engine touches is a real value scaled by [`Fixed::SCALE`]:
//! `2.5` is stored as `250`. Comparisons work on the raw integers directly,
//! and all rescaling for multiplication and division lives here.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A real number stored as an integer scaled by 100.
///
/// ## Example
///
/// ```
/// use tabletop_effects::core::Fixed;
///
/// let half = "2.5".parse::<Fixed>().unwrap();
/// assert_eq!(half.raw(), 250);
///
/// // Multiplying two scaled values rescales once.
/// let doubled = half.checked_mul(Fixed::from_int(2)).unwrap();
/// assert_eq!(doubled, Fixed::from_int(5));
/// assert_eq!(doubled.to_string(), "5");
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Fixed(i64);

impl Fixed {
    /// Scale factor between the stored integer and the real value.
    pub const SCALE: i64 = 100;

    /// Number of decimal digits the scale can represent.
    pub const FRACTION_DIGITS: usize = 2;

    /// Zero.
    pub const ZERO: Fixed = Fixed(0);

    /// One (raw 100).
    pub const ONE: Fixed = Fixed(Self::SCALE);

    /// Wrap an already-scaled integer.
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Scale a whole number.
    ///
    /// Saturates at the `i64` range.
    #[must_use]
    pub const fn from_int(value: i64) -> Self {
        Self(value.saturating_mul(Self::SCALE))
    }

    /// The stored integer.
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Whole part, truncated toward zero.
    #[must_use]
    pub const fn trunc(self) -> i64 {
        self.0 / Self::SCALE
    }

    /// Check for zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    #[must_use]
    pub fn checked_add(self, rhs: Fixed) -> Option<Fixed> {
        self.0.checked_add(rhs.0).map(Fixed)
    }

    /// Checked subtraction.
    #[must_use]
    pub fn checked_sub(self, rhs: Fixed) -> Option<Fixed> {
        self.0.checked_sub(rhs.0).map(Fixed)
    }

    /// Checked multiplication, rescaled so the result keeps one factor of
    /// [`Self::SCALE`]. Truncates toward zero.
    #[must_use]
    pub fn checked_mul(self, rhs: Fixed) -> Option<Fixed> {
        let product = i128::from(self.0) * i128::from(rhs.0) / i128::from(Self::SCALE);
        i64::try_from(product).ok().map(Fixed)
    }

    /// Checked division. `None` on a zero divisor or overflow.
    /// Truncates toward zero.
    #[must_use]
    pub fn checked_div(self, rhs: Fixed) -> Option<Fixed> {
        if rhs.is_zero() {
            return None;
        }
        let quotient = i128::from(self.0) * i128::from(Self::SCALE) / i128::from(rhs.0);
        i64::try_from(quotient).ok().map(Fixed)
    }
}

impl From<bool> for Fixed {
    fn from(value: bool) -> Self {
        if value {
            Fixed::ONE
        } else {
            Fixed::ZERO
        }
    }
}

impl std::fmt::Display for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = Self::SCALE.unsigned_abs();
        let whole = abs / scale;
        let frac = abs % scale;

        if frac == 0 {
            write!(f, "{sign}{whole}")
        } else if frac % 10 == 0 {
            write!(f, "{sign}{whole}.{}", frac / 10)
        } else {
            write!(f, "{sign}{whole}.{frac:02}")
        }
    }
}

impl std::str::FromStr for Fixed {
    type Err = ParseError;

    /// Parse `-?\d+(\.\d{1,2})?` into a scaled value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidLiteral(s.to_string());

        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (whole, frac) = match body.split_once('.') {
            Some((whole, frac)) => (whole, Some(frac)),
            None => (body, None),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let mut raw: i64 = whole
            .parse::<i64>()
            .ok()
            .and_then(|w| w.checked_mul(Self::SCALE))
            .ok_or_else(invalid)?;

        if let Some(frac) = frac {
            if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            if frac.len() > Self::FRACTION_DIGITS {
                return Err(ParseError::TooManyFractionDigits(s.to_string()));
            }
            let digits: i64 = frac.parse().map_err(|_| invalid())?;
            let frac_raw = if frac.len() == 1 { digits * 10 } else { digits };
            raw = raw.checked_add(frac_raw).ok_or_else(invalid)?;
        }

        Ok(Fixed(if negative { -raw } else { raw }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integers_are_scaled() {
        assert_eq!("5".parse::<Fixed>().unwrap().raw(), 500);
        assert_eq!("-3".parse::<Fixed>().unwrap().raw(), -300);
        assert_eq!("0".parse::<Fixed>().unwrap(), Fixed::ZERO);
    }

    #[test]
    fn test_parse_decimals() {
        assert_eq!("2.5".parse::<Fixed>().unwrap().raw(), 250);
        assert_eq!("2.05".parse::<Fixed>().unwrap().raw(), 205);
        assert_eq!("-0.75".parse::<Fixed>().unwrap().raw(), -75);
    }

    #[test]
    fn test_parse_rejects_extra_precision() {
        assert_eq!(
            "1.234".parse::<Fixed>(),
            Err(ParseError::TooManyFractionDigits("1.234".into()))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "-", "1.", ".5", "1e3", "+4", "1.2.3", "abc", "99999999999999999999"] {
            assert!(
                matches!(bad.parse::<Fixed>(), Err(ParseError::InvalidLiteral(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!(Fixed::from_raw(500).to_string(), "5");
        assert_eq!(Fixed::from_raw(250).to_string(), "2.5");
        assert_eq!(Fixed::from_raw(205).to_string(), "2.05");
        assert_eq!(Fixed::from_raw(-5).to_string(), "-0.05");
        assert_eq!(Fixed::from_raw(-250).to_string(), "-2.5");
        assert_eq!(Fixed::ZERO.to_string(), "0");
    }

    #[test]
    fn test_mul_rescales_once() {
        let a = Fixed::from_int(3);
        let b = "1.5".parse::<Fixed>().unwrap();
        assert_eq!(a.checked_mul(b), Some(Fixed::from_raw(450)));
    }

    #[test]
    fn test_div_rescales() {
        let a = Fixed::from_int(10);
        let b = Fixed::from_int(4);
        assert_eq!(a.checked_div(b), Some(Fixed::from_raw(250)));
        assert_eq!(a.checked_div(Fixed::ZERO), None);
    }

    #[test]
    fn test_overflow_is_detected() {
        let big = Fixed::from_raw(i64::MAX);
        assert_eq!(big.checked_add(Fixed::ONE), None);
        assert_eq!(big.checked_mul(Fixed::from_int(2)), None);
        assert_eq!(big.checked_div(Fixed::from_raw(1)), None);
    }

    #[test]
    fn test_trunc() {
        assert_eq!(Fixed::from_raw(399).trunc(), 3);
        assert_eq!(Fixed::from_raw(-399).trunc(), -3);
    }
}

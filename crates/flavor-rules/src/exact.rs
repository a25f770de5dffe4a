use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// Exact rational value backed by arbitrary precision integers.
///
/// The value is always kept in lowest terms. Floating point views are derived
/// on demand and never written back.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Exact(BigRational);

impl Exact {
    /// Builds a reduced fraction from integer numerator and denominator.
    ///
    /// Returns `None` when `den` is zero.
    pub fn from_integers(num: i64, den: i64) -> Option<Self> {
        if den == 0 {
            return None;
        }
        Some(Self(BigRational::new(BigInt::from(num), BigInt::from(den))))
    }

    /// Builds an integer valued fraction.
    pub fn integer(value: i64) -> Self {
        Self(BigRational::from_integer(BigInt::from(value)))
    }

    /// Underlying rational.
    pub fn ratio(&self) -> &BigRational {
        &self.0
    }

    /// Reduced numerator (carries the sign).
    pub fn numerator(&self) -> &BigInt {
        self.0.numer()
    }

    /// Reduced denominator (always positive).
    pub fn denominator(&self) -> &BigInt {
        self.0.denom()
    }

    /// Whether the fraction is negative.
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Adds two exact values.
    pub fn add(&self, other: &Exact) -> Self {
        Self(&self.0 + &other.0)
    }

    /// Divides by another exact value, returning `None` for a zero divisor.
    pub fn checked_div(&self, other: &Exact) -> Option<Self> {
        if other.0.is_zero() {
            return None;
        }
        Some(Self(&self.0 / &other.0))
    }

    /// Nearest `f64`. Only used for comparison and display.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }
}

impl fmt::Display for Exact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.denom().is_one() {
            write!(f, "{}", self.0.numer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}

impl FromStr for Exact {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let ratio = match trimmed.split_once('/') {
            Some((num, den)) => {
                let num: BigInt = num.trim().parse().map_err(|_| format!("bad numerator in '{s}'"))?;
                let den: BigInt = den.trim().parse().map_err(|_| format!("bad denominator in '{s}'"))?;
                if den.is_zero() {
                    return Err(format!("zero denominator in '{s}'"));
                }
                BigRational::new(num, den)
            }
            None => {
                let num: BigInt = trimmed.parse().map_err(|_| format!("bad integer '{s}'"))?;
                BigRational::from_integer(num)
            }
        };
        Ok(Self(ratio))
    }
}

impl Serialize for Exact {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Exact {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduces_to_lowest_terms() {
        let value = Exact::from_integers(48, 8).unwrap();
        assert_eq!(value.to_string(), "6");
        let value = Exact::from_integers(10, -13).unwrap();
        assert_eq!(value.to_string(), "-10/13");
        assert!(value.is_negative());
    }

    #[test]
    fn zero_denominator_is_rejected() {
        assert!(Exact::from_integers(1, 0).is_none());
        assert!("1/0".parse::<Exact>().is_err());
    }

    #[test]
    fn parses_display_form() {
        let value: Exact = "38/169".parse().unwrap();
        assert_eq!(value, Exact::from_integers(38, 169).unwrap());
        let value: Exact = "137".parse().unwrap();
        assert_eq!(value, Exact::integer(137));
    }
}

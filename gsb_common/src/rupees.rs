use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Sub},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

pub const INR_CURRENCY_CODE: &str = "INR";
pub const INR_CURRENCY_CODE_LOWER: &str = "inr";

//--------------------------------------      Rupees       -----------------------------------------------------------
/// An amount of Indian rupees, stored as an integral number of paise (minor currency units).
///
/// All arithmetic is exact integer arithmetic on paise. Amounts serialize to JSON as decimal rupees
/// (`1050` paise becomes `10.5`), which is the representation the storefront and the invoice renderer use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Type)]
#[sqlx(transparent)]
pub struct Rupees(i64);

impl Add for Rupees {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Rupees {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Rupees {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul<i64> for Rupees {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Sum for Rupees {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in paise: {0}")]
pub struct RupeesConversionError(pub String);

impl Rupees {
    pub const fn from_paise(paise: i64) -> Self {
        Self(paise)
    }

    pub const fn from_rupees(rupees: i64) -> Self {
        Self(rupees * 100)
    }

    /// The amount as a whole number of paise.
    pub fn paise(&self) -> i64 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Converts a decimal rupee amount (e.g. `10.5`) into paise, rounding to the nearest paisa.
    pub fn try_from_decimal(rupees: f64) -> Result<Self, RupeesConversionError> {
        if !rupees.is_finite() {
            return Err(RupeesConversionError(format!("{rupees} is not a finite amount")));
        }
        let paise = (rupees * 100.0).round();
        if paise.abs() > i64::MAX as f64 {
            return Err(RupeesConversionError(format!("{rupees} is too large an amount")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(paise as i64))
    }

    /// The amount as decimal rupees. Only use this for serialization and display; arithmetic stays in paise.
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// A plain `"1234.50"` rendering without the currency sign, suitable for documents that cannot
    /// encode the rupee glyph.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let paise = self.0.abs();
        format!("{sign}{}.{:02}", paise / 100, paise % 100)
    }
}

impl Display for Rupees {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "₹{}", self.to_decimal_string())
    }
}

impl FromStr for Rupees {
    type Err = RupeesConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('₹');
        let value = trimmed.parse::<f64>().map_err(|e| RupeesConversionError(format!("{s}: {e}")))?;
        Self::try_from_decimal(value)
    }
}

impl Serialize for Rupees {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Rupees {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Rupees::try_from_decimal(value).map_err(serde::de::Error::custom)
    }
}

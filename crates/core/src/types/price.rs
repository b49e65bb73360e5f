//! Fixed-point price representation.
//!
//! Prices are decimal amounts in the shop's single currency. They are never
//! converted to floating point: parsing, comparison, and cart arithmetic all
//! happen on [`Decimal`].

use core::fmt;
use core::iter::Sum;
use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("not a decimal number: {0:?}")]
    Invalid(String),
}

/// A price in the shop currency.
///
/// Serializes as a decimal string (`"19.99"`) so no precision is lost on the
/// wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);
    /// The largest representable price.
    pub const MAX: Self = Self(Decimal::MAX);
    /// The smallest (most negative) representable price.
    pub const MIN: Self = Self(Decimal::MIN);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Parse a price from text such as `"19.99"`, `"-1"` or `"1e3"`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Invalid`] if the text is not a decimal number.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .map(Self)
            .map_err(|_| PriceError::Invalid(s.to_owned()))
    }

    /// Parse a range bound such as a search filter limit.
    ///
    /// Accepts everything [`parse`](Self::parse) does, plus numbers beyond the
    /// decimal range and `inf`/`infinity` (any case, optional sign). Those
    /// saturate to [`Price::MAX`] or [`Price::MIN`]. `NaN` is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Invalid`] if the text is not a number.
    pub fn parse_bound(s: &str) -> Result<Self, PriceError> {
        if let Ok(price) = Self::parse(s) {
            return Ok(price);
        }

        let value: f64 = s.parse().map_err(|_| PriceError::Invalid(s.to_owned()))?;
        if value.is_nan() {
            return Err(PriceError::Invalid(s.to_owned()));
        }

        Ok(Decimal::from_f64(value).map_or_else(
            || {
                if value.is_sign_negative() {
                    Self::MIN
                } else {
                    Self::MAX
                }
            },
            Self,
        ))
    }

    /// The total for `quantity` units at this price.
    ///
    /// Negative quantities produce negative totals.
    #[must_use]
    pub fn line_total(self, quantity: i32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, p| Self(acc.0.saturating_add(p.0)))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

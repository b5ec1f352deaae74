//! Value Objects for the storefront

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_CURRENCY: &str = "INR";

/// Decimal places of the minor unit; prices never carry more.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Whether `amount` is expressible in whole minor units.
pub fn fits_minor_unit(amount: Decimal) -> bool { amount.normalize().scale() <= MINOR_UNIT_SCALE }

/// Money value object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money { amount: Decimal, currency: String }

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self { Self { amount, currency: currency.to_string() } }
    pub fn inr(amount: Decimal) -> Self { Self::new(amount, DEFAULT_CURRENCY) }
    pub fn zero(currency: &str) -> Self { Self::new(Decimal::ZERO, currency) }
    pub fn amount(&self) -> Decimal { self.amount }
    pub fn currency(&self) -> &str { &self.currency }
    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency { return Err(MoneyError::CurrencyMismatch); }
        let amount = self.amount.checked_add(other.amount).ok_or(MoneyError::Overflow)?;
        Ok(Money::new(amount, &self.currency))
    }
    pub fn multiply(&self, qty: u32) -> Result<Money, MoneyError> {
        let amount = self.amount.checked_mul(Decimal::from(qty)).ok_or(MoneyError::Overflow)?;
        Ok(Money::new(amount, &self.currency))
    }

    /// Rounds to the minor unit, half away from zero.
    pub fn rounded(&self) -> Money {
        Money::new(self.amount.round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero), &self.currency)
    }

    /// True when both amounts agree once rounded to the minor unit.
    pub fn same_minor_amount(&self, other: &Money) -> bool {
        self.currency == other.currency && self.rounded().amount == other.rounded().amount
    }

    /// Amount in the currency's minor unit (paise for INR), rounded half away from zero.
    pub fn to_minor_units(&self) -> Result<i64, MoneyError> {
        let minor = self.rounded().amount.checked_mul(Decimal::ONE_HUNDRED).ok_or(MoneyError::Overflow)?;
        if minor <= Decimal::ZERO { return Err(MoneyError::NotPositive); }
        minor.to_i64().ok_or(MoneyError::Overflow)
    }
}

impl Default for Money { fn default() -> Self { Self::zero(DEFAULT_CURRENCY) } }

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{} {}", self.amount, self.currency) }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum MoneyError { CurrencyMismatch, NotPositive, Overflow }
impl std::error::Error for MoneyError {}
impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CurrencyMismatch => write!(f, "Currency mismatch"),
            Self::NotPositive => write!(f, "Amount must be positive"),
            Self::Overflow => write!(f, "Amount out of range"),
        }
    }
}

/// Quantity value object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    /// Line quantities are at least one.
    pub fn new(value: i64) -> Option<Self> {
        u32::try_from(value).ok().filter(|v| *v >= 1).map(Self)
    }
    pub fn value(&self) -> u32 { self.0 }
}

/// Star rating of a review, 1 to 5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: i32) -> Result<Self, RatingError> {
        match value {
            1..=5 => Ok(Self(value as u8)),
            _ => Err(RatingError(value)),
        }
    }
    pub fn value(&self) -> u8 { self.0 }
}

impl TryFrom<i32> for Rating {
    type Error = RatingError;
    fn try_from(value: i32) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<Rating> for i32 { fn from(r: Rating) -> Self { r.0 as i32 } }

#[derive(Debug, Clone, PartialEq, Eq)] pub struct RatingError(pub i32);
impl std::error::Error for RatingError {}
impl fmt::Display for RatingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Rating must be between 1 and 5, got {}", self.0) }
}

//! Money types with precise decimal arithmetic
//!
//! This module provides a type-safe representation of monetary values
//! using rust_decimal, so cent rounding and conservation checks are exact
//! rather than subject to floating-point drift.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;

/// Number of minor digits carried by every supported currency
pub const CENT_PLACES: u32 = 2;

/// Tolerance used for "effectively zero" and "sums match" comparisons
pub const EPSILON: Decimal = dec!(0.01);

/// Currency codes following ISO 4217
///
/// Only currencies with two minor digits are supported; the settlement
/// arithmetic works in cents throughout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    CHF,
    INR,
    AUD,
    CAD,
    SGD,
    HKD,
}

impl Currency {
    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::CHF => "CHF",
            Currency::INR => "₹",
            Currency::AUD => "A$",
            Currency::CAD => "C$",
            Currency::SGD => "S$",
            Currency::HKD => "HK$",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::CHF => "CHF",
            Currency::INR => "INR",
            Currency::AUD => "AUD",
            Currency::CAD => "CAD",
            Currency::SGD => "SGD",
            Currency::HKD => "HKD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "CHF" => Ok(Currency::CHF),
            "INR" => Ok(Currency::INR),
            "AUD" => Ok(Currency::AUD),
            "CAD" => Ok(Currency::CAD),
            "SGD" => Ok(Currency::SGD),
            "HKD" => Ok(Currency::HKD),
            other => Err(MoneyError::UnknownCurrency(other.to_string())),
        }
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Overflow during calculation")]
    Overflow,
}

/// A monetary amount with associated currency
///
/// Amounts keep up to 4 decimal places internally so intermediate results
/// (percentages of a total, running sums) can be carried before the final
/// rounding pass to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp(4),
            currency,
        }
    }

    /// Creates Money from an integer amount in cents
    pub fn from_minor(minor_units: i64, currency: Currency) -> Self {
        Self::new(Decimal::new(minor_units, CENT_PLACES), currency)
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the amount in whole cents, rounding half away from zero
    pub fn to_minor(&self) -> Result<i64, MoneyError> {
        self.round_to_cents()
            .amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|minor| minor.trunc().to_i64())
            .ok_or(MoneyError::Overflow)
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Returns true if the amount is within `EPSILON` of zero
    pub fn is_negligible(&self) -> bool {
        self.amount.abs() <= EPSILON
    }

    /// Returns true if both amounts share a currency and differ by at most `EPSILON`
    pub fn approx_eq(&self, other: &Money) -> bool {
        self.currency == other.currency && (self.amount - other.amount).abs() <= EPSILON
    }

    /// Returns the absolute value
    pub fn abs(&self) -> Self {
        Self {
            amount: self.amount.abs(),
            currency: self.currency,
        }
    }

    /// Rounds to whole cents, half away from zero
    pub fn round_to_cents(&self) -> Self {
        Self {
            amount: round_cents(self.amount),
            currency: self.currency,
        }
    }

    /// Returns true if the amount carries no digits beyond whole cents
    pub fn is_whole_cents(&self) -> bool {
        self.amount == round_cents(self.amount)
    }

    /// Allocates the money into n parts that differ by at most one cent
    ///
    /// Each part starts at the floor of `amount / n` in cents; the leftover
    /// cents go one at a time to the first parts, so the parts always sum
    /// back to the original amount.
    pub fn allocate(&self, n: u32) -> Result<Vec<Money>, MoneyError> {
        if n == 0 {
            return Err(MoneyError::InvalidAmount("Cannot allocate to zero parts".to_string()));
        }
        if self.is_negative() {
            return Err(MoneyError::InvalidAmount(format!(
                "Cannot allocate a negative amount: {}",
                self.amount
            )));
        }

        let total_minor = self.to_minor()?;
        let parts = i64::from(n);
        let base_amount = total_minor / parts;
        let remainder = total_minor % parts;

        let allocations = (0..parts)
            .map(|i| {
                let minor = if i < remainder { base_amount + 1 } else { base_amount };
                Money::from_minor(minor, self.currency)
            })
            .collect();

        Ok(allocations)
    }

    /// Splits the money in proportion to `weights`, in whole cents
    ///
    /// Each part starts at the floor of its exact proportional amount. The
    /// leftover cents go one at a time to the parts with the largest
    /// remainders, earlier parts first on ties, so the parts always sum back
    /// to the original amount.
    pub fn apportion(&self, weights: &[Decimal]) -> Result<Vec<Money>, MoneyError> {
        if self.is_negative() {
            return Err(MoneyError::InvalidAmount(format!(
                "Cannot apportion a negative amount: {}",
                self.amount
            )));
        }
        if let Some(weight) = weights.iter().find(|w| w.is_sign_negative() && !w.is_zero()) {
            return Err(MoneyError::InvalidAmount(format!("Negative weight: {}", weight)));
        }

        let weight_total = weights
            .iter()
            .try_fold(Decimal::ZERO, |acc, w| acc.checked_add(*w))
            .ok_or(MoneyError::Overflow)?;
        if weight_total.is_zero() {
            return Err(MoneyError::InvalidAmount("Weights must not all be zero".to_string()));
        }

        let total_minor = self.to_minor()?;
        let total = Decimal::from(total_minor);

        let mut floors = Vec::with_capacity(weights.len());
        let mut remainders = Vec::with_capacity(weights.len());
        for weight in weights {
            let exact = total
                .checked_mul(*weight)
                .and_then(|v| v.checked_div(weight_total))
                .ok_or(MoneyError::Overflow)?;
            let floor = exact.floor();
            floors.push(floor.to_i64().ok_or(MoneyError::Overflow)?);
            remainders.push(exact - floor);
        }

        let leftover = total_minor - floors.iter().sum::<i64>();
        let leftover = usize::try_from(leftover).map_err(|_| MoneyError::Overflow)?;

        let mut order: Vec<usize> = (0..weights.len()).collect();
        // sort_by is stable
        order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]));
        for &index in order.iter().take(leftover) {
            floors[index] += 1;
        }

        Ok(floors
            .into_iter()
            .map(|minor| Money::from_minor(minor, self.currency))
            .collect())
    }
}

/// Rounds a decimal to whole cents, half away from zero
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CENT_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.dp$}",
            self.currency.symbol(),
            self.amount,
            dp = CENT_PLACES as usize
        )
    }
}

impl PartialOrd for Money {
    /// Amounts in different currencies are not comparable
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        if self.currency != other.currency {
            return None;
        }
        Some(self.amount.cmp(&other.amount))
    }
}

// The operator impls require matching currencies

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        debug_assert_eq!(self.currency, other.currency, "Currency mismatch in Money::add");
        Self::new(self.amount + other.amount, self.currency)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        debug_assert_eq!(self.currency, other.currency, "Currency mismatch in Money::sub");
        Self::new(self.amount - other.amount, self.currency)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.amount, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_creation() {
        let m = Money::new(dec!(100.50), Currency::USD);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.currency(), Currency::USD);
    }

    #[test]
    fn test_money_from_minor() {
        let m = Money::from_minor(10050, Currency::USD);
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_round_to_cents_is_half_away_from_zero() {
        assert_eq!(Money::new(dec!(0.125), Currency::USD).round_to_cents().amount(), dec!(0.13));
        assert_eq!(Money::new(dec!(-0.125), Currency::USD).round_to_cents().amount(), dec!(-0.13));
        assert_eq!(Money::new(dec!(0.135), Currency::USD).round_to_cents().amount(), dec!(0.14));
    }

    #[test]
    fn test_apportion_gives_leftover_to_largest_remainders() {
        let m = Money::new(dec!(1000.00), Currency::USD);
        let parts = m.apportion(&[dec!(50), dec!(49.995)]).unwrap();

        let amounts: Vec<Decimal> = parts.iter().map(|p| p.amount()).collect();
        assert_eq!(amounts, vec![dec!(500.03), dec!(499.97)]);
    }

    #[test]
    fn test_money_allocation() {
        let m = Money::new(dec!(100.00), Currency::USD);
        let parts = m.allocate(3).unwrap();

        let amounts: Vec<Decimal> = parts.iter().map(|p| p.amount()).collect();
        assert_eq!(amounts, vec![dec!(33.34), dec!(33.33), dec!(33.33)]);
    }

    #[test]
    fn test_approx_eq_uses_one_cent_tolerance() {
        let a = Money::new(dec!(10.00), Currency::USD);
        assert!(a.approx_eq(&Money::new(dec!(10.01), Currency::USD)));
        assert!(!a.approx_eq(&Money::new(dec!(10.02), Currency::USD)));
        assert!(!a.approx_eq(&Money::new(dec!(10.00), Currency::EUR)));
    }

    #[test]
    fn test_currency_parsing() {
        assert_eq!("eur".parse::<Currency>().unwrap(), Currency::EUR);
        assert!(matches!("XYZ".parse::<Currency>(), Err(MoneyError::UnknownCurrency(_))));
    }
}

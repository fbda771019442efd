//! Share allocation
//!
//! Turns an expense total and a split instruction into one share per
//! participant. Every validation rule is checked before any share is built,
//! so a failed allocation never yields a partial result.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{Money, MemberId, EPSILON};
use crate::error::ValidationError;
use crate::expense::{Share, SplitPolicy};
use crate::member::{ensure_unique_members, Member};

/// A caller-supplied value for one participant
///
/// For percentage splits the value is a percentage of the total (0-100);
/// for exact splits it is an amount in the expense currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weight {
    /// Participating member
    pub member: MemberId,
    /// Percentage or exact amount, depending on the policy
    pub value: Decimal,
}

impl Weight {
    pub fn new(member: MemberId, value: Decimal) -> Self {
        Self { member, value }
    }
}

/// How an expense total should be divided
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", content = "weights", rename_all = "snake_case")]
pub enum SplitInstruction {
    /// Divide across the whole roster, spreading leftover cents in roster order
    Equal,
    /// Each participant pays a percentage of the total
    Percentage(Vec<Weight>),
    /// Each participant pays an explicit amount
    Exact(Vec<Weight>),
}

impl SplitInstruction {
    /// Returns the policy tag recorded on the expense
    pub fn policy(&self) -> SplitPolicy {
        match self {
            SplitInstruction::Equal => SplitPolicy::Equal,
            SplitInstruction::Percentage(_) => SplitPolicy::Percentage,
            SplitInstruction::Exact(_) => SplitPolicy::Exact,
        }
    }
}

/// Allocates expense totals into shares
///
/// The allocator is stateless; one instance can serve any number of
/// concurrent callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Allocator;

impl Allocator {
    /// Creates a new allocator
    pub fn new() -> Self {
        Self
    }

    /// Allocates `total` according to `split`
    ///
    /// # Arguments
    ///
    /// * `total` - The expense total, strictly positive and in whole cents
    /// * `roster` - The full group roster, used only by the equal policy
    /// * `split` - The splitting policy and its per-member values
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` naming the violated rule: non-positive
    /// total, empty roster, negative or duplicate entries, or percentages /
    /// exact amounts that do not add up within one cent. Accepted input
    /// always yields shares that sum to `total` exactly.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let shares = Allocator::new().allocate(total, &roster, &SplitInstruction::Equal)?;
    /// assert_eq!(shares.len(), roster.len());
    /// ```
    pub fn allocate(
        &self,
        total: Money,
        roster: &[Member],
        split: &SplitInstruction,
    ) -> Result<Vec<Share>, ValidationError> {
        validate_total(&total)?;

        let shares = match split {
            SplitInstruction::Equal => self.allocate_equal(total, roster)?,
            SplitInstruction::Percentage(weights) => self.allocate_percentage(total, weights)?,
            SplitInstruction::Exact(weights) => self.allocate_exact(total, weights)?,
        };

        debug!(
            policy = ?split.policy(),
            total = %total,
            participants = shares.len(),
            "Allocated expense shares"
        );

        Ok(shares)
    }

    fn allocate_equal(&self, total: Money, roster: &[Member]) -> Result<Vec<Share>, ValidationError> {
        if roster.is_empty() {
            return Err(ValidationError::EmptyRoster);
        }
        ensure_unique_members(roster.iter().map(|m| m.id))?;

        let parts = u32::try_from(roster.len()).map_err(|_| ValidationError::NoParticipants)?;
        let amounts = total.allocate(parts).map_err(|_| too_large(&total))?;

        Ok(roster
            .iter()
            .zip(amounts)
            .map(|(member, amount)| Share::new(member.id, amount))
            .collect())
    }

    fn allocate_percentage(&self, total: Money, weights: &[Weight]) -> Result<Vec<Share>, ValidationError> {
        validate_weights(weights)?;

        let sum: Decimal = weights.iter().map(|w| w.value).sum();
        if (sum - dec!(100)).abs() > EPSILON {
            return Err(ValidationError::PercentageSum { sum });
        }

        apportion(total, weights)
    }

    fn allocate_exact(&self, total: Money, weights: &[Weight]) -> Result<Vec<Share>, ValidationError> {
        validate_weights(weights)?;

        let sum: Decimal = weights.iter().map(|w| w.value).sum();
        if sum.is_zero() || !Money::new(sum, total.currency()).approx_eq(&total) {
            return Err(ValidationError::ExactSum {
                sum,
                total: total.amount(),
            });
        }

        apportion(total, weights)
    }
}

/// Splits `total` in proportion to the weight values; the leftover of at
/// most one cent per participant goes to the largest remainders
fn apportion(total: Money, weights: &[Weight]) -> Result<Vec<Share>, ValidationError> {
    let values: Vec<Decimal> = weights.iter().map(|w| w.value).collect();
    let amounts = total.apportion(&values).map_err(|_| too_large(&total))?;

    Ok(weights
        .iter()
        .zip(amounts)
        .map(|(weight, amount)| Share::new(weight.member, amount))
        .collect())
}

fn too_large(total: &Money) -> ValidationError {
    ValidationError::AmountTooLarge { amount: total.amount() }
}

fn validate_total(total: &Money) -> Result<(), ValidationError> {
    if !total.is_positive() {
        return Err(ValidationError::NonPositiveTotal { total: total.amount() });
    }
    if !total.is_whole_cents() {
        return Err(ValidationError::SubCentAmount { amount: total.amount() });
    }
    Ok(())
}

fn validate_weights(weights: &[Weight]) -> Result<(), ValidationError> {
    if weights.is_empty() {
        return Err(ValidationError::NoParticipants);
    }

    if let Some(negative) = weights.iter().find(|w| w.value.is_sign_negative() && !w.value.is_zero()) {
        return Err(ValidationError::NegativeWeight {
            member: negative.member,
            value: negative.value,
        });
    }

    ensure_unique_members(weights.iter().map(|w| w.member))
}

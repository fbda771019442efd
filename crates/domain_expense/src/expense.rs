//! Expense records

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{Currency, ExpenseId, MemberId, Money};
use crate::allocation::{Allocator, SplitInstruction};
use crate::error::ValidationError;
use crate::member::{ensure_unique_members, Member};

/// Split policy recorded on an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitPolicy {
    Equal,
    Percentage,
    Exact,
}

/// Expense category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Groceries,
    Utilities,
    Rent,
    Internet,
    Entertainment,
    Transport,
    Household,
    #[default]
    Other,
}

impl ExpenseCategory {
    /// All categories in reporting order
    pub const ALL: [ExpenseCategory; 8] = [
        ExpenseCategory::Groceries,
        ExpenseCategory::Utilities,
        ExpenseCategory::Rent,
        ExpenseCategory::Internet,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Transport,
        ExpenseCategory::Household,
        ExpenseCategory::Other,
    ];

    /// Lowercase label used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Groceries => "groceries",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Rent => "rent",
            ExpenseCategory::Internet => "internet",
            ExpenseCategory::Entertainment => "entertainment",
            ExpenseCategory::Transport => "transport",
            ExpenseCategory::Household => "household",
            ExpenseCategory::Other => "other",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown expense category: {}", s))
    }
}

/// One member's portion of an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    /// Member who owes this portion
    pub member: MemberId,
    /// Amount owed, in whole cents
    pub amount: Money,
}

impl Share {
    pub fn new(member: MemberId, amount: Money) -> Self {
        Self { member, amount }
    }
}

/// A group expense paid by one member and split across several
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,
    /// Member who paid
    pub payer: MemberId,
    /// Total paid
    pub total: Money,
    /// Policy used to produce the shares
    pub policy: SplitPolicy,
    /// Shares, one per participant
    pub shares: Vec<Share>,
    /// Short description
    pub description: String,
    /// Category
    pub category: ExpenseCategory,
    /// Date the expense was incurred
    pub date: NaiveDate,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Creates an expense from already computed shares
    ///
    /// Shares that add up to within one cent of the total are apportioned
    /// onto it, so the stored shares always sum to the total exactly.
    ///
    /// # Errors
    ///
    /// Fails when the shares are inconsistent with the total.
    pub fn new(
        payer: MemberId,
        total: Money,
        policy: SplitPolicy,
        shares: Vec<Share>,
    ) -> Result<Self, ValidationError> {
        let now = Utc::now();
        let mut expense = Self {
            id: ExpenseId::new_v7(),
            payer,
            total,
            policy,
            shares,
            description: String::new(),
            category: ExpenseCategory::default(),
            date: now.date_naive(),
            created_at: now,
        };
        expense.check_parts()?;
        expense.reconcile_shares()?;
        Ok(expense)
    }

    /// Allocates `total` with the given instruction and records the result
    pub fn from_allocation(
        payer: MemberId,
        total: Money,
        roster: &[Member],
        split: &SplitInstruction,
    ) -> Result<Self, ValidationError> {
        let shares = Allocator::new().allocate(total, roster, split)?;
        Self::new(payer, total, split.policy(), shares)
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the category
    pub fn with_category(mut self, category: ExpenseCategory) -> Self {
        self.category = category;
        self
    }

    /// Sets the date
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Currency of the expense
    pub fn currency(&self) -> Currency {
        self.total.currency()
    }

    /// Checks that the shares are well formed and add up to the total exactly
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.check_parts()?;

        let sum = self.share_total();
        if sum != self.total.amount() {
            return Err(ValidationError::ShareSum {
                sum,
                total: self.total.amount(),
            });
        }
        Ok(())
    }

    fn check_parts(&self) -> Result<(), ValidationError> {
        if !self.total.is_positive() {
            return Err(ValidationError::NonPositiveTotal { total: self.total.amount() });
        }
        if self.shares.is_empty() {
            return Err(ValidationError::NoParticipants);
        }

        let currency = self.currency();
        for share in &self.shares {
            if share.amount.currency() != currency {
                return Err(ValidationError::CurrencyMismatch {
                    expected: currency,
                    found: share.amount.currency(),
                });
            }
            if share.amount.is_negative() {
                return Err(ValidationError::NegativeWeight {
                    member: share.member,
                    value: share.amount.amount(),
                });
            }
        }
        ensure_unique_members(self.shares.iter().map(|s| s.member))
    }

    fn reconcile_shares(&mut self) -> Result<(), ValidationError> {
        let sum = self.share_total();
        if sum == self.total.amount() {
            return Ok(());
        }
        if sum.is_zero() || !Money::new(sum, self.currency()).approx_eq(&self.total) {
            return Err(ValidationError::ShareSum {
                sum,
                total: self.total.amount(),
            });
        }

        let values: Vec<Decimal> = self.shares.iter().map(|s| s.amount.amount()).collect();
        let amounts = self
            .total
            .apportion(&values)
            .map_err(|_| ValidationError::AmountTooLarge { amount: self.total.amount() })?;
        for (share, amount) in self.shares.iter_mut().zip(amounts) {
            share.amount = amount;
        }
        Ok(())
    }

    /// Returns the share owed by `member`, if they participate
    pub fn share_of(&self, member: MemberId) -> Option<Money> {
        self.shares.iter().find(|s| s.member == member).map(|s| s.amount)
    }

    /// Sum of all share amounts
    pub fn share_total(&self) -> Decimal {
        self.shares.iter().map(|s| s.amount.amount()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd(amount: Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }

    #[test]
    fn test_from_allocation_equal() {
        let roster = vec![Member::new("A"), Member::new("B"), Member::new("C")];
        let expense = Expense::from_allocation(roster[0].id, usd(dec!(100)), &roster, &SplitInstruction::Equal)
            .unwrap()
            .with_description("Groceries")
            .with_category(ExpenseCategory::Groceries);

        assert_eq!(expense.policy, SplitPolicy::Equal);
        assert_eq!(expense.share_of(roster[0].id).unwrap().amount(), dec!(33.34));
        assert_eq!(expense.share_total(), dec!(100));
        assert_eq!(expense.category, ExpenseCategory::Groceries);
    }

    #[test]
    fn test_new_rejects_share_sum_mismatch() {
        let a = MemberId::new();
        let result = Expense::new(a, usd(dec!(10)), SplitPolicy::Exact, vec![Share::new(a, usd(dec!(9.50)))]);
        assert!(matches!(result, Err(ValidationError::ShareSum { .. })));
    }

    #[test]
    fn test_new_absorbs_one_cent_of_slack() {
        let (a, b) = (MemberId::new(), MemberId::new());
        let shares = vec![Share::new(a, usd(dec!(10.00))), Share::new(b, usd(dec!(10.00)))];
        let expense = Expense::new(a, usd(dec!(20.01)), SplitPolicy::Exact, shares).unwrap();

        assert_eq!(expense.share_total(), dec!(20.01));
        assert_eq!(expense.share_of(a).unwrap().amount(), dec!(10.01));
        assert!(expense.validate().is_ok());
    }

    #[test]
    fn test_new_rejects_mixed_currency() {
        let a = MemberId::new();
        let shares = vec![Share::new(a, Money::new(dec!(10), Currency::EUR))];
        let result = Expense::new(a, usd(dec!(10)), SplitPolicy::Exact, shares);
        assert_eq!(
            result,
            Err(ValidationError::CurrencyMismatch { expected: Currency::USD, found: Currency::EUR })
        );
    }

    #[test]
    fn test_payer_need_not_participate() {
        let (payer, other) = (MemberId::new(), MemberId::new());
        let expense = Expense::new(payer, usd(dec!(20)), SplitPolicy::Exact, vec![Share::new(other, usd(dec!(20)))])
            .unwrap();
        assert!(expense.share_of(payer).is_none());
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("Rent".parse::<ExpenseCategory>().unwrap(), ExpenseCategory::Rent);
        assert!("yachts".parse::<ExpenseCategory>().is_err());
        assert_eq!(ExpenseCategory::default(), ExpenseCategory::Other);
    }
}

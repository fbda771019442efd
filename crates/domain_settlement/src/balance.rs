//! Balance aggregation
//!
//! Folds a group's expenses and confirmed transfers into one balance per
//! roster member. The fold only adds, so the order of records never
//! changes the result.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use core_kernel::{round_cents, Currency, MemberId, Money, EPSILON};
use domain_expense::{Expense, Member, Transfer};
use crate::error::IntegrityError;

/// Derived balance of one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// The member
    pub member: Member,
    /// Expense totals paid plus confirmed transfers sent
    pub total_paid: Money,
    /// Expense shares owed plus confirmed transfers received
    pub total_owed: Money,
    /// `total_paid - total_owed`; positive means the group owes this member
    pub net: Money,
}

impl Balance {
    /// Returns true if the member is within one cent of even
    pub fn is_settled(&self) -> bool {
        self.net.is_negligible()
    }
}

/// Balances for every roster member, in roster order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    currency: Currency,
    balances: Vec<Balance>,
}

impl BalanceSheet {
    /// Builds a sheet from precomputed balances
    pub fn new(currency: Currency, balances: Vec<Balance>) -> Self {
        Self { currency, balances }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn balances(&self) -> &[Balance] {
        &self.balances
    }

    pub fn iter(&self) -> impl Iterator<Item = &Balance> {
        self.balances.iter()
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Looks up the balance of one member
    pub fn get(&self, member: MemberId) -> Option<&Balance> {
        self.balances.iter().find(|b| b.member.id == member)
    }

    /// Sum of all net balances; zero for consistent input
    pub fn residual(&self) -> Money {
        let sum: Decimal = self.balances.iter().map(|b| b.net.amount()).sum();
        Money::new(sum, self.currency)
    }

    /// Fails if the nets do not sum to zero within one cent
    pub fn verify_conservation(&self) -> Result<(), IntegrityError> {
        let residual = self.residual();
        if residual.is_negligible() {
            return Ok(());
        }

        warn!(residual = %residual.amount(), members = self.len(), "Balance conservation violated");
        Err(IntegrityError::ConservationViolated {
            residual: residual.amount(),
        })
    }

    pub fn into_balances(self) -> Vec<Balance> {
        self.balances
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    paid: Decimal,
    owed: Decimal,
}

/// Computes balances from expenses and transfers
#[derive(Debug, Clone, Copy)]
pub struct BalanceAggregator {
    currency: Currency,
}

impl Default for BalanceAggregator {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

impl BalanceAggregator {
    /// Creates an aggregator for a group denominated in `currency`
    pub fn new(currency: Currency) -> Self {
        Self { currency }
    }

    /// Aggregates balances for every roster member
    ///
    /// Payers are credited with expense totals and share owners are debited
    /// their shares. A confirmed transfer credits the sender and debits the
    /// receiver. Pending and rejected transfers are ignored.
    ///
    /// # Errors
    ///
    /// Returns an `IntegrityError` when a record references a member outside
    /// the roster, the roster has duplicates, or a record is in a different
    /// currency. Share sums are not checked here; use
    /// [`BalanceSheet::verify_conservation`] on the result.
    pub fn aggregate(
        &self,
        roster: &[Member],
        expenses: &[Expense],
        transfers: &[Transfer],
    ) -> Result<BalanceSheet, IntegrityError> {
        let mut index: HashMap<MemberId, usize> = HashMap::with_capacity(roster.len());
        for (position, member) in roster.iter().enumerate() {
            if index.insert(member.id, position).is_some() {
                return Err(IntegrityError::DuplicateRosterMember(member.id));
            }
        }

        let mut accounts = vec![Accumulator::default(); roster.len()];
        let slot = |member: MemberId, context: &str| {
            index.get(&member).copied().ok_or_else(|| IntegrityError::UnknownMember {
                member,
                context: context.to_string(),
            })
        };

        for expense in expenses {
            self.check_currency(expense.total.currency())?;
            let payer = slot(expense.payer, "expense payer")?;
            accounts[payer].paid += expense.total.amount();

            for share in &expense.shares {
                self.check_currency(share.amount.currency())?;
                let owner = slot(share.member, "expense share")?;
                accounts[owner].owed += share.amount.amount();
            }
        }

        let mut confirmed = 0usize;
        for transfer in transfers.iter().filter(|t| t.is_confirmed()) {
            self.check_currency(transfer.amount.currency())?;
            let sender = slot(transfer.from, "transfer sender")?;
            let receiver = slot(transfer.to, "transfer receiver")?;
            accounts[sender].paid += transfer.amount.amount();
            accounts[receiver].owed += transfer.amount.amount();
            confirmed += 1;
        }

        let balances = roster
            .iter()
            .zip(accounts)
            .map(|(member, account)| Balance {
                member: member.clone(),
                total_paid: Money::new(round_cents(account.paid), self.currency),
                total_owed: Money::new(round_cents(account.owed), self.currency),
                net: Money::new(round_cents(account.paid - account.owed), self.currency),
            })
            .collect();

        debug!(
            members = roster.len(),
            expenses = expenses.len(),
            transfers = confirmed,
            "Aggregated balances"
        );

        Ok(BalanceSheet::new(self.currency, balances))
    }

    fn check_currency(&self, found: Currency) -> Result<(), IntegrityError> {
        if found != self.currency {
            return Err(IntegrityError::CurrencyMismatch {
                expected: self.currency,
                found,
            });
        }
        Ok(())
    }
}

/// Returns true if every balance is within one cent of zero
pub fn all_settled(balances: &[Balance]) -> bool {
    balances.iter().all(|b| b.net.amount().abs() <= EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_expense::SplitInstruction;
    use rust_decimal_macros::dec;

    fn roster() -> Vec<Member> {
        vec![Member::new("A"), Member::new("B"), Member::new("C")]
    }

    fn usd(amount: Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }

    fn nets(sheet: &BalanceSheet) -> Vec<Decimal> {
        sheet.iter().map(|b| b.net.amount()).collect()
    }

    #[test]
    fn test_single_equal_expense() {
        let members = roster();
        let expense =
            Expense::from_allocation(members[0].id, usd(dec!(100)), &members, &SplitInstruction::Equal).unwrap();

        let sheet = BalanceAggregator::new(Currency::USD)
            .aggregate(&members, &[expense], &[])
            .unwrap();

        assert_eq!(nets(&sheet), vec![dec!(66.66), dec!(-33.33), dec!(-33.33)]);
        assert_eq!(sheet.get(members[0].id).unwrap().total_paid.amount(), dec!(100));
        assert_eq!(sheet.get(members[0].id).unwrap().total_owed.amount(), dec!(33.34));
        assert!(sheet.verify_conservation().is_ok());
    }

    #[test]
    fn test_confirmed_transfer_moves_balance() {
        let members = roster();
        let expense =
            Expense::from_allocation(members[0].id, usd(dec!(100)), &members, &SplitInstruction::Equal).unwrap();
        let transfer = Transfer::confirmed(members[1].id, members[0].id, usd(dec!(33.33))).unwrap();

        let sheet = BalanceAggregator::new(Currency::USD)
            .aggregate(&members, &[expense], &[transfer])
            .unwrap();

        assert_eq!(nets(&sheet), vec![dec!(33.33), dec!(0), dec!(-33.33)]);
        assert_eq!(sheet.get(members[1].id).unwrap().total_paid.amount(), dec!(33.33));
    }

    #[test]
    fn test_pending_transfer_ignored() {
        let members = roster();
        let transfer = Transfer::propose(members[1].id, members[0].id, usd(dec!(10))).unwrap();

        let sheet = BalanceAggregator::new(Currency::USD)
            .aggregate(&members, &[], &[transfer])
            .unwrap();

        assert!(all_settled(sheet.balances()));
    }

    #[test]
    fn test_unknown_member_is_integrity_error() {
        let members = roster();
        let outsider = Member::new("D");
        let expense = Expense::from_allocation(
            outsider.id,
            usd(dec!(10)),
            &members,
            &SplitInstruction::Equal,
        )
        .unwrap();

        let result = BalanceAggregator::new(Currency::USD).aggregate(&members, &[expense], &[]);
        assert!(matches!(result, Err(IntegrityError::UnknownMember { member, .. }) if member == outsider.id));
    }

    #[test]
    fn test_duplicate_roster_member() {
        let member = Member::new("A");
        let result = BalanceAggregator::new(Currency::USD).aggregate(&[member.clone(), member.clone()], &[], &[]);
        assert_eq!(result, Err(IntegrityError::DuplicateRosterMember(member.id)));
    }

    #[test]
    fn test_currency_mismatch() {
        let members = roster();
        let expense = Expense::from_allocation(
            members[0].id,
            Money::new(dec!(10), Currency::EUR),
            &members,
            &SplitInstruction::Equal,
        )
        .unwrap();

        let result = BalanceAggregator::new(Currency::USD).aggregate(&members, &[expense], &[]);
        assert_eq!(
            result,
            Err(IntegrityError::CurrencyMismatch { expected: Currency::USD, found: Currency::EUR })
        );
    }

    #[test]
    fn test_corrupted_shares_break_conservation() {
        let members = roster();
        let mut expense =
            Expense::from_allocation(members[0].id, usd(dec!(90)), &members, &SplitInstruction::Equal).unwrap();
        expense.shares.pop();

        let sheet = BalanceAggregator::new(Currency::USD)
            .aggregate(&members, &[expense], &[])
            .unwrap();

        assert_eq!(sheet.residual().amount(), dec!(30));
        assert_eq!(
            sheet.verify_conservation(),
            Err(IntegrityError::ConservationViolated { residual: dec!(30) })
        );
    }

    #[test]
    fn test_order_does_not_matter() {
        let members = roster();
        let first =
            Expense::from_allocation(members[0].id, usd(dec!(100)), &members, &SplitInstruction::Equal).unwrap();
        let second =
            Expense::from_allocation(members[2].id, usd(dec!(45.50)), &members, &SplitInstruction::Equal).unwrap();
        let aggregator = BalanceAggregator::new(Currency::USD);

        let forward = aggregator
            .aggregate(&members, &[first.clone(), second.clone()], &[])
            .unwrap();
        let backward = aggregator.aggregate(&members, &[second, first], &[]).unwrap();

        assert_eq!(forward, backward);
    }
}

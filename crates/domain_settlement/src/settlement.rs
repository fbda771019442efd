//! Settlement reduction
//!
//! Greedy largest-to-largest matching of creditors and debtors. The result
//! has at most `n - 1` edges for `n` unsettled members; it is not guaranteed
//! to be the smallest possible edge set.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{round_cents, Currency, MemberId, Money, EPSILON};
use domain_expense::{Member, Transfer, ValidationError};
use crate::balance::{Balance, BalanceSheet};
use crate::debts::UserDebts;

/// A suggested payment from a debtor to a creditor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementEdge {
    /// Debtor
    pub from: Member,
    /// Creditor
    pub to: Member,
    /// Amount to pay, always above one cent
    pub amount: Money,
}

impl SettlementEdge {
    /// Turns the suggestion into a pending transfer the debtor can send
    pub fn to_transfer(&self) -> Result<Transfer, ValidationError> {
        Transfer::propose(self.from.id, self.to.id, self.amount)
    }
}

/// The full list of suggested payments for a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    currency: Currency,
    edges: Vec<SettlementEdge>,
}

impl Settlement {
    pub fn new(currency: Currency, edges: Vec<SettlementEdge>) -> Self {
        Self { currency, edges }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn edges(&self) -> &[SettlementEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Debts owed by and to one member
    pub fn user_debts(&self, member: MemberId) -> UserDebts {
        UserDebts::for_member(&self.edges, member, self.currency)
    }

    pub fn into_edges(self) -> Vec<SettlementEdge> {
        self.edges
    }
}

struct Party<'a> {
    member: &'a Member,
    remaining: Decimal,
}

/// Reduces balances to a list of settlement edges
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementReducer;

impl SettlementReducer {
    pub fn new() -> Self {
        Self
    }

    /// Reduces a balance sheet to settlement edges
    pub fn reduce(&self, sheet: &BalanceSheet) -> Settlement {
        Settlement::new(sheet.currency(), reduce_to_settlement(sheet.balances(), sheet.currency()))
    }
}

/// Greedy reduction over a slice of balances
///
/// Members within one cent of zero are treated as settled. Creditors and
/// debtors are each sorted by amount, largest first, with ties kept in
/// input order. The largest creditor and largest debtor are matched
/// repeatedly, and each match transfers the smaller of their remainders.
/// A party drops out once its remainder falls below one cent.
pub fn reduce_to_settlement(balances: &[Balance], currency: Currency) -> Vec<SettlementEdge> {
    let mut creditors: Vec<Party<'_>> = balances
        .iter()
        .filter(|b| b.net.amount() > EPSILON)
        .map(|b| Party { member: &b.member, remaining: b.net.amount() })
        .collect();
    let mut debtors: Vec<Party<'_>> = balances
        .iter()
        .filter(|b| b.net.amount() < -EPSILON)
        .map(|b| Party { member: &b.member, remaining: -b.net.amount() })
        .collect();

    // sort_by is stable
    creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
    debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

    let mut edges = Vec::with_capacity(creditors.len() + debtors.len());
    let (mut c, mut d) = (0, 0);

    while c < creditors.len() && d < debtors.len() {
        let amount = creditors[c].remaining.min(debtors[d].remaining);

        if amount > EPSILON {
            edges.push(SettlementEdge {
                from: debtors[d].member.clone(),
                to: creditors[c].member.clone(),
                amount: Money::new(round_cents(amount), currency),
            });
        }

        creditors[c].remaining -= amount;
        debtors[d].remaining -= amount;

        if creditors[c].remaining < EPSILON {
            c += 1;
        }
        if debtors[d].remaining < EPSILON {
            d += 1;
        }
    }

    debug!(
        creditors = creditors.len(),
        debtors = debtors.len(),
        edges = edges.len(),
        "Reduced balances to settlement"
    );

    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn balance(name: &str, net: Decimal) -> Balance {
        Balance {
            member: Member::new(name),
            total_paid: Money::zero(Currency::USD),
            total_owed: Money::zero(Currency::USD),
            net: Money::new(net, Currency::USD),
        }
    }

    fn summary(edges: &[SettlementEdge]) -> Vec<(String, String, Decimal)> {
        edges
            .iter()
            .map(|e| (e.from.display_name.clone(), e.to.display_name.clone(), e.amount.amount()))
            .collect()
    }

    #[test]
    fn test_one_creditor_two_debtors() {
        let balances = vec![
            balance("A", dec!(66.66)),
            balance("B", dec!(-33.33)),
            balance("C", dec!(-33.33)),
        ];

        let edges = reduce_to_settlement(&balances, Currency::USD);
        assert_eq!(
            summary(&edges),
            vec![
                ("B".to_string(), "A".to_string(), dec!(33.33)),
                ("C".to_string(), "A".to_string(), dec!(33.33)),
            ]
        );
    }

    #[test]
    fn test_largest_matched_first() {
        let balances = vec![
            balance("A", dec!(10)),
            balance("B", dec!(40)),
            balance("C", dec!(-20)),
            balance("D", dec!(-30)),
        ];

        let edges = reduce_to_settlement(&balances, Currency::USD);
        assert_eq!(
            summary(&edges),
            vec![
                ("D".to_string(), "B".to_string(), dec!(30)),
                ("C".to_string(), "B".to_string(), dec!(10)),
                ("C".to_string(), "A".to_string(), dec!(10)),
            ]
        );
    }

    #[test]
    fn test_settled_band_excluded() {
        let balances = vec![
            balance("A", dec!(0.01)),
            balance("B", dec!(-0.01)),
            balance("C", dec!(0)),
        ];

        assert!(reduce_to_settlement(&balances, Currency::USD).is_empty());
    }

    #[test]
    fn test_no_balances() {
        assert!(reduce_to_settlement(&[], Currency::USD).is_empty());
    }

    #[test]
    fn test_edges_never_exceed_parties_minus_one() {
        let balances = vec![
            balance("A", dec!(25)),
            balance("B", dec!(25)),
            balance("C", dec!(25)),
            balance("D", dec!(-75)),
        ];

        let edges = reduce_to_settlement(&balances, Currency::USD);
        assert_eq!(edges.len(), 3);
        assert!(edges.iter().all(|e| e.amount.amount() > EPSILON));
    }

    #[test]
    fn test_edge_to_transfer_is_pending() {
        let balances = vec![balance("A", dec!(5)), balance("B", dec!(-5))];
        let edges = reduce_to_settlement(&balances, Currency::USD);

        let transfer = edges[0].to_transfer().unwrap();
        assert_eq!(transfer.from, balances[1].member.id);
        assert_eq!(transfer.to, balances[0].member.id);
        assert!(!transfer.is_confirmed());
    }
}

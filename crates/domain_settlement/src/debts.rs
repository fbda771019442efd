//! Per-member debt view

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, MemberId, Money};
use crate::settlement::SettlementEdge;

/// What one member owes and is owed, according to a settlement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDebts {
    /// Edges where the member pays
    pub owes: Vec<SettlementEdge>,
    /// Edges where the member gets paid
    pub owed_by: Vec<SettlementEdge>,
    pub total_owes: Money,
    pub total_owed_by: Money,
    /// `total_owed_by - total_owes`
    pub net_balance: Money,
}

impl UserDebts {
    /// Filters `edges` down to those involving `member`
    pub fn for_member(edges: &[SettlementEdge], member: MemberId, currency: Currency) -> Self {
        let owes: Vec<SettlementEdge> = edges.iter().filter(|e| e.from.id == member).cloned().collect();
        let owed_by: Vec<SettlementEdge> = edges.iter().filter(|e| e.to.id == member).cloned().collect();

        let total_owes: Decimal = owes.iter().map(|e| e.amount.amount()).sum();
        let total_owed_by: Decimal = owed_by.iter().map(|e| e.amount.amount()).sum();

        Self {
            owes,
            owed_by,
            total_owes: Money::new(total_owes, currency).round_to_cents(),
            total_owed_by: Money::new(total_owed_by, currency).round_to_cents(),
            net_balance: Money::new(total_owed_by - total_owes, currency).round_to_cents(),
        }
    }

    /// Returns true if the member neither owes nor is owed anything
    pub fn is_clear(&self) -> bool {
        self.owes.is_empty() && self.owed_by.is_empty()
    }
}

/// Debts of `member` within `edges`
///
/// Totals take the currency of the first edge, falling back to the default
/// currency when `edges` is empty. Use [`UserDebts::for_member`] when the
/// group currency is known.
pub fn user_debts(edges: &[SettlementEdge], member: MemberId) -> UserDebts {
    let currency = edges
        .first()
        .map(|e| e.amount.currency())
        .unwrap_or_default();
    UserDebts::for_member(edges, member, currency)
}

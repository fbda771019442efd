//! Settlement DTOs

use rust_decimal::Decimal;
use serde::Serialize;

use core_kernel::Currency;
use domain_expense::Member;
use domain_settlement::{Settlement, SettlementEdge, UserDebts};

/// One suggested payment
#[derive(Debug, Serialize)]
pub struct DebtResponse {
    pub from: Member,
    pub to: Member,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl From<&SettlementEdge> for DebtResponse {
    fn from(edge: &SettlementEdge) -> Self {
        Self {
            from: edge.from.clone(),
            to: edge.to.clone(),
            amount: edge.amount.round_to_cents().amount(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DebtsResponse {
    pub currency: Currency,
    pub debts: Vec<DebtResponse>,
}

impl From<&Settlement> for DebtsResponse {
    fn from(settlement: &Settlement) -> Self {
        Self {
            currency: settlement.currency(),
            debts: settlement.edges().iter().map(DebtResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDebtsResponse {
    pub owes: Vec<DebtResponse>,
    pub owed_by: Vec<DebtResponse>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_owes: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_owed_by: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_balance: Decimal,
}

impl From<&UserDebts> for UserDebtsResponse {
    fn from(debts: &UserDebts) -> Self {
        Self {
            owes: debts.owes.iter().map(DebtResponse::from).collect(),
            owed_by: debts.owed_by.iter().map(DebtResponse::from).collect(),
            total_owes: debts.total_owes.amount(),
            total_owed_by: debts.total_owed_by.amount(),
            net_balance: debts.net_balance.amount(),
        }
    }
}

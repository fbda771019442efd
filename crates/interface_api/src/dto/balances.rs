//! Balance DTOs

use rust_decimal::Decimal;
use serde::Serialize;

use core_kernel::Currency;
use domain_expense::Member;
use domain_settlement::{Balance, BalanceSheet};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub user: Member,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_paid: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_owed: Decimal,
    /// Positive when the group owes the member
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl From<&Balance> for BalanceResponse {
    fn from(balance: &Balance) -> Self {
        Self {
            user: balance.member.clone(),
            total_paid: balance.total_paid.round_to_cents().amount(),
            total_owed: balance.total_owed.round_to_cents().amount(),
            balance: balance.net.round_to_cents().amount(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BalancesResponse {
    pub currency: Currency,
    pub balances: Vec<BalanceResponse>,
}

impl From<&BalanceSheet> for BalancesResponse {
    fn from(sheet: &BalanceSheet) -> Self {
        Self {
            currency: sheet.currency(),
            balances: sheet.iter().map(BalanceResponse::from).collect(),
        }
    }
}

//! Group record DTOs shared by the compute endpoints

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use core_kernel::{Currency, ExpenseId, GroupId, MemberId, Money, TransferId};
use domain_expense::{Expense, ExpenseCategory, Member, Share, SplitPolicy, Transfer, TransferStatus, ValidationError};
use domain_settlement::GroupSnapshot;

pub(crate) fn equal_split() -> SplitPolicy {
    SplitPolicy::Equal
}

fn confirmed() -> TransferStatus {
    TransferStatus::Confirmed
}

#[derive(Debug, Deserialize)]
pub struct ShareInput {
    pub user: MemberId,
    pub amount: Decimal,
}

/// An expense whose shares were already allocated
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseInput {
    pub id: Option<ExpenseId>,
    pub paid_by: MemberId,
    pub amount: Decimal,
    #[serde(default = "equal_split")]
    pub split_type: SplitPolicy,
    pub shares: Vec<ShareInput>,
    pub description: Option<String>,
    #[serde(default)]
    pub category: ExpenseCategory,
    pub date: Option<NaiveDate>,
}

impl ExpenseInput {
    pub fn into_expense(self, currency: Currency) -> Result<Expense, ValidationError> {
        let shares = self
            .shares
            .into_iter()
            .map(|s| Share::new(s.user, Money::new(s.amount, currency)))
            .collect();

        let mut expense = Expense::new(self.paid_by, Money::new(self.amount, currency), self.split_type, shares)?
            .with_category(self.category);
        if let Some(id) = self.id {
            expense.id = id;
        }
        if let Some(description) = self.description {
            expense = expense.with_description(description);
        }
        if let Some(date) = self.date {
            expense = expense.on(date);
        }
        Ok(expense)
    }
}

/// A repayment between two members; confirmed unless stated otherwise
#[derive(Debug, Deserialize)]
pub struct TransferInput {
    pub id: Option<TransferId>,
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Decimal,
    #[serde(default = "confirmed")]
    pub status: TransferStatus,
    pub note: Option<String>,
    pub date: Option<NaiveDate>,
}

impl TransferInput {
    pub fn into_transfer(self, currency: Currency) -> Result<Transfer, ValidationError> {
        let mut transfer = Transfer::propose(self.from, self.to, Money::new(self.amount, currency))?;
        transfer.status = self.status;
        if let Some(id) = self.id {
            transfer.id = id;
        }
        if let Some(note) = self.note {
            transfer = transfer.with_note(note);
        }
        if let Some(date) = self.date {
            transfer = transfer.on(date);
        }
        Ok(transfer)
    }
}

/// Everything a stateless balance or settlement computation needs
#[derive(Debug, Deserialize)]
pub struct GroupRecordsRequest {
    pub currency: Option<Currency>,
    pub roster: Vec<Member>,
    #[serde(default)]
    pub expenses: Vec<ExpenseInput>,
    #[serde(default)]
    pub transfers: Vec<TransferInput>,
}

impl GroupRecordsRequest {
    /// Builds an ad-hoc snapshot, falling back to `default_currency`
    pub fn into_snapshot(self, default_currency: Currency) -> Result<GroupSnapshot, ValidationError> {
        let currency = self.currency.unwrap_or(default_currency);

        let expenses = self
            .expenses
            .into_iter()
            .map(|e| e.into_expense(currency))
            .collect::<Result<Vec<_>, _>>()?;
        let transfers = self
            .transfers
            .into_iter()
            .map(|t| t.into_transfer(currency))
            .collect::<Result<Vec<_>, _>>()?;

        let mut snapshot = GroupSnapshot::new(GroupId::new(), currency).with_roster(self.roster);
        snapshot.expenses = expenses;
        snapshot.transfers = transfers;
        Ok(snapshot)
    }
}

//! Stored group DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, ExpenseId, GroupId, MemberId, TransferId};
use domain_expense::{Expense, ExpenseCategory, Member, SplitInstruction, SplitPolicy, Transfer, TransferStatus};

use super::allocation::{split_instruction, ShareResponse, WeightInput};
use super::records::equal_split;

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub currency: Option<Currency>,
    pub roster: Vec<Member>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    pub id: GroupId,
    pub currency: Currency,
    pub roster: Vec<Member>,
}

/// A new expense, split across the stored roster
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    pub paid_by: MemberId,
    pub amount: Decimal,
    #[serde(default = "equal_split")]
    pub split_type: SplitPolicy,
    #[serde(default)]
    pub weights: Vec<WeightInput>,
    pub description: Option<String>,
    #[serde(default)]
    pub category: ExpenseCategory,
    pub date: Option<NaiveDate>,
}

impl CreateExpenseRequest {
    pub fn split(&self) -> SplitInstruction {
        split_instruction(self.split_type, &self.weights)
    }

    /// Members named by the request, payer first
    pub fn referenced_members(&self) -> impl Iterator<Item = MemberId> + '_ {
        std::iter::once(self.paid_by).chain(self.weights.iter().map(|w| w.user))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResponse {
    pub id: ExpenseId,
    pub paid_by: MemberId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: Currency,
    pub split_type: SplitPolicy,
    pub shares: Vec<ShareResponse>,
    pub description: String,
    pub category: ExpenseCategory,
    pub date: NaiveDate,
}

impl From<&Expense> for ExpenseResponse {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id,
            paid_by: expense.payer,
            amount: expense.total.amount(),
            currency: expense.currency(),
            split_type: expense.policy,
            shares: expense.shares.iter().map(ShareResponse::from).collect(),
            description: expense.description.clone(),
            category: expense.category,
            date: expense.date,
        }
    }
}

/// A repayment awaiting the receiver's confirmation
#[derive(Debug, Deserialize)]
pub struct ProposeTransferRequest {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Decimal,
    pub note: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmTransferRequest {
    /// Member confirming receipt; must be the receiver
    pub actor: MemberId,
}

#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub id: TransferId,
    pub from: MemberId,
    pub to: MemberId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: Currency,
    pub status: TransferStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub date: NaiveDate,
}

impl From<&Transfer> for TransferResponse {
    fn from(transfer: &Transfer) -> Self {
        Self {
            id: transfer.id,
            from: transfer.from,
            to: transfer.to,
            amount: transfer.amount.amount(),
            currency: transfer.amount.currency(),
            status: transfer.status,
            note: transfer.note.clone(),
            date: transfer.date,
        }
    }
}

//! Allocation DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, MemberId};
use domain_expense::{Member, Share, SplitInstruction, SplitPolicy, Weight};

use super::records::equal_split;

#[derive(Debug, Deserialize)]
pub struct WeightInput {
    pub user: MemberId,
    pub value: Decimal,
}

/// Splits `amount` across `roster`
///
/// `weights` carries percentages or exact amounts and is ignored for an
/// equal split.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRequest {
    pub amount: Decimal,
    pub currency: Option<Currency>,
    pub roster: Vec<Member>,
    #[serde(default = "equal_split")]
    pub split_type: SplitPolicy,
    #[serde(default)]
    pub weights: Vec<WeightInput>,
}

impl AllocationRequest {
    pub fn split(&self) -> SplitInstruction {
        split_instruction(self.split_type, &self.weights)
    }
}

pub(crate) fn split_instruction(policy: SplitPolicy, weights: &[WeightInput]) -> SplitInstruction {
    let weights = || weights.iter().map(|w| Weight::new(w.user, w.value)).collect();
    match policy {
        SplitPolicy::Equal => SplitInstruction::Equal,
        SplitPolicy::Percentage => SplitInstruction::Percentage(weights()),
        SplitPolicy::Exact => SplitInstruction::Exact(weights()),
    }
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub user: MemberId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl From<&Share> for ShareResponse {
    fn from(share: &Share) -> Self {
        Self {
            user: share.member,
            amount: share.amount.round_to_cents().amount(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AllocationResponse {
    pub currency: Currency,
    pub shares: Vec<ShareResponse>,
}

impl AllocationResponse {
    pub fn new(currency: Currency, shares: &[Share]) -> Self {
        Self {
            currency,
            shares: shares.iter().map(ShareResponse::from).collect(),
        }
    }
}

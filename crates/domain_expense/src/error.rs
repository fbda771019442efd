//! Expense domain errors
//!
//! Every variant describes a rule the caller broke; these errors are
//! recoverable and meant to be shown to the person who submitted the input.

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::{Currency, MemberId};
use crate::transfer::TransferStatus;

/// Errors raised while validating allocation and transfer input
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Expense totals must be greater than zero
    #[error("Amount must be greater than 0, got {total}")]
    NonPositiveTotal { total: Decimal },

    /// Totals must fit in whole cents without overflowing
    #[error("Amount {amount} is too large to split")]
    AmountTooLarge { amount: Decimal },

    /// Amounts are expressed in whole cents
    #[error("Amount {amount} has more than two decimal places")]
    SubCentAmount { amount: Decimal },

    /// Equal split needs at least one group member
    #[error("Cannot split equally across an empty roster")]
    EmptyRoster,

    /// Percentage and exact splits need at least one entry
    #[error("At least one participant is required")]
    NoParticipants,

    /// Percentages and exact amounts cannot be negative
    #[error("Negative split value {value} for member {member}")]
    NegativeWeight { member: MemberId, value: Decimal },

    /// A member may appear only once per expense
    #[error("Member {0} appears more than once")]
    DuplicateMember(MemberId),

    /// Percentages must sum to 100 within tolerance
    #[error("Percentages must sum to 100, got {sum}")]
    PercentageSum { sum: Decimal },

    /// Exact amounts must sum to the expense total within tolerance
    #[error("Share amounts must sum to total expense amount: shares={sum}, total={total}")]
    ExactSum { sum: Decimal, total: Decimal },


    /// Shares attached to an expense must sum to its total within tolerance
    #[error("Expense shares sum to {sum} but the expense total is {total}")]
    ShareSum { sum: Decimal, total: Decimal },

    /// All amounts of one expense or transfer share a currency
    #[error("Currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch { expected: Currency, found: Currency },

    /// Transfers need two distinct members
    #[error("Cannot create a transfer to yourself")]
    SelfTransfer,

    /// Transfers move at least one cent
    #[error("Transfer amount must be at least 0.01, got {amount}")]
    NonPositiveTransfer { amount: Decimal },

    /// Only pending transfers can be confirmed or rejected
    #[error("Transfer has already been processed (status: {status})")]
    TransferNotPending { status: TransferStatus },

    /// Only the receiver acknowledges a transfer
    #[error("Only the transfer receiver can confirm or reject, not {actor}")]
    NotTransferReceiver { actor: MemberId },
}

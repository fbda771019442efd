//! Settlement domain errors

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::{Currency, ExpenseId, MemberId, PortError};
use domain_expense::ValidationError;

/// Inconsistent group data
///
/// These errors point at corrupted or mismatched records rather than at
/// anything an end user typed, so callers log them and report a generic
/// failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntegrityError {
    /// A share, transfer or payer references someone outside the roster
    #[error("Member {member} referenced by {context} is not in the group roster")]
    UnknownMember { member: MemberId, context: String },

    /// The roster lists the same member twice
    #[error("Member {0} appears more than once in the roster")]
    DuplicateRosterMember(MemberId),

    /// A record is denominated in a different currency than the group
    #[error("Record in {found} does not match group currency {expected}")]
    CurrencyMismatch { expected: Currency, found: Currency },

    /// An expense's shares do not add up to its total
    #[error("Expense {expense} is inconsistent: {reason}")]
    InconsistentExpense { expense: ExpenseId, reason: String },

    /// Net balances do not sum to zero
    #[error("Balances do not sum to zero: residual {residual}")]
    ConservationViolated { residual: Decimal },
}

/// Errors raised by the settlement service
#[derive(Debug, Error)]
pub enum SettlementError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    #[error(transparent)]
    Port(#[from] PortError),
}

impl SettlementError {
    /// Returns true if the error was caused by caller input
    pub fn is_validation(&self) -> bool {
        matches!(self, SettlementError::Validation(_))
    }

    /// Returns true if the requested group or member does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, SettlementError::Port(e) if e.is_not_found())
    }
}

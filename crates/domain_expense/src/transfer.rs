//! Member-to-member transfers
//!
//! A transfer records money one member sent to another to pay down debt.
//! It starts out pending and only counts toward balances after the
//! receiver confirms it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{MemberId, Money, TransferId};
use crate::error::ValidationError;

/// Transfer status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    /// Sent, waiting for the receiver
    Pending,
    /// Receiver acknowledged the money arrived
    Confirmed,
    /// Receiver disputed the transfer
    Rejected,
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransferStatus::Pending => "pending",
            TransferStatus::Confirmed => "confirmed",
            TransferStatus::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

/// A transfer of money between two members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Unique identifier
    pub id: TransferId,
    /// Sender
    pub from: MemberId,
    /// Receiver
    pub to: MemberId,
    /// Amount moved
    pub amount: Money,
    /// Status
    pub status: TransferStatus,
    /// Free-form note
    pub note: Option<String>,
    /// Date the money changed hands
    pub date: NaiveDate,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Transfer {
    /// Proposes a pending transfer
    ///
    /// # Errors
    ///
    /// Fails when sender and receiver are the same member or the amount
    /// is below one cent.
    pub fn propose(from: MemberId, to: MemberId, amount: Money) -> Result<Self, ValidationError> {
        if from == to {
            return Err(ValidationError::SelfTransfer);
        }
        let amount = amount.round_to_cents();
        if !amount.is_positive() {
            return Err(ValidationError::NonPositiveTransfer { amount: amount.amount() });
        }

        let now = Utc::now();
        Ok(Self {
            id: TransferId::new_v7(),
            from,
            to,
            amount,
            status: TransferStatus::Pending,
            note: None,
            date: now.date_naive(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Builds a transfer that is already confirmed, e.g. when importing history
    pub fn confirmed(from: MemberId, to: MemberId, amount: Money) -> Result<Self, ValidationError> {
        let mut transfer = Self::propose(from, to, amount)?;
        transfer.status = TransferStatus::Confirmed;
        Ok(transfer)
    }

    /// Attaches a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Sets the transfer date
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Confirms receipt; only the receiver may do this
    pub fn confirm(&mut self, actor: MemberId) -> Result<(), ValidationError> {
        self.transition(actor, TransferStatus::Confirmed)
    }

    /// Rejects the transfer; only the receiver may do this
    pub fn reject(&mut self, actor: MemberId) -> Result<(), ValidationError> {
        self.transition(actor, TransferStatus::Rejected)
    }

    /// Returns true once the receiver has confirmed
    pub fn is_confirmed(&self) -> bool {
        self.status == TransferStatus::Confirmed
    }

    /// Returns true if the member sent or received this transfer
    pub fn involves(&self, member: MemberId) -> bool {
        self.from == member || self.to == member
    }

    fn transition(&mut self, actor: MemberId, target: TransferStatus) -> Result<(), ValidationError> {
        if actor != self.to {
            return Err(ValidationError::NotTransferReceiver { actor });
        }
        if self.status != TransferStatus::Pending {
            return Err(ValidationError::TransferNotPending { status: self.status });
        }
        self.status = target;
        self.updated_at = Utc::now();
        Ok(())
    }
}

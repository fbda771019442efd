//! Settlement Domain Ports
//!
//! The engine never reads storage itself. Callers hand the `DebtService` an
//! adapter implementing [`GroupRepository`]; the service reads one
//! [`GroupSnapshot`] per request and computes everything from it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_settlement::{DebtService, InMemoryGroupStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryGroupStore::new());
//! store.insert(snapshot).await;
//!
//! let service = DebtService::new(store);
//! let settlement = service.settlement(group_id).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, DomainPort, GroupId, PortError};
use domain_expense::{Expense, Member, Transfer};

/// Everything the engine needs about one group, read at a single point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    /// Group identifier
    pub group_id: GroupId,
    /// Group currency
    #[serde(default)]
    pub currency: Currency,
    /// Members, in roster order
    pub roster: Vec<Member>,
    /// All expenses
    #[serde(default)]
    pub expenses: Vec<Expense>,
    /// All transfers regardless of status
    #[serde(default)]
    pub transfers: Vec<Transfer>,
}

impl GroupSnapshot {
    /// Creates an empty snapshot for a group
    pub fn new(group_id: GroupId, currency: Currency) -> Self {
        Self {
            group_id,
            currency,
            roster: Vec::new(),
            expenses: Vec::new(),
            transfers: Vec::new(),
        }
    }

    pub fn with_roster(mut self, roster: Vec<Member>) -> Self {
        self.roster = roster;
        self
    }

    pub fn with_expense(mut self, expense: Expense) -> Self {
        self.expenses.push(expense);
        self
    }

    pub fn with_transfer(mut self, transfer: Transfer) -> Self {
        self.transfers.push(transfer);
        self
    }

    /// Returns the roster entry for a member
    pub fn member(&self, id: core_kernel::MemberId) -> Option<&Member> {
        self.roster.iter().find(|m| m.id == id)
    }
}

/// Read access to group records
///
/// Implementations must return data that is internally consistent at read
/// time; [`GroupRepository::load_snapshot`] is the call the service uses.
#[async_trait]
pub trait GroupRepository: DomainPort {
    /// Members of a group in roster order
    async fn roster(&self, group_id: GroupId) -> Result<Vec<Member>, PortError>;

    /// Expenses of a group
    async fn expenses(&self, group_id: GroupId) -> Result<Vec<Expense>, PortError>;

    /// Transfers of a group, in any status
    async fn transfers(&self, group_id: GroupId) -> Result<Vec<Transfer>, PortError>;

    /// Reads roster, expenses and transfers as one consistent snapshot
    ///
    /// # Returns
    ///
    /// The snapshot, or `PortError::NotFound` for an unknown group
    async fn load_snapshot(&self, group_id: GroupId) -> Result<GroupSnapshot, PortError>;
}

//! In-memory group store
//!
//! Holds whole group snapshots behind a `tokio` read-write lock. Every read
//! clones under a single guard, so a snapshot never mixes records from two
//! different writes.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use core_kernel::{
    AdapterHealth, DomainPort, GroupId, HealthCheckResult, HealthCheckable, MemberId, PortError, TransferId,
};
use domain_expense::{Expense, Member, Transfer};
use crate::ports::{GroupRepository, GroupSnapshot};

/// `GroupRepository` adapter backed by a map in memory
#[derive(Debug, Default)]
pub struct InMemoryGroupStore {
    groups: RwLock<HashMap<GroupId, GroupSnapshot>>,
}

impl InMemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with snapshots
    pub fn with_groups(groups: impl IntoIterator<Item = GroupSnapshot>) -> Self {
        let groups = groups.into_iter().map(|g| (g.group_id, g)).collect();
        Self {
            groups: RwLock::new(groups),
        }
    }

    /// Inserts or replaces a group
    pub async fn insert(&self, snapshot: GroupSnapshot) {
        debug!(group_id = %snapshot.group_id, "Storing group snapshot");
        self.groups.write().await.insert(snapshot.group_id, snapshot);
    }

    /// Removes a group, returning its last snapshot
    pub async fn remove(&self, group_id: GroupId) -> Option<GroupSnapshot> {
        self.groups.write().await.remove(&group_id)
    }

    /// Appends an expense to an existing group
    pub async fn add_expense(&self, group_id: GroupId, expense: Expense) -> Result<(), PortError> {
        let mut groups = self.groups.write().await;
        let group = groups
            .get_mut(&group_id)
            .ok_or_else(|| PortError::not_found("Group", group_id))?;
        group.expenses.push(expense);
        Ok(())
    }

    /// Appends a transfer to an existing group
    pub async fn add_transfer(&self, group_id: GroupId, transfer: Transfer) -> Result<(), PortError> {
        let mut groups = self.groups.write().await;
        let group = groups
            .get_mut(&group_id)
            .ok_or_else(|| PortError::not_found("Group", group_id))?;
        group.transfers.push(transfer);
        Ok(())
    }

    /// Confirms a pending transfer on behalf of `actor`
    pub async fn confirm_transfer(
        &self,
        group_id: GroupId,
        transfer_id: TransferId,
        actor: MemberId,
    ) -> Result<Transfer, PortError> {
        let mut groups = self.groups.write().await;
        let group = groups
            .get_mut(&group_id)
            .ok_or_else(|| PortError::not_found("Group", group_id))?;
        let transfer = group
            .transfers
            .iter_mut()
            .find(|t| t.id == transfer_id)
            .ok_or_else(|| PortError::not_found("Transfer", transfer_id))?;

        transfer
            .confirm(actor)
            .map_err(|e| PortError::conflict(e.to_string()))?;
        Ok(transfer.clone())
    }

    /// Number of stored groups
    pub async fn len(&self) -> usize {
        self.groups.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.groups.read().await.is_empty()
    }

    async fn read<T>(
        &self,
        group_id: GroupId,
        f: impl FnOnce(&GroupSnapshot) -> T + Send,
    ) -> Result<T, PortError> {
        let groups = self.groups.read().await;
        groups
            .get(&group_id)
            .map(f)
            .ok_or_else(|| PortError::not_found("Group", group_id))
    }
}

impl DomainPort for InMemoryGroupStore {}

#[async_trait]
impl GroupRepository for InMemoryGroupStore {
    async fn roster(&self, group_id: GroupId) -> Result<Vec<Member>, PortError> {
        self.read(group_id, |g| g.roster.clone()).await
    }

    async fn expenses(&self, group_id: GroupId) -> Result<Vec<Expense>, PortError> {
        self.read(group_id, |g| g.expenses.clone()).await
    }

    async fn transfers(&self, group_id: GroupId) -> Result<Vec<Transfer>, PortError> {
        self.read(group_id, |g| g.transfers.clone()).await
    }

    async fn load_snapshot(&self, group_id: GroupId) -> Result<GroupSnapshot, PortError> {
        self.read(group_id, GroupSnapshot::clone).await
    }
}

#[async_trait]
impl HealthCheckable for InMemoryGroupStore {
    async fn health_check(&self) -> HealthCheckResult {
        let groups = self.groups.read().await.len();
        let mut result = HealthCheckResult::healthy("in_memory_group_store")
            .with_message(format!("{} groups loaded", groups));
        if groups == 0 {
            result.status = AdapterHealth::Degraded;
        }
        result
    }
}

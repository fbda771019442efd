//! Settlement domain services
//!
//! `DebtService` reads a group snapshot through the repository port and runs
//! the aggregation and reduction pipeline on it. It holds no state of its
//! own besides the port handle.

use std::sync::Arc;
use tracing::{error, instrument};

use core_kernel::{GroupId, MemberId, PortError};
use crate::balance::{BalanceAggregator, BalanceSheet};
use crate::debts::UserDebts;
use crate::error::{IntegrityError, SettlementError};
use crate::ports::{GroupRepository, GroupSnapshot};
use crate::settlement::{Settlement, SettlementReducer};
use crate::statistics::{DateRange, GroupStatistics, StatisticsReport};

/// Service computing balances, debts and statistics for stored groups
#[derive(Clone)]
pub struct DebtService {
    repository: Arc<dyn GroupRepository>,
    reducer: SettlementReducer,
}

impl DebtService {
    /// Creates a new debt service over a repository adapter
    pub fn new(repository: Arc<dyn GroupRepository>) -> Self {
        Self {
            repository,
            reducer: SettlementReducer::new(),
        }
    }

    /// Balances of every member in the group
    ///
    /// # Errors
    ///
    /// Returns `SettlementError::Port` if the group cannot be read and
    /// `SettlementError::Integrity` if the stored records are inconsistent.
    #[instrument(skip_all, fields(group_id = %group_id))]
    pub async fn balances(&self, group_id: GroupId) -> Result<BalanceSheet, SettlementError> {
        let snapshot = self.repository.load_snapshot(group_id).await?;
        Ok(aggregate_snapshot(&snapshot)?)
    }

    /// Suggested payments that settle the whole group
    #[instrument(skip_all, fields(group_id = %group_id))]
    pub async fn settlement(&self, group_id: GroupId) -> Result<Settlement, SettlementError> {
        let snapshot = self.repository.load_snapshot(group_id).await?;
        let sheet = aggregate_snapshot(&snapshot)?;
        Ok(self.reducer.reduce(&sheet))
    }

    /// Suggested payments involving one member
    ///
    /// # Errors
    ///
    /// Returns a not-found port error if the member is not in the roster.
    #[instrument(skip_all, fields(group_id = %group_id, member_id = %member_id))]
    pub async fn user_debts(&self, group_id: GroupId, member_id: MemberId) -> Result<UserDebts, SettlementError> {
        let snapshot = self.repository.load_snapshot(group_id).await?;
        if snapshot.member(member_id).is_none() {
            return Err(PortError::not_found("Member", member_id).into());
        }

        let sheet = aggregate_snapshot(&snapshot)?;
        Ok(self.reducer.reduce(&sheet).user_debts(member_id))
    }

    /// Spending statistics, with monthly figures for `year`
    #[instrument(skip_all, fields(group_id = %group_id))]
    pub async fn statistics(
        &self,
        group_id: GroupId,
        range: DateRange,
        year: i32,
    ) -> Result<StatisticsReport, SettlementError> {
        let snapshot = self.repository.load_snapshot(group_id).await?;
        Ok(GroupStatistics::new(&snapshot).with_range(range).report(year))
    }
}

/// Aggregates a snapshot and checks it end to end
///
/// Every expense must be internally consistent, every record must reference
/// roster members in the group currency, and the resulting nets must sum to
/// zero. Failures are logged at error level before being returned.
pub fn aggregate_snapshot(snapshot: &GroupSnapshot) -> Result<BalanceSheet, IntegrityError> {
    let result = check_expenses(snapshot)
        .and_then(|_| {
            BalanceAggregator::new(snapshot.currency).aggregate(
                &snapshot.roster,
                &snapshot.expenses,
                &snapshot.transfers,
            )
        })
        .and_then(|sheet| sheet.verify_conservation().map(|_| sheet));

    if let Err(e) = &result {
        error!(group_id = %snapshot.group_id, error = %e, "Group data failed integrity checks");
    }
    result
}

fn check_expenses(snapshot: &GroupSnapshot) -> Result<(), IntegrityError> {
    for expense in &snapshot.expenses {
        expense
            .validate()
            .map_err(|e| IntegrityError::InconsistentExpense {
                expense: expense.id,
                reason: e.to_string(),
            })?;
    }
    Ok(())
}

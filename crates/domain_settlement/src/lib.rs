//! Settlement Domain
//!
//! This crate turns a group's expenses and confirmed transfers into member
//! balances, reduces those balances to a short list of suggested payments,
//! and reports spending statistics.
//!
//! # Pipeline
//!
//! ```text
//! roster + expenses + confirmed transfers
//!     -> BalanceAggregator  (paid, owed, net per member)
//!     -> SettlementReducer  (debtor -> creditor edges)
//!     -> UserDebts          (one member's view of the edges)
//! ```
//!
//! Every step is a pure computation over values the caller supplies.
//! `DebtService` wires the steps to a `GroupRepository` adapter.

pub mod balance;
pub mod settlement;
pub mod debts;
pub mod statistics;
pub mod ports;
pub mod memory;
pub mod services;
pub mod error;

pub use balance::{all_settled, Balance, BalanceAggregator, BalanceSheet};
pub use settlement::{reduce_to_settlement, Settlement, SettlementEdge, SettlementReducer};
pub use debts::{user_debts, UserDebts};
pub use statistics::{
    CategoryTotal, DateRange, GroupStatistics, MemberStatistics, MonthTotal, StatisticsReport, Summary, TopSpender,
};
pub use ports::{GroupRepository, GroupSnapshot};
pub use memory::InMemoryGroupStore;
pub use services::{aggregate_snapshot, DebtService};
pub use error::{IntegrityError, SettlementError};

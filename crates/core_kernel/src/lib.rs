//! Core Kernel - Foundational types and utilities for the settlement engine
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic and cent rounding
//! - Strongly-typed identifiers for groups, members, and ledger records
//! - Port infrastructure for repository adapters

pub mod money;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{Money, Currency, MoneyError, EPSILON, CENT_PLACES, round_cents};
pub use identifiers::{GroupId, MemberId, ExpenseId, TransferId};
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
pub use error::CoreError;

//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! settlement engine test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built rosters, amounts, and groups
//! - `builders`: Builder patterns for expenses and transfers
//! - `assertions`: Custom assertion helpers for balances and settlements
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;

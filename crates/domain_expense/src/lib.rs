//! Expense Domain
//!
//! This crate turns group expenses into per-member shares and tracks the
//! transfers members send each other to settle up.
//!
//! # Split policies
//!
//! ```text
//! Equal      -> total / roster size, leftover cents to the first members
//! Percentage -> each member pays p% of the total, p summing to 100
//! Exact      -> each member pays a given amount, amounts summing to the total
//!
//! Percentage and exact shares are apportioned in whole cents, largest
//! remainder first, so they always add up to the total exactly.
//! ```
//!
//! # Transfer lifecycle
//!
//! ```text
//! Pending -> Confirmed | Rejected
//! ```

pub mod member;
pub mod expense;
pub mod allocation;
pub mod transfer;
pub mod error;

pub use member::{Member, ensure_unique_members, roster_ids};
pub use expense::{Expense, ExpenseCategory, Share, SplitPolicy};
pub use allocation::{Allocator, SplitInstruction, Weight};
pub use transfer::{Transfer, TransferStatus};
pub use error::ValidationError;

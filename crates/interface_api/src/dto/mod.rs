//! Request and response bodies
//!
//! Money leaves the API as JSON numbers rounded to cents; requests accept
//! numbers or decimal strings.

pub mod allocation;
pub mod balances;
pub mod groups;
pub mod records;
pub mod settlement;
pub mod statistics;

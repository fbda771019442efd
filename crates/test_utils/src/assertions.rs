//! Custom Test Assertions
//!
//! Provides assertion helpers for money, balances and settlements that give
//! more meaningful failure messages than standard assertions.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

use core_kernel::{MemberId, Money, EPSILON};
use domain_expense::Share;
use domain_settlement::{BalanceSheet, Settlement};

/// Largest per-member remainder left after applying a settlement
///
/// The reducer skips matches of exactly one cent, which can happen once
/// when a member is first matched and once when their remainder runs out.
pub const SETTLEMENT_TOLERANCE: Decimal = dec!(0.02);

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(
        money.is_zero(),
        "Expected zero money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

/// Asserts that shares sum exactly to a total
pub fn assert_shares_sum_to(shares: &[Share], total: &Money) {
    let sum: Decimal = shares.iter().map(|s| s.amount.amount()).sum();
    assert_eq!(
        sum,
        total.amount(),
        "Sum of shares ({}) doesn't equal total ({})",
        sum,
        total.amount()
    );
}

/// Asserts that net balances sum to zero within one cent
pub fn assert_conserved(sheet: &BalanceSheet) {
    let residual = sheet.residual();
    assert!(
        residual.amount().abs() <= EPSILON,
        "Balances are not conserved: residual={} across {} members",
        residual.amount(),
        sheet.len()
    );
}

/// Asserts that applying every edge as a payment leaves every member even
///
/// Each edge moves its amount from the debtor's debt to the creditor's
/// credit; afterwards no member may be further than
/// [`SETTLEMENT_TOLERANCE`] from zero.
pub fn assert_settles(sheet: &BalanceSheet, settlement: &Settlement) {
    let mut remaining: HashMap<MemberId, Decimal> =
        sheet.iter().map(|b| (b.member.id, b.net.amount())).collect();

    for edge in settlement.edges() {
        assert!(
            edge.amount.amount() > EPSILON,
            "Edge {} -> {} has non-positive amount {}",
            edge.from.display_name,
            edge.to.display_name,
            edge.amount.amount()
        );
        *remaining.entry(edge.from.id).or_default() += edge.amount.amount();
        *remaining.entry(edge.to.id).or_default() -= edge.amount.amount();
    }

    for balance in sheet.iter() {
        let left = remaining[&balance.member.id];
        assert!(
            left.abs() <= SETTLEMENT_TOLERANCE,
            "Member {} still has net {} after settlement (started at {})",
            balance.member.display_name,
            left,
            balance.net.amount()
        );
    }
}

/// Asserts that the settlement has at most one edge fewer than unsettled members
pub fn assert_edge_bound(sheet: &BalanceSheet, settlement: &Settlement) {
    let unsettled = sheet.iter().filter(|b| b.net.amount().abs() > EPSILON).count();
    assert!(
        settlement.len() <= unsettled.saturating_sub(1),
        "{} edges for {} unsettled members",
        settlement.len(),
        unsettled
    );
}

/// Asserts that a decimal value is approximately equal to another
pub fn assert_decimal_approx_eq(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "Decimals differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Asserts that a result is Ok and returns the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Asserts that an error matches a specific variant
#[macro_export]
macro_rules! assert_err_variant {
    ($result:expr, $pattern:pat) => {
        match $result {
            Ok(value) => panic!("Expected Err matching {}, got Ok({:?})", stringify!($pattern), value),
            Err(ref e) => {
                assert!(
                    matches!(e, $pattern),
                    "Error {:?} does not match pattern {}",
                    e,
                    stringify!($pattern)
                );
            }
        }
    };
}

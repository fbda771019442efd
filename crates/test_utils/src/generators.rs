//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants: every generated expense has shares
//! summing to its total and every generated transfer has distinct members.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::{Currency, GroupId, Money};
use domain_expense::{Expense, Member, SplitInstruction, Transfer, Weight};
use domain_settlement::GroupSnapshot;

/// Strategy for generating supported Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::CHF),
        Just(Currency::INR),
        Just(Currency::AUD),
        Just(Currency::CAD),
        Just(Currency::SGD),
        Just(Currency::HKD),
    ]
}

/// Strategy for generating positive amounts in cents
pub fn cents_strategy() -> impl Strategy<Value = i64> {
    1i64..10_000_000i64
}

/// Strategy for generating rosters of `min..=max` distinct members
pub fn roster_strategy(min: usize, max: usize) -> impl Strategy<Value = Vec<Member>> {
    (min..=max).prop_map(|size| (0..size).map(|i| Member::new(format!("member-{}", i))).collect())
}

/// Strategy for generating `count` percentages with two decimals that sum to exactly 100
pub fn percentage_split_strategy(count: usize) -> impl Strategy<Value = Vec<Decimal>> {
    proptest::collection::vec(1u32..1000u32, count..=count).prop_map(|weights| {
        split_units(10_000, &weights)
            .into_iter()
            .map(|bp| Decimal::new(bp, 2))
            .collect()
    })
}

/// Strategy for generating dates within 2024
pub fn date_2024_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..366i64).prop_map(|days| {
        NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date") + Duration::days(days)
    })
}

/// Splits `units` proportionally to `weights`, leftover units to the first entries
fn split_units(units: i64, weights: &[u32]) -> Vec<i64> {
    let total: i64 = weights.iter().map(|w| i64::from(*w)).sum();
    let mut parts: Vec<i64> = weights.iter().map(|w| units * i64::from(*w) / total).collect();
    let mut leftover = units - parts.iter().sum::<i64>();
    for part in parts.iter_mut() {
        if leftover == 0 {
            break;
        }
        *part += 1;
        leftover -= 1;
    }
    parts
}

#[derive(Debug, Clone)]
enum PolicyChoice {
    Equal,
    /// Weights and a drift of up to 0.01 percent, in thousandths
    Percentage(Vec<u32>, i64),
    /// Weights and a slack of up to one cent
    Exact(Vec<u32>, i64),
}

fn policy_strategy(size: usize) -> impl Strategy<Value = PolicyChoice> {
    let weights = proptest::collection::vec(1u32..1000u32, size..=size);
    prop_oneof![
        Just(PolicyChoice::Equal),
        (weights.clone(), -10i64..=10i64).prop_map(|(w, drift)| PolicyChoice::Percentage(w, drift)),
        (weights, -1i64..=1i64).prop_map(|(w, slack)| PolicyChoice::Exact(w, slack)),
    ]
}

fn build_expense(roster: &[Member], payer: usize, cents: i64, policy: &PolicyChoice, date: NaiveDate) -> Expense {
    let total = Money::from_minor(cents, Currency::USD);
    let weights = |values: Vec<Decimal>| -> Vec<Weight> {
        roster.iter().zip(values).map(|(m, v)| Weight::new(m.id, v)).collect()
    };

    let split = match policy {
        PolicyChoice::Equal => SplitInstruction::Equal,
        PolicyChoice::Percentage(w, drift) => {
            // Every part is at least 0.014 percent, so the drift never turns it negative
            let mut thousandths = split_units(100_000, w);
            thousandths[0] += drift;
            SplitInstruction::Percentage(weights(
                thousandths.into_iter().map(|t| Decimal::new(t, 3)).collect(),
            ))
        }
        PolicyChoice::Exact(w, slack) => SplitInstruction::Exact(weights(
            split_units((cents + slack).max(1), w)
                .into_iter()
                .map(|c| Decimal::new(c, 2))
                .collect(),
        )),
    };

    Expense::from_allocation(roster[payer].id, total, roster, &split)
        .expect("generated splits stay within the one cent tolerance")
        .on(date)
}

/// Strategy for generating internally consistent groups
///
/// Rosters have 2 to 8 members and expenses use every split policy.
/// Percentages may miss 100 by up to 0.01 and exact amounts may miss the
/// total by up to one cent, both inside the accepted tolerance. Transfers
/// are a mix of pending and confirmed, always between distinct members.
pub fn consistent_group_strategy() -> impl Strategy<Value = GroupSnapshot> {
    (2usize..=8usize)
        .prop_flat_map(|size| {
            let expense = (0..size, cents_strategy(), policy_strategy(size), date_2024_strategy());
            let transfer = (0..size, 1..size, cents_strategy(), any::<bool>());
            (
                Just(size),
                proptest::collection::vec(expense, 0..12),
                proptest::collection::vec(transfer, 0..6),
            )
        })
        .prop_map(|(size, expenses, transfers)| {
            let roster: Vec<Member> = (0..size).map(|i| Member::new(format!("member-{}", i))).collect();
            let mut snapshot = GroupSnapshot::new(GroupId::new(), Currency::USD);

            for (payer, cents, policy, date) in expenses {
                snapshot = snapshot.with_expense(build_expense(&roster, payer, cents, &policy, date));
            }

            for (from, offset, cents, confirmed) in transfers {
                let to = (from + offset) % size;
                let amount = Money::from_minor(cents, Currency::USD);
                let transfer = if confirmed {
                    Transfer::confirmed(roster[from].id, roster[to].id, amount)
                } else {
                    Transfer::propose(roster[from].id, roster[to].id, amount)
                }
                .expect("distinct members and positive amount");
                snapshot = snapshot.with_transfer(transfer);
            }

            snapshot.with_roster(roster)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_units_sums_exactly() {
        let parts = split_units(10_000, &[1, 1, 1]);
        assert_eq!(parts, vec![3334, 3333, 3333]);
        assert_eq!(parts.iter().sum::<i64>(), 10_000);
    }

    proptest! {
        #[test]
        fn percentages_sum_to_one_hundred(values in percentage_split_strategy(5)) {
            prop_assert_eq!(values.iter().sum::<Decimal>(), Decimal::ONE_HUNDRED);
        }

        #[test]
        fn generated_expenses_are_valid(snapshot in consistent_group_strategy()) {
            for expense in &snapshot.expenses {
                prop_assert!(expense.validate().is_ok());
                prop_assert_eq!(expense.share_total(), expense.total.amount());
            }
            for transfer in &snapshot.transfers {
                prop_assert_ne!(transfer.from, transfer.to);
            }
        }
    }
}

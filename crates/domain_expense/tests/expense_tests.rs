//! Comprehensive tests for domain_expense

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{Currency, MemberId, Money};

use domain_expense::allocation::{Allocator, SplitInstruction, Weight};
use domain_expense::error::ValidationError;
use domain_expense::expense::{Expense, ExpenseCategory, SplitPolicy};
use domain_expense::member::Member;
use domain_expense::transfer::{Transfer, TransferStatus};

fn household() -> Vec<Member> {
    vec![Member::new("A"), Member::new("B"), Member::new("C")]
}

fn usd(amount: Decimal) -> Money {
    Money::new(amount, Currency::USD)
}

// ============================================================================
// Allocation Tests
// ============================================================================

mod allocation_tests {
    use super::*;

    #[test]
    fn test_equal_split_of_one_hundred_across_three() {
        let roster = household();
        let shares = Allocator::new()
            .allocate(usd(dec!(100.00)), &roster, &SplitInstruction::Equal)
            .unwrap();

        let amounts: Vec<Decimal> = shares.iter().map(|s| s.amount.amount()).collect();
        assert_eq!(amounts, vec![dec!(33.34), dec!(33.33), dec!(33.33)]);
        assert_eq!(amounts.iter().sum::<Decimal>(), dec!(100.00));
    }

    #[test]
    fn test_equal_split_one_cent_across_three() {
        let roster = household();
        let shares = Allocator::new()
            .allocate(usd(dec!(0.01)), &roster, &SplitInstruction::Equal)
            .unwrap();

        let amounts: Vec<Decimal> = shares.iter().map(|s| s.amount.amount()).collect();
        assert_eq!(amounts, vec![dec!(0.01), dec!(0), dec!(0)]);
    }

    #[test]
    fn test_equal_split_follows_roster_order() {
        let roster = household();
        let reversed: Vec<Member> = roster.iter().rev().cloned().collect();
        let shares = Allocator::new()
            .allocate(usd(dec!(0.02)), &reversed, &SplitInstruction::Equal)
            .unwrap();

        assert_eq!(shares[0].member, roster[2].id);
        assert_eq!(shares[0].amount.amount(), dec!(0.01));
        assert_eq!(shares[2].amount.amount(), dec!(0));
    }

    #[test]
    fn test_percentage_sum_rejections() {
        let roster = household();
        let instruction = |last: Decimal| {
            SplitInstruction::Percentage(vec![
                Weight::new(roster[0].id, dec!(40)),
                Weight::new(roster[1].id, dec!(30)),
                Weight::new(roster[2].id, last),
            ])
        };

        let low = Allocator::new().allocate(usd(dec!(90)), &roster, &instruction(dec!(29.98)));
        let high = Allocator::new().allocate(usd(dec!(90)), &roster, &instruction(dec!(30.02)));
        let exact = Allocator::new().allocate(usd(dec!(90)), &roster, &instruction(dec!(30)));
        let within = Allocator::new().allocate(usd(dec!(90)), &roster, &instruction(dec!(29.995)));

        assert_eq!(low, Err(ValidationError::PercentageSum { sum: dec!(99.98) }));
        assert_eq!(high, Err(ValidationError::PercentageSum { sum: dec!(100.02) }));
        assert!(exact.is_ok());
        assert!(within.is_ok());
    }

    #[test]
    fn test_percentage_error_message() {
        let roster = household();
        let split = SplitInstruction::Percentage(vec![Weight::new(roster[0].id, dec!(90))]);
        let err = Allocator::new().allocate(usd(dec!(10)), &roster, &split).unwrap_err();
        assert!(err.to_string().contains("Percentages must sum to 100"));
    }

    #[test]
    fn test_exact_split_within_tolerance() {
        let roster = household();
        let split = SplitInstruction::Exact(vec![
            Weight::new(roster[0].id, dec!(50.00)),
            Weight::new(roster[1].id, dec!(49.99)),
        ]);

        let shares = Allocator::new().allocate(usd(dec!(100.00)), &roster, &split).unwrap();
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[1].amount.amount(), dec!(49.99));
    }

    #[test]
    fn test_exact_split_outside_tolerance() {
        let roster = household();
        let split = SplitInstruction::Exact(vec![
            Weight::new(roster[0].id, dec!(50.00)),
            Weight::new(roster[1].id, dec!(49.98)),
        ]);

        let result = Allocator::new().allocate(usd(dec!(100.00)), &roster, &split);
        assert!(matches!(result, Err(ValidationError::ExactSum { .. })));
    }

    #[test]
    fn test_zero_total_rejected_for_every_policy() {
        let roster = household();
        let weights = vec![Weight::new(roster[0].id, dec!(100))];
        for split in [
            SplitInstruction::Equal,
            SplitInstruction::Percentage(weights.clone()),
            SplitInstruction::Exact(weights.clone()),
        ] {
            let result = Allocator::new().allocate(usd(dec!(0)), &roster, &split);
            assert!(matches!(result, Err(ValidationError::NonPositiveTotal { .. })));
        }
    }
}

// ============================================================================
// Expense Tests
// ============================================================================

mod expense_tests {
    use super::*;

    #[test]
    fn test_expense_records_policy_and_metadata() {
        let roster = household();
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let expense = Expense::from_allocation(
            roster[1].id,
            usd(dec!(60)),
            &roster,
            &SplitInstruction::Exact(vec![
                Weight::new(roster[0].id, dec!(20)),
                Weight::new(roster[2].id, dec!(40)),
            ]),
        )
        .unwrap()
        .with_description("Internet")
        .with_category(ExpenseCategory::Internet)
        .on(date);

        assert_eq!(expense.policy, SplitPolicy::Exact);
        assert_eq!(expense.date, date);
        assert!(expense.share_of(roster[1].id).is_none());
        assert_eq!(expense.share_of(roster[2].id).unwrap().amount(), dec!(40));
        assert!(expense.validate().is_ok());
    }

    #[test]
    fn test_tampered_expense_fails_validation() {
        let roster = household();
        let mut expense =
            Expense::from_allocation(roster[0].id, usd(dec!(30)), &roster, &SplitInstruction::Equal).unwrap();
        expense.shares.pop();

        assert!(matches!(expense.validate(), Err(ValidationError::ShareSum { .. })));
    }

    #[test]
    fn test_expense_json_shape() {
        let roster = household();
        let expense =
            Expense::from_allocation(roster[0].id, usd(dec!(30)), &roster, &SplitInstruction::Equal).unwrap();
        let json = serde_json::to_value(&expense).unwrap();

        assert_eq!(json["policy"], "equal");
        assert_eq!(json["category"], "other");
        assert_eq!(json["shares"].as_array().unwrap().len(), 3);
    }
}

// ============================================================================
// Transfer Tests
// ============================================================================

mod transfer_tests {
    use super::*;

    #[test]
    fn test_transfer_lifecycle() {
        let (b, a) = (MemberId::new(), MemberId::new());
        let mut transfer = Transfer::propose(b, a, usd(dec!(33.33)))
            .unwrap()
            .with_note("groceries");

        assert_eq!(transfer.status, TransferStatus::Pending);
        transfer.confirm(a).unwrap();
        assert_eq!(transfer.status, TransferStatus::Confirmed);
        assert_eq!(transfer.note.as_deref(), Some("groceries"));
    }

    #[test]
    fn test_sender_cannot_reject() {
        let (b, a) = (MemberId::new(), MemberId::new());
        let mut transfer = Transfer::propose(b, a, usd(dec!(1))).unwrap();

        assert!(matches!(transfer.reject(b), Err(ValidationError::NotTransferReceiver { .. })));
        assert_eq!(transfer.status, TransferStatus::Pending);
    }

    #[test]
    fn test_confirmed_constructor() {
        let transfer = Transfer::confirmed(MemberId::new(), MemberId::new(), usd(dec!(12.50))).unwrap();
        assert!(transfer.is_confirmed());
    }

    #[test]
    fn test_zero_transfer_rejected() {
        let result = Transfer::propose(MemberId::new(), MemberId::new(), usd(dec!(0)));
        assert_eq!(result, Err(ValidationError::NonPositiveTransfer { amount: dec!(0) }));
    }
}

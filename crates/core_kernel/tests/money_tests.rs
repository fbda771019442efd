//! Unit tests for the Money module
//!
//! Tests cover money creation, arithmetic, cent rounding, allocation,
//! tolerance comparisons, and serialization.

use core_kernel::{round_cents, Currency, Money, MoneyError, EPSILON};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_creates_money_with_correct_amount() {
        let m = Money::new(dec!(100.50), Currency::USD);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.currency(), Currency::USD);
    }

    #[test]
    fn test_new_keeps_four_decimal_places() {
        let m = Money::new(dec!(100.123456789), Currency::USD);
        assert_eq!(m.amount(), dec!(100.1235));
    }

    #[test]
    fn test_from_minor_converts_cents_correctly() {
        let m = Money::from_minor(10050, Currency::USD);
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_to_minor_rounds_to_whole_cents() {
        assert_eq!(Money::new(dec!(12.345), Currency::EUR).to_minor().unwrap(), 1235);
        assert_eq!(Money::new(dec!(-0.015), Currency::EUR).to_minor().unwrap(), -2);
    }

    #[test]
    fn test_zero_creates_zero_amount() {
        let m = Money::zero(Currency::EUR);
        assert!(m.is_zero());
        assert!(!m.is_negative());
        assert!(!m.is_positive());
    }
}

mod rounding {
    use super::*;

    #[test]
    fn test_round_cents_half_away_from_zero() {
        assert_eq!(round_cents(dec!(2.675)), dec!(2.68));
        assert_eq!(round_cents(dec!(2.665)), dec!(2.67));
        assert_eq!(round_cents(dec!(-2.665)), dec!(-2.67));
        assert_eq!(round_cents(dec!(2.664)), dec!(2.66));
    }

    #[test]
    fn test_is_whole_cents() {
        assert!(Money::new(dec!(10.25), Currency::USD).is_whole_cents());
        assert!(!Money::new(dec!(10.255), Currency::USD).is_whole_cents());
    }
}

mod tolerance {
    use super::*;

    #[test]
    fn test_epsilon_is_one_cent() {
        assert_eq!(EPSILON, dec!(0.01));
    }

    #[test]
    fn test_is_negligible_includes_boundary() {
        assert!(Money::new(dec!(0.01), Currency::USD).is_negligible());
        assert!(Money::new(dec!(-0.01), Currency::USD).is_negligible());
        assert!(!Money::new(dec!(0.011), Currency::USD).is_negligible());
    }

    #[test]
    fn test_approx_eq_requires_same_currency() {
        let usd = Money::new(dec!(5.00), Currency::USD);
        let gbp = Money::new(dec!(5.00), Currency::GBP);
        assert!(!usd.approx_eq(&gbp));
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_operators() {
        let mut a = Money::new(dec!(10.00), Currency::USD);
        a += Money::new(dec!(2.50), Currency::USD);
        a -= Money::new(dec!(0.50), Currency::USD);
        assert_eq!(a.amount(), dec!(12.00));
        assert_eq!((-a).amount(), dec!(-12.00));
    }

    #[test]
    fn test_ordering_only_within_currency() {
        let a = Money::new(dec!(1), Currency::USD);
        let b = Money::new(dec!(2), Currency::USD);
        let c = Money::new(dec!(2), Currency::EUR);
        assert!(a < b);
        assert_eq!(a.partial_cmp(&c), None);
    }
}

mod allocation {
    use super::*;

    #[test]
    fn test_allocate_equal_parts() {
        let m = Money::new(dec!(90.00), Currency::USD);
        let parts = m.allocate(3).unwrap();
        assert!(parts.iter().all(|p| p.amount() == dec!(30.00)));
    }

    #[test]
    fn test_allocate_handles_remainder() {
        let m = Money::new(dec!(10.00), Currency::USD);
        let parts = m.allocate(7).unwrap();
        let amounts: Vec<Decimal> = parts.iter().map(|p| p.amount()).collect();
        assert_eq!(amounts[..3], [dec!(1.43), dec!(1.43), dec!(1.43)]);
        assert_eq!(amounts[3..], [dec!(1.42), dec!(1.42), dec!(1.42), dec!(1.42)]);
        assert_eq!(amounts.iter().sum::<Decimal>(), dec!(10.00));
    }

    #[test]
    fn test_allocate_zero_parts_error() {
        let m = Money::new(dec!(10.00), Currency::USD);
        assert!(matches!(m.allocate(0), Err(MoneyError::InvalidAmount(_))));
    }

    #[test]
    fn test_allocate_negative_amount_error() {
        let m = Money::new(dec!(-10.00), Currency::USD);
        assert!(matches!(m.allocate(2), Err(MoneyError::InvalidAmount(_))));
    }

    #[test]
    fn test_allocate_single_part() {
        let m = Money::new(dec!(42.42), Currency::USD);
        assert_eq!(m.allocate(1).unwrap(), vec![m]);
    }

    #[test]
    fn test_apportion_whole_percentages() {
        let m = Money::new(dec!(45.50), Currency::USD);
        let parts = m.apportion(&[dec!(70), dec!(30)]).unwrap();
        assert_eq!(parts, vec![
            Money::new(dec!(31.85), Currency::USD),
            Money::new(dec!(13.65), Currency::USD),
        ]);
    }

    #[test]
    fn test_apportion_spreads_cents_in_order_on_ties() {
        let m = Money::new(dec!(0.05), Currency::USD);
        let parts = m.apportion(&[dec!(10); 10]).unwrap();
        let amounts: Vec<Decimal> = parts.iter().map(|p| p.amount()).collect();

        assert_eq!(amounts[..5], [dec!(0.01); 5]);
        assert_eq!(amounts[5..], [dec!(0); 5]);
    }

    #[test]
    fn test_apportion_keeps_exact_amounts() {
        let m = Money::new(dec!(25.50), Currency::USD);
        let parts = m.apportion(&[dec!(10.00), dec!(15.50), dec!(0)]).unwrap();
        let amounts: Vec<Decimal> = parts.iter().map(|p| p.amount()).collect();
        assert_eq!(amounts, vec![dec!(10.00), dec!(15.50), dec!(0)]);
    }

    #[test]
    fn test_apportion_rejects_unusable_weights() {
        let m = Money::new(dec!(10.00), Currency::USD);
        assert!(matches!(m.apportion(&[]), Err(MoneyError::InvalidAmount(_))));
        assert!(matches!(m.apportion(&[dec!(0), dec!(0)]), Err(MoneyError::InvalidAmount(_))));
        assert!(matches!(m.apportion(&[dec!(1), dec!(-1)]), Err(MoneyError::InvalidAmount(_))));
    }

    #[test]
    fn test_to_minor_overflow() {
        let m = Money::new(Decimal::MAX, Currency::USD);
        assert_eq!(m.allocate(2), Err(MoneyError::Overflow));
    }
}

mod display_and_serialization {
    use super::*;

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(dec!(1234.5), Currency::USD).to_string(), "$ 1234.50");
        assert_eq!(Money::new(dec!(7), Currency::EUR).to_string(), "€ 7.00");
    }

    #[test]
    fn test_money_json_roundtrip() {
        let m = Money::new(dec!(33.33), Currency::GBP);
        let json = serde_json::to_string(&m).unwrap();
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }

    #[test]
    fn test_currency_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Currency::CHF).unwrap(), "\"CHF\"");
    }
}

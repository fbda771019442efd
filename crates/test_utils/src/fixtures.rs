//! Pre-built Test Fixtures
//!
//! Provides ready-to-use rosters, amounts and groups. Identifiers are fixed
//! so that fixtures compare equal across calls.

use chrono::NaiveDate;
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use core_kernel::{Currency, GroupId, MemberId, Money};
use domain_expense::{Expense, Member, SplitInstruction, Transfer};
use domain_settlement::GroupSnapshot;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Creates a USD amount
    pub fn usd(amount: Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }

    /// The one-hundred-dollar expense used by the A/B/C scenarios
    pub fn usd_100() -> Money {
        Self::usd(dec!(100.00))
    }

    /// A third of the A/B/C expense
    pub fn usd_third() -> Money {
        Self::usd(dec!(33.33))
    }

    /// Creates a EUR amount for currency mismatch tests
    pub fn eur_100() -> Money {
        Money::new(dec!(100.00), Currency::EUR)
    }
}

/// Fixture for group members
pub struct RosterFixtures;

impl RosterFixtures {
    pub fn alice() -> Member {
        Member::with_id(MemberId::from_uuid(Uuid::from_u128(0xA)), "A").with_email("a@example.com")
    }

    pub fn bob() -> Member {
        Member::with_id(MemberId::from_uuid(Uuid::from_u128(0xB)), "B").with_email("b@example.com")
    }

    pub fn carol() -> Member {
        Member::with_id(MemberId::from_uuid(Uuid::from_u128(0xC)), "C").with_email("c@example.com")
    }

    /// The three-member roster A, B, C in that order
    pub fn abc() -> Vec<Member> {
        vec![Self::alice(), Self::bob(), Self::carol()]
    }

    /// A member with a randomly generated name
    pub fn random_member() -> Member {
        let name: String = Name().fake();
        Member::new(name)
    }

    /// A roster of `size` members with random names
    pub fn random_roster(size: usize) -> Vec<Member> {
        (0..size).map(|_| Self::random_member()).collect()
    }
}

/// Fixture for dates
pub struct DateFixtures;

impl DateFixtures {
    pub fn jan_15_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date")
    }

    pub fn mar_01_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
    }
}

/// Fixture for whole groups
pub struct GroupFixtures;

impl GroupFixtures {
    pub fn group_id() -> GroupId {
        GroupId::from_uuid(Uuid::from_u128(0x6E0))
    }

    /// A pays 100.00 split equally across A, B and C
    pub fn abc_groceries() -> GroupSnapshot {
        let roster = RosterFixtures::abc();
        let expense = Expense::from_allocation(
            roster[0].id,
            MoneyFixtures::usd_100(),
            &roster,
            &SplitInstruction::Equal,
        )
        .expect("valid allocation")
        .with_description("Groceries")
        .on(DateFixtures::jan_15_2024());

        GroupSnapshot::new(Self::group_id(), Currency::USD)
            .with_roster(roster)
            .with_expense(expense)
    }

    /// `abc_groceries` after B paid A back 33.33 and A confirmed it
    pub fn abc_after_bob_repays() -> GroupSnapshot {
        let transfer = Transfer::confirmed(
            RosterFixtures::bob().id,
            RosterFixtures::alice().id,
            MoneyFixtures::usd_third(),
        )
        .expect("valid transfer")
        .on(DateFixtures::mar_01_2024());

        Self::abc_groceries().with_transfer(transfer)
    }
}

//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use core_kernel::{MemberId, Money};
use domain_expense::{Expense, ExpenseCategory, Member, SplitInstruction, Transfer, Weight};

use crate::fixtures::{DateFixtures, MoneyFixtures, RosterFixtures};

/// Builder for expenses
pub struct ExpenseBuilder {
    roster: Vec<Member>,
    payer: MemberId,
    total: Money,
    split: SplitInstruction,
    description: String,
    category: ExpenseCategory,
    date: NaiveDate,
}

impl Default for ExpenseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseBuilder {
    /// Creates a builder for A paying 100.00 split equally across A, B, C
    pub fn new() -> Self {
        let roster = RosterFixtures::abc();
        Self {
            payer: roster[0].id,
            roster,
            total: MoneyFixtures::usd_100(),
            split: SplitInstruction::Equal,
            description: "Test expense".to_string(),
            category: ExpenseCategory::Other,
            date: DateFixtures::jan_15_2024(),
        }
    }

    /// Sets the roster; the payer defaults to its first member
    pub fn with_roster(mut self, roster: Vec<Member>) -> Self {
        if let Some(first) = roster.first() {
            self.payer = first.id;
        }
        self.roster = roster;
        self
    }

    pub fn paid_by(mut self, payer: MemberId) -> Self {
        self.payer = payer;
        self
    }

    pub fn with_total(mut self, total: Money) -> Self {
        self.total = total;
        self
    }

    /// Splits by percentage
    pub fn percentages(mut self, weights: &[(MemberId, Decimal)]) -> Self {
        self.split = SplitInstruction::Percentage(to_weights(weights));
        self
    }

    /// Splits by exact amounts
    pub fn exact(mut self, weights: &[(MemberId, Decimal)]) -> Self {
        self.split = SplitInstruction::Exact(to_weights(weights));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: ExpenseCategory) -> Self {
        self.category = category;
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Builds the expense
    ///
    /// # Panics
    ///
    /// Panics if the split does not validate
    pub fn build(self) -> Expense {
        Expense::from_allocation(self.payer, self.total, &self.roster, &self.split)
            .expect("ExpenseBuilder produced an invalid split")
            .with_description(self.description)
            .with_category(self.category)
            .on(self.date)
    }
}

fn to_weights(weights: &[(MemberId, Decimal)]) -> Vec<Weight> {
    weights.iter().map(|(m, v)| Weight::new(*m, *v)).collect()
}

/// Builder for transfers
pub struct TransferBuilder {
    from: MemberId,
    to: MemberId,
    amount: Money,
    confirmed: bool,
    note: Option<String>,
    date: NaiveDate,
}

impl Default for TransferBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferBuilder {
    /// Creates a builder for a pending 33.33 transfer from B to A
    pub fn new() -> Self {
        Self {
            from: RosterFixtures::bob().id,
            to: RosterFixtures::alice().id,
            amount: MoneyFixtures::usd_third(),
            confirmed: false,
            note: None,
            date: DateFixtures::mar_01_2024(),
        }
    }

    pub fn from(mut self, member: MemberId) -> Self {
        self.from = member;
        self
    }

    pub fn to(mut self, member: MemberId) -> Self {
        self.to = member;
        self
    }

    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = amount;
        self
    }

    /// Marks the transfer as confirmed by the receiver
    pub fn confirmed(mut self) -> Self {
        self.confirmed = true;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Builds the transfer
    ///
    /// # Panics
    ///
    /// Panics if sender and receiver are equal or the amount is not positive
    pub fn build(self) -> Transfer {
        let mut transfer = Transfer::propose(self.from, self.to, self.amount)
            .expect("TransferBuilder produced an invalid transfer")
            .on(self.date);
        if let Some(note) = self.note {
            transfer = transfer.with_note(note);
        }
        if self.confirmed {
            transfer
                .confirm(self.to)
                .expect("receiver can confirm a pending transfer");
        }
        transfer
    }
}

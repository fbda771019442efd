//! Group spending statistics
//!
//! Read-only reports over a group snapshot. Expenses and transfers can be
//! restricted to an inclusive date range; monthly figures always cover a
//! full calendar year.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use core_kernel::{round_cents, Currency, MemberId, Money};
use domain_expense::{Expense, ExpenseCategory, Member, Transfer};
use crate::ports::GroupSnapshot;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Inclusive date range; open ends are unbounded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Range covering every date
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

/// The member who paid the most
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSpender {
    pub member: Member,
    pub total_spent: Money,
}

/// Headline figures for a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_expenses: Money,
    pub expense_count: usize,
    pub average_expense: Money,
    pub member_count: usize,
    pub average_per_person: Money,
    /// Confirmed transfers only
    pub total_payments: Money,
    pub top_spender: Option<TopSpender>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    pub total: Money,
    pub count: usize,
    /// Share of all spending, one decimal place
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthTotal {
    /// 1 to 12
    pub month: u32,
    pub name: String,
    pub total: Money,
    pub count: usize,
}

/// Expense-only figures for one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberStatistics {
    pub member: Member,
    pub total_paid: Money,
    pub total_owed: Money,
    pub expense_count: usize,
    pub balance: Money,
}

/// Every report at once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub summary: Summary,
    pub categories: Vec<CategoryTotal>,
    pub year: i32,
    pub months: Vec<MonthTotal>,
    pub members: Vec<MemberStatistics>,
}

/// Computes statistics over one snapshot
pub struct GroupStatistics<'a> {
    snapshot: &'a GroupSnapshot,
    range: DateRange,
}

impl<'a> GroupStatistics<'a> {
    pub fn new(snapshot: &'a GroupSnapshot) -> Self {
        Self {
            snapshot,
            range: DateRange::all(),
        }
    }

    /// Restricts expenses and transfers to `range`
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    fn currency(&self) -> Currency {
        self.snapshot.currency
    }

    fn money(&self, amount: Decimal) -> Money {
        Money::new(round_cents(amount), self.currency())
    }

    fn expenses(&self) -> impl Iterator<Item = &'a Expense> + '_ {
        self.snapshot
            .expenses
            .iter()
            .filter(move |e| self.range.contains(e.date))
    }

    fn confirmed_transfers(&self) -> impl Iterator<Item = &'a Transfer> + '_ {
        self.snapshot
            .transfers
            .iter()
            .filter(move |t| t.is_confirmed() && self.range.contains(t.date))
    }

    fn paid_by_member(&self) -> HashMap<MemberId, (Decimal, usize)> {
        let mut paid: HashMap<MemberId, (Decimal, usize)> = HashMap::new();
        for expense in self.expenses() {
            let entry = paid.entry(expense.payer).or_default();
            entry.0 += expense.total.amount();
            entry.1 += 1;
        }
        paid
    }

    pub fn summary(&self) -> Summary {
        let (total, count) = self
            .expenses()
            .fold((Decimal::ZERO, 0usize), |(sum, n), e| (sum + e.total.amount(), n + 1));
        let member_count = self.snapshot.roster.len();
        let payments: Decimal = self.confirmed_transfers().map(|t| t.amount.amount()).sum();

        let average = |divisor: usize| {
            if divisor == 0 {
                Decimal::ZERO
            } else {
                total / Decimal::from(divisor)
            }
        };

        // Ties go to whoever appears first in the roster
        let paid = self.paid_by_member();
        let top_spender = self
            .snapshot
            .roster
            .iter()
            .filter_map(|m| paid.get(&m.id).map(|(sum, _)| (m, *sum)))
            .fold(None::<(&Member, Decimal)>, |best, (member, sum)| match best {
                Some((_, top)) if top >= sum => best,
                _ => Some((member, sum)),
            })
            .map(|(member, sum)| TopSpender {
                member: member.clone(),
                total_spent: self.money(sum),
            });

        Summary {
            total_expenses: self.money(total),
            expense_count: count,
            average_expense: self.money(average(count)),
            member_count,
            average_per_person: self.money(average(member_count)),
            total_payments: self.money(payments),
            top_spender,
        }
    }

    /// Spending per category, largest first; categories without expenses are omitted
    pub fn by_category(&self) -> Vec<CategoryTotal> {
        let mut totals: Vec<(ExpenseCategory, Decimal, usize)> = Vec::new();
        for expense in self.expenses() {
            match totals.iter_mut().find(|(c, _, _)| *c == expense.category) {
                Some(entry) => {
                    entry.1 += expense.total.amount();
                    entry.2 += 1;
                }
                None => totals.push((expense.category, expense.total.amount(), 1)),
            }
        }

        let grand_total: Decimal = totals.iter().map(|(_, t, _)| *t).sum();
        totals.sort_by(|a, b| b.1.cmp(&a.1));

        totals
            .into_iter()
            .map(|(category, total, count)| CategoryTotal {
                category,
                total: self.money(total),
                count,
                percentage: if grand_total.is_zero() {
                    Decimal::ZERO
                } else {
                    (total / grand_total * dec!(100))
                        .round_dp_with_strategy(1, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
                },
            })
            .collect()
    }

    /// Twelve monthly totals for `year`; the date range is not applied
    pub fn by_month(&self, year: i32) -> Vec<MonthTotal> {
        let mut months = [(Decimal::ZERO, 0usize); 12];
        for expense in self.snapshot.expenses.iter().filter(|e| e.date.year() == year) {
            let slot = &mut months[expense.date.month0() as usize];
            slot.0 += expense.total.amount();
            slot.1 += 1;
        }

        months
            .iter()
            .zip(MONTH_NAMES)
            .enumerate()
            .map(|(i, ((total, count), name))| MonthTotal {
                month: i as u32 + 1,
                name: name.to_string(),
                total: self.money(*total),
                count: *count,
            })
            .collect()
    }

    /// Per-member figures from expenses only, highest payer first
    pub fn by_member(&self) -> Vec<MemberStatistics> {
        let paid = self.paid_by_member();
        let mut owed: HashMap<MemberId, Decimal> = HashMap::new();
        for expense in self.expenses() {
            for share in &expense.shares {
                *owed.entry(share.member).or_default() += share.amount.amount();
            }
        }

        let mut members: Vec<MemberStatistics> = self
            .snapshot
            .roster
            .iter()
            .map(|member| {
                let (total_paid, expense_count) = paid.get(&member.id).copied().unwrap_or_default();
                let total_owed = owed.get(&member.id).copied().unwrap_or_default();
                MemberStatistics {
                    member: member.clone(),
                    total_paid: self.money(total_paid),
                    total_owed: self.money(total_owed),
                    expense_count,
                    balance: self.money(total_paid - total_owed),
                }
            })
            .collect();

        members.sort_by(|a, b| b.total_paid.amount().cmp(&a.total_paid.amount()));
        members
    }

    /// All reports, with monthly figures for `year`
    pub fn report(&self, year: i32) -> StatisticsReport {
        StatisticsReport {
            summary: self.summary(),
            categories: self.by_category(),
            year,
            months: self.by_month(year),
            members: self.by_member(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::GroupId;
    use domain_expense::SplitInstruction;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot() -> GroupSnapshot {
        let roster = vec![Member::new("A"), Member::new("B"), Member::new("C")];
        let usd = |a: Decimal| Money::new(a, Currency::USD);
        let equal = |payer: MemberId, total: Decimal| {
            Expense::from_allocation(payer, usd(total), &roster, &SplitInstruction::Equal).unwrap()
        };

        GroupSnapshot::new(GroupId::new(), Currency::USD)
            .with_expense(equal(roster[0].id, dec!(90)).with_category(ExpenseCategory::Rent).on(date(2024, 1, 5)))
            .with_expense(equal(roster[1].id, dec!(30)).with_category(ExpenseCategory::Groceries).on(date(2024, 1, 20)))
            .with_expense(equal(roster[1].id, dec!(30)).with_category(ExpenseCategory::Groceries).on(date(2024, 3, 2)))
            .with_transfer(
                Transfer::confirmed(roster[2].id, roster[0].id, usd(dec!(10)))
                    .unwrap()
                    .on(date(2024, 2, 1)),
            )
            .with_transfer(Transfer::propose(roster[2].id, roster[1].id, usd(dec!(99))).unwrap())
            .with_roster(roster)
    }

    #[test]
    fn test_summary() {
        let snapshot = snapshot();
        let summary = GroupStatistics::new(&snapshot).summary();

        assert_eq!(summary.total_expenses.amount(), dec!(150));
        assert_eq!(summary.expense_count, 3);
        assert_eq!(summary.average_expense.amount(), dec!(50));
        assert_eq!(summary.member_count, 3);
        assert_eq!(summary.average_per_person.amount(), dec!(50));
        assert_eq!(summary.total_payments.amount(), dec!(10));
        assert_eq!(summary.top_spender.unwrap().member.display_name, "A");
    }

    #[test]
    fn test_top_spender_tie_goes_to_roster_order() {
        let mut snapshot = snapshot();
        snapshot.expenses.truncate(1);
        let roster = snapshot.roster.clone();
        snapshot.expenses.push(
            Expense::from_allocation(
                roster[1].id,
                Money::new(dec!(90), Currency::USD),
                &roster,
                &SplitInstruction::Equal,
            )
            .unwrap(),
        );

        let top = GroupStatistics::new(&snapshot).summary().top_spender.unwrap();
        assert_eq!(top.member.id, roster[0].id);
    }

    #[test]
    fn test_empty_group_summary() {
        let snapshot = GroupSnapshot::new(GroupId::new(), Currency::EUR);
        let summary = GroupStatistics::new(&snapshot).summary();

        assert!(summary.total_expenses.is_zero());
        assert!(summary.average_expense.is_zero());
        assert!(summary.average_per_person.is_zero());
        assert!(summary.top_spender.is_none());
    }

    #[test]
    fn test_by_category() {
        let snapshot = snapshot();
        let categories = GroupStatistics::new(&snapshot).by_category();

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].category, ExpenseCategory::Rent);
        assert_eq!(categories[0].percentage, dec!(60.0));
        assert_eq!(categories[1].count, 2);
        assert_eq!(categories[1].percentage, dec!(40.0));
    }

    #[test]
    fn test_by_month_is_zero_filled() {
        let snapshot = snapshot();
        let months = GroupStatistics::new(&snapshot).by_month(2024);

        assert_eq!(months.len(), 12);
        assert_eq!(months[0].name, "January");
        assert_eq!(months[0].total.amount(), dec!(120));
        assert_eq!(months[0].count, 2);
        assert_eq!(months[1].count, 0);
        assert_eq!(months[2].total.amount(), dec!(30));
        assert!(GroupStatistics::new(&snapshot).by_month(2023).iter().all(|m| m.count == 0));
    }

    #[test]
    fn test_by_member_sorted_by_paid() {
        let snapshot = snapshot();
        let members = GroupStatistics::new(&snapshot).by_member();

        assert_eq!(members[0].member.display_name, "A");
        assert_eq!(members[0].total_paid.amount(), dec!(90));
        assert_eq!(members[0].total_owed.amount(), dec!(50));
        assert_eq!(members[0].balance.amount(), dec!(40));
        assert_eq!(members[1].expense_count, 2);
        assert_eq!(members[2].total_paid.amount(), dec!(0));
    }

    #[test]
    fn test_date_range_filters_expenses_and_transfers() {
        let snapshot = snapshot();
        let range = DateRange::new(Some(date(2024, 1, 10)), Some(date(2024, 1, 31)));
        let summary = GroupStatistics::new(&snapshot).with_range(range).summary();

        assert_eq!(summary.expense_count, 1);
        assert_eq!(summary.total_expenses.amount(), dec!(30));
        assert!(summary.total_payments.is_zero());
    }

    #[test]
    fn test_date_range_contains_is_inclusive() {
        let range = DateRange::new(Some(date(2024, 1, 1)), Some(date(2024, 1, 31)));
        assert!(range.contains(date(2024, 1, 1)));
        assert!(range.contains(date(2024, 1, 31)));
        assert!(!range.contains(date(2024, 2, 1)));
        assert!(DateRange::all().contains(date(1999, 12, 31)));
    }
}

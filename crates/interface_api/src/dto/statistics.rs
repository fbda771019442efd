//! Statistics DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::Currency;
use domain_expense::{ExpenseCategory, Member};
use domain_settlement::{
    CategoryTotal, DateRange, MemberStatistics, MonthTotal, StatisticsReport, Summary, TopSpender,
};

/// Query string for the statistics endpoint
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub year: Option<i32>,
}

impl StatisticsQuery {
    /// The requested range, or `None` when it ends before it starts
    pub fn range(&self) -> Option<DateRange> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if end < start => None,
            (start, end) => Some(DateRange::new(start, end)),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSpenderResponse {
    pub user: Member,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
}

impl From<&TopSpender> for TopSpenderResponse {
    fn from(top: &TopSpender) -> Self {
        Self {
            user: top.member.clone(),
            total_spent: top.total_spent.amount(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expenses: Decimal,
    pub expense_count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_expense: Decimal,
    pub member_count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_per_person: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_payments: Decimal,
    pub top_spender: Option<TopSpenderResponse>,
}

impl From<&Summary> for SummaryResponse {
    fn from(summary: &Summary) -> Self {
        Self {
            total_expenses: summary.total_expenses.amount(),
            expense_count: summary.expense_count,
            average_expense: summary.average_expense.amount(),
            member_count: summary.member_count,
            average_per_person: summary.average_per_person.amount(),
            total_payments: summary.total_payments.amount(),
            top_spender: summary.top_spender.as_ref().map(TopSpenderResponse::from),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub category: ExpenseCategory,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
}

impl From<&CategoryTotal> for CategoryResponse {
    fn from(category: &CategoryTotal) -> Self {
        Self {
            category: category.category,
            total: category.total.amount(),
            count: category.count,
            percentage: category.percentage,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MonthResponse {
    pub month: u32,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub count: usize,
}

impl From<&MonthTotal> for MonthResponse {
    fn from(month: &MonthTotal) -> Self {
        Self {
            month: month.month,
            name: month.name.clone(),
            total: month.total.amount(),
            count: month.count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStatisticsResponse {
    pub user: Member,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_paid: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_owed: Decimal,
    pub expense_count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl From<&MemberStatistics> for MemberStatisticsResponse {
    fn from(stats: &MemberStatistics) -> Self {
        Self {
            user: stats.member.clone(),
            total_paid: stats.total_paid.amount(),
            total_owed: stats.total_owed.amount(),
            expense_count: stats.expense_count,
            balance: stats.balance.amount(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub currency: Currency,
    pub summary: SummaryResponse,
    pub categories: Vec<CategoryResponse>,
    pub year: i32,
    pub months: Vec<MonthResponse>,
    pub members: Vec<MemberStatisticsResponse>,
}

impl From<&StatisticsReport> for StatisticsResponse {
    fn from(report: &StatisticsReport) -> Self {
        Self {
            currency: report.summary.total_expenses.currency(),
            summary: SummaryResponse::from(&report.summary),
            categories: report.categories.iter().map(CategoryResponse::from).collect(),
            year: report.year,
            months: report.months.iter().map(MonthResponse::from).collect(),
            members: report.members.iter().map(MemberStatisticsResponse::from).collect(),
        }
    }
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Spending aggregation over in-memory record lists.
//!
//! Everything here is total: zero denominators yield 0. The one exception is
//! [`raw_percentage`], which reports a zero denominator as an error instead of
//! hiding it.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::alerts::{classify_display_tier, DisplayTier};
use crate::models::{BudgetAllocation, ExpenseRecord, InvestmentRecord, Period};

/// Budget utilization shown in overviews is capped at 150%.
pub const DISPLAY_UTILIZATION_CAP: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("attempted to divide by zero")]
    DivideByZero,
    #[error("arithmetic overflow")]
    Overflow,
}

/// `part / whole * 100`, or 0 when `whole` is zero.
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    raw_percentage(part, whole).unwrap_or(Decimal::ZERO)
}

/// `part / whole * 100` with no zero guard.
pub fn raw_percentage(part: Decimal, whole: Decimal) -> Result<Decimal, ArithmeticError> {
    if whole.is_zero() {
        return Err(ArithmeticError::DivideByZero);
    }
    part.checked_div(whole)
        .and_then(|q| q.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or(ArithmeticError::Overflow)
}

pub fn filter_by_period(expenses: &[ExpenseRecord], period: Period) -> Vec<ExpenseRecord> {
    expenses
        .iter()
        .filter(|e| period.contains(e.date))
        .cloned()
        .collect()
}

pub fn total_spent(expenses: &[ExpenseRecord]) -> Decimal {
    expenses.iter().map(|e| e.amount).sum()
}

/// Spending for one category in one period. Category match is exact.
pub fn category_spend(expenses: &[ExpenseRecord], category: &str, period: Period) -> Decimal {
    expenses
        .iter()
        .filter(|e| e.category == category && period.contains(e.date))
        .map(|e| e.amount)
        .sum()
}

/// `(salary - spent) / salary * 100`, 0 without a positive salary.
pub fn savings_rate(salary: Decimal, total_spent: Decimal) -> Decimal {
    if salary <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    percentage(salary - total_spent, salary)
}

pub fn budget_progress(total_allocated: Decimal, total_spent: Decimal) -> Decimal {
    if total_allocated <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    percentage(total_spent, total_allocated)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryStyle {
    pub icon: &'static str,
    pub background: &'static str,
    pub accent: &'static str,
}

/// Display metadata, looked up case-insensitively.
pub fn category_style(category: &str) -> CategoryStyle {
    let (icon, background, accent) = match category.to_lowercase().as_str() {
        "food" => ("🍔", "#FEF08A", "#EAB308"),
        "travel" => ("✈️", "#DBEAFE", "#0EA5E9"),
        "entertainment" => ("🎬", "#FCE7F3", "#EC4899"),
        "shopping" => ("🛍️", "#DDD6FE", "#A855F7"),
        "health" | "healthcare" => ("⚕️", "#E0E7FF", "#6366F1"),
        "education" => ("📚", "#F3F4F6", "#6B7280"),
        "utilities" => ("💡", "#CCFBF1", "#14B8A6"),
        "bills" => ("📋", "#F3F4F6", "#6B7280"),
        _ => ("📁", "#F3F4F6", "#6B7280"),
    };
    CategoryStyle {
        icon,
        background,
        accent,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAggregate {
    pub category: String,
    pub amount: Decimal,
    pub percentage: Decimal,
    pub count: usize,
    pub style: CategoryStyle,
}

/// Per-category sums in first-encountered order.
pub fn group_by_category(expenses: &[ExpenseRecord]) -> Vec<(String, Decimal, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Decimal, usize)> = Vec::new();
    for e in expenses {
        match index.get(e.category.as_str()) {
            Some(&i) => {
                groups[i].1 += e.amount;
                groups[i].2 += 1;
            }
            None => {
                index.insert(e.category.as_str(), groups.len());
                groups.push((e.category.clone(), e.amount, 1));
            }
        }
    }
    groups
}

/// Categories by descending amount; ties keep first-encountered order.
pub fn category_breakdown(expenses: &[ExpenseRecord]) -> Vec<CategoryAggregate> {
    let total = total_spent(expenses);
    let mut out: Vec<CategoryAggregate> = group_by_category(expenses)
        .into_iter()
        .map(|(category, amount, count)| CategoryAggregate {
            style: category_style(&category),
            percentage: percentage(amount, total),
            category,
            amount,
            count,
        })
        .collect();
    out.sort_by(|a, b| b.amount.cmp(&a.amount));
    out
}

pub fn recent_expenses(expenses: &[ExpenseRecord], n: usize) -> Vec<ExpenseRecord> {
    let mut sorted = expenses.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(n);
    sorted
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetRow {
    pub id: String,
    pub category: String,
    pub allocated: Decimal,
    pub spent: Decimal,
    pub percentage_used: Decimal,
    /// spent / allocated, capped at [`DISPLAY_UTILIZATION_CAP`]
    pub utilization: Decimal,
    pub exceeded: bool,
    pub tier: DisplayTier,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetOverview {
    pub period: Period,
    pub rows: Vec<BudgetRow>,
    pub total_allocated: Decimal,
    /// Everything spent in the period, budgeted categories or not.
    pub total_spent: Decimal,
    pub progress: Decimal,
}

pub fn budget_overview(
    allocations: &[BudgetAllocation],
    expenses: &[ExpenseRecord],
    period: Period,
) -> BudgetOverview {
    let total_spent = total_spent(&filter_by_period(expenses, period));
    let mut total_allocated = Decimal::ZERO;
    let mut rows = Vec::new();
    for b in allocations.iter().filter(|b| b.is_for(period)) {
        let spent = category_spend(expenses, &b.category, period);
        let pct = percentage(spent, b.allocated_amount);
        let exceeded = spent > b.allocated_amount;
        let utilization = if b.allocated_amount > Decimal::ZERO {
            (spent / b.allocated_amount).min(DISPLAY_UTILIZATION_CAP)
        } else {
            Decimal::ZERO
        };
        rows.push(BudgetRow {
            id: b.id.clone(),
            category: b.category.clone(),
            allocated: b.allocated_amount,
            spent,
            percentage_used: pct,
            utilization,
            exceeded,
            tier: classify_display_tier(pct),
            message: if exceeded {
                format!("Exceeded by {:.2}", spent - b.allocated_amount)
            } else {
                String::new()
            },
        });
        total_allocated += b.allocated_amount;
    }
    BudgetOverview {
        period,
        rows,
        total_allocated,
        total_spent,
        progress: budget_progress(total_allocated, total_spent),
    }
}

// Investments

/// `amount * rate / 100`; a missing rate counts as 0.
pub fn expected_annual_return(investment: &InvestmentRecord) -> Decimal {
    let rate = investment.return_rate.unwrap_or(Decimal::ZERO);
    investment.amount * rate / Decimal::ONE_HUNDRED
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioTotals {
    pub count: usize,
    pub total_value: Decimal,
    pub total_expected_return: Decimal,
}

pub fn portfolio_totals(investments: &[InvestmentRecord]) -> PortfolioTotals {
    PortfolioTotals {
        count: investments.len(),
        total_value: investments.iter().map(|i| i.amount).sum(),
        total_expected_return: investments.iter().map(expected_annual_return).sum(),
    }
}

/// Annually compounded value `P * (1 + r/100)^years`. `None` on overflow.
pub fn future_value(principal: Decimal, annual_rate_pct: Decimal, years: u32) -> Option<Decimal> {
    let factor = Decimal::ONE + annual_rate_pct / Decimal::ONE_HUNDRED;
    if factor == Decimal::ONE {
        return Some(principal);
    }
    let mut value = principal;
    for _ in 0..years {
        value = value.checked_mul(factor)?;
    }
    Some(value)
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Rule-based budget suggestions over the last three months of spending.

use chrono::{DateTime, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::group_by_category;
use crate::error::Result;
use crate::gateway::Gateway;
use crate::models::{BudgetAllocation, ExpenseRecord, Period, SalaryRecord};

pub const LOOKBACK_MONTHS: u32 = 3;
/// Headroom added on top of the average when suggesting an increase.
pub const INCREASE_BUFFER: Decimal = Decimal::from_parts(11, 0, 0, false, 1);
/// Average above allocation × this ratio escalates an increase to High.
pub const OVERSPEND_ESCALATION_RATIO: Decimal = Decimal::from_parts(12, 0, 0, false, 1);
/// Average below allocation × this ratio counts as underspending.
pub const UNDERSPEND_RATIO: Decimal = Decimal::from_parts(5, 0, 0, false, 1);
/// Headroom kept for occasional needs when suggesting a decrease.
pub const DECREASE_BUFFER: Decimal = Decimal::from_parts(12, 0, 0, false, 1);
pub const MIN_MONTHS_FOR_DECREASE: i64 = 2;
pub const MIN_SAVINGS_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);
pub const RECOMMENDED_SAVINGS_SHARE: Decimal = Decimal::from_parts(20, 0, 0, false, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SuggestionType {
    IncreaseCategory,
    DecreaseCategory,
    IncreaseSavings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSuggestion {
    pub kind: SuggestionType,
    pub category: Option<String>,
    pub current_amount: Decimal,
    pub suggested_amount: Decimal,
    pub reason: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAnalysis {
    pub category: String,
    pub total_spent: Decimal,
    pub months_tracked: i64,
    pub average_monthly_spending: Decimal,
}

/// Expenses dated within the last [`LOOKBACK_MONTHS`] months.
pub fn recent_window(expenses: &[ExpenseRecord], now: DateTime<Utc>) -> Vec<ExpenseRecord> {
    let cutoff = now
        .checked_sub_months(Months::new(LOOKBACK_MONTHS))
        .unwrap_or(now);
    expenses
        .iter()
        .filter(|e| e.date >= cutoff)
        .cloned()
        .collect()
}

/// Whole months since the earliest expense, plus one. The same value is
/// shared by every category. Never below 1.
pub fn months_tracked(expenses: &[ExpenseRecord], now: DateTime<Utc>) -> i64 {
    match expenses.iter().map(|e| e.date).min() {
        Some(earliest) => ((now - earliest).num_days() / 30 + 1).max(1),
        None => 1,
    }
}

pub fn analyze_by_category(expenses: &[ExpenseRecord], now: DateTime<Utc>) -> Vec<CategoryAnalysis> {
    let months = months_tracked(expenses, now);
    group_by_category(expenses)
        .into_iter()
        .map(|(category, total, _)| CategoryAnalysis {
            average_monthly_spending: total / Decimal::from(months),
            category,
            total_spent: total,
            months_tracked: months,
        })
        .collect()
}

/// `(salary - mean expense amount) / salary`, as a fraction. 0 without a
/// positive salary.
pub fn savings_ratio(salary: Decimal, expenses: &[ExpenseRecord]) -> Decimal {
    if salary <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let mean = if expenses.is_empty() {
        Decimal::ZERO
    } else {
        expenses.iter().map(|e| e.amount).sum::<Decimal>() / Decimal::from(expenses.len())
    };
    (salary - mean) / salary
}

/// Suggestions from already-fetched records. `expenses` may be the full
/// history; it is trimmed to the lookback window here.
pub fn generate_suggestions(
    expenses: &[ExpenseRecord],
    salary: Option<&SalaryRecord>,
    budgets: &[BudgetAllocation],
    now: DateTime<Utc>,
) -> Vec<BudgetSuggestion> {
    let recent = recent_window(expenses, now);
    let Some(salary) = salary else {
        return Vec::new();
    };
    if recent.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    for analysis in analyze_by_category(&recent, now) {
        let current = budgets
            .iter()
            .find(|b| b.category == analysis.category)
            .map(|b| b.allocated_amount)
            .unwrap_or(Decimal::ZERO);
        let avg = analysis.average_monthly_spending;

        if avg > current {
            let suggested = avg * INCREASE_BUFFER;
            let priority = if avg > current * OVERSPEND_ESCALATION_RATIO {
                Priority::High
            } else {
                Priority::Medium
            };
            out.push(BudgetSuggestion {
                kind: SuggestionType::IncreaseCategory,
                category: Some(analysis.category.clone()),
                current_amount: current,
                suggested_amount: suggested,
                reason: format!(
                    "You've been spending {:.2}/month on {}. Consider increasing budget to {:.2} to accommodate your needs.",
                    avg, analysis.category, suggested
                ),
                priority,
            });
        }

        if avg < current * UNDERSPEND_RATIO && analysis.months_tracked >= MIN_MONTHS_FOR_DECREASE {
            let suggested = avg * DECREASE_BUFFER;
            out.push(BudgetSuggestion {
                kind: SuggestionType::DecreaseCategory,
                category: Some(analysis.category.clone()),
                current_amount: current,
                suggested_amount: suggested,
                reason: format!(
                    "Your actual {} spending ({:.2}/month) is much lower than your budget. You could reduce to {:.2}.",
                    analysis.category, avg, suggested
                ),
                priority: Priority::Low,
            });
        }
    }

    let ratio = savings_ratio(salary.amount, &recent);
    if ratio < MIN_SAVINGS_RATE {
        let target = salary.amount * RECOMMENDED_SAVINGS_SHARE;
        out.push(BudgetSuggestion {
            kind: SuggestionType::IncreaseSavings,
            category: None,
            current_amount: Decimal::ZERO,
            suggested_amount: target,
            reason: format!(
                "Your savings rate is only {:.1}%. Consider aiming for at least 20% of your income ({:.2}) in savings.",
                ratio * Decimal::ONE_HUNDRED,
                target
            ),
            priority: Priority::High,
        });
    }

    // stable: equal priorities keep generation order
    out.sort_by(|a, b| b.priority.cmp(&a.priority));
    out
}

pub fn suggest_for_user<G: Gateway + ?Sized>(
    gateway: &G,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<Vec<BudgetSuggestion>> {
    let expenses = gateway.get_expenses(user_id)?;
    let salary = gateway.get_salary(user_id)?;
    let budgets = gateway.get_budgets(user_id, Period::current(now))?;
    let out = generate_suggestions(&expenses, salary.as_ref(), &budgets, now);
    debug!(user_id, suggestions = out.len(), "generated suggestions");
    Ok(out)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpendingInsight {
    pub total_spent: Decimal,
    pub average_expense: Decimal,
    pub highest_category: Option<String>,
    pub highest_amount: Decimal,
    pub insight: String,
}

pub fn spending_insight(expenses: &[ExpenseRecord]) -> SpendingInsight {
    if expenses.is_empty() {
        return SpendingInsight::default();
    }
    let total: Decimal = expenses.iter().map(|e| e.amount).sum();
    let mut top: Option<(String, Decimal)> = None;
    for (category, amount, _) in group_by_category(expenses) {
        if top.as_ref().is_none_or(|(_, best)| amount > *best) {
            top = Some((category, amount));
        }
    }
    let (highest_category, highest_amount) = match top {
        Some((c, a)) => (Some(c), a),
        None => (None, Decimal::ZERO),
    };
    SpendingInsight {
        total_spent: total,
        average_expense: total / Decimal::from(expenses.len()),
        insight: format!(
            "Your spending is trending high in {}. Consider reviewing this category for potential savings.",
            highest_category.as_deref().unwrap_or("Unknown")
        ),
        highest_category,
        highest_amount,
    }
}

pub fn analyze_spending_trends<G: Gateway + ?Sized>(
    gateway: &G,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<SpendingInsight> {
    let expenses = gateway.get_expenses(user_id)?;
    Ok(spending_insight(&recent_window(&expenses, now)))
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::{
    budget_progress, category_breakdown, filter_by_period, recent_expenses, savings_rate,
    total_spent, CategoryAggregate,
};
use crate::error::Result;
use crate::gateway::Gateway;
use crate::models::{ExpenseRecord, Period};

pub const RECENT_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub period: Period,
    pub monthly_salary: Decimal,
    pub total_investments: Decimal,
    pub total_spent: Decimal,
    pub total_budget: Decimal,
    pub budget_progress: Decimal,
    pub savings_rate: Decimal,
    pub breakdown: Vec<CategoryAggregate>,
    pub recent: Vec<ExpenseRecord>,
}

/// Everything the dashboard shows for `period`: salary, portfolio total,
/// spending breakdown, budget progress and the latest expenses.
pub fn load_dashboard<G: Gateway + ?Sized>(
    gateway: &G,
    user_id: &str,
    period: Period,
) -> Result<DashboardSummary> {
    let monthly_salary = gateway
        .get_salary(user_id)?
        .map(|s| s.amount)
        .unwrap_or(Decimal::ZERO);
    let total_investments = gateway
        .get_investments(user_id)?
        .iter()
        .map(|i| i.amount)
        .sum();
    let expenses = filter_by_period(&gateway.get_expenses(user_id)?, period);
    let spent = total_spent(&expenses);
    let total_budget: Decimal = gateway
        .get_budgets(user_id, period)?
        .iter()
        .map(|b| b.allocated_amount)
        .sum();

    Ok(DashboardSummary {
        period,
        monthly_salary,
        total_investments,
        total_spent: spent,
        total_budget,
        budget_progress: budget_progress(total_budget, spent),
        savings_rate: savings_rate(monthly_salary, spent),
        breakdown: category_breakdown(&expenses),
        recent: recent_expenses(&expenses, RECENT_LIMIT),
    })
}

pub fn load_current<G: Gateway + ?Sized>(
    gateway: &G,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<DashboardSummary> {
    load_dashboard(gateway, user_id, Period::current(now))
}

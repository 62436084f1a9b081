// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget alert classification.
//!
//! Two independent threshold tables live here: the alert severity used when
//! generating alerts (90 / 100 / 110) and the display tier used to color
//! budget rows (75 / 90 / 100).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::{category_spend, percentage};
use crate::error::Result;
use crate::gateway::Gateway;
use crate::models::{BudgetAllocation, ExpenseRecord, Period};

pub const CRITICAL_PCT: Decimal = Decimal::from_parts(110, 0, 0, false, 0);
pub const HIGH_PCT: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
pub const MEDIUM_PCT: Decimal = Decimal::from_parts(90, 0, 0, false, 0);

pub const RED_PCT: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
pub const ORANGE_PCT: Decimal = Decimal::from_parts(90, 0, 0, false, 0);
pub const YELLOW_PCT: Decimal = Decimal::from_parts(75, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlertLevel {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayTier {
    Green,
    Yellow,
    Orange,
    Red,
}

pub fn classify_alert_tier(percentage_used: Decimal) -> AlertLevel {
    if percentage_used >= CRITICAL_PCT {
        AlertLevel::Critical
    } else if percentage_used >= HIGH_PCT {
        AlertLevel::High
    } else if percentage_used >= MEDIUM_PCT {
        AlertLevel::Medium
    } else {
        AlertLevel::Low
    }
}

pub fn classify_display_tier(percentage_used: Decimal) -> DisplayTier {
    if percentage_used < YELLOW_PCT {
        DisplayTier::Green
    } else if percentage_used < ORANGE_PCT {
        DisplayTier::Yellow
    } else if percentage_used < RED_PCT {
        DisplayTier::Orange
    } else {
        DisplayTier::Red
    }
}

/// `max(0, spent - budget)`
pub fn overage(budget: Decimal, spent: Decimal) -> Decimal {
    (spent - budget).max(Decimal::ZERO)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAlert {
    pub category: String,
    pub budget_amount: Decimal,
    pub current_spending: Decimal,
    pub overage: Decimal,
    pub percentage_used: Decimal,
    pub percentage_exceeded: Decimal,
    pub has_exceeded: bool,
    pub level: AlertLevel,
    pub message: String,
    pub checked_at: DateTime<Utc>,
}

/// Build the alert record for one allocation given its period spend.
pub fn build_alert(allocation: &BudgetAllocation, spend: Decimal, now: DateTime<Utc>) -> BudgetAlert {
    let budget = allocation.allocated_amount;
    let pct = percentage(spend, budget);
    let over = overage(budget, spend);
    let has_exceeded = spend > budget;
    let message = if has_exceeded {
        format!(
            "{} budget exceeded! Spent {:.2} of {:.2} (Overage: {:.2})",
            allocation.category, spend, budget, over
        )
    } else {
        format!(
            "{} budget: {:.2} / {:.2} ({:.1}% used)",
            allocation.category, spend, budget, pct
        )
    };
    BudgetAlert {
        category: allocation.category.clone(),
        budget_amount: budget,
        current_spending: spend,
        overage: over,
        percentage_used: pct,
        percentage_exceeded: percentage(over, budget),
        has_exceeded,
        level: classify_alert_tier(pct),
        message,
        checked_at: now,
    }
}

pub fn evaluate_budget(
    allocation: &BudgetAllocation,
    expenses: &[ExpenseRecord],
    period: Period,
    now: DateTime<Utc>,
) -> BudgetAlert {
    let spend = category_spend(expenses, &allocation.category, period);
    build_alert(allocation, spend, now)
}

/// Alerts for the exceeded allocations of `period`, from already-fetched records.
pub fn exceeded_alerts(
    allocations: &[BudgetAllocation],
    expenses: &[ExpenseRecord],
    period: Period,
    now: DateTime<Utc>,
) -> Vec<BudgetAlert> {
    allocations
        .iter()
        .filter(|b| b.is_for(period))
        .map(|b| evaluate_budget(b, expenses, period, now))
        .filter(|a| a.has_exceeded)
        .collect()
}

/// Alerts for every allocation of the current period that has been exceeded.
/// Allocations within budget are left out.
pub fn check_all_budget_alerts<G: Gateway + ?Sized>(
    gateway: &G,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<Vec<BudgetAlert>> {
    if user_id.trim().is_empty() {
        return Ok(Vec::new());
    }
    let period = Period::current(now);
    let budgets = gateway.get_budgets(user_id, period)?;
    if budgets.is_empty() {
        return Ok(Vec::new());
    }
    let expenses = gateway.get_expenses(user_id)?;
    let alerts = exceeded_alerts(&budgets, &expenses, period, now);
    debug!(user_id, %period, budgets = budgets.len(), alerts = alerts.len(), "checked budget alerts");
    Ok(alerts)
}

/// The current-period alert for one category, if its budget is exceeded.
pub fn check_category_alert<G: Gateway + ?Sized>(
    gateway: &G,
    user_id: &str,
    category: &str,
    now: DateTime<Utc>,
) -> Result<Option<BudgetAlert>> {
    if user_id.trim().is_empty() || category.trim().is_empty() {
        return Ok(None);
    }
    let period = Period::current(now);
    let budgets = gateway.get_budgets(user_id, period)?;
    let Some(allocation) = budgets.iter().find(|b| b.category == category) else {
        return Ok(None);
    };
    let expenses = gateway.get_expenses(user_id)?;
    let alert = evaluate_budget(allocation, &expenses, period, now);
    Ok(alert.has_exceeded.then_some(alert))
}

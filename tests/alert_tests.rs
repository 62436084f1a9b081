// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, TimeZone, Utc};
use pennywise::alerts::{
    AlertLevel, DisplayTier, build_alert, check_all_budget_alerts, check_category_alert,
    classify_alert_tier, classify_display_tier, exceeded_alerts, overage,
};
use pennywise::gateway::{Gateway, SqliteGateway};
use pennywise::models::{BudgetAllocation, ExpenseRecord, Period};
use rust_decimal::Decimal;
use std::str::FromStr;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 20, 9, 0, 0).unwrap()
}

fn march() -> Period {
    Period::new(2025, 3).unwrap()
}

#[test]
fn display_tier_boundaries() {
    assert_eq!(classify_display_tier(d("74.9")), DisplayTier::Green);
    assert_eq!(classify_display_tier(d("75")), DisplayTier::Yellow);
    assert_eq!(classify_display_tier(d("89.9")), DisplayTier::Yellow);
    assert_eq!(classify_display_tier(d("90")), DisplayTier::Orange);
    assert_eq!(classify_display_tier(d("99.9")), DisplayTier::Orange);
    assert_eq!(classify_display_tier(d("100")), DisplayTier::Red);
    assert_eq!(classify_display_tier(Decimal::ZERO), DisplayTier::Green);
}

#[test]
fn alert_tier_boundaries() {
    assert_eq!(classify_alert_tier(d("89.99")), AlertLevel::Low);
    assert_eq!(classify_alert_tier(d("90")), AlertLevel::Medium);
    assert_eq!(classify_alert_tier(d("100")), AlertLevel::High);
    assert_eq!(classify_alert_tier(d("109.99")), AlertLevel::High);
    assert_eq!(classify_alert_tier(d("110")), AlertLevel::Critical);
    assert!(AlertLevel::Critical > AlertLevel::High);
}

#[test]
fn overage_is_never_negative() {
    assert_eq!(overage(d("900"), d("1000")), d("100"));
    assert_eq!(overage(d("900"), d("900")), Decimal::ZERO);
    assert_eq!(overage(d("900"), d("10")), Decimal::ZERO);
}

#[test]
fn alert_percentages() {
    let b = BudgetAllocation::new("Food", d("200"), march(), now());
    let half = build_alert(&b, d("100"), now());
    assert_eq!(half.percentage_used, d("50"));
    assert!(!half.has_exceeded);
    assert_eq!(half.message, "Food budget: 100.00 / 200.00 (50.0% used)");

    let full = build_alert(&b, d("200"), now());
    assert_eq!(full.percentage_used, d("100"));
    assert_eq!(full.level, AlertLevel::High);
    // spending exactly the budget is not exceeding it
    assert!(!full.has_exceeded);

    let over = build_alert(&b, d("300"), now());
    assert_eq!(over.percentage_used, d("150"));
    assert_eq!(over.percentage_exceeded, d("50"));
    assert_eq!(over.overage, d("100"));
    assert_eq!(over.level, AlertLevel::Critical);
    assert_eq!(
        over.message,
        "Food budget exceeded! Spent 300.00 of 200.00 (Overage: 100.00)"
    );
    assert_eq!(over.checked_at, now());
}

#[test]
fn only_exceeded_allocations_of_the_period_alert() {
    let budgets = vec![
        BudgetAllocation::new("Food", d("900"), march(), now()),
        BudgetAllocation::new("Travel", d("1000"), march(), now()),
        BudgetAllocation::new("Gifts", d("10"), Period::new(2025, 2).unwrap(), now()),
    ];
    let at = Utc.with_ymd_and_hms(2025, 3, 5, 0, 0, 0).unwrap();
    let expenses = vec![
        ExpenseRecord::new("Food", d("950"), at),
        ExpenseRecord::new("Travel", d("10"), at),
        ExpenseRecord::new("Gifts", d("500"), at),
    ];
    let alerts = exceeded_alerts(&budgets, &expenses, march(), now());
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].category, "Food");
}

#[test]
fn empty_user_or_no_budgets_give_no_alerts() {
    let gw = SqliteGateway::in_memory().unwrap();
    assert!(check_all_budget_alerts(&gw, "", now()).unwrap().is_empty());
    assert!(check_all_budget_alerts(&gw, "u1", now()).unwrap().is_empty());
    assert!(check_category_alert(&gw, "u1", "Food", now()).unwrap().is_none());
}

#[test]
fn category_check_reads_the_store() {
    let gw = SqliteGateway::in_memory().unwrap();
    gw.save_budget("u1", &BudgetAllocation::new("Food", d("100"), march(), now()))
        .unwrap();
    gw.save_budget("u1", &BudgetAllocation::new("Travel", d("100"), march(), now()))
        .unwrap();
    let at = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap();
    gw.save_expense("u1", &ExpenseRecord::new("Food", d("150"), at))
        .unwrap();
    gw.save_expense("u1", &ExpenseRecord::new("Travel", d("20"), at))
        .unwrap();

    let food = check_category_alert(&gw, "u1", "Food", now()).unwrap().unwrap();
    assert_eq!(food.overage, d("50"));
    assert_eq!(food.level, AlertLevel::Critical);
    assert!(check_category_alert(&gw, "u1", "Travel", now()).unwrap().is_none());
}

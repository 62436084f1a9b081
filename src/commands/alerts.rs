// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;

use crate::alerts::{AlertLevel, BudgetAlert, check_all_budget_alerts, check_category_alert};
use crate::commands::App;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

fn level_label(level: AlertLevel) -> &'static str {
    match level {
        AlertLevel::Low => "low",
        AlertLevel::Medium => "medium",
        AlertLevel::High => "HIGH",
        AlertLevel::Critical => "CRITICAL",
    }
}

pub fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    let user = app.user_id()?;
    let now = Utc::now();
    let alerts: Vec<BudgetAlert> = match m.get_one::<String>("category") {
        Some(cat) => check_category_alert(app.gateway(), user, cat.trim(), now)?
            .into_iter()
            .collect(),
        None => check_all_budget_alerts(app.gateway(), user, now)?,
    };
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &alerts)? {
        return Ok(());
    }
    if alerts.is_empty() {
        println!("✅ All budgets within limits");
        return Ok(());
    }
    let ccy = &app.currency;
    let data = alerts
        .iter()
        .map(|a| {
            vec![
                level_label(a.level).to_string(),
                a.category.clone(),
                fmt_money(&a.budget_amount, ccy),
                fmt_money(&a.current_spending, ccy),
                fmt_money(&a.overage, ccy),
                format!("{:.1}%", a.percentage_used),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Level", "Category", "Budget", "Spent", "Over", "Used"], data)
    );
    for a in &alerts {
        println!("⚠️  {}", a.message);
    }
    Ok(())
}

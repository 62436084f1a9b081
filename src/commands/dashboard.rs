// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;

use crate::commands::App;
use crate::dashboard::load_dashboard;
use crate::models::Period;
use crate::utils::{fmt_money, maybe_print_json, parse_period, pretty_table};

pub fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    let user = app.user_id()?;
    let period = match m.get_one::<String>("month") {
        Some(p) => parse_period(p)?,
        None => Period::current(Utc::now()),
    };
    let summary = load_dashboard(app.gateway(), user, period)?;
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &summary)? {
        return Ok(());
    }

    let ccy = &app.currency;
    let head = vec![
        vec!["Monthly salary".to_string(), fmt_money(&summary.monthly_salary, ccy)],
        vec!["Spent".into(), fmt_money(&summary.total_spent, ccy)],
        vec!["Budgeted".into(), fmt_money(&summary.total_budget, ccy)],
        vec![
            "Budget used".into(),
            format!("{:.1}%", summary.budget_progress),
        ],
        vec!["Savings rate".into(), format!("{:.1}%", summary.savings_rate)],
        vec!["Invested".into(), fmt_money(&summary.total_investments, ccy)],
    ];
    println!("Dashboard for {}", summary.period);
    println!("{}", pretty_table(&["", "Value"], head));

    if summary.breakdown.is_empty() {
        println!("No expenses this month");
        return Ok(());
    }
    let cats = summary
        .breakdown
        .iter()
        .map(|c| {
            vec![
                format!("{} {}", c.style.icon, c.category),
                fmt_money(&c.amount, ccy),
                format!("{:.1}%", c.percentage),
                c.count.to_string(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Spent", "Share", "Count"], cats));

    let recent = summary
        .recent
        .iter()
        .map(|e| {
            vec![
                e.date.format("%Y-%m-%d").to_string(),
                e.category.clone(),
                fmt_money(&e.amount, ccy),
                e.shop_name
                    .clone()
                    .or_else(|| e.description.clone())
                    .unwrap_or_default(),
            ]
        })
        .collect();
    println!("Recent");
    println!("{}", pretty_table(&["Date", "Category", "Amount", "Where"], recent));
    Ok(())
}

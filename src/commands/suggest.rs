// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;

use crate::commands::App;
use crate::suggest::{Priority, SuggestionType, analyze_spending_trends, suggest_for_user};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

pub fn suggestions(app: &App, m: &clap::ArgMatches) -> Result<()> {
    let user = app.user_id()?;
    let items = suggest_for_user(app.gateway(), user, Utc::now())?;
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &items)? {
        return Ok(());
    }
    if items.is_empty() {
        println!("No suggestions (needs a salary and expenses in the last three months)");
        return Ok(());
    }
    let ccy = &app.currency;
    let data = items
        .iter()
        .map(|s| {
            let what = match s.kind {
                SuggestionType::IncreaseCategory => "increase",
                SuggestionType::DecreaseCategory => "decrease",
                SuggestionType::IncreaseSavings => "save more",
            };
            let priority = match s.priority {
                Priority::High => "high",
                Priority::Medium => "medium",
                Priority::Low => "low",
            };
            vec![
                priority.to_string(),
                what.to_string(),
                s.category.clone().unwrap_or_else(|| "Savings".into()),
                fmt_money(&s.current_amount, ccy),
                fmt_money(&s.suggested_amount.round_dp(2), ccy),
                s.reason.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Priority", "Action", "Category", "Current", "Suggested", "Why"],
            data
        )
    );
    Ok(())
}

pub fn insights(app: &App, m: &clap::ArgMatches) -> Result<()> {
    let user = app.user_id()?;
    let insight = analyze_spending_trends(app.gateway(), user, Utc::now())?;
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &insight)? {
        return Ok(());
    }
    let Some(top) = insight.highest_category.as_deref() else {
        println!("No expenses in the last three months");
        return Ok(());
    };
    let ccy = &app.currency;
    let rows = vec![
        vec!["Total spent".to_string(), fmt_money(&insight.total_spent, ccy)],
        vec!["Average expense".into(), fmt_money(&insight.average_expense, ccy)],
        vec![
            "Top category".into(),
            format!("{} ({})", top, fmt_money(&insight.highest_amount, ccy)),
        ],
    ];
    println!("{}", pretty_table(&["", "Last 3 months"], rows));
    println!("{}", insight.insight);
    Ok(())
}

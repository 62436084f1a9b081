// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use chrono::Utc;

use crate::aggregate::budget_overview;
use crate::alerts::DisplayTier;
use crate::commands::App;
use crate::models::{BudgetAllocation, Period};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, parse_period, pretty_table};

pub fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(app, sub),
        Some(("list", sub)) => list(app, sub),
        Some(("rm", sub)) => remove(app, sub),
        Some(("status", sub)) => status(app, sub),
        _ => Ok(()),
    }
}

fn period_arg(sub: &clap::ArgMatches) -> Result<Period> {
    match sub.get_one::<String>("month") {
        Some(p) => parse_period(p),
        None => Ok(Period::current(Utc::now())),
    }
}

/// One allocation per category and month: an existing one is updated in place.
fn set(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let user = app.user_id()?;
    let category = sub.get_one::<String>("category").unwrap().trim();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let period = period_arg(sub)?;
    let notes = sub.get_one::<String>("notes").cloned();
    let now = Utc::now();

    let existing = app
        .gateway()
        .get_budgets(user, period)?
        .into_iter()
        .find(|b| b.category == category);
    let budget = match existing {
        Some(mut b) => {
            b.allocated_amount = amount;
            if notes.is_some() {
                b.notes = notes;
            }
            b.updated_at = Some(now);
            b
        }
        None => {
            let mut b = BudgetAllocation::new(category, amount, period, now);
            b.notes = notes;
            b
        }
    };
    let saved = app.gateway().save_budget(user, &budget)?;
    println!(
        "Budget set for {} / {} = {}",
        period,
        saved.category,
        fmt_money(&saved.allocated_amount, &app.currency)
    );
    Ok(())
}

fn list(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let user = app.user_id()?;
    let mut items = if sub.get_flag("all") {
        app.gateway().get_all_budgets(user)?
    } else {
        app.gateway().get_budgets(user, period_arg(sub)?)?
    };
    items.sort_by(|a, b| {
        b.period()
            .cmp(&a.period())
            .then_with(|| a.category.cmp(&b.category))
    });
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
        return Ok(());
    }
    let data = items
        .iter()
        .map(|b| {
            vec![
                b.id.clone(),
                b.period().to_string(),
                b.category.clone(),
                fmt_money(&b.allocated_amount, &app.currency),
                b.notes.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Month", "Category", "Budget", "Notes"], data)
    );
    Ok(())
}

fn remove(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let user = app.user_id()?;
    let id = sub.get_one::<String>("id").unwrap();
    let exists = app
        .gateway()
        .get_all_budgets(user)?
        .iter()
        .any(|b| b.id == *id);
    if !exists {
        bail!("Budget not found: {}", id);
    }
    app.gateway().delete_budget(user, id)?;
    println!("Deleted budget {}", id);
    Ok(())
}

fn tier_label(tier: DisplayTier) -> &'static str {
    match tier {
        DisplayTier::Green => "🟢 on track",
        DisplayTier::Yellow => "🟡 watch",
        DisplayTier::Orange => "🟠 near limit",
        DisplayTier::Red => "🔴 over",
    }
}

fn status(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let user = app.user_id()?;
    let period = period_arg(sub)?;
    let budgets = app.gateway().get_budgets(user, period)?;
    let expenses = app.gateway().get_expenses(user)?;
    let overview = budget_overview(&budgets, &expenses, period);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &overview)? {
        return Ok(());
    }
    let ccy = &app.currency;
    let data = overview
        .rows
        .iter()
        .map(|r| {
            vec![
                r.category.clone(),
                fmt_money(&r.allocated, ccy),
                fmt_money(&r.spent, ccy),
                format!("{:.1}%", r.percentage_used),
                tier_label(r.tier).to_string(),
                r.message.clone(),
            ]
        })
        .collect();
    println!("Budgets for {}", period);
    println!(
        "{}",
        pretty_table(&["Category", "Budget", "Spent", "Used", "Status", "Note"], data)
    );
    println!(
        "Total: {} of {} ({:.1}%)",
        fmt_money(&overview.total_spent, ccy),
        fmt_money(&overview.total_allocated, ccy),
        overview.progress
    );
    Ok(())
}

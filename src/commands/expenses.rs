// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::Utc;

use crate::aggregate::{category_style, filter_by_period};
use crate::commands::App;
use crate::models::ExpenseRecord;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, parse_period, parse_utc_date, pretty_table};

pub fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(app, sub),
        Some(("list", sub)) => list(app, sub),
        Some(("show", sub)) => show(app, sub),
        Some(("edit", sub)) => edit(app, sub),
        Some(("rm", sub)) => remove(app, sub),
        _ => Ok(()),
    }
}

fn opt(sub: &clap::ArgMatches, name: &str) -> Option<String> {
    sub.get_one::<String>(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn add(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let user = app.user_id()?;
    let category = sub.get_one::<String>("category").unwrap().trim();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let now = Utc::now();
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_utc_date(d)?,
        None => now,
    };
    let mut record = ExpenseRecord::new(category, amount, date);
    record.created_at = now;
    record.description = opt(sub, "description");
    record.shop_name = opt(sub, "shop");
    record.address = opt(sub, "address");
    record.location = opt(sub, "location");
    record.icon = Some(category_style(category).icon.to_string());

    let saved = app.gateway().save_expense(user, &record)?;
    println!(
        "Added expense {} ({} {})",
        saved.id,
        saved.category,
        fmt_money(&saved.amount, &app.currency)
    );
    Ok(())
}

fn list(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let user = app.user_id()?;
    let mut items = app.gateway().get_expenses(user)?;
    if let Some(p) = sub.get_one::<String>("month") {
        items = filter_by_period(&items, parse_period(p)?);
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        items.retain(|e| e.category == *cat);
    }
    if let Some(limit) = sub.get_one::<usize>("limit") {
        items.truncate(*limit);
    }
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
        return Ok(());
    }
    let data = items
        .iter()
        .map(|e| {
            vec![
                e.id.clone(),
                e.date.format("%Y-%m-%d").to_string(),
                format!("{} {}", category_style(&e.category).icon, e.category),
                fmt_money(&e.amount, &app.currency),
                e.shop_name.clone().unwrap_or_default(),
                e.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Date", "Category", "Amount", "Shop", "Description"], data)
    );
    Ok(())
}

fn show(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let user = app.user_id()?;
    let id = sub.get_one::<String>("id").unwrap();
    let e = app
        .gateway()
        .get_expense(user, id)?
        .with_context(|| format!("Expense not found: {}", id))?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &e)? {
        return Ok(());
    }
    let rows = vec![
        vec!["ID".to_string(), e.id.clone()],
        vec!["Date".into(), e.date.format("%Y-%m-%d").to_string()],
        vec!["Category".into(), e.category.clone()],
        vec!["Amount".into(), fmt_money(&e.amount, &app.currency)],
        vec!["Description".into(), e.description.clone().unwrap_or_default()],
        vec!["Shop".into(), e.shop_name.clone().unwrap_or_default()],
        vec!["Address".into(), e.address.clone().unwrap_or_default()],
        vec!["Location".into(), e.location.clone().unwrap_or_default()],
    ];
    println!("{}", pretty_table(&["Field", "Value"], rows));
    Ok(())
}

fn edit(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let user = app.user_id()?;
    let id = sub.get_one::<String>("id").unwrap();
    let mut e = app
        .gateway()
        .get_expense(user, id)?
        .with_context(|| format!("Expense not found: {}", id))?;
    if let Some(c) = opt(sub, "category") {
        e.icon = Some(category_style(&c).icon.to_string());
        e.category = c;
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        e.amount = parse_decimal(a)?;
    }
    if let Some(d) = sub.get_one::<String>("date") {
        e.date = parse_utc_date(d)?;
    }
    if let Some(d) = opt(sub, "description") {
        e.description = Some(d);
    }
    if let Some(s) = opt(sub, "shop") {
        e.shop_name = Some(s);
    }
    if let Some(a) = opt(sub, "address") {
        e.address = Some(a);
    }
    if let Some(l) = opt(sub, "location") {
        e.location = Some(l);
    }
    e.modified_at = Some(Utc::now());
    app.gateway().save_expense(user, &e)?;
    println!("Updated expense {}", id);
    Ok(())
}

fn remove(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let user = app.user_id()?;
    let id = sub.get_one::<String>("id").unwrap();
    app.gateway()
        .get_expense(user, id)?
        .with_context(|| format!("Expense not found: {}", id))?;
    app.gateway().delete_expense(user, id)?;
    println!("Deleted expense {}", id);
    Ok(())
}

// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::{expected_annual_return, future_value, portfolio_totals};
use crate::commands::App;
use crate::models::{InvestmentFrequency, InvestmentRecord};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, parse_utc_date, pretty_table};

pub fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(app, sub),
        Some(("list", sub)) => list(app, sub),
        Some(("edit", sub)) => edit(app, sub),
        Some(("rm", sub)) => remove(app, sub),
        Some(("project", sub)) => project(app, sub),
        _ => Ok(()),
    }
}

fn rate_arg(sub: &clap::ArgMatches) -> Result<Option<Decimal>> {
    sub.get_one::<String>("rate")
        .map(|r| parse_decimal(r))
        .transpose()
}

fn add(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let user = app.user_id()?;
    let now = Utc::now();
    let investment_date = match sub.get_one::<String>("date") {
        Some(d) => parse_utc_date(d)?,
        None => now,
    };
    let frequency: InvestmentFrequency = sub.get_one::<String>("frequency").unwrap().parse()?;
    let record = InvestmentRecord {
        id: String::new(),
        user_id: user.to_string(),
        investment_type: sub.get_one::<String>("type").unwrap().trim().to_string(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        return_rate: rate_arg(sub)?,
        investment_date,
        description: sub.get_one::<String>("description").cloned(),
        investment_frequency: frequency,
        created_at: now,
        updated_at: None,
    };
    let saved = app.gateway().save_investment(user, &record)?;
    println!(
        "Added investment {} ({} {})",
        saved.id,
        saved.investment_type,
        fmt_money(&saved.amount, &app.currency)
    );
    Ok(())
}

fn list(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let user = app.user_id()?;
    let items = app.gateway().get_investments(user)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
        return Ok(());
    }
    let ccy = &app.currency;
    let data = items
        .iter()
        .map(|i| {
            vec![
                i.id.clone(),
                i.investment_date.format("%Y-%m-%d").to_string(),
                i.investment_type.clone(),
                i.investment_frequency.to_string(),
                fmt_money(&i.amount, ccy),
                i.return_rate
                    .map(|r| format!("{:.2}%", r))
                    .unwrap_or_else(|| "-".into()),
                fmt_money(&expected_annual_return(i), ccy),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Type", "Frequency", "Amount", "Rate", "Expected / yr"],
            data
        )
    );
    let totals = portfolio_totals(&items);
    println!(
        "{} holdings, total {} (expected {} per year)",
        totals.count,
        fmt_money(&totals.total_value, ccy),
        fmt_money(&totals.total_expected_return, ccy)
    );
    Ok(())
}

/// Load, patch and save one investment. Only the given fields change.
fn edit(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let user = app.user_id()?;
    let id = sub.get_one::<String>("id").unwrap();
    let mut inv = app
        .gateway()
        .get_investment(user, id)?
        .with_context(|| format!("Investment not found: {}", id))?;
    if let Some(t) = sub.get_one::<String>("type") {
        inv.investment_type = t.trim().to_string();
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        inv.amount = parse_decimal(a)?;
    }
    if let Some(r) = rate_arg(sub)? {
        inv.return_rate = Some(r);
    }
    if let Some(d) = sub.get_one::<String>("date") {
        inv.investment_date = parse_utc_date(d)?;
    }
    if let Some(f) = sub.get_one::<String>("frequency") {
        inv.investment_frequency = f.parse()?;
    }
    if let Some(d) = sub.get_one::<String>("description") {
        inv.description = Some(d.clone());
    }
    inv.updated_at = Some(Utc::now());
    app.gateway().save_investment(user, &inv)?;
    println!("Updated investment {}", id);
    Ok(())
}

fn remove(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let user = app.user_id()?;
    let id = sub.get_one::<String>("id").unwrap();
    app.gateway()
        .get_investment(user, id)?
        .with_context(|| format!("Investment not found: {}", id))?;
    app.gateway().delete_investment(user, id)?;
    println!("Deleted investment {}", id);
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub id: String,
    pub investment_type: String,
    pub principal: Decimal,
    pub rate: Decimal,
    pub years: u32,
    pub future_value: Decimal,
}

pub fn projections(items: &[InvestmentRecord], years: u32) -> Result<Vec<Projection>> {
    items
        .iter()
        .map(|i| {
            let rate = i.return_rate.unwrap_or(Decimal::ZERO);
            let value = future_value(i.amount, rate, years)
                .with_context(|| format!("Projection overflowed for {}", i.id))?;
            Ok(Projection {
                id: i.id.clone(),
                investment_type: i.investment_type.clone(),
                principal: i.amount,
                rate,
                years,
                future_value: value.round_dp(2),
            })
        })
        .collect()
}

fn project(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let user = app.user_id()?;
    let years = *sub.get_one::<u32>("years").unwrap();
    let rows = projections(&app.gateway().get_investments(user)?, years)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let ccy = &app.currency;
    let total: Decimal = rows.iter().map(|p| p.future_value).sum();
    let data = rows
        .iter()
        .map(|p| {
            vec![
                p.investment_type.clone(),
                fmt_money(&p.principal, ccy),
                format!("{:.2}%", p.rate),
                fmt_money(&p.future_value, ccy),
            ]
        })
        .collect();
    let horizon = format!("After {}y", years);
    println!(
        "{}",
        pretty_table(&["Type", "Principal", "Rate", horizon.as_str()], data)
    );
    println!("Projected total: {}", fmt_money(&total, ccy));
    Ok(())
}

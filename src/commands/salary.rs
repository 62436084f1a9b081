// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;

use crate::commands::App;
use crate::models::{PayFrequency, SalaryRecord};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, parse_utc_date, pretty_table};

pub fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(app, sub),
        Some(("show", sub)) => show(app, sub),
        Some(("history", sub)) => history(app, sub),
        _ => Ok(()),
    }
}

/// Every `set` adds a record; the newest one is the current salary.
fn set(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let user = app.user_id()?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let frequency: PayFrequency = sub.get_one::<String>("frequency").unwrap().parse()?;
    let now = Utc::now();
    let start_date = match sub.get_one::<String>("start") {
        Some(d) => parse_utc_date(d)?,
        None => now,
    };
    let record = SalaryRecord {
        id: String::new(),
        user_id: user.to_string(),
        amount,
        frequency,
        start_date,
        notes: sub.get_one::<String>("notes").cloned(),
        created_at: now,
        updated_at: None,
    };
    let saved = app.gateway().save_salary(user, &record)?;
    println!(
        "Salary set to {} ({})",
        fmt_money(&saved.amount, &app.currency),
        saved.frequency
    );
    Ok(())
}

fn rows(app: &App, items: &[SalaryRecord]) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|s| {
            vec![
                s.created_at.format("%Y-%m-%d").to_string(),
                fmt_money(&s.amount, &app.currency),
                s.frequency.to_string(),
                s.start_date.format("%Y-%m-%d").to_string(),
                s.notes.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

const HEADERS: [&str; 5] = ["Recorded", "Amount", "Frequency", "Start", "Notes"];

fn show(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let user = app.user_id()?;
    let Some(current) = app.gateway().get_salary(user)? else {
        println!("No salary recorded (pennywise salary set --amount <n>)");
        return Ok(());
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &current)? {
        println!("{}", pretty_table(&HEADERS, rows(app, &[current])));
    }
    Ok(())
}

fn history(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let user = app.user_id()?;
    let items = app.gateway().get_salary_history(user)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
        println!("{}", pretty_table(&HEADERS, rows(app, &items)));
    }
    Ok(())
}

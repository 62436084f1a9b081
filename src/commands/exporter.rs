// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use serde_json::json;

use crate::aggregate::filter_by_period;
use crate::commands::App;
use crate::utils::parse_period;

pub fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("expenses", sub)) => export_expenses(app, sub),
        _ => Ok(()),
    }
}

fn export_expenses(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let user = app.user_id()?;
    let mut items = app.gateway().get_expenses(user)?;
    if let Some(p) = sub.get_one::<String>("month") {
        items = filter_by_period(&items, parse_period(p)?);
    }
    // oldest first in files
    items.reverse();

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record([
            "id",
            "date",
            "category",
            "amount",
            "currency",
            "description",
            "shop",
            "address",
            "location",
        ])?;
        for e in &items {
            let date = e.date.format("%Y-%m-%d").to_string();
            let amount = e.amount.to_string();
            wtr.write_record([
                e.id.as_str(),
                date.as_str(),
                e.category.as_str(),
                amount.as_str(),
                app.currency.as_str(),
                e.description.as_deref().unwrap_or_default(),
                e.shop_name.as_deref().unwrap_or_default(),
                e.address.as_deref().unwrap_or_default(),
                e.location.as_deref().unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
    } else {
        let rows: Vec<_> = items
            .iter()
            .map(|e| {
                json!({
                    "id": e.id,
                    "date": e.date.format("%Y-%m-%d").to_string(),
                    "category": e.category,
                    "amount": e.amount.to_string(),
                    "currency": app.currency,
                    "description": e.description,
                    "shop": e.shop_name,
                    "address": e.address,
                    "location": e.location,
                })
            })
            .collect();
        std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
    }
    println!("Exported {} expenses to {}", items.len(), out);
    Ok(())
}

// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use anyhow::Result;
use rust_decimal::Decimal;

use crate::commands::App;
use crate::gateway::Gateway;
use crate::utils::pretty_table;

/// `(issue, detail)` pairs for everything that looks wrong in the user's data.
pub fn diagnose<G: Gateway + ?Sized>(gw: &G, user: &str) -> Result<Vec<(String, String)>> {
    let mut rows = Vec::new();

    // 1) More than one allocation for a category in a month
    let budgets = gw.get_all_budgets(user)?;
    let mut seen: HashMap<(String, i32, u32), Vec<&str>> = HashMap::new();
    for b in &budgets {
        seen.entry((b.category.clone(), b.year, b.month))
            .or_default()
            .push(b.id.as_str());
    }
    let mut dups: Vec<_> = seen.into_iter().filter(|(_, ids)| ids.len() > 1).collect();
    dups.sort();
    for ((cat, year, month), ids) in dups {
        rows.push((
            "duplicate_budget".into(),
            format!("{} {:04}-{:02}: {}", cat, year, month, ids.join(", ")),
        ));
    }

    // 2) Amounts the store accepted but writes would reject
    let expenses = gw.get_expenses(user)?;
    for e in expenses.iter().filter(|e| e.amount <= Decimal::ZERO) {
        rows.push(("non_positive_expense".into(), format!("{} {}", e.id, e.amount)));
    }
    for b in budgets.iter().filter(|b| b.allocated_amount <= Decimal::ZERO) {
        rows.push((
            "non_positive_budget".into(),
            format!("{} {}", b.id, b.allocated_amount),
        ));
    }
    for i in gw
        .get_investments(user)?
        .iter()
        .filter(|i| i.amount <= Decimal::ZERO)
    {
        rows.push(("non_positive_investment".into(), format!("{} {}", i.id, i.amount)));
    }

    // 3) Cached profile total out of step with the expense list
    let actual: Decimal = expenses.iter().map(|e| e.amount).sum();
    match gw.get_total_expenses(user)? {
        Some(cached) if cached != actual => rows.push((
            "stale_total_expenses".into(),
            format!("cached {} vs actual {}", cached, actual),
        )),
        None if !expenses.is_empty() => rows.push((
            "stale_total_expenses".into(),
            format!("no cached total, actual {}", actual),
        )),
        _ => {}
    }
    Ok(rows)
}

pub fn handle(app: &App) -> Result<()> {
    let user = app.user_id()?;
    let rows = diagnose(app.gateway(), user)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let data = rows.into_iter().map(|(k, v)| vec![k, v]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], data));
    }
    Ok(())
}

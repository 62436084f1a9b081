// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use crate::auth::is_valid_email;
use crate::commands::App;
use crate::models::UserProfile;

pub fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("edit", sub)) => edit(app, sub),
        _ => Ok(()),
    }
}

/// Trimmed flag value. `Some(None)` means the flag was given empty.
fn field(sub: &clap::ArgMatches, name: &str) -> Option<Option<String>> {
    sub.get_one::<String>(name).map(|s| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    })
}

/// Apply the given fields, then store the profile with its total recomputed
/// from every expense on record.
fn edit(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let user = app.user_id()?;
    let gw = app.gateway();
    let now = Utc::now();
    let mut profile = gw.get_profile(user)?.unwrap_or_else(|| UserProfile {
        id: user.to_string(),
        full_name: String::new(),
        email: String::new(),
        created_at: now,
        phone_number: None,
        location: None,
        profile_image_url: None,
        total_expenses: Decimal::ZERO,
        last_modified: None,
    });

    if let Some(name) = field(sub, "name") {
        profile.full_name = name.unwrap_or_default();
    }
    if let Some(email) = field(sub, "email") {
        profile.email = email.unwrap_or_default();
    }
    if let Some(phone) = field(sub, "phone") {
        profile.phone_number = phone;
    }
    if let Some(location) = field(sub, "location") {
        profile.location = location;
    }

    if profile.full_name.is_empty() || profile.email.is_empty() {
        bail!("Name and email are required");
    }
    if !is_valid_email(&profile.email) {
        bail!("Please enter a valid email address");
    }

    profile.total_expenses = gw.get_expenses(user)?.iter().map(|e| e.amount).sum();
    profile.last_modified = Some(now);
    gw.save_profile(user, &profile)?;
    info!(user_id = user, "profile updated");
    println!("Profile updated for {}", profile.full_name);
    Ok(())
}

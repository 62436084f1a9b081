// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::Connection;
use serde_json::json;
use tracing::info;

use crate::auth::{IdentityClient, Session};
use crate::commands::config::clear_session;
use crate::commands::{App, backend};
use crate::models::UserProfile;
use crate::utils::{fmt_money, get_setting, maybe_print_json, pretty_table, set_setting};

fn identity(conn: &Connection) -> Result<IdentityClient> {
    let key = get_setting(conn, "api_key")?.unwrap_or_default();
    Ok(IdentityClient::new(&key)?)
}

fn store_session(conn: &Connection, session: &Session) -> Result<()> {
    set_setting(conn, "user_id", &session.local_id)?;
    set_setting(conn, "id_token", &session.id_token)?;
    set_setting(conn, "email", &session.email)?;
    Ok(())
}

pub fn login(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let email = m.get_one::<String>("email").unwrap();
    let password = m.get_one::<String>("password").unwrap();
    let session = identity(conn)?.sign_in(email, password)?;
    store_session(conn, &session)?;
    info!(user_id = session.local_id.as_str(), "signed in");
    println!("Signed in as {}", session.email);
    Ok(())
}

/// Create the account and write its profile document. A remote store is
/// reopened first so the write carries the new id token.
pub fn register(app: &mut App, m: &clap::ArgMatches) -> Result<()> {
    let name = m.get_one::<String>("name").unwrap().trim().to_string();
    let email = m.get_one::<String>("email").unwrap();
    let password = m.get_one::<String>("password").unwrap();
    if name.is_empty() {
        anyhow::bail!("Name is required");
    }
    let session = identity(&app.conn)?.sign_up(email, password)?;
    store_session(&app.conn, &session)?;
    if backend(&app.conn)? == "remote" {
        let path = crate::db::db_path()?;
        app.gateway = crate::commands::build_gateway(&app.conn, &path)?;
    }
    let profile = UserProfile {
        id: session.local_id.clone(),
        full_name: name,
        email: session.email.clone(),
        created_at: Utc::now(),
        phone_number: None,
        location: None,
        profile_image_url: None,
        total_expenses: Default::default(),
        last_modified: None,
    };
    app.gateway()
        .save_profile(&session.local_id, &profile)
        .context("Account created but the profile could not be saved")?;
    println!("Account created for {}", session.email);
    Ok(())
}

pub fn forgot_password(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let email = m.get_one::<String>("email").unwrap();
    identity(conn)?.send_password_reset(email)?;
    println!("Password reset email sent to {}", email.trim());
    Ok(())
}

pub fn logout(conn: &Connection) -> Result<()> {
    clear_session(conn)?;
    println!("Signed out");
    Ok(())
}

pub fn whoami(app: &App, m: &clap::ArgMatches) -> Result<()> {
    let backend = backend(&app.conn)?;
    let email = get_setting(&app.conn, "email")?;
    let user_id = app.user_id()?;
    let profile = app.gateway().get_profile(user_id)?;
    let value = json!({
        "backend": backend,
        "userId": user_id,
        "email": email,
        "profile": profile,
    });
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &value)? {
        return Ok(());
    }
    let mut rows = vec![
        vec!["Backend".to_string(), backend],
        vec!["User".to_string(), user_id.to_string()],
        vec!["Email".to_string(), email.unwrap_or_default()],
    ];
    if let Some(p) = profile.as_ref().filter(|p| !p.full_name.is_empty()) {
        rows.push(vec!["Name".into(), p.full_name.clone()]);
        rows.push(vec!["Member since".into(), p.created_at.format("%Y-%m-%d").to_string()]);
    }
    if let Some(p) = profile {
        rows.push(vec![
            "Total expenses".into(),
            fmt_money(&p.total_expenses, &app.currency),
        ]);
    }
    println!("{}", pretty_table(&["Field", "Value"], rows));
    Ok(())
}

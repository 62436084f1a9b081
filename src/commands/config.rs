// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;

use crate::utils::{clear_setting, maybe_print_json, pretty_table, set_setting};

/// Keys `config set` accepts. Session keys are written by `login` only.
pub const EDITABLE_KEYS: [&str; 4] = ["backend", "store_url", "api_key", "currency"];
const SESSION_KEYS: [&str; 3] = ["user_id", "id_token", "email"];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub),
        Some(("unset", sub)) => unset(conn, sub),
        Some(("show", sub)) => show(conn, sub),
        _ => Ok(()),
    }
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let key = sub.get_one::<String>("key").unwrap().trim().to_lowercase();
    let value = sub.get_one::<String>("value").unwrap().trim().to_string();
    if !EDITABLE_KEYS.contains(&key.as_str()) {
        bail!("Unknown setting '{}' (use {})", key, EDITABLE_KEYS.join("|"));
    }
    let value = match key.as_str() {
        "backend" if value != "local" && value != "remote" => {
            bail!("backend must be local or remote")
        }
        "currency" => value.to_uppercase(),
        _ => value,
    };
    set_setting(conn, &key, &value)?;
    println!("{} = {}", key, display_value(&key, &value));
    Ok(())
}

fn unset(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let key = sub.get_one::<String>("key").unwrap().trim().to_lowercase();
    clear_setting(conn, &key)?;
    println!("Removed {}", key);
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let rows = settings(conn)?;
    let data: Vec<Vec<String>> = rows
        .iter()
        .map(|(k, v)| vec![k.clone(), display_value(k, v)])
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", pretty_table(&["Key", "Value"], data));
    }
    Ok(())
}

/// Every stored setting, ordered by key.
pub fn settings(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Secrets are shown by their last four characters only.
pub fn display_value(key: &str, value: &str) -> String {
    if key != "api_key" && key != "id_token" {
        return value.to_string();
    }
    let n = value.chars().count();
    if n <= 4 {
        return "****".to_string();
    }
    let tail: String = value.chars().skip(n - 4).collect();
    format!("****{}", tail)
}

pub fn clear_session(conn: &Connection) -> Result<()> {
    for key in SESSION_KEYS {
        clear_setting(conn, key)?;
    }
    Ok(())
}

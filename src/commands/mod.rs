// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod account;
pub mod alerts;
pub mod budgets;
pub mod config;
pub mod dashboard;
pub mod doctor;
pub mod expenses;
pub mod exporter;
pub mod investments;
pub mod profile;
pub mod salary;
pub mod suggest;

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::error::Error;
use crate::gateway::{Gateway, RestGateway, SqliteGateway};
use crate::utils::{get_currency, get_setting};

/// User id used by the offline backend when nobody has signed in.
pub const LOCAL_USER: &str = "local";

/// Everything a command handler needs: the settings connection, the data
/// gateway chosen by the `backend` setting, and the session user.
pub struct App {
    pub conn: Connection,
    pub gateway: Box<dyn Gateway>,
    pub currency: String,
    user_id: Option<String>,
}

impl App {
    /// Build the gateway from the `backend` setting. `db_path` is the file
    /// the offline store lives in.
    pub fn open(conn: Connection, db_path: &Path) -> Result<Self> {
        let gateway = build_gateway(&conn, db_path)?;
        Self::with_gateway(conn, gateway)
    }

    pub fn with_gateway(conn: Connection, gateway: Box<dyn Gateway>) -> Result<Self> {
        let currency = get_currency(&conn)?;
        let backend = backend(&conn)?;
        let user_id = get_setting(&conn, "user_id")?
            .filter(|u| !u.trim().is_empty())
            .or_else(|| (backend == "local").then(|| LOCAL_USER.to_string()));
        Ok(Self {
            conn,
            gateway,
            currency,
            user_id,
        })
    }

    pub fn user_id(&self) -> Result<&str> {
        self.user_id.as_deref().ok_or_else(|| Error::NotSignedIn.into())
    }

    pub fn gateway(&self) -> &dyn Gateway {
        self.gateway.as_ref()
    }
}

pub fn backend(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, "backend")?.unwrap_or_else(|| "local".to_string()))
}

pub fn build_gateway(conn: &Connection, db_path: &Path) -> Result<Box<dyn Gateway>> {
    match backend(conn)?.as_str() {
        "local" => {
            let gw = SqliteGateway::open(db_path)
                .with_context(|| format!("Open local store at {}", db_path.display()))?;
            Ok(Box::new(gw))
        }
        "remote" => {
            let url = get_setting(conn, "store_url")?.unwrap_or_default();
            let token = get_setting(conn, "id_token")?;
            Ok(Box::new(RestGateway::new(&url, token)?))
        }
        other => anyhow::bail!("Unknown backend '{}' (use local|remote)", other),
    }
}

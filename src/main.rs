// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use pennywise::commands::{self, App};
use pennywise::{cli, db};

fn init_logging() {
    let filter = EnvFilter::try_from_env("PENNYWISE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;

    // commands that only touch settings or the identity service
    match matches.subcommand() {
        Some(("config", sub)) => return commands::config::handle(&conn, sub),
        Some(("login", sub)) => return commands::account::login(&conn, sub),
        Some(("forgot-password", sub)) => return commands::account::forgot_password(&conn, sub),
        Some(("logout", _)) => return commands::account::logout(&conn),
        None => {
            cli::build_cli().print_help()?;
            println!();
            return Ok(());
        }
        _ => {}
    }

    let mut app = App::open(conn, &db::db_path()?)?;
    match matches.subcommand() {
        Some(("register", sub)) => commands::account::register(&mut app, sub)?,
        Some(("whoami", sub)) => commands::account::whoami(&app, sub)?,
        Some(("profile", sub)) => commands::profile::handle(&app, sub)?,
        Some(("expense", sub)) => commands::expenses::handle(&app, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&app, sub)?,
        Some(("salary", sub)) => commands::salary::handle(&app, sub)?,
        Some(("investment", sub)) => commands::investments::handle(&app, sub)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&app, sub)?,
        Some(("alerts", sub)) => commands::alerts::handle(&app, sub)?,
        Some(("suggest", sub)) => commands::suggest::suggestions(&app, sub)?,
        Some(("insights", sub)) => commands::suggest::insights(&app, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&app, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&app)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{TimeZone, Utc};
use pennywise::commands::config::display_value;
use pennywise::commands::doctor::diagnose;
use pennywise::commands::investments::projections;
use pennywise::commands::{App, LOCAL_USER, budgets, config, expenses, exporter, profile};
use pennywise::gateway::{Gateway, SqliteGateway};
use pennywise::models::{BudgetAllocation, ExpenseRecord, Period};
use pennywise::{cli, db, utils};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;
use tempfile::tempdir;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn settings_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn app() -> App {
    App::with_gateway(settings_conn(), Box::new(SqliteGateway::in_memory().unwrap())).unwrap()
}

fn run(app: &App, argv: &[&str]) -> anyhow::Result<()> {
    let mut full = vec!["pennywise"];
    full.extend_from_slice(argv);
    let matches = cli::build_cli().get_matches_from(full);
    match matches.subcommand() {
        Some(("expense", sub)) => expenses::handle(app, sub),
        Some(("budget", sub)) => budgets::handle(app, sub),
        Some(("export", sub)) => exporter::handle(app, sub),
        Some(("config", sub)) => config::handle(&app.conn, sub),
        Some(("profile", sub)) => profile::handle(app, sub),
        other => panic!("unexpected subcommand {:?}", other.map(|(n, _)| n)),
    }
}

#[test]
fn local_backend_works_without_sign_in() {
    let app = app();
    assert_eq!(app.user_id().unwrap(), LOCAL_USER);
    assert_eq!(app.currency, "INR");
}

#[test]
fn remote_backend_requires_a_session() {
    let conn = settings_conn();
    utils::set_setting(&conn, "backend", "remote").unwrap();
    let app = App::with_gateway(conn, Box::new(SqliteGateway::in_memory().unwrap())).unwrap();
    assert!(app.user_id().is_err());

    let conn = settings_conn();
    utils::set_setting(&conn, "backend", "remote").unwrap();
    utils::set_setting(&conn, "user_id", "abc123").unwrap();
    let app = App::with_gateway(conn, Box::new(SqliteGateway::in_memory().unwrap())).unwrap();
    assert_eq!(app.user_id().unwrap(), "abc123");
}

#[test]
fn expense_add_stores_the_record() {
    let app = app();
    run(
        &app,
        &[
            "expense", "add", "--category", "Food", "--amount", "250.75", "--date", "2025-03-04",
            "--shop", "Corner Cafe",
        ],
    )
    .unwrap();
    let list = app.gateway().get_expenses(LOCAL_USER).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].amount, d("250.75"));
    assert_eq!(list[0].shop_name.as_deref(), Some("Corner Cafe"));
    assert_eq!(list[0].date, Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap());
    assert_eq!(list[0].icon.as_deref(), Some("🍔"));

    assert!(run(&app, &["expense", "add", "--category", "Food", "--amount", "0"]).is_err());
    assert!(run(&app, &["expense", "add", "--category", "Food", "--amount", "abc"]).is_err());
}

#[test]
fn budget_set_updates_the_existing_allocation() {
    let app = app();
    run(&app, &["budget", "set", "--category", "Food", "--amount", "900", "--month", "2025-03"]).unwrap();
    run(&app, &["budget", "set", "--category", "Food", "--amount", "1200", "--month", "2025-03"]).unwrap();
    run(&app, &["budget", "set", "--category", "Food", "--amount", "500", "--month", "2025-04"]).unwrap();

    let march = app
        .gateway()
        .get_budgets(LOCAL_USER, Period::new(2025, 3).unwrap())
        .unwrap();
    assert_eq!(march.len(), 1);
    assert_eq!(march[0].allocated_amount, d("1200"));
    assert!(march[0].updated_at.is_some());
    assert_eq!(app.gateway().get_all_budgets(LOCAL_USER).unwrap().len(), 2);

    assert!(run(&app, &["budget", "set", "--category", "Food", "--amount", "1", "--month", "2025-13"]).is_err());
    assert!(run(&app, &["budget", "rm", "missing-id"]).is_err());
}

#[test]
fn export_expenses_writes_pretty_json() {
    let app = app();
    let gw = app.gateway();
    let mut e = ExpenseRecord::new("Food", d("12.34"), Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap());
    e.id = "e1".into();
    e.shop_name = Some("Corner Shop".into());
    gw.save_expense(LOCAL_USER, &e).unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();
    run(&app, &["export", "expenses", "--format", "json", "--out", &out_str]).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": "e1",
                "date": "2025-01-02",
                "category": "Food",
                "amount": "12.34",
                "currency": "INR",
                "description": null,
                "shop": "Corner Shop",
                "address": null,
                "location": null
            }
        ])
    );
}

#[test]
fn export_expenses_csv_and_unknown_format() {
    let app = app();
    let at = Utc.with_ymd_and_hms(2025, 2, 10, 0, 0, 0).unwrap();
    app.gateway()
        .save_expense(LOCAL_USER, &ExpenseRecord::new("Travel", d("300"), at))
        .unwrap();

    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("out.csv");
    let csv_str = csv_path.to_string_lossy().to_string();
    run(&app, &["export", "expenses", "--out", &csv_str]).unwrap();
    let mut rdr = csv::Reader::from_path(&csv_path).unwrap();
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][1], "2025-02-10");
    assert_eq!(&rows[0][2], "Travel");
    assert_eq!(&rows[0][3], "300");

    let bad = dir.path().join("out.xml");
    let bad_str = bad.to_string_lossy().to_string();
    assert!(run(&app, &["export", "expenses", "--format", "xml", "--out", &bad_str]).is_err());
    assert!(!bad.exists());
}

#[test]
fn doctor_reports_duplicates_and_stale_totals() {
    let app = app();
    let gw = app.gateway();
    let march = Period::new(2025, 3).unwrap();
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    assert!(diagnose(gw, LOCAL_USER).unwrap().is_empty());

    gw.save_budget(LOCAL_USER, &BudgetAllocation::new("Food", d("100"), march, now))
        .unwrap();
    gw.save_budget(LOCAL_USER, &BudgetAllocation::new("Food", d("200"), march, now))
        .unwrap();
    gw.save_expense(LOCAL_USER, &ExpenseRecord::new("Food", d("40"), now))
        .unwrap();
    gw.set_total_expenses(LOCAL_USER, d("10")).unwrap();

    let issues: Vec<String> = diagnose(gw, LOCAL_USER)
        .unwrap()
        .into_iter()
        .map(|(k, _)| k)
        .collect();
    assert_eq!(issues, ["duplicate_budget", "stale_total_expenses"]);
}

#[test]
fn config_set_accepts_known_keys_only() {
    let app = app();
    run(&app, &["config", "set", "currency", "usd"]).unwrap();
    assert_eq!(utils::get_currency(&app.conn).unwrap(), "USD");
    assert!(run(&app, &["config", "set", "backend", "cloud"]).is_err());
    assert!(run(&app, &["config", "set", "user_id", "x"]).is_err());
    assert_eq!(display_value("api_key", "AIzaSyExample1234"), "****1234");
    assert_eq!(display_value("currency", "USD"), "USD");
}

#[test]
fn projections_compound_each_holding() {
    use pennywise::models::{InvestmentFrequency, InvestmentRecord};
    let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let inv = InvestmentRecord {
        id: "i1".into(),
        user_id: LOCAL_USER.into(),
        investment_type: "Fixed Deposit".into(),
        amount: d("10000"),
        return_rate: Some(d("5")),
        investment_date: at,
        description: None,
        investment_frequency: InvestmentFrequency::OneTime,
        created_at: at,
        updated_at: None,
    };
    let p = projections(&[inv], 5).unwrap();
    assert_eq!(p[0].future_value, d("12762.82"));
}

#[test]
fn expense_edit_changes_address_and_location() {
    let app = app();
    let at = Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap();
    let saved = app
        .gateway()
        .save_expense(LOCAL_USER, &ExpenseRecord::new("Food", d("20"), at))
        .unwrap();
    run(
        &app,
        &[
            "expense", "edit", saved.id.as_str(), "--address", "12 MG Road", "--location", "Pune",
        ],
    )
    .unwrap();
    let got = app.gateway().get_expense(LOCAL_USER, &saved.id).unwrap().unwrap();
    assert_eq!(got.address.as_deref(), Some("12 MG Road"));
    assert_eq!(got.location.as_deref(), Some("Pune"));
    assert!(got.modified_at.is_some());
}

#[test]
fn profile_edit_updates_fields_and_recomputes_total() {
    let app = app();
    let gw = app.gateway();
    let at = Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap();
    gw.save_expense(LOCAL_USER, &ExpenseRecord::new("Food", d("40"), at))
        .unwrap();
    gw.save_expense(LOCAL_USER, &ExpenseRecord::new("Travel", d("60"), at))
        .unwrap();
    gw.set_total_expenses(LOCAL_USER, d("5")).unwrap();

    assert!(run(&app, &["profile", "edit", "--name", "Asha Rao"]).is_err());
    run(
        &app,
        &[
            "profile", "edit", "--name", "Asha Rao", "--email", "asha@example.com", "--phone",
            "98200 00000", "--location", "Pune",
        ],
    )
    .unwrap();
    let p = gw.get_profile(LOCAL_USER).unwrap().unwrap();
    assert_eq!(p.full_name, "Asha Rao");
    assert_eq!(p.phone_number.as_deref(), Some("98200 00000"));
    assert_eq!(p.total_expenses, d("100"));
    assert!(p.last_modified.is_some());
    assert!(diagnose(gw, LOCAL_USER).unwrap().is_empty());

    run(&app, &["profile", "edit", "--phone", ""]).unwrap();
    let p = gw.get_profile(LOCAL_USER).unwrap().unwrap();
    assert!(p.phone_number.is_none());
    assert_eq!(p.location.as_deref(), Some("Pune"));
    assert!(run(&app, &["profile", "edit", "--email", "not-an-email"]).is_err());
}

#[test]
fn projection_years_are_capped() {
    let parse = |years: &str| {
        cli::build_cli().try_get_matches_from(["pennywise", "investment", "project", "--years", years])
    };
    assert!(parse("100").is_ok());
    assert!(parse("101").is_err());
    assert!(parse("4000000000").is_err());
}

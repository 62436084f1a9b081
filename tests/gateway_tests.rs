// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, TimeZone, Utc};
use pennywise::error::Error;
use pennywise::gateway::{Gateway, SqliteGateway, paths, read_collection};
use pennywise::models::{
    BudgetAllocation, ExpenseRecord, InvestmentFrequency, InvestmentRecord, PayFrequency, Period,
    SalaryRecord, UserProfile,
};
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn at(y: i32, m: u32, dd: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, dd, 8, 30, 0).unwrap()
}

fn gw() -> SqliteGateway {
    SqliteGateway::in_memory().unwrap()
}

fn salary(amount: &str, created: DateTime<Utc>) -> SalaryRecord {
    SalaryRecord {
        id: String::new(),
        user_id: String::new(),
        amount: d(amount),
        frequency: PayFrequency::Monthly,
        start_date: created,
        notes: None,
        created_at: created,
        updated_at: None,
    }
}

fn investment(amount: &str, rate: Option<&str>, created: DateTime<Utc>) -> InvestmentRecord {
    InvestmentRecord {
        id: String::new(),
        user_id: String::new(),
        investment_type: "Stocks".into(),
        amount: d(amount),
        return_rate: rate.map(d),
        investment_date: created,
        description: None,
        investment_frequency: InvestmentFrequency::MonthlySip,
        created_at: created,
        updated_at: None,
    }
}

#[test]
fn expense_crud_assigns_ids_and_refreshes_total() {
    let g = gw();
    let a = g
        .save_expense("u1", &ExpenseRecord::new("Food", d("12.5"), at(2025, 3, 1)))
        .unwrap();
    let b = g
        .save_expense("u1", &ExpenseRecord::new("Travel", d("30"), at(2025, 3, 5)))
        .unwrap();
    assert!(!a.id.is_empty());
    assert_ne!(a.id, b.id);
    assert_eq!(a.user_id, "u1");

    let list = g.get_expenses("u1").unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].id, b.id, "newest first");
    assert_eq!(g.get_total_expenses("u1").unwrap(), Some(d("42.5")));

    let mut edited = g.get_expense("u1", &a.id).unwrap().unwrap();
    edited.amount = d("20");
    let saved = g.save_expense("u1", &edited).unwrap();
    assert_eq!(saved.id, a.id, "saving a keyed record replaces it");
    assert_eq!(g.get_expenses("u1").unwrap().len(), 2);
    assert_eq!(g.get_total_expenses("u1").unwrap(), Some(d("50")));

    g.delete_expense("u1", &b.id).unwrap();
    assert!(g.get_expense("u1", &b.id).unwrap().is_none());
    assert_eq!(g.get_total_expenses("u1").unwrap(), Some(d("20")));

    // other users are untouched
    assert!(g.get_expenses("u2").unwrap().is_empty());
}

#[test]
fn writes_are_validated() {
    let g = gw();
    let zero = ExpenseRecord::new("Food", Decimal::ZERO, at(2025, 3, 1));
    assert!(matches!(g.save_expense("u1", &zero), Err(Error::InvalidData(_))));
    let blank = ExpenseRecord::new("  ", d("5"), at(2025, 3, 1));
    assert!(matches!(g.save_expense("u1", &blank), Err(Error::InvalidData(_))));
    let ok = ExpenseRecord::new("Food", d("5"), at(2025, 3, 1));
    assert!(matches!(g.save_expense("", &ok), Err(Error::InvalidData(_))));

    let mut bad_month = BudgetAllocation::new("Food", d("10"), Period::new(2025, 3).unwrap(), at(2025, 3, 1));
    bad_month.month = 13;
    assert!(g.save_budget("u1", &bad_month).is_err());
    let negative = BudgetAllocation::new("Food", d("-1"), Period::new(2025, 3).unwrap(), at(2025, 3, 1));
    assert!(g.save_budget("u1", &negative).is_err());

    assert!(g.save_salary("u1", &salary("0", at(2025, 1, 1))).is_err());
    assert!(g
        .save_investment("u1", &investment("100", Some("-2"), at(2025, 1, 1)))
        .is_err());
    assert!(g.get_expenses("u1").unwrap().is_empty());
}

#[test]
fn budgets_filter_by_period_and_sort_by_category() {
    let g = gw();
    let march = Period::new(2025, 3).unwrap();
    let april = Period::new(2025, 4).unwrap();
    let now = at(2025, 3, 1);
    for (cat, p) in [("Travel", march), ("Food", march), ("Food", april)] {
        g.save_budget("u1", &BudgetAllocation::new(cat, d("100"), p, now))
            .unwrap();
    }
    let cats: Vec<_> = g
        .get_budgets("u1", march)
        .unwrap()
        .into_iter()
        .map(|b| b.category)
        .collect();
    assert_eq!(cats, ["Food", "Travel"]);
    assert_eq!(g.get_all_budgets("u1").unwrap().len(), 3);

    let april_food = &g.get_budgets("u1", april).unwrap()[0];
    g.delete_budget("u1", &april_food.id).unwrap();
    assert!(g.get_budgets("u1", april).unwrap().is_empty());
}

#[test]
fn salary_is_the_most_recently_created() {
    let g = gw();
    assert!(g.get_salary("u1").unwrap().is_none());
    g.save_salary("u1", &salary("40000", at(2024, 6, 1))).unwrap();
    g.save_salary("u1", &salary("52000", at(2025, 1, 1))).unwrap();
    g.save_salary("u1", &salary("45000", at(2024, 9, 1))).unwrap();
    assert_eq!(g.get_salary("u1").unwrap().unwrap().amount, d("52000"));
    assert_eq!(g.get_salary_history("u1").unwrap().len(), 3);
}

#[test]
fn investments_newest_first_and_editable() {
    let g = gw();
    let old = g
        .save_investment("u1", &investment("1000", Some("7"), at(2024, 1, 1)))
        .unwrap();
    g.save_investment("u1", &investment("500", None, at(2025, 1, 1)))
        .unwrap();
    let list = g.get_investments("u1").unwrap();
    assert_eq!(list[0].amount, d("500"));

    let mut edit = g.get_investment("u1", &old.id).unwrap().unwrap();
    edit.return_rate = Some(d("9"));
    g.save_investment("u1", &edit).unwrap();
    let got = g.get_investment("u1", &old.id).unwrap().unwrap();
    assert_eq!(got.return_rate, Some(d("9")));
    assert_eq!(got.investment_frequency, InvestmentFrequency::MonthlySip);

    g.delete_investment("u1", &old.id).unwrap();
    assert_eq!(g.get_investments("u1").unwrap().len(), 1);
}

#[test]
fn profile_keeps_cached_total_beneath_it() {
    let g = gw();
    assert!(g.get_profile("u1").unwrap().is_none());
    let profile = UserProfile {
        id: String::new(),
        full_name: "Asha Rao".into(),
        email: "asha@example.com".into(),
        created_at: at(2025, 1, 1),
        phone_number: None,
        location: Some("Pune".into()),
        profile_image_url: None,
        total_expenses: Decimal::ZERO,
        last_modified: None,
    };
    g.save_profile("u1", &profile).unwrap();
    g.save_expense("u1", &ExpenseRecord::new("Food", d("99"), at(2025, 2, 1)))
        .unwrap();
    let got = g.get_profile("u1").unwrap().unwrap();
    assert_eq!(got.id, "u1");
    assert_eq!(got.full_name, "Asha Rao");
    assert_eq!(got.total_expenses, d("99"));
}

#[test]
fn collections_decode_from_maps_and_arrays() {
    let g = gw();
    g.put_document(
        &paths::expenses("u1"),
        &json!([
            null,
            {"category": "Food", "amount": 10, "date": "2025-03-01T00:00:00Z", "createdAt": "2025-03-01T00:00:00Z"}
        ]),
    )
    .unwrap();
    let list: Vec<ExpenseRecord> = read_collection(&g, &paths::expenses("u1")).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, "1", "array index stands in for a missing id");

    g.put_document(&paths::expenses("u1"), &json!("oops")).unwrap();
    assert!(g.get_expenses("u1").is_err());
}

#[test]
fn timestamps_without_offset_read_as_utc() {
    let g = gw();
    g.save_expense("u1", &ExpenseRecord::new("Food", d("10"), at(2025, 3, 1)))
        .unwrap();
    g.put_document(
        &format!("{}/legacy", paths::expenses("u1")),
        &json!({
            "category": "Travel",
            "amount": 25,
            "date": "2024-01-15T00:00:00",
            "createdAt": "2024-01-15T09:30:00.1234567",
            "modifiedAt": null
        }),
    )
    .unwrap();
    let list = g.get_expenses("u1").unwrap();
    assert_eq!(list.len(), 2);
    let legacy = list.iter().find(|e| e.id == "legacy").unwrap();
    assert_eq!(legacy.date, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
    assert!(legacy.modified_at.is_none());

    g.put_document(
        &format!("{}/i1", paths::investments("u1")),
        &json!({
            "investmentType": "Gold",
            "amount": 500,
            "investmentDate": "2024-01-15T00:00:00",
            "createdAt": "2024-01-15T00:00:00+05:30",
            "updatedAt": "2024-02-01T12:00:00"
        }),
    )
    .unwrap();
    let inv = g.get_investment("u1", "i1").unwrap().unwrap();
    assert_eq!(inv.investment_date, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
    assert_eq!(inv.created_at, Utc.with_ymd_and_hms(2024, 1, 14, 18, 30, 0).unwrap());
    assert_eq!(inv.updated_at, Some(Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap()));

    let saved = serde_json::to_value(&inv).unwrap();
    assert_eq!(saved["investmentDate"], json!("2024-01-15T00:00:00Z"));
}

#[test]
fn cached_total_inside_the_profile_is_read_and_replaced() {
    let g = gw();
    g.put_document(
        &paths::profile("u1"),
        &json!({"fullName": "Asha Rao", "totalExpenses": 25}),
    )
    .unwrap();
    assert_eq!(g.get_total_expenses("u1").unwrap(), Some(d("25")));

    g.set_total_expenses("u1", d("40")).unwrap();
    assert_eq!(g.get_total_expenses("u1").unwrap(), Some(d("40")));
    let profile = g.get_profile("u1").unwrap().unwrap();
    assert_eq!(profile.full_name, "Asha Rao");
    assert_eq!(profile.total_expenses, d("40"));
}

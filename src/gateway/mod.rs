// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Remote data gateway.
//!
//! The store is a hierarchical JSON document tree. A backend only has to
//! implement the three raw document operations; the typed queries and writes
//! used by the rest of the crate are provided on top of them.

pub mod local;
pub mod rest;

use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{
    BudgetAllocation, ExpenseRecord, InvestmentRecord, Period, SalaryRecord, UserProfile,
};

pub use local::SqliteGateway;
pub use rest::RestGateway;

pub mod paths {
    pub fn user(user_id: &str) -> String {
        format!("users/{}", user_id)
    }

    pub fn expenses(user_id: &str) -> String {
        format!("users/{}/expenses", user_id)
    }

    pub fn expense(user_id: &str, id: &str) -> String {
        format!("users/{}/expenses/{}", user_id, id)
    }

    pub fn budgets(user_id: &str) -> String {
        format!("users/{}/budgets", user_id)
    }

    pub fn budget(user_id: &str, id: &str) -> String {
        format!("users/{}/budgets/{}", user_id, id)
    }

    pub fn salaries(user_id: &str) -> String {
        format!("users/{}/salary", user_id)
    }

    pub fn salary(user_id: &str, id: &str) -> String {
        format!("users/{}/salary/{}", user_id, id)
    }

    pub fn investments(user_id: &str) -> String {
        format!("users/{}/investments", user_id)
    }

    pub fn investment(user_id: &str, id: &str) -> String {
        format!("users/{}/investments/{}", user_id, id)
    }

    pub fn profile(user_id: &str) -> String {
        format!("users/{}/profile", user_id)
    }

    pub fn total_expenses(user_id: &str) -> String {
        format!("users/{}/profile/totalExpenses", user_id)
    }
}

/// Records stored under an id-keyed collection.
pub trait Keyed {
    fn key(&self) -> &str;
    fn assign_key(&mut self, key: &str);
    fn assign_owner(&mut self, user_id: &str);
}

macro_rules! impl_keyed {
    ($($t:ty),*) => {
        $(
            impl Keyed for $t {
                fn key(&self) -> &str {
                    &self.id
                }
                fn assign_key(&mut self, key: &str) {
                    self.id = key.to_string();
                }
                fn assign_owner(&mut self, user_id: &str) {
                    self.user_id = user_id.to_string();
                }
            }
        )*
    };
}

impl_keyed!(ExpenseRecord, BudgetAllocation, SalaryRecord, InvestmentRecord);

pub trait Gateway {
    /// Read the node at `path`. A missing node is `Ok(None)`.
    fn get_document(&self, path: &str) -> Result<Option<Value>>;

    /// Replace the node at `path` (and everything beneath it) with `body`.
    fn put_document(&self, path: &str, body: &Value) -> Result<()>;

    /// Remove the node at `path` and everything beneath it.
    fn delete_document(&self, path: &str) -> Result<()>;

    // ---- expenses ----

    /// Every expense of the user, newest first.
    fn get_expenses(&self, user_id: &str) -> Result<Vec<ExpenseRecord>> {
        require_user(user_id)?;
        let mut list: Vec<ExpenseRecord> = read_collection(self, &paths::expenses(user_id))?;
        list.sort_by(|a, b| b.date.cmp(&a.date));
        debug!(user_id, count = list.len(), "fetched expenses");
        Ok(list)
    }

    fn get_expense(&self, user_id: &str, id: &str) -> Result<Option<ExpenseRecord>> {
        require_user(user_id)?;
        read_record(self, &paths::expense(user_id, id), id)
    }

    /// Insert or replace an expense, then refresh the cached profile total.
    /// The two writes are independent; a failure of the second one leaves the
    /// cached total stale until the next refresh.
    fn save_expense(&self, user_id: &str, record: &ExpenseRecord) -> Result<ExpenseRecord> {
        require_user(user_id)?;
        if record.amount <= Decimal::ZERO {
            return Err(Error::InvalidData("Expense amount must be greater than 0".into()));
        }
        if record.category.trim().is_empty() {
            return Err(Error::InvalidData("Expense category is required".into()));
        }
        let saved = prepare(record, user_id);
        write_record(self, &paths::expense(user_id, &saved.id), &saved)?;
        sync_total(self, user_id);
        Ok(saved)
    }

    fn delete_expense(&self, user_id: &str, id: &str) -> Result<()> {
        require_user(user_id)?;
        require_id(id)?;
        self.delete_document(&paths::expense(user_id, id))?;
        sync_total(self, user_id);
        Ok(())
    }

    // ---- budgets ----

    fn get_all_budgets(&self, user_id: &str) -> Result<Vec<BudgetAllocation>> {
        require_user(user_id)?;
        read_collection(self, &paths::budgets(user_id))
    }

    /// Allocations for one period, ordered by category.
    fn get_budgets(&self, user_id: &str, period: Period) -> Result<Vec<BudgetAllocation>> {
        let mut list: Vec<BudgetAllocation> = self
            .get_all_budgets(user_id)?
            .into_iter()
            .filter(|b| b.is_for(period))
            .collect();
        list.sort_by(|a, b| a.category.cmp(&b.category));
        Ok(list)
    }

    fn save_budget(&self, user_id: &str, budget: &BudgetAllocation) -> Result<BudgetAllocation> {
        require_user(user_id)?;
        if budget.allocated_amount <= Decimal::ZERO {
            return Err(Error::InvalidData("Invalid budget amount".into()));
        }
        if budget.category.trim().is_empty() {
            return Err(Error::InvalidData("Budget category is required".into()));
        }
        Period::new(budget.year, budget.month)?;
        let saved = prepare(budget, user_id);
        write_record(self, &paths::budget(user_id, &saved.id), &saved)?;
        Ok(saved)
    }

    fn delete_budget(&self, user_id: &str, id: &str) -> Result<()> {
        require_user(user_id)?;
        require_id(id)?;
        self.delete_document(&paths::budget(user_id, id))
    }

    // ---- salary ----

    fn get_salary_history(&self, user_id: &str) -> Result<Vec<SalaryRecord>> {
        require_user(user_id)?;
        let mut list: Vec<SalaryRecord> = read_collection(self, &paths::salaries(user_id))?;
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    /// The most recently created salary record.
    fn get_salary(&self, user_id: &str) -> Result<Option<SalaryRecord>> {
        Ok(self.get_salary_history(user_id)?.into_iter().next())
    }

    fn save_salary(&self, user_id: &str, salary: &SalaryRecord) -> Result<SalaryRecord> {
        require_user(user_id)?;
        if salary.amount <= Decimal::ZERO {
            return Err(Error::InvalidData("Invalid salary amount".into()));
        }
        let saved = prepare(salary, user_id);
        write_record(self, &paths::salary(user_id, &saved.id), &saved)?;
        Ok(saved)
    }

    // ---- investments ----

    /// Investments, newest first.
    fn get_investments(&self, user_id: &str) -> Result<Vec<InvestmentRecord>> {
        require_user(user_id)?;
        let mut list: Vec<InvestmentRecord> =
            read_collection(self, &paths::investments(user_id))?;
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    fn get_investment(&self, user_id: &str, id: &str) -> Result<Option<InvestmentRecord>> {
        require_user(user_id)?;
        read_record(self, &paths::investment(user_id, id), id)
    }

    fn save_investment(
        &self,
        user_id: &str,
        investment: &InvestmentRecord,
    ) -> Result<InvestmentRecord> {
        require_user(user_id)?;
        if investment.amount <= Decimal::ZERO {
            return Err(Error::InvalidData("Invalid investment amount".into()));
        }
        if investment.return_rate.is_some_and(|r| r < Decimal::ZERO) {
            return Err(Error::InvalidData("Return rate cannot be negative".into()));
        }
        let saved = prepare(investment, user_id);
        write_record(self, &paths::investment(user_id, &saved.id), &saved)?;
        Ok(saved)
    }

    fn delete_investment(&self, user_id: &str, id: &str) -> Result<()> {
        require_user(user_id)?;
        require_id(id)?;
        self.delete_document(&paths::investment(user_id, id))
    }

    // ---- profile ----

    fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        require_user(user_id)?;
        match self.get_document(&paths::profile(user_id))? {
            Some(Value::Null) | None => Ok(None),
            Some(v) => {
                let mut profile: UserProfile = serde_json::from_value(v)?;
                if profile.id.is_empty() {
                    profile.id = user_id.to_string();
                }
                Ok(Some(profile))
            }
        }
    }

    fn save_profile(&self, user_id: &str, profile: &UserProfile) -> Result<()> {
        require_user(user_id)?;
        let mut p = profile.clone();
        p.id = user_id.to_string();
        write_record(self, &paths::profile(user_id), &p)
    }

    fn set_total_expenses(&self, user_id: &str, total: Decimal) -> Result<()> {
        require_user(user_id)?;
        self.put_document(&paths::total_expenses(user_id), &serde_json::to_value(total)?)
    }

    /// The cached total stored under the profile, if any.
    fn get_total_expenses(&self, user_id: &str) -> Result<Option<Decimal>> {
        require_user(user_id)?;
        match self.get_document(&paths::total_expenses(user_id))? {
            Some(Value::Null) | None => Ok(None),
            Some(v) => Ok(Some(serde_json::from_value(v)?)),
        }
    }

    /// Recompute the cached profile total from the full expense history.
    fn refresh_total_expenses(&self, user_id: &str) -> Result<Decimal> {
        let total: Decimal = self.get_expenses(user_id)?.iter().map(|e| e.amount).sum();
        self.set_total_expenses(user_id, total)?;
        Ok(total)
    }
}

fn require_user(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(Error::InvalidData("User ID is required".into()));
    }
    Ok(())
}

fn require_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::InvalidData("Record ID is required".into()));
    }
    Ok(())
}

fn prepare<T: Keyed + Clone>(record: &T, user_id: &str) -> T {
    let mut out = record.clone();
    if out.key().trim().is_empty() {
        out.assign_key(&uuid::Uuid::new_v4().to_string());
    }
    out.assign_owner(user_id);
    out
}

fn sync_total<G: Gateway + ?Sized>(gw: &G, user_id: &str) {
    if let Err(err) = gw.refresh_total_expenses(user_id) {
        warn!(user_id, error = %err, "could not refresh cached expense total");
    }
}

fn write_record<G: Gateway + ?Sized, T: Serialize>(gw: &G, path: &str, record: &T) -> Result<()> {
    let body = serde_json::to_value(record)?;
    debug!(path, "put document");
    gw.put_document(path, &body)
}

fn read_record<G, T>(gw: &G, path: &str, key: &str) -> Result<Option<T>>
where
    G: Gateway + ?Sized,
    T: DeserializeOwned + Keyed,
{
    match gw.get_document(path)? {
        Some(Value::Null) | None => Ok(None),
        Some(v) => {
            let mut record: T = serde_json::from_value(v)?;
            if record.key().is_empty() {
                record.assign_key(key);
            }
            Ok(Some(record))
        }
    }
}

/// Decode an id → record map. Records missing an `id` field take their key.
pub fn read_collection<G, T>(gw: &G, path: &str) -> Result<Vec<T>>
where
    G: Gateway + ?Sized,
    T: DeserializeOwned + Keyed,
{
    let entries: Vec<(String, Value)> = match gw.get_document(path)? {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Object(map)) => map.into_iter().collect(),
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        Some(other) => {
            return Err(Error::InvalidData(format!(
                "Expected a collection at '{}', found {}",
                path, other
            )));
        }
    };
    let mut out = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        if value.is_null() {
            continue;
        }
        let mut record: T = serde_json::from_value(value)?;
        if record.key().is_empty() {
            record.assign_key(&key);
        }
        out.push(record);
    }
    Ok(out)
}

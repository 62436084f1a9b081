// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A calendar month used as the aggregation window. All period math is done
/// on UTC wall-clock fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, Error> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidData(format!("Invalid month number {}", month)));
        }
        Ok(Self { year, month })
    }

    pub fn of(dt: DateTime<Utc>) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
        }
    }

    pub fn current(now: DateTime<Utc>) -> Self {
        Self::of(now)
    }

    pub fn contains(&self, dt: DateTime<Utc>) -> bool {
        dt.year() == self.year && dt.month() == self.month
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || Error::InvalidData(format!("Invalid month '{}', expected YYYY-MM", s));
        let (y, m) = s.trim().split_once('-').ok_or_else(bad)?;
        let year: i32 = y.parse().map_err(|_| bad())?;
        let month: u32 = m.parse().map_err(|_| bad())?;
        Period::new(year, month).map_err(|_| bad())
    }
}

/// Timestamp fields on stored records. Writes use chrono's RFC 3339 form.
/// Reads also accept a timestamp with no offset, which is taken as UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(dt) = raw.parse::<DateTime<Utc>>() {
            return Ok(dt);
        }
        raw.parse::<NaiveDateTime>()
            .map(|naive| naive.and_utc())
            .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))
    }

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        dt.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(D::Error::custom)
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::de::Error as _;
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        use super::parse;

        pub fn serialize<S: Serializer>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
            dt.serialize(s)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(d)? {
                Some(raw) => parse(&raw).map(Some).map_err(D::Error::custom),
                None => Ok(None),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    pub amount: Decimal,
    #[serde(with = "timestamp")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub shop_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl ExpenseRecord {
    pub fn new(category: &str, amount: Decimal, date: DateTime<Utc>) -> Self {
        Self {
            id: String::new(),
            user_id: String::new(),
            category: category.to_string(),
            description: None,
            amount,
            date,
            icon: None,
            shop_name: None,
            address: None,
            location: None,
            created_at: date,
            modified_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAllocation {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub category: String,
    pub allocated_amount: Decimal,
    pub month: u32, // 1-12
    pub year: i32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BudgetAllocation {
    pub fn new(category: &str, allocated_amount: Decimal, period: Period, now: DateTime<Utc>) -> Self {
        Self {
            id: String::new(),
            user_id: String::new(),
            category: category.to_string(),
            allocated_amount,
            month: period.month,
            year: period.year,
            notes: None,
            created_at: now,
            updated_at: None,
        }
    }

    pub fn period(&self) -> Period {
        Period {
            year: self.year,
            month: self.month,
        }
    }

    pub fn is_for(&self, period: Period) -> bool {
        self.month == period.month && self.year == period.year
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayFrequency {
    Daily,
    Weekly,
    #[serde(rename = "Bi-weekly")]
    BiWeekly,
    Monthly,
    Quarterly,
    Annual,
}

impl PayFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayFrequency::Daily => "Daily",
            PayFrequency::Weekly => "Weekly",
            PayFrequency::BiWeekly => "Bi-weekly",
            PayFrequency::Monthly => "Monthly",
            PayFrequency::Quarterly => "Quarterly",
            PayFrequency::Annual => "Annual",
        }
    }
}

impl fmt::Display for PayFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayFrequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(PayFrequency::Daily),
            "weekly" => Ok(PayFrequency::Weekly),
            "bi-weekly" | "biweekly" => Ok(PayFrequency::BiWeekly),
            "monthly" => Ok(PayFrequency::Monthly),
            "quarterly" => Ok(PayFrequency::Quarterly),
            "annual" | "yearly" => Ok(PayFrequency::Annual),
            _ => Err(Error::InvalidData(format!("Unknown salary frequency '{}'", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub amount: Decimal,
    pub frequency: PayFrequency,
    #[serde(with = "timestamp")]
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InvestmentFrequency {
    #[default]
    #[serde(rename = "One-Time")]
    OneTime,
    #[serde(rename = "Monthly SIP")]
    MonthlySip,
}

impl fmt::Display for InvestmentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvestmentFrequency::OneTime => f.write_str("One-Time"),
            InvestmentFrequency::MonthlySip => f.write_str("Monthly SIP"),
        }
    }
}

impl FromStr for InvestmentFrequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "one-time" | "onetime" | "once" => Ok(InvestmentFrequency::OneTime),
            "monthly sip" | "sip" | "monthly" | "recurring" => Ok(InvestmentFrequency::MonthlySip),
            _ => Err(Error::InvalidData(format!(
                "Unknown investment frequency '{}' (use one-time|sip)",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub investment_type: String,
    pub amount: Decimal,
    #[serde(default)]
    pub return_rate: Option<Decimal>, // annual %
    #[serde(with = "timestamp")]
    pub investment_date: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub investment_frequency: InvestmentFrequency,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    // a node holding only the cached total decodes with the epoch here
    #[serde(default, with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub total_expenses: Decimal,
    #[serde(default, with = "timestamp::option")]
    pub last_modified: Option<DateTime<Utc>>,
}

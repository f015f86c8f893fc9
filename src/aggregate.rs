// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived views over the in-memory expense list: the current month's spend,
//! a per-month series for charts, per-category totals, and category/search
//! filtering.
//!
//! Input order is never assumed and malformed records never abort a
//! computation. A record with an unreadable amount adds nothing to a sum but
//! is still returned by [`filter_expenses`].

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use crate::calendar::CalendarZone;
use crate::models::Expense;
use crate::utils::{month_key, parse_timestamp};

pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    pub month: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Exact(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Exact(c) => c == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.eq_ignore_ascii_case(ALL_CATEGORIES) {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Exact(s.to_string()))
        }
    }
}

/// Sum of amounts whose `transaction_date` lies in the same calendar month as
/// `now`, both read in `zone`.
pub fn current_month_total(expenses: &[Expense], zone: &CalendarZone, now: DateTime<Utc>) -> Decimal {
    let today = zone.wall_time_utc(&now);
    let (year, month) = (today.year(), today.month());

    let mut total = Decimal::ZERO;
    for e in expenses {
        let Some(ts) = parse_timestamp(&e.transaction_date) else {
            tracing::debug!(id = %e.id_string(), date = %e.transaction_date, "skipping expense with unreadable date");
            continue;
        };
        let Some(amount) = e.amount.get() else {
            tracing::debug!(id = %e.id_string(), "skipping expense with unreadable amount");
            continue;
        };
        let wall = ts.wall_time(zone);
        if wall.year() == year && wall.month() == month {
            total += amount;
        }
    }
    total
}

/// Per-month totals in ascending month order, one entry for every month that
/// has at least one dated record.
pub fn monthly_series(expenses: &[Expense], zone: &CalendarZone) -> Vec<MonthlyTotal> {
    let mut map: BTreeMap<String, Decimal> = BTreeMap::new();
    for e in expenses {
        let Some(ts) = parse_timestamp(&e.transaction_date) else {
            tracing::debug!(id = %e.id_string(), date = %e.transaction_date, "no month for expense");
            continue;
        };
        *map.entry(month_key(&ts, zone)).or_insert(Decimal::ZERO) += e.amount.value_or_zero();
    }
    map.into_iter()
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect()
}

/// Spend per category, largest first; ties keep category name order.
pub fn category_totals(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut agg: HashMap<&str, Decimal> = HashMap::new();
    for e in expenses {
        *agg.entry(e.category.as_str()).or_insert(Decimal::ZERO) += e.amount.value_or_zero();
    }
    let mut items: Vec<CategoryTotal> = agg
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    items.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    items
}

/// Records matching the category selector and, when `query` is non-empty,
/// containing it (case-insensitively) in their description or category.
/// Order is preserved.
pub fn filter_expenses<'a>(
    expenses: &'a [Expense],
    category: &CategoryFilter,
    query: &str,
) -> Vec<&'a Expense> {
    let needle = query.to_lowercase();
    expenses
        .iter()
        .filter(|e| category.matches(&e.category))
        .filter(|e| {
            needle.is_empty()
                || e.description_or_empty().to_lowercase().contains(&needle)
                || e.category.to_lowercase().contains(&needle)
        })
        .collect()
}

// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::MonthlyTotal;
use crate::store::{ExpenseBackend, ExpenseStore};
use crate::utils::{format_grouped, format_money, maybe_print_json, pretty_table, wordify};
use anyhow::Result;
use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

const BAR_WIDTH: usize = 40;

pub fn handle<B: ExpenseBackend>(store: &mut ExpenseStore<B>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(store, sub)?,
        Some(("monthly", sub)) => monthly(store, sub)?,
        Some(("categories", sub)) => categories(store, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub month: String,
    pub total: Decimal,
    pub formatted: String,
    pub words: String,
    pub records: usize,
    pub unreadable_amounts: usize,
}

pub fn build_summary<B: ExpenseBackend>(store: &ExpenseStore<B>, now: DateTime<Utc>) -> Summary {
    let today = store.zone().wall_time_utc(&now);
    let total = store.current_month_total(now);
    Summary {
        month: format!("{:04}-{:02}", today.year(), today.month()),
        total,
        formatted: format_money(&total),
        words: wordify(&total),
        records: store.expenses().len(),
        unreadable_amounts: store
            .expenses()
            .iter()
            .filter(|e| !e.amount.is_valid())
            .count(),
    }
}

fn summary<B: ExpenseBackend>(store: &mut ExpenseStore<B>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    store.refresh()?;
    let s = build_summary(store, Utc::now());
    if !maybe_print_json(json_flag, jsonl_flag, &s)? {
        println!("Spent in {}: {}", s.month, s.formatted);
        println!("{}", s.words);
        if s.unreadable_amounts > 0 {
            println!(
                "{} of {} records have an unreadable amount and were counted as zero",
                s.unreadable_amounts, s.records
            );
        }
    }
    Ok(())
}

/// Bar of up to `width` cells proportional to `value / max`.
pub fn bar(value: &Decimal, max: &Decimal, width: usize) -> String {
    if max.is_zero() || value.is_sign_negative() {
        return String::new();
    }
    let ratio = (value / max).to_f64().unwrap_or(0.0).clamp(0.0, 1.0);
    let cells = (ratio * width as f64).round() as usize;
    "█".repeat(cells)
}

/// The most recent `months` entries of the series, still oldest first.
pub fn last_months(series: Vec<MonthlyTotal>, months: Option<usize>) -> Vec<MonthlyTotal> {
    match months {
        Some(n) if n < series.len() => {
            let skip = series.len() - n;
            series.into_iter().skip(skip).collect()
        }
        _ => series,
    }
}

fn monthly<B: ExpenseBackend>(store: &mut ExpenseStore<B>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    store.refresh()?;
    let series = last_months(store.monthly_series(), sub.get_one::<usize>("months").copied());
    if !maybe_print_json(json_flag, jsonl_flag, &series)? {
        let max = series
            .iter()
            .map(|m| m.total)
            .max()
            .unwrap_or(Decimal::ZERO);
        let rows: Vec<Vec<String>> = series
            .iter()
            .map(|m| {
                vec![
                    m.month.clone(),
                    format_grouped(&m.total),
                    bar(&m.total, &max, BAR_WIDTH),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Spent", ""], rows));
    }
    Ok(())
}

fn categories<B: ExpenseBackend>(store: &mut ExpenseStore<B>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    store.refresh()?;
    let items = store.category_totals();
    if !maybe_print_json(json_flag, jsonl_flag, &items)? {
        let rows: Vec<Vec<String>> = items
            .iter()
            .map(|c| vec![c.category.clone(), format_grouped(&c.total)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }
    Ok(())
}

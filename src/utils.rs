// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::time::Duration;

use crate::calendar::CalendarZone;

const UA: &str = concat!("spendbook/", env!("CARGO_PKG_VERSION"));

pub const CURRENCY_SYMBOL: &str = "₹";
pub const CURRENCY_WORD: &str = "Rupees";
pub const ZERO_WORD: &str = "Zero";

const ONES: [&str; 20] = [
    "", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen",
];
const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const CRORE: u128 = 10_000_000;
const LAKH: u128 = 100_000;
const THOUSAND: u128 = 1_000;

pub fn http_client(timeout: Duration) -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Lenient amount parsing for data coming off the wire.
///
/// Accepts plain and scientific decimal text. Anything else, including
/// negative values, yields `None`.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let d = s
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())?;
    if d.is_sign_negative() && !d.is_zero() {
        return None;
    }
    Some(d)
}

/// A parsed `transaction_date`.
///
/// Timestamps carrying an offset are converted into the configured calendar
/// zone; timestamps without one are taken as wall-clock time already.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Zoned(DateTime<FixedOffset>),
    Floating(NaiveDateTime),
}

impl Timestamp {
    pub fn wall_time(&self, zone: &CalendarZone) -> NaiveDateTime {
        match self {
            Timestamp::Zoned(ts) => zone.wall_time(ts),
            Timestamp::Floating(ts) => *ts,
        }
    }
}

const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

pub fn parse_timestamp(s: &str) -> Option<Timestamp> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(Timestamp::Zoned(ts));
    }
    if let Ok(ts) = DateTime::parse_from_rfc2822(s) {
        return Some(Timestamp::Zoned(ts));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Timestamp::Floating(ts));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(Timestamp::Floating)
}

/// `YYYY-MM` key of the calendar month `ts` falls in.
///
/// Year is padded to four digits and month to two so that keys sort
/// lexicographically in chronological order.
pub fn month_key(ts: &Timestamp, zone: &CalendarZone) -> String {
    use chrono::Datelike;
    let wall = ts.wall_time(zone);
    format!("{:04}-{:02}", wall.year(), wall.month())
}

pub fn month_key_of(raw: &str, zone: &CalendarZone) -> Option<String> {
    parse_timestamp(raw).map(|ts| month_key(&ts, zone))
}

/// Two-decimal rendering with lakh/crore grouping, e.g. `12,34,567.89`.
pub fn format_grouped(d: &Decimal) -> String {
    let r = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = r.is_sign_negative() && !r.is_zero();
    let text = format!("{:.2}", r.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 2 + 4);
    if int_part.len() > 3 {
        let (head, tail) = int_part.split_at(int_part.len() - 3);
        let lead = head.len() % 2;
        if lead == 1 {
            grouped.push_str(&head[..1]);
        }
        for (i, pair) in head.as_bytes()[lead..].chunks(2).enumerate() {
            if i > 0 || lead == 1 {
                grouped.push(',');
            }
            grouped.push_str(std::str::from_utf8(pair).unwrap_or_default());
        }
        grouped.push(',');
        grouped.push_str(tail);
    } else {
        grouped.push_str(int_part);
    }

    if negative {
        format!("-{}.{}", grouped, frac_part)
    } else {
        format!("{}.{}", grouped, frac_part)
    }
}

pub fn format_money(d: &Decimal) -> String {
    let body = format_grouped(d);
    match body.strip_prefix('-') {
        Some(abs) => format!("-{}{}", CURRENCY_SYMBOL, abs),
        None => format!("{}{}", CURRENCY_SYMBOL, body),
    }
}

/// Spoken form of the integer part of `amount`, e.g.
/// `One lakh twenty thousand five hundred Rupees`.
///
/// Display only. Negative input is spoken as zero.
pub fn wordify(amount: &Decimal) -> String {
    let n = amount.trunc().to_u128().unwrap_or(0);
    if n == 0 {
        return format!("{} {}", ZERO_WORD, CURRENCY_WORD);
    }
    let phrase = spell(n);
    let mut chars = phrase.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => phrase,
    };
    format!("{} {}", capitalized, CURRENCY_WORD)
}

fn spell(n: u128) -> String {
    let mut parts: Vec<String> = Vec::new();

    let crores = n / CRORE;
    if crores > 0 {
        parts.push(format!("{} crore", spell(crores)));
    }
    let mut rest = n % CRORE;

    let lakhs = rest / LAKH;
    if lakhs > 0 {
        parts.push(format!("{} lakh", below_hundred(lakhs)));
    }
    rest %= LAKH;

    let thousands = rest / THOUSAND;
    if thousands > 0 {
        parts.push(format!("{} thousand", below_hundred(thousands)));
    }
    rest %= THOUSAND;

    let hundreds = rest / 100;
    if hundreds > 0 {
        parts.push(format!("{} hundred", ONES[hundreds as usize]));
    }
    rest %= 100;

    if rest > 0 {
        parts.push(below_hundred(rest));
    }
    parts.join(" ")
}

fn below_hundred(n: u128) -> String {
    let n = n as usize;
    if n < 20 {
        ONES[n].to_string()
    } else if n % 10 == 0 {
        TENS[n / 10].to_string()
    } else {
        format!("{} {}", TENS[n / 10], ONES[n % 10])
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

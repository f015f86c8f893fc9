// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;

static OFFSET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-])(\d{2}):?(\d{2})$").expect("static regex"));

/// The calendar used to decide which month a timestamp belongs to.
///
/// Month bucketing and "current month" depend on wall-clock time, so the zone
/// is pinned in configuration instead of being read implicitly from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarZone {
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl CalendarZone {
    /// Wall-clock time of `ts` in this zone.
    pub fn wall_time(&self, ts: &DateTime<FixedOffset>) -> NaiveDateTime {
        match self {
            CalendarZone::Local => ts.with_timezone(&Local).naive_local(),
            CalendarZone::Utc => ts.naive_utc(),
            CalendarZone::Fixed(off) => ts.with_timezone(off).naive_local(),
        }
    }

    pub fn wall_time_utc(&self, now: &DateTime<Utc>) -> NaiveDateTime {
        match self {
            CalendarZone::Local => now.with_timezone(&Local).naive_local(),
            CalendarZone::Utc => now.naive_utc(),
            CalendarZone::Fixed(off) => now.with_timezone(off).naive_local(),
        }
    }
}

impl fmt::Display for CalendarZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarZone::Local => write!(f, "local"),
            CalendarZone::Utc => write!(f, "utc"),
            CalendarZone::Fixed(off) => write!(f, "{}", off),
        }
    }
}

impl FromStr for CalendarZone {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.eq_ignore_ascii_case("local") {
            return Ok(CalendarZone::Local);
        }
        if raw.eq_ignore_ascii_case("utc") || raw == "Z" {
            return Ok(CalendarZone::Utc);
        }
        let caps = OFFSET_RE
            .captures(raw)
            .ok_or_else(|| ConfigError::InvalidZone(raw.to_string()))?;
        let hours: i32 = caps[2].parse().map_err(|_| ConfigError::InvalidZone(raw.to_string()))?;
        let minutes: i32 = caps[3].parse().map_err(|_| ConfigError::InvalidZone(raw.to_string()))?;
        if minutes >= 60 {
            return Err(ConfigError::InvalidZone(raw.to_string()));
        }
        let mut secs = hours * 3600 + minutes * 60;
        if &caps[1] == "-" {
            secs = -secs;
        }
        FixedOffset::east_opt(secs)
            .map(CalendarZone::Fixed)
            .ok_or_else(|| ConfigError::InvalidZone(raw.to_string()))
    }
}

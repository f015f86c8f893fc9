// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::calendar::CalendarZone;
use crate::db::{get_setting, set_setting};

pub const DEFAULT_API_URL: &str = "http://localhost:5001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

const KEY_API_URL: &str = "api_url";
const KEY_ZONE: &str = "calendar_zone";
const KEY_TIMEOUT: &str = "timeout_secs";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid calendar zone '{0}', expected local, utc or an offset like +05:30")]
    InvalidZone(String),
    #[error("Invalid timeout '{0}', expected a positive number of seconds")]
    InvalidTimeout(String),
    #[error("Invalid API URL '{0}', expected http:// or https://")]
    InvalidApiUrl(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub api_url: String,
    #[serde(serialize_with = "zone_as_str")]
    pub zone: CalendarZone,
    pub timeout_secs: u64,
}

fn zone_as_str<S: serde::Serializer>(z: &CalendarZone, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(z)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            zone: CalendarZone::Local,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub fn parse_api_url(s: &str) -> Result<String, ConfigError> {
    let url = s.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidApiUrl(s.to_string()));
    }
    Ok(url.to_string())
}

pub fn parse_timeout(s: &str) -> Result<u64, ConfigError> {
    match s.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidTimeout(s.to_string())),
    }
}

/// Reads the stored settings, falling back to defaults for anything unset.
pub fn load(conn: &Connection) -> Result<Config> {
    let mut cfg = Config::default();
    if let Some(url) = get_setting(conn, KEY_API_URL)? {
        cfg.api_url = parse_api_url(&url)?;
    }
    if let Some(zone) = get_setting(conn, KEY_ZONE)? {
        cfg.zone = zone.parse()?;
    }
    if let Some(t) = get_setting(conn, KEY_TIMEOUT)? {
        cfg.timeout_secs = parse_timeout(&t)?;
    }
    Ok(cfg)
}

pub fn set_api_url(conn: &Connection, url: &str) -> Result<()> {
    let url = parse_api_url(url)?;
    set_setting(conn, KEY_API_URL, &url)
}

pub fn set_zone(conn: &Connection, zone: &str) -> Result<()> {
    let zone: CalendarZone = zone.parse()?;
    set_setting(conn, KEY_ZONE, &zone.to_string())
}

pub fn set_timeout(conn: &Connection, secs: &str) -> Result<()> {
    let secs = parse_timeout(secs)?;
    set_setting(conn, KEY_TIMEOUT, &secs.to_string())
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::{delete_setting, get_setting, set_setting};

const KEY_TOKEN: &str = "session_token";

/// Claims read from the token payload. The signature is not checked here;
/// the server does that on every request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub sub: Option<Value>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl UserProfile {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|s| DateTime::<Utc>::from_timestamp(s, 0))
    }

    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.email.clone())
            .or_else(|| self.sub.as_ref().map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }))
            .unwrap_or_else(|| "(unknown user)".to_string())
    }
}

/// Explicit session context handed to the API client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
    profile: Option<UserProfile>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn from_token(token: &str) -> Self {
        let token = token.trim().to_string();
        let profile = decode_profile(&token);
        Self {
            token: Some(token),
            profile,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.profile
            .as_ref()
            .and_then(UserProfile::expires_at)
            .is_some_and(|exp| exp <= now)
    }

    /// Drop credentials held in memory.
    pub fn clear(&mut self) {
        self.token = None;
        self.profile = None;
    }

    pub fn load(conn: &Connection) -> Result<Self> {
        Ok(match get_setting(conn, KEY_TOKEN)? {
            Some(t) if !t.trim().is_empty() => Session::from_token(&t),
            _ => Session::anonymous(),
        })
    }

    pub fn save(&self, conn: &Connection) -> Result<()> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| anyhow!("No session token to save"))?;
        set_setting(conn, KEY_TOKEN, token)
    }

    /// Remove the persisted token.
    pub fn forget(conn: &Connection) -> Result<()> {
        delete_setting(conn, KEY_TOKEN)
    }
}

/// Best-effort decoding of a JWT payload. Opaque tokens yield `None`.
pub fn decode_profile(token: &str) -> Option<UserProfile> {
    let mut parts = token.split('.');
    let (_header, payload, _sig) = (parts.next()?, parts.next()?, parts.next()?);
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

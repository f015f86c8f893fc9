// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod expenses;
pub mod exporter;
pub mod reports;
pub mod settings;

use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;

use crate::api::{ApiClient, ApiError};
use crate::config;
use crate::session::Session;
use crate::store::ExpenseStore;

/// Store bound to the configured backend and the persisted session.
pub fn open_store(conn: &Connection) -> Result<ExpenseStore<ApiClient>> {
    let cfg = config::load(conn)?;
    let session = Session::load(conn)?;
    if session.is_expired(Utc::now()) {
        tracing::warn!("stored session token has expired");
    }
    let client = ApiClient::new(&cfg, session)?;
    Ok(ExpenseStore::new(client, cfg.zone))
}

/// Forget the persisted token when the server rejected it.
pub fn after_failure(conn: &Connection, err: anyhow::Error) -> anyhow::Error {
    if matches!(err.downcast_ref::<ApiError>(), Some(ApiError::Unauthorized)) {
        if let Err(e) = Session::forget(conn) {
            tracing::warn!(error = %e, "could not clear stored session");
        }
        return err.context("Logged out; run `spendbook auth login --token <TOKEN>`");
    }
    err
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use reqwest::{StatusCode, Url};
use reqwest::blocking::{Client, RequestBuilder, Response, multipart};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

use crate::config::Config;
use crate::models::{Expense, ExpensePatch, NewExpense, ReceiptGuess, ReceiptResponse};
use crate::session::Session;
use crate::store::ExpenseBackend;
use crate::utils::http_client;

pub const ALLOWED_RECEIPT_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("session expired or invalid, please log in again")]
    Unauthorized,
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("cannot read receipt: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
    #[error("unsupported receipt file '{0}', expected png, jpg or jpeg")]
    UnsupportedFile(String),
}

/// Blocking client for the expense REST API.
pub struct ApiClient {
    base_url: String,
    http: Client,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &Config, session: Session) -> anyhow::Result<Self> {
        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            http: http_client(config.timeout())?,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Sends with the bearer token attached. A 401 clears the session.
    fn send(&mut self, req: RequestBuilder) -> Result<Response, ApiError> {
        let req = match self.session.token() {
            Some(t) => req.bearer_auth(t),
            None => req,
        };
        let resp = req.send()?;
        tracing::debug!(status = %resp.status(), url = %resp.url(), "api response");
        if resp.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("api rejected session token");
            self.session.clear();
            return Err(ApiError::Unauthorized);
        }
        Ok(resp)
    }

    fn send_ok(&mut self, req: RequestBuilder) -> Result<Response, ApiError> {
        let resp = self.send(req)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(resp)
    }

    fn echoed_expense(resp: Response) -> Result<Option<Expense>, ApiError> {
        // Any 2xx body that is not a record, e.g. `{"status": "success"}`, is `None`.
        let body = resp.text()?;
        Ok(serde_json::from_str::<Expense>(&body).ok())
    }

    /// URL of a single expense. The opaque id is encoded as one path segment.
    pub fn expense_url(&self, id: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.url("expenses"))
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.clone()))?
            .push(id);
        Ok(url)
    }
}

/// Pull the `error` field out of a JSON error body, or fall back to the text.
pub fn error_message(body: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(body) {
        if let Some(msg) = v.get("error").and_then(Value::as_str) {
            return msg.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no details".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}

pub fn check_receipt_extension(path: &Path) -> Result<(), ApiError> {
    let ok = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            ALLOWED_RECEIPT_EXTENSIONS
                .iter()
                .any(|a| a.eq_ignore_ascii_case(e))
        });
    if ok {
        Ok(())
    } else {
        Err(ApiError::UnsupportedFile(path.display().to_string()))
    }
}

/// Decode a list body one record at a time so that a single bad entry does
/// not hide the rest.
pub fn decode_expense_list(body: &str) -> Result<Vec<Expense>, ApiError> {
    let items: Vec<Value> =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<Expense>(item) {
            Ok(e) => out.push(e),
            Err(err) => tracing::warn!(error = %err, "dropping undecodable expense record"),
        }
    }
    Ok(out)
}

impl ExpenseBackend for ApiClient {
    fn list(&mut self) -> Result<Vec<Expense>, ApiError> {
        let req = self.http.get(self.url("expenses"));
        let body = self.send_ok(req)?.text()?;
        decode_expense_list(&body)
    }

    fn create(&mut self, expense: &NewExpense) -> Result<Option<Expense>, ApiError> {
        let req = self.http.post(self.url("expenses")).json(expense);
        let resp = self.send_ok(req)?;
        Self::echoed_expense(resp)
    }

    fn update(&mut self, id: &str, patch: &ExpensePatch) -> Result<Option<Expense>, ApiError> {
        let req = self.http.put(self.expense_url(id)?).json(patch);
        let resp = self.send_ok(req)?;
        Self::echoed_expense(resp)
    }

    fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        let req = self.http.delete(self.expense_url(id)?);
        self.send_ok(req)?;
        Ok(())
    }

    fn upload_receipt(&mut self, path: &Path) -> Result<ReceiptGuess, ApiError> {
        check_receipt_extension(path)?;
        let form = multipart::Form::new().file("file", path)?;
        let req = self.http.post(self.url("upload-receipt")).multipart(form);
        let resp = self.send(req)?;
        let status = resp.status();
        let body = resp.text()?;
        // Extraction failures come back as non-2xx with a JSON envelope; those
        // are soft and yield an empty guess.
        match serde_json::from_str::<ReceiptResponse>(&body) {
            Ok(r) => {
                if let Some(err) = r.error.as_deref() {
                    tracing::warn!(%status, error = err, "receipt extraction failed");
                }
                Ok(r.into_guess())
            }
            Err(_) if status.is_success() => Err(ApiError::Decode(error_message(&body))),
            Err(_) => Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            }),
        }
    }
}

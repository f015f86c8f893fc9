// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Client-side expense store.
//!
//! The store never patches its list locally. Each mutation is sent to the
//! backend and followed by a full refetch, so ids and timestamps are always
//! the server's. A failed call leaves the previous list in place and records a
//! notice for the user.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::path::Path;

use crate::aggregate::{self, CategoryFilter, CategoryTotal, MonthlyTotal};
use crate::api::ApiError;
use crate::calendar::CalendarZone;
use crate::models::{Expense, ExpensePatch, NewExpense, ReceiptGuess};

/// The remote side of the store.
pub trait ExpenseBackend {
    fn list(&mut self) -> Result<Vec<Expense>, ApiError>;
    /// Returns the created record when the server echoes one back.
    fn create(&mut self, expense: &NewExpense) -> Result<Option<Expense>, ApiError>;
    fn update(&mut self, id: &str, patch: &ExpensePatch) -> Result<Option<Expense>, ApiError>;
    fn delete(&mut self, id: &str) -> Result<(), ApiError>;
    fn upload_receipt(&mut self, path: &Path) -> Result<ReceiptGuess, ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreState {
    #[default]
    Idle,
    Loading,
}

pub struct ExpenseStore<B: ExpenseBackend> {
    backend: B,
    zone: CalendarZone,
    expenses: Vec<Expense>,
    state: StoreState,
    notice: Option<String>,
}

impl<B: ExpenseBackend> ExpenseStore<B> {
    pub fn new(backend: B, zone: CalendarZone) -> Self {
        Self {
            backend,
            zone,
            expenses: Vec::new(),
            state: StoreState::Idle,
            notice: None,
        }
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == StoreState::Loading
    }

    /// Message from the last failed call, if it has not been taken yet.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn zone(&self) -> &CalendarZone {
        &self.zone
    }

    pub fn refresh(&mut self) -> Result<(), ApiError> {
        self.state = StoreState::Loading;
        let res = self.refetch();
        self.state = StoreState::Idle;
        res
    }

    pub fn create(&mut self, expense: &NewExpense) -> Result<Option<Expense>, ApiError> {
        self.state = StoreState::Loading;
        let res = self.backend.create(expense);
        self.finish_mutation("create", res)
    }

    pub fn update(&mut self, id: &str, patch: &ExpensePatch) -> Result<Option<Expense>, ApiError> {
        self.state = StoreState::Loading;
        let res = self.backend.update(id, patch);
        self.finish_mutation("update", res)
    }

    pub fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        self.state = StoreState::Loading;
        let res = self.backend.delete(id);
        self.finish_mutation("delete", res)
    }

    /// Upload a receipt and return whatever could be read from it. Nothing is
    /// created until the caller submits the draft through [`Self::create`].
    pub fn scan_receipt(&mut self, path: &Path) -> Result<ReceiptGuess, ApiError> {
        self.state = StoreState::Loading;
        let res = self.backend.upload_receipt(path);
        self.state = StoreState::Idle;
        res.inspect_err(|e| self.record_failure("scan receipt", e))
    }

    pub fn current_month_total(&self, now: DateTime<Utc>) -> Decimal {
        aggregate::current_month_total(&self.expenses, &self.zone, now)
    }

    pub fn monthly_series(&self) -> Vec<MonthlyTotal> {
        aggregate::monthly_series(&self.expenses, &self.zone)
    }

    pub fn category_totals(&self) -> Vec<CategoryTotal> {
        aggregate::category_totals(&self.expenses)
    }

    pub fn filtered(&self, category: &CategoryFilter, query: &str) -> Vec<&Expense> {
        aggregate::filter_expenses(&self.expenses, category, query)
    }

    fn refetch(&mut self) -> Result<(), ApiError> {
        match self.backend.list() {
            Ok(list) => {
                tracing::debug!(count = list.len(), "expense list refreshed");
                self.expenses = list;
                self.notice = None;
                Ok(())
            }
            Err(e) => {
                self.record_failure("refresh", &e);
                Err(e)
            }
        }
    }

    fn finish_mutation<T>(&mut self, op: &str, res: Result<T, ApiError>) -> Result<T, ApiError> {
        let out = match res {
            Ok(v) => {
                tracing::info!(op, "expense mutation accepted");
                self.refetch().map(|_| v)
            }
            Err(e) => {
                self.record_failure(op, &e);
                Err(e)
            }
        };
        self.state = StoreState::Idle;
        out
    }

    fn record_failure(&mut self, op: &str, e: &ApiError) {
        tracing::warn!(op, error = %e, "expense store call failed");
        self.notice = Some(format!("Could not {}: {}", op, e));
    }
}

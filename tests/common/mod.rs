// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};
use spendbook::api::ApiError;
use spendbook::calendar::CalendarZone;
use spendbook::models::{Expense, ExpensePatch, NewExpense, ReceiptGuess};
use spendbook::store::{ExpenseBackend, ExpenseStore};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

pub const CREATED_AT: &str = "2025-08-20T09:30:00Z";

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 15, 12, 0, 0).unwrap()
}

pub fn expense(id: i64, amount: Value, category: &str, description: &str, date: &str) -> Expense {
    serde_json::from_value(json!({
        "id": id,
        "amount": amount,
        "category": category,
        "description": description,
        "transaction_date": date,
    }))
    .unwrap()
}

#[derive(Default)]
pub struct MemoryState {
    pub records: Vec<Expense>,
    pub next_id: i64,
    pub calls: Vec<String>,
    pub fail_list: bool,
    pub fail_mutations: bool,
    pub unauthorized: bool,
    pub receipt: ReceiptGuess,
}

/// In-memory stand-in for the REST backend. The state is shared so tests can
/// flip failure switches after handing the backend to a store.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    pub state: Rc<RefCell<MemoryState>>,
}

impl MemoryBackend {
    pub fn with_records(records: Vec<Expense>) -> Self {
        let b = MemoryBackend::default();
        {
            let mut s = b.state.borrow_mut();
            s.next_id = records.len() as i64 + 1;
            s.records = records;
        }
        b
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    fn guard(&self, op: &str, mutation: bool) -> Result<(), ApiError> {
        let mut s = self.state.borrow_mut();
        s.calls.push(op.to_string());
        if s.unauthorized {
            return Err(ApiError::Unauthorized);
        }
        if (mutation && s.fail_mutations) || (!mutation && s.fail_list) {
            return Err(ApiError::Status {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(())
    }
}

impl ExpenseBackend for MemoryBackend {
    fn list(&mut self) -> Result<Vec<Expense>, ApiError> {
        self.guard("list", false)?;
        Ok(self.state.borrow().records.clone())
    }

    fn create(&mut self, expense: &NewExpense) -> Result<Option<Expense>, ApiError> {
        self.guard("create", true)?;
        let mut s = self.state.borrow_mut();
        let id = s.next_id;
        s.next_id += 1;
        let record: Expense = serde_json::from_value(json!({
            "id": id,
            "amount": expense.amount.to_string(),
            "category": expense.category,
            "description": expense.description,
            "transaction_date": CREATED_AT,
        }))
        .unwrap();
        s.records.push(record.clone());
        Ok(Some(record))
    }

    fn update(&mut self, id: &str, patch: &ExpensePatch) -> Result<Option<Expense>, ApiError> {
        self.guard("update", true)?;
        let mut s = self.state.borrow_mut();
        let Some(rec) = s.records.iter_mut().find(|e| e.id_string() == id) else {
            return Err(ApiError::Status {
                status: 404,
                message: "Expense not found".to_string(),
            });
        };
        if let Some(a) = patch.amount {
            rec.amount = a.into();
        }
        if let Some(c) = &patch.category {
            rec.category = c.clone();
        }
        if let Some(d) = &patch.description {
            rec.description = Some(d.clone());
        }
        Ok(Some(rec.clone()))
    }

    fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        self.guard("delete", true)?;
        self.state.borrow_mut().records.retain(|e| e.id_string() != id);
        Ok(())
    }

    fn upload_receipt(&mut self, _path: &Path) -> Result<ReceiptGuess, ApiError> {
        self.guard("upload", true)?;
        Ok(self.state.borrow().receipt.clone())
    }
}

pub fn store_with(records: Vec<Expense>) -> (ExpenseStore<MemoryBackend>, MemoryBackend) {
    let backend = MemoryBackend::with_records(records);
    let handle = backend.clone();
    (ExpenseStore::new(backend, CalendarZone::Utc), handle)
}

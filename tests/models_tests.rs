// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde_json::json;
use spendbook::models::{Amount, Category, Expense, ExpensePatch, ReceiptGuess, ReceiptResponse};
use std::str::FromStr;

#[test]
fn expense_decodes_mixed_amount_shapes() {
    let list: Vec<Expense> = serde_json::from_value(json!([
        {"id": 1, "amount": 12.5, "category": "Food", "description": "Tea", "transaction_date": "2025-08-01 10:00:00"},
        {"id": "abc", "amount": "12.50", "category": "Food", "description": null, "transaction_date": "2025-08-01 10:00:00"},
        {"id": 3, "amount": "twelve", "category": "Food", "transaction_date": "2025-08-01 10:00:00"},
        {"id": 4, "category": "Other"}
    ]))
    .unwrap();
    assert_eq!(list[0].amount, list[1].amount);
    assert_eq!(list[1].id_string(), "abc");
    assert_eq!(list[0].id_string(), "1");
    assert!(!list[2].amount.is_valid());
    assert_eq!(list[2].amount.value_or_zero(), Decimal::ZERO);
    assert!(!list[3].amount.is_valid());
    assert_eq!(list[3].description_or_empty(), "");
    assert_eq!(list[3].transaction_date, "");
}

#[test]
fn amount_serializes_as_text_or_null() {
    let ok = Amount::from(Decimal::new(1050, 2));
    assert_eq!(serde_json::to_value(ok).unwrap(), json!("10.50"));
    assert_eq!(serde_json::to_value(Amount::INVALID).unwrap(), json!(null));
    assert!(!Amount::from(Decimal::new(-1, 0)).is_valid());
}

#[test]
fn categories_parse_case_insensitively() {
    assert_eq!(Category::from_str("food").unwrap(), Category::Food);
    assert_eq!(Category::from_str(" BILLS ").unwrap().to_string(), "Bills");
    assert!(Category::from_str("Groceries").is_err());
}

#[test]
fn patch_sends_only_set_fields() {
    let patch = ExpensePatch {
        category: Some("Bills".into()),
        ..Default::default()
    };
    assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"category": "Bills"}));
    assert!(ExpensePatch::default().is_empty());
}

#[test]
fn receipt_draft_folds_merchant_into_description() {
    let guess = ReceiptGuess {
        amount: Some(Decimal::new(349, 0)),
        category: Some("Food".into()),
        merchant: Some("Swiggy".into()),
        date: None,
    };
    let draft = guess.into_draft(None, None, None).unwrap();
    assert_eq!(draft.amount, Decimal::new(349, 0));
    assert_eq!(draft.category, "Food");
    assert_eq!(draft.description.as_deref(), Some("Payment to Swiggy"));
}

#[test]
fn receipt_draft_defaults_and_overrides() {
    let guess = ReceiptGuess {
        amount: None,
        category: None,
        merchant: Some("Unknown".into()),
        date: None,
    };
    assert!(guess.clone().into_draft(None, None, None).is_none());

    let draft = guess
        .into_draft(Some(Decimal::new(80, 0)), None, None)
        .unwrap();
    assert_eq!(draft.category, "Other");
    assert_eq!(draft.description, None);

    let user_wins = ReceiptGuess {
        amount: Some(Decimal::new(1, 0)),
        category: Some("Shopping".into()),
        merchant: Some("Amazon".into()),
        date: None,
    }
    .into_draft(
        Some(Decimal::new(2, 0)),
        Some("Bills".into()),
        Some("Router".into()),
    )
    .unwrap();
    assert_eq!(user_wins.amount, Decimal::new(2, 0));
    assert_eq!(user_wins.category, "Bills");
    assert_eq!(user_wins.description.as_deref(), Some("Router"));
}

#[test]
fn receipt_envelope_failures_are_soft() {
    let ok: ReceiptResponse = serde_json::from_value(json!({
        "status": "success",
        "extracted_data": {"amount": 20000.0, "category": "Bills & Utilities", "merchant": "BillDesk", "date": null}
    }))
    .unwrap();
    let guess = ok.into_guess();
    assert_eq!(guess.amount, Some(Decimal::new(20000, 0)));
    assert_eq!(guess.merchant_name(), Some("BillDesk"));

    let failed: ReceiptResponse = serde_json::from_value(json!({
        "status": "error",
        "error": "No text content to analyze"
    }))
    .unwrap();
    assert_eq!(failed.into_guess(), ReceiptGuess::default());

    let partial: ReceiptResponse = serde_json::from_value(json!({
        "status": "success",
        "extracted_data": {"amount": "n/a"}
    }))
    .unwrap();
    let g = partial.into_guess();
    assert_eq!(g.amount, None);
    assert_eq!(g.category_or_default(), "Other");
}

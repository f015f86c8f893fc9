// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::utils::parse_amount;

/// Expense amount, normalized once when the record is decoded.
///
/// The server may send a number or a decimal string. Values that do not
/// parse to a finite non-negative decimal are kept as invalid; they count as
/// zero in totals but the record itself is retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Amount(Option<Decimal>);

impl Amount {
    pub const INVALID: Amount = Amount(None);

    pub fn get(&self) -> Option<Decimal> {
        self.0
    }

    pub fn value_or_zero(&self) -> Decimal {
        self.0.unwrap_or(Decimal::ZERO)
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    pub fn from_json(v: &Value) -> Amount {
        match v {
            Value::Number(n) => Amount(parse_amount(&n.to_string())),
            Value::String(s) => Amount(parse_amount(s)),
            _ => Amount::INVALID,
        }
    }
}

impl From<Decimal> for Amount {
    fn from(d: Decimal) -> Self {
        if d.is_sign_negative() && !d.is_zero() {
            Amount::INVALID
        } else {
            Amount(Some(d))
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(Amount::from_json(&v))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(d) => s.collect_str(&d),
            None => s.serialize_none(),
        }
    }
}

/// Categories offered when recording an expense. Records coming back from the
/// server may still carry any string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Bills,
    Entertainment,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Bills,
        Category::Entertainment,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown category '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Value,
    #[serde(default)]
    pub amount: Amount,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub transaction_date: String,
}

impl Expense {
    /// Server ids are opaque; numbers and strings both render as plain text.
    pub fn id_string(&self) -> String {
        match &self.id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Body of `POST /api/expenses`. The server assigns `id` and
/// `transaction_date`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewExpense {
    pub amount: Decimal,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `PUT /api/expenses/{id}`; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpensePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.category.is_none() && self.description.is_none()
    }
}

const UNKNOWN_MERCHANT: &str = "Unknown";

/// Best-effort fields read from a receipt image. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptGuess {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub merchant: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

fn lenient_amount<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Decimal>, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(Amount::from_json(&v).get())
}

/// Envelope returned by `POST /api/upload-receipt`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReceiptResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub extracted_data: Option<ReceiptGuess>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ReceiptResponse {
    /// A failed extraction is reported as an empty guess, never as an error.
    pub fn into_guess(self) -> ReceiptGuess {
        if self.status.as_deref() == Some("error") {
            return ReceiptGuess::default();
        }
        self.extracted_data.unwrap_or_default()
    }
}

impl ReceiptGuess {
    pub fn merchant_name(&self) -> Option<&str> {
        self.merchant
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty() && !m.eq_ignore_ascii_case(UNKNOWN_MERCHANT))
    }

    pub fn category_or_default(&self) -> String {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| c.to_string())
            .unwrap_or_else(|| Category::Other.to_string())
    }

    /// Fill a new expense from the guess. Values the user typed win over the
    /// extracted ones. Returns `None` when no amount is known at all.
    pub fn into_draft(
        self,
        amount: Option<Decimal>,
        category: Option<String>,
        description: Option<String>,
    ) -> Option<NewExpense> {
        let amount = amount.or(self.amount)?;
        let category = category.unwrap_or_else(|| self.category_or_default());
        let description = description.or_else(|| {
            self.merchant_name()
                .map(|m| format!("Payment to {}", m))
        });
        Some(NewExpense {
            amount,
            category,
            description,
        })
    }
}

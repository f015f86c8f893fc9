// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Expense;
use crate::store::{ExpenseBackend, ExpenseStore};
use anyhow::{Context, Result, bail};
use serde_json::json;
use std::path::Path;

pub fn handle<B: ExpenseBackend>(store: &mut ExpenseStore<B>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("expenses", sub)) => {
            let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
            let out = sub.get_one::<String>("out").unwrap();
            store.refresh()?;
            export_expenses(store.expenses(), &fmt, Path::new(out))?;
            println!("Exported {} expenses to {}", store.expenses().len(), out);
            Ok(())
        }
        _ => Ok(()),
    }
}

pub fn export_expenses(expenses: &[Expense], fmt: &str, out: &Path) -> Result<()> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create {}", out.display()))?;
            wtr.write_record(["id", "transaction_date", "category", "description", "amount"])?;
            for e in expenses {
                wtr.write_record([
                    e.id_string(),
                    e.transaction_date.clone(),
                    e.category.clone(),
                    e.description_or_empty().to_string(),
                    e.amount.get().map(|a| a.to_string()).unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = expenses
                .iter()
                .map(|e| {
                    json!({
                        "id": e.id, "transaction_date": e.transaction_date, "category": e.category,
                        "description": e.description, "amount": e.amount
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Write {}", out.display()))?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(())
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::CategoryFilter;
use crate::models::{Category, Expense, ExpensePatch, NewExpense, ReceiptGuess};
use crate::store::{ExpenseBackend, ExpenseStore};
use crate::utils::{format_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Result, anyhow, bail};
use rust_decimal::Decimal;
use std::path::Path;

pub fn handle<B: ExpenseBackend>(store: &mut ExpenseStore<B>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(store, sub)?,
        Some(("add", sub)) => add(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => remove(store, sub)?,
        Some(("scan", sub)) => scan(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn list<B: ExpenseBackend>(store: &mut ExpenseStore<B>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    store.refresh()?;
    let data = query_rows(store, sub);
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data.iter().map(|e| display_row(e)).collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Category", "Description", "Amount"], rows)
        );
    }
    Ok(())
}

/// Records selected by the list filters, in the order the server sent them.
pub fn query_rows<'a, B: ExpenseBackend>(
    store: &'a ExpenseStore<B>,
    sub: &clap::ArgMatches,
) -> Vec<&'a Expense> {
    let category: CategoryFilter = sub
        .get_one::<String>("category")
        .map(|s| s.trim())
        .unwrap_or_default()
        .parse()
        .unwrap_or_default();
    let query = sub.get_one::<String>("search").map(|s| s.as_str()).unwrap_or("");
    let mut rows = store.filtered(&category, query);
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }
    rows
}

pub fn display_row(e: &Expense) -> Vec<String> {
    vec![
        e.id_string(),
        e.transaction_date.clone(),
        e.category.clone(),
        e.description_or_empty().to_string(),
        e.amount
            .get()
            .map(|a| format_money(&a))
            .unwrap_or_else(|| "-".to_string()),
    ]
}

fn parse_amount_arg(raw: &str) -> Result<Decimal> {
    let amount = parse_decimal(raw)?;
    if amount.is_sign_negative() && !amount.is_zero() {
        bail!("Amount must not be negative, got {}", raw.trim());
    }
    Ok(amount)
}

fn canonical_category(raw: &str) -> Result<String> {
    let c: Category = raw.parse().map_err(|e: String| anyhow!(e))?;
    Ok(c.to_string())
}

fn description_arg(sub: &clap::ArgMatches) -> Option<String> {
    sub.get_one::<String>("description")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

pub fn new_expense_from(sub: &clap::ArgMatches) -> Result<NewExpense> {
    let amount = parse_amount_arg(
        sub.get_one::<String>("amount")
            .ok_or_else(|| anyhow!("--amount is required"))?,
    )?;
    let category = canonical_category(
        sub.get_one::<String>("category")
            .ok_or_else(|| anyhow!("--category is required"))?,
    )?;
    Ok(NewExpense {
        amount,
        category,
        description: description_arg(sub),
    })
}

pub fn patch_from(sub: &clap::ArgMatches) -> Result<ExpensePatch> {
    let patch = ExpensePatch {
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_amount_arg(s))
            .transpose()?,
        category: sub
            .get_one::<String>("category")
            .map(|s| canonical_category(s))
            .transpose()?,
        // An explicit empty value clears the description.
        description: sub
            .get_one::<String>("description")
            .map(|s| s.trim().to_string()),
    };
    if patch.is_empty() {
        bail!("Nothing to change; pass --amount, --category or --description");
    }
    Ok(patch)
}

fn add<B: ExpenseBackend>(store: &mut ExpenseStore<B>, sub: &clap::ArgMatches) -> Result<()> {
    let expense = new_expense_from(sub)?;
    store.create(&expense)?;
    println!(
        "Recorded {} under {}",
        format_money(&expense.amount),
        expense.category
    );
    Ok(())
}

fn edit<B: ExpenseBackend>(store: &mut ExpenseStore<B>, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().to_string();
    let patch = patch_from(sub)?;
    store.update(&id, &patch)?;
    println!("Updated expense {}", id);
    Ok(())
}

fn remove<B: ExpenseBackend>(store: &mut ExpenseStore<B>, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().to_string();
    store.delete(&id)?;
    println!("Removed expense {}", id);
    Ok(())
}

/// Turn what the receipt showed, plus any flags the user passed, into an
/// expense ready to submit.
pub fn draft_from_receipt(guess: ReceiptGuess, sub: &clap::ArgMatches) -> Result<NewExpense> {
    let amount = sub
        .get_one::<String>("amount")
        .map(|s| parse_amount_arg(s))
        .transpose()?;
    let category = sub
        .get_one::<String>("category")
        .map(|s| canonical_category(s))
        .transpose()?;
    guess
        .into_draft(amount, category, description_arg(sub))
        .ok_or_else(|| anyhow!("Could not read an amount from the receipt; pass --amount"))
}

fn scan<B: ExpenseBackend>(store: &mut ExpenseStore<B>, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let guess = store.scan_receipt(Path::new(path))?;
    println!(
        "Read from receipt: amount {}, category {}, merchant {}",
        guess
            .amount
            .map(|a| format_money(&a))
            .unwrap_or_else(|| "?".to_string()),
        guess.category.as_deref().unwrap_or("?"),
        guess.merchant_name().unwrap_or("?"),
    );
    let draft = draft_from_receipt(guess, sub)?;
    if sub.get_flag("dry_run") {
        println!("{}", serde_json::to_string_pretty(&draft)?);
        return Ok(());
    }
    store.create(&draft)?;
    println!(
        "Recorded {} under {}{}",
        format_money(&draft.amount),
        draft.category,
        draft
            .description
            .as_deref()
            .map(|d| format!(" ({})", d))
            .unwrap_or_default()
    );
    Ok(())
}

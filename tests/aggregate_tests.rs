// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{expense, now};
use rust_decimal::Decimal;
use serde_json::json;
use spendbook::aggregate::{
    CategoryFilter, category_totals, current_month_total, filter_expenses, monthly_series,
};
use spendbook::calendar::CalendarZone;
use std::str::FromStr;

const UTC: CalendarZone = CalendarZone::Utc;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn empty_input_totals_zero() {
    assert_eq!(current_month_total(&[], &UTC, now()), Decimal::ZERO);
    assert!(monthly_series(&[], &UTC).is_empty());
}

#[test]
fn records_outside_current_month_are_ignored() {
    let list = vec![
        expense(1, json!(10), "Food", "Tea", "2025-07-31T23:59:59Z"),
        expense(2, json!(20), "Food", "Tea", "2025-09-01T00:00:00Z"),
        expense(3, json!(30), "Food", "Tea", "2024-08-10T00:00:00Z"),
    ];
    assert_eq!(current_month_total(&list, &UTC, now()), Decimal::ZERO);
}

#[test]
fn string_and_number_amounts_count_the_same() {
    let as_text = vec![expense(1, json!("10.50"), "Food", "", "2025-08-02T00:00:00Z")];
    let as_number = vec![expense(1, json!(10.5), "Food", "", "2025-08-02T00:00:00Z")];
    assert_eq!(
        current_month_total(&as_text, &UTC, now()),
        current_month_total(&as_number, &UTC, now())
    );
    assert_eq!(current_month_total(&as_text, &UTC, now()), d("10.5"));
}

#[test]
fn unreadable_amount_counts_zero_but_still_filters() {
    let list = vec![
        expense(1, json!("ten"), "Food", "Burger", "2025-08-02T00:00:00Z"),
        expense(2, json!("5"), "Food", "Fries", "2025-08-03T00:00:00Z"),
        expense(3, json!(null), "Food", "Burger deluxe", "2025-08-04T00:00:00Z"),
        expense(4, json!(-3), "Food", "Refund", "2025-08-04T00:00:00Z"),
    ];
    assert_eq!(current_month_total(&list, &UTC, now()), d("5"));

    let series = monthly_series(&list, &UTC);
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].total, d("5"));

    let hits = filter_expenses(&list, &CategoryFilter::All, "burger");
    let ids: Vec<String> = hits.iter().map(|e| e.id_string()).collect();
    assert_eq!(ids, vec!["1", "3"]);
}

#[test]
fn unreadable_date_is_left_out_of_sums() {
    let list = vec![
        expense(1, json!(7), "Bills", "Power", "not a date"),
        expense(2, json!(3), "Bills", "Water", "2025-08-09 08:00:00"),
    ];
    assert_eq!(current_month_total(&list, &UTC, now()), d("3"));
    assert_eq!(monthly_series(&list, &UTC).len(), 1);
    assert_eq!(filter_expenses(&list, &CategoryFilter::All, "power").len(), 1);
}

#[test]
fn series_is_sorted_with_one_entry_per_month() {
    let list = vec![
        expense(1, json!(5), "Food", "", "2025-03-10T00:00:00Z"),
        expense(2, json!(1), "Food", "", "2024-12-31T00:00:00Z"),
        expense(3, json!("2.5"), "Food", "", "2025-03-01T00:00:00Z"),
        expense(4, json!(4), "Food", "", "2025-01-15T00:00:00Z"),
        expense(5, json!(6), "Food", "", "2024-12-01T00:00:00Z"),
    ];
    let series = monthly_series(&list, &UTC);
    let months: Vec<&str> = series.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(months, vec!["2024-12", "2025-01", "2025-03"]);
    assert_eq!(series[0].total, d("7"));
    assert_eq!(series[2].total, d("7.5"));
}

#[test]
fn series_buckets_in_configured_zone() {
    let list = vec![expense(1, json!(9), "Food", "", "2025-08-31T20:00:00Z")];
    let ist = CalendarZone::from_str("+05:30").unwrap();
    assert_eq!(monthly_series(&list, &ist)[0].month, "2025-09");
    assert_eq!(monthly_series(&list, &UTC)[0].month, "2025-08");
}

#[test]
fn empty_filter_returns_everything_in_order() {
    let list = vec![
        expense(3, json!(1), "Shopping", "Cable", "2025-08-01T00:00:00Z"),
        expense(1, json!(2), "Food", "Dosa", "2025-06-01T00:00:00Z"),
        expense(2, json!("x"), "Other", "", "bad"),
    ];
    let all: CategoryFilter = "All".parse().unwrap();
    let out = filter_expenses(&list, &all, "");
    assert_eq!(out.len(), list.len());
    for (a, b) in out.iter().zip(list.iter()) {
        assert_eq!(*a, b);
    }
}

#[test]
fn category_and_query_must_both_match() {
    let list = vec![
        expense(1, json!(1), "Food", "Veg Burger", "2025-08-01T00:00:00Z"),
        expense(2, json!(1), "Shopping", "Burger King gift card", "2025-08-01T00:00:00Z"),
        expense(3, json!(1), "Food", "Pizza", "2025-08-01T00:00:00Z"),
        expense(4, json!(1), "food", "burger", "2025-08-01T00:00:00Z"),
    ];
    let food = CategoryFilter::from_str("Food").unwrap();
    let out = filter_expenses(&list, &food, "BURGER");
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id_string(), "1");
}

#[test]
fn query_matches_category_text_too() {
    let list = vec![
        expense(1, json!(1), "Transport", "Cab home", "2025-08-01T00:00:00Z"),
        expense(2, json!(1), "Food", "Lunch", "2025-08-01T00:00:00Z"),
    ];
    let out = filter_expenses(&list, &CategoryFilter::All, "trans");
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].category, "Transport");
}

#[test]
fn category_filter_wildcards() {
    assert_eq!(CategoryFilter::from_str("all").unwrap(), CategoryFilter::All);
    assert_eq!(CategoryFilter::from_str("").unwrap(), CategoryFilter::All);
    assert_eq!(
        CategoryFilter::from_str("Bills").unwrap(),
        CategoryFilter::Exact("Bills".into())
    );
}

#[test]
fn category_totals_largest_first() {
    let list = vec![
        expense(1, json!(5), "Food", "", "2025-08-01T00:00:00Z"),
        expense(2, json!(50), "Bills", "", "2025-08-01T00:00:00Z"),
        expense(3, json!("7"), "Food", "", "2025-07-01T00:00:00Z"),
        expense(4, json!("bad"), "Other", "", "2025-07-01T00:00:00Z"),
    ];
    let totals = category_totals(&list);
    let names: Vec<&str> = totals.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(names, vec!["Bills", "Food", "Other"]);
    assert_eq!(totals[1].total, d("12"));
    assert_eq!(totals[2].total, Decimal::ZERO);
}

#[test]
fn lunch_and_usb_scenario() {
    let list = vec![
        expense(1, json!("25.50"), "Food", "Lunch", "2025-08-05T13:00:00Z"),
        expense(2, json!(49.99), "Shopping", "USB", "2025-07-20T18:30:00Z"),
    ];
    assert_eq!(current_month_total(&list, &UTC, now()), d("25.50"));

    let series = monthly_series(&list, &UTC);
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].month, "2025-07");
    assert_eq!(series[0].total, d("49.99"));
    assert_eq!(series[1].month, "2025-08");

    let hits = filter_expenses(&list, &CategoryFilter::All, "usb");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id_string(), "2");
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let cfg = config::load(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cfg)? {
                let rows = vec![
                    vec!["api_url".to_string(), cfg.api_url.clone()],
                    vec!["zone".to_string(), cfg.zone.to_string()],
                    vec!["timeout_secs".to_string(), cfg.timeout_secs.to_string()],
                ];
                println!("{}", pretty_table(&["Setting", "Value"], rows));
            }
        }
        Some(("set", sub)) => {
            if let Some(url) = sub.get_one::<String>("api_url") {
                config::set_api_url(conn, url)?;
            }
            if let Some(zone) = sub.get_one::<String>("zone") {
                config::set_zone(conn, zone)?;
            }
            if let Some(t) = sub.get_one::<String>("timeout") {
                config::set_timeout(conn, t)?;
            }
            println!("Settings saved");
        }
        _ => {}
    }
    Ok(())
}

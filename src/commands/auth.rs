// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::session::Session;
use anyhow::{Result, bail};
use chrono::Utc;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("login", sub)) => {
            let token = sub.get_one::<String>("token").unwrap().trim();
            if token.is_empty() {
                bail!("Token must not be empty");
            }
            let session = Session::from_token(token);
            session.save(conn)?;
            println!("Logged in as {}", describe(&session));
        }
        Some(("logout", _)) => {
            Session::forget(conn)?;
            println!("Logged out");
        }
        Some(("whoami", _)) => {
            let session = Session::load(conn)?;
            if !session.is_authenticated() {
                println!("Not logged in");
            } else if session.is_expired(Utc::now()) {
                println!("{} (token expired)", describe(&session));
            } else {
                println!("{}", describe(&session));
            }
        }
        _ => {}
    }
    Ok(())
}

fn describe(session: &Session) -> String {
    match session.profile() {
        Some(p) => match p.expires_at() {
            Some(exp) => format!("{} until {}", p.display_name(), exp.format("%Y-%m-%d %H:%M UTC")),
            None => p.display_name(),
        },
        None => "(opaque token)".to_string(),
    }
}

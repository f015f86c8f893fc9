// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use spendbook::{cli, commands, db};

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SPENDBOOK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;

    let res = match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
            Ok(())
        }
        Some(("auth", sub)) => commands::auth::handle(&conn, sub),
        Some(("config", sub)) => commands::settings::handle(&conn, sub),
        Some(("expense", sub)) => {
            let mut store = commands::open_store(&conn)?;
            commands::expenses::handle(&mut store, sub)
        }
        Some(("report", sub)) => {
            let mut store = commands::open_store(&conn)?;
            commands::reports::handle(&mut store, sub)
        }
        Some(("export", sub)) => {
            let mut store = commands::open_store(&conn)?;
            commands::exporter::handle(&mut store, sub)
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
            Ok(())
        }
    };
    res.map_err(|e| commands::after_failure(&conn, e))
}

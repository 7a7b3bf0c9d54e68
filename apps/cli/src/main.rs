// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! QTO-Lite CLI - quantity takeoff over scene snapshots.
//!
//! Loads a scene snapshot (object hierarchy, properties and render proxies)
//! and either:
//!
//! - groups every leaf element by family and type, summing a measure
//! - lists the properties and world-space faces of a single element

use anyhow::{Context, Result};
use qto_lite_processing::{extract_element_metadata, extract_quantities, SceneSnapshot};
use std::io::{self, Write};
use std::process::ExitCode;

mod args;
mod config;
mod output;

use args::{Action, Command};
use config::Config;

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&argv) {
        Ok(Some(command)) => command,
        Ok(None) => {
            args::print_usage();
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Run with --help for usage.");
            return ExitCode::from(2);
        }
    };

    let config = Config::from_env();

    // Logs go to stderr so stdout stays clean for tables and JSON
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(config.log_filter.clone())
        .with_writer(io::stderr);
    if config.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match run(&command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Extraction failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Command, config: &Config) -> Result<()> {
    tracing::info!(
        snapshot = %command.snapshot,
        worker_threads = config.worker_threads,
        parallel_threshold = config.quantity.parallel_threshold,
        "Starting QTO-Lite"
    );

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build_global()
        .context("Failed to initialize thread pool")?;

    let scene = SceneSnapshot::from_path(&command.snapshot)
        .with_context(|| format!("Failed to load snapshot {}", command.snapshot))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command.action {
        Action::Quantities => {
            let takeoff = extract_quantities(&scene, &config.quantity)
                .context("Quantity takeoff failed")?;
            if command.json {
                serde_json::to_writer_pretty(&mut out, &takeoff)?;
                writeln!(out)?;
            } else {
                let rows = takeoff.rows(&config.quantity.measure_unit);
                output::write_quantity_table(&mut out, &rows)?;
            }
        }
        Action::Metadata { db_id } => {
            let metadata = extract_element_metadata(&scene, db_id)
                .with_context(|| format!("Metadata extraction failed for element {}", db_id))?;
            if command.json {
                serde_json::to_writer_pretty(&mut out, &metadata)?;
                writeln!(out)?;
            } else {
                output::write_metadata(&mut out, &metadata)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

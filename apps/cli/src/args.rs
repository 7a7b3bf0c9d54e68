// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command-line argument parsing.

/// What to extract from the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Family/type quantity table over all leaf elements.
    Quantities,
    /// Properties and faces of one element.
    Metadata { db_id: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub snapshot: String,
    pub action: Action,
    pub json: bool,
}

impl Command {
    /// Parse arguments (without the program name).
    ///
    /// Returns `Ok(None)` when help was requested.
    pub fn parse(args: &[String]) -> Result<Option<Command>, String> {
        if args.is_empty() || args.iter().any(|a| a == "-h" || a == "--help") {
            return Ok(None);
        }

        let mut positional = Vec::new();
        let mut json = false;
        for arg in args {
            match arg.as_str() {
                "--json" => json = true,
                other if other.starts_with("--") => {
                    return Err(format!("Unknown option: {}", other));
                }
                other => positional.push(other),
            }
        }

        let (snapshot, rest) = positional
            .split_first()
            .ok_or_else(|| "Missing snapshot path".to_string())?;

        let action = match rest {
            [] | ["quantities"] => Action::Quantities,
            ["metadata", id] => Action::Metadata {
                db_id: id
                    .parse()
                    .map_err(|_| format!("Invalid element id: {}", id))?,
            },
            ["metadata"] => return Err("metadata requires an element id".into()),
            [other, ..] => return Err(format!("Unknown command: {}", other)),
        };

        Ok(Some(Command {
            snapshot: snapshot.to_string(),
            action,
            json,
        }))
    }
}

pub fn print_usage() {
    println!(
        r#"QTO-Lite - quantity takeoff over scene snapshots
===============================================

USAGE:
  qto <snapshot.json> [quantities] [--json]
  qto <snapshot.json> metadata <db_id> [--json]

ARGUMENTS:
  <snapshot.json>           Scene snapshot (hierarchy, properties, render proxies)

COMMANDS:
  quantities                Family/type table over all leaf elements (default)
  metadata <db_id>          Properties and world-space faces of one element

OPTIONS:
  --json                    Print JSON instead of text
  -h, --help                Show this help message

ENVIRONMENT:
  QTO_FAMILY_KEYS           Family property aliases (default: "Family Name,Family")
  QTO_TYPE_KEYS             Type property aliases (default: "Type Name,Type")
  QTO_MEASURE_KEY           Summed property (default: "Volume")
  QTO_MEASURE_UNIT          Unit suffix for the summed property (default: "m³")
  QTO_PARALLEL_THRESHOLD    Records before aggregation goes parallel (default: 4096)
  WORKER_THREADS            Aggregation threads (default: CPU count)
  QTO_LOG_JSON              Log as JSON lines when "true"
  RUST_LOG                  Log filter (logs go to stderr)"#
    );
}

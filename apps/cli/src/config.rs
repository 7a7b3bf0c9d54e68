// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.

use qto_lite_processing::QuantityConfig;

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Property aliases and measure used by the takeoff.
    pub quantity: QuantityConfig,
    /// Number of worker threads for parallel aggregation.
    pub worker_threads: usize,
    /// Log filter directives when RUST_LOG is unset.
    pub log_filter: String,
    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Missing or unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = QuantityConfig::default();

        let list = |key: &str, default: Vec<String>| {
            lookup(key)
                .map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect::<Vec<_>>()
                })
                .filter(|keys| !keys.is_empty())
                .unwrap_or(default)
        };

        let quantity = QuantityConfig {
            family_keys: list("QTO_FAMILY_KEYS", defaults.family_keys),
            type_keys: list("QTO_TYPE_KEYS", defaults.type_keys),
            measure_key: lookup("QTO_MEASURE_KEY")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.measure_key),
            measure_unit: lookup("QTO_MEASURE_UNIT").unwrap_or(defaults.measure_unit),
            parallel_threshold: lookup("QTO_PARALLEL_THRESHOLD")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.parallel_threshold),
        };

        Self {
            quantity,
            worker_threads: lookup("WORKER_THREADS")
                .and_then(|s| s.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or_else(num_cpus::get),
            log_filter: lookup("RUST_LOG")
                .unwrap_or_else(|| "warn,qto_lite_processing=info,qto=info".into()),
            log_json: lookup("QTO_LOG_JSON")
                .map(|s| matches!(s.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

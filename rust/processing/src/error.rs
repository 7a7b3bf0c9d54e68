// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Errors surfaced by extraction.
//!
//! Decode anomalies never show up here: missing geometry, bad strides,
//! truncated buffers and missing properties are absorbed with fallbacks.
//! Only failures to reach the scene data make an extraction fail.

use thiserror::Error;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Scene source error: {0}")]
    Source(String),

    #[error("Element {0} not found in scene")]
    ElementNotFound(u32),

    #[error("Invalid scene snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a [`Error::Source`] from anything printable.
    pub fn scene(message: impl Into<String>) -> Self {
        Error::Source(message.into())
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding fragment geometry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Fragment has no decodable vertex buffer")]
    NoGeometry,

    #[error("Invalid vertex stride {0}: at least 3 position fields are required")]
    InvalidStride(usize),

    #[error("Malformed buffer: {0}")]
    MalformedBuffer(String),
}

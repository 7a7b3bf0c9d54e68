// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # QTO-Lite Geometry
//!
//! Turns opaque per-fragment render buffers into numbered world-space
//! triangles.
//!
//! - **Buffer decoding**: attribute-form and packed (strided) vertex buffers
//!   are normalized into one [`BufferView`]
//! - **Transforms**: fragment world matrices are applied with nalgebra
//! - **Face reconstruction**: indexed and non-indexed traversal with one
//!   contiguous face counter per extraction
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use qto_lite_geometry::{decode, matrix_from_elements, FaceCollector, RenderGeometry};
//!
//! let geometry = RenderGeometry::packed(vertex_floats, Some(6), Some(indices));
//! let view = decode(&geometry)?;
//!
//! let mut faces = FaceCollector::new(1);
//! faces.push_buffer(&view, &matrix_from_elements(&world_matrix), "Concrete (ID: 4)");
//! println!("{} faces", faces.finish().total_faces);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: serialization for [`RenderGeometry`], [`Face`] and [`FaceSet`]

pub mod buffer;
pub mod error;
pub mod faces;
pub mod transform;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3};

pub use buffer::{decode, BufferView, GeometryBuffer, RenderGeometry, POSITION_FIELDS};
pub use error::{Error, Result};
pub use faces::{reconstruct_faces, Face, FaceCollector, FaceSet, FaceSource};
pub use transform::{apply_transform, matrix_from_elements, IDENTITY_ELEMENTS};

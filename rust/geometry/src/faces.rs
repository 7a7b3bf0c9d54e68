// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! World-space face reconstruction
//!
//! Walks decoded buffers (indexed or not), transforms every corner into world
//! space and numbers the resulting triangles with one counter shared by all
//! buffers of an extraction.

use crate::buffer::{decode, BufferView, RenderGeometry, POSITION_FIELDS};
use crate::transform::apply_transform;
use nalgebra::{Matrix4, Point3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A world-space triangle
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Face {
    /// 1-based sequential index within one extraction
    pub index: u32,
    /// Corners in world space
    pub vertices: [Point3<f64>; 3],
    /// Resolved material label of the owning fragment
    pub material: String,
}

/// Faces produced by one extraction
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FaceSet {
    pub faces: Vec<Face>,
    pub total_faces: usize,
}

impl FaceSet {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Face> {
        self.faces.iter()
    }
}

/// Accumulates faces across the buffers of one extraction
#[derive(Debug, Clone)]
pub struct FaceCollector {
    next_index: u32,
    faces: Vec<Face>,
}

impl FaceCollector {
    /// Start numbering at `start_index` (1 for a fresh extraction)
    pub fn new(start_index: u32) -> Self {
        Self {
            next_index: start_index,
            faces: Vec::new(),
        }
    }

    /// Index the next emitted face will receive
    #[inline]
    pub fn next_index(&self) -> u32 {
        self.next_index
    }

    #[inline]
    pub fn total_faces(&self) -> usize {
        self.faces.len()
    }

    /// Walk one decoded buffer and append its faces
    ///
    /// Returns the number of faces emitted. Trailing partial triangles are
    /// dropped; an index pointing outside the vertex buffer stops the buffer
    /// at the last complete face.
    pub fn push_buffer(
        &mut self,
        view: &BufferView<'_>,
        transform: &Matrix4<f64>,
        material: &str,
    ) -> usize {
        if let Err(err) = view.validate() {
            tracing::warn!(%err, "Buffer does not split into whole triangles");
        }

        let before = self.faces.len();
        self.faces.reserve(view.triangle_count());

        match view.indices {
            Some(indices) => {
                for (triangle, corners) in indices.chunks_exact(3).enumerate() {
                    let (Some(a), Some(b), Some(c)) = (
                        view.position(corners[0] as usize),
                        view.position(corners[1] as usize),
                        view.position(corners[2] as usize),
                    ) else {
                        tracing::warn!(
                            triangle,
                            indices = ?corners,
                            vertex_count = view.vertex_count(),
                            "Index out of range, truncating buffer"
                        );
                        break;
                    };
                    self.emit([a, b, c], transform, material);
                }
            }
            None => {
                let Some(span) = view.triangle_span() else {
                    tracing::warn!(stride = view.stride, "Unusable stride, skipping buffer");
                    return 0;
                };
                let stride = view.stride;
                for block in view.positions.chunks_exact(span) {
                    let corner = |k: usize| {
                        let p = &block[k * stride..k * stride + POSITION_FIELDS];
                        Point3::new(p[0] as f64, p[1] as f64, p[2] as f64)
                    };
                    self.emit([corner(0), corner(1), corner(2)], transform, material);
                }
            }
        }

        self.faces.len() - before
    }

    #[inline]
    fn emit(&mut self, local: [Point3<f64>; 3], transform: &Matrix4<f64>, material: &str) {
        self.faces.push(Face {
            index: self.next_index,
            vertices: local.map(|v| apply_transform(&v, transform)),
            material: material.to_owned(),
        });
        self.next_index += 1;
    }

    pub fn finish(self) -> FaceSet {
        let total_faces = self.faces.len();
        FaceSet {
            faces: self.faces,
            total_faces,
        }
    }
}

/// One fragment's worth of input to [`reconstruct_faces`]
#[derive(Debug, Clone)]
pub struct FaceSource<'a> {
    pub geometry: &'a RenderGeometry,
    pub transform: Matrix4<f64>,
    pub material: String,
}

/// Reconstruct faces for a list of fragments
///
/// Fragments whose geometry fails to decode are skipped without consuming
/// face indices.
pub fn reconstruct_faces(sources: &[FaceSource<'_>], start_index: u32) -> FaceSet {
    let mut collector = FaceCollector::new(start_index);

    for (position, source) in sources.iter().enumerate() {
        match decode(source.geometry) {
            Ok(view) => {
                collector.push_buffer(&view, &source.transform, &source.material);
            }
            Err(err) => {
                tracing::warn!(source = position, %err, "Skipping fragment geometry");
            }
        }
    }

    collector.finish()
}

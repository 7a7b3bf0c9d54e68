// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Render buffer decoding
//!
//! Viewers hand out fragment geometry in one of two layouts:
//! - attribute form: a position attribute (3 floats per vertex) and an optional index attribute
//! - packed form: an interleaved vertex buffer with a declared stride and an optional index buffer
//!
//! Both are normalized into a [`BufferView`] before anything else reads them.

use crate::error::{Error, Result};
use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of position fields at the start of every vertex
pub const POSITION_FIELDS: usize = 3;

/// Fragment geometry as supplied by the host, with every layout field optional
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderGeometry {
    /// Attribute-form vertex positions (x, y, z)
    pub position: Option<Vec<f32>>,
    /// Attribute-form triangle indices
    pub index: Option<Vec<u32>>,
    /// Packed interleaved vertex buffer
    pub vb: Option<Vec<f32>>,
    /// Declared number of floats per packed vertex
    pub vbstride: Option<usize>,
    /// Packed triangle indices
    pub ib: Option<Vec<u32>>,
}

impl RenderGeometry {
    /// Attribute-form geometry
    pub fn attribute(positions: Vec<f32>, indices: Option<Vec<u32>>) -> Self {
        Self {
            position: Some(positions),
            index: indices,
            ..Self::default()
        }
    }

    /// Packed-form geometry
    pub fn packed(vertices: Vec<f32>, stride: Option<usize>, indices: Option<Vec<u32>>) -> Self {
        Self {
            vb: Some(vertices),
            vbstride: stride,
            ib: indices,
            ..Self::default()
        }
    }
}

/// Geometry layout resolved from a [`RenderGeometry`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryBuffer<'a> {
    Standard {
        positions: &'a [f32],
        indices: Option<&'a [u32]>,
    },
    Packed {
        positions: &'a [f32],
        stride: usize,
        indices: Option<&'a [u32]>,
    },
}

impl<'a> GeometryBuffer<'a> {
    /// Resolve the layout of host geometry.
    ///
    /// The attribute position array wins over the packed buffer. Index
    /// resolution is independent of which position array was chosen.
    pub fn from_render_geometry(geometry: &'a RenderGeometry) -> Result<Self> {
        let indices = geometry.index.as_deref().or(geometry.ib.as_deref());

        if let Some(positions) = geometry.position.as_deref() {
            return Ok(GeometryBuffer::Standard { positions, indices });
        }

        if let Some(positions) = geometry.vb.as_deref() {
            // A stride of 0 means the host left it unspecified
            let stride = geometry
                .vbstride
                .filter(|&stride| stride != 0)
                .unwrap_or(POSITION_FIELDS);
            if stride < POSITION_FIELDS || stride.checked_mul(3).is_none() {
                return Err(Error::InvalidStride(stride));
            }
            return Ok(GeometryBuffer::Packed {
                positions,
                stride,
                indices,
            });
        }

        Err(Error::NoGeometry)
    }

    /// Normalize into the canonical (positions, stride, indices) shape
    #[inline]
    pub fn view(&self) -> BufferView<'a> {
        match *self {
            GeometryBuffer::Standard { positions, indices } => BufferView {
                positions,
                stride: POSITION_FIELDS,
                indices,
            },
            GeometryBuffer::Packed {
                positions,
                stride,
                indices,
            } => BufferView {
                positions,
                stride,
                indices,
            },
        }
    }
}

/// Decode host geometry straight into its canonical view
pub fn decode(geometry: &RenderGeometry) -> Result<BufferView<'_>> {
    GeometryBuffer::from_render_geometry(geometry).map(|buffer| buffer.view())
}

/// Canonical view over a decoded vertex buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferView<'a> {
    /// Vertex floats, `stride` per vertex, position first
    pub positions: &'a [f32],
    /// Floats per vertex (always >= 3)
    pub stride: usize,
    /// Triangle list indices, if the buffer is indexed
    pub indices: Option<&'a [u32]>,
}

impl<'a> BufferView<'a> {
    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Number of vertices with a complete position
    #[inline]
    pub fn vertex_count(&self) -> usize {
        if self.stride < POSITION_FIELDS || self.positions.len() < POSITION_FIELDS {
            return 0;
        }
        (self.positions.len() - POSITION_FIELDS) / self.stride + 1
    }

    /// Position of vertex `index`, or `None` when it lies outside the buffer
    #[inline]
    pub fn position(&self, index: usize) -> Option<Point3<f64>> {
        let start = index.checked_mul(self.stride)?;
        let p = self.positions.get(start..start.checked_add(POSITION_FIELDS)?)?;
        Some(Point3::new(p[0] as f64, p[1] as f64, p[2] as f64))
    }

    /// Number of whole triangles the traversal will visit
    ///
    /// Indexed buffers count complete index triples, non-indexed buffers
    /// count complete `stride * 3` float blocks. Out-of-range indices are
    /// not accounted for here.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        match self.indices {
            Some(indices) => indices.len() / 3,
            None => self
                .triangle_span()
                .map_or(0, |span| self.positions.len() / span),
        }
    }

    /// Floats per non-indexed triangle, or `None` for an unusable stride
    #[inline]
    pub fn triangle_span(&self) -> Option<usize> {
        if self.stride < POSITION_FIELDS {
            return None;
        }
        self.stride.checked_mul(3)
    }

    /// Check that the buffer splits evenly into triangles
    pub fn validate(&self) -> Result<()> {
        let span = self
            .triangle_span()
            .ok_or(Error::InvalidStride(self.stride))?;
        match self.indices {
            Some(indices) if indices.len() % 3 != 0 => Err(Error::MalformedBuffer(format!(
                "index count {} is not a multiple of 3",
                indices.len()
            ))),
            None if self.positions.len() % span != 0 => Err(Error::MalformedBuffer(format!(
                "{} vertex floats do not form whole triangles at stride {}",
                self.positions.len(),
                self.stride
            ))),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_form_uses_stride_three() {
        let geometry = RenderGeometry::attribute(vec![0.0; 9], Some(vec![0, 1, 2]));
        let view = decode(&geometry).unwrap();

        assert_eq!(view.stride, 3);
        assert_eq!(view.positions.len(), 9);
        assert_eq!(view.indices, Some(&[0u32, 1, 2][..]));
    }

    #[test]
    fn test_packed_form_uses_declared_stride() {
        let geometry = RenderGeometry::packed(vec![0.0; 18], Some(6), None);
        let buffer = GeometryBuffer::from_render_geometry(&geometry).unwrap();

        assert!(matches!(buffer, GeometryBuffer::Packed { stride: 6, .. }));
        assert_eq!(buffer.view().stride, 6);
        assert!(!buffer.view().is_indexed());
    }

    #[test]
    fn test_packed_form_defaults_stride() {
        let geometry = RenderGeometry::packed(vec![0.0; 9], None, None);
        assert_eq!(decode(&geometry).unwrap().stride, 3);
    }

    #[test]
    fn test_attribute_positions_take_precedence() {
        let geometry = RenderGeometry {
            position: Some(vec![1.0; 9]),
            vb: Some(vec![2.0; 18]),
            vbstride: Some(6),
            ..RenderGeometry::default()
        };
        let buffer = GeometryBuffer::from_render_geometry(&geometry).unwrap();

        assert!(matches!(buffer, GeometryBuffer::Standard { .. }));
        assert_eq!(buffer.view().positions[0], 1.0);
    }

    #[test]
    fn test_index_resolution_is_independent() {
        // Attribute positions paired with a packed index buffer
        let geometry = RenderGeometry {
            position: Some(vec![0.0; 9]),
            ib: Some(vec![2, 1, 0]),
            ..RenderGeometry::default()
        };
        assert_eq!(decode(&geometry).unwrap().indices, Some(&[2u32, 1, 0][..]));

        // Standard index array wins over packed
        let geometry = RenderGeometry {
            vb: Some(vec![0.0; 9]),
            index: Some(vec![0, 1, 2]),
            ib: Some(vec![2, 1, 0]),
            ..RenderGeometry::default()
        };
        assert_eq!(decode(&geometry).unwrap().indices, Some(&[0u32, 1, 2][..]));
    }

    #[test]
    fn test_missing_buffers_is_no_geometry() {
        let geometry = RenderGeometry {
            index: Some(vec![0, 1, 2]),
            ..RenderGeometry::default()
        };
        assert_eq!(decode(&geometry), Err(Error::NoGeometry));
    }

    #[test]
    fn test_stride_below_three_is_rejected() {
        let geometry = RenderGeometry::packed(vec![0.0; 4], Some(2), None);
        assert_eq!(decode(&geometry), Err(Error::InvalidStride(2)));

        let geometry = RenderGeometry::packed(vec![0.0; 4], Some(1), None);
        assert_eq!(decode(&geometry), Err(Error::InvalidStride(1)));
    }

    #[test]
    fn test_zero_stride_means_unspecified() {
        let geometry = RenderGeometry::packed(vec![0.0; 9], Some(0), None);
        let view = decode(&geometry).unwrap();

        assert_eq!(view.stride, 3);
        assert_eq!(view.triangle_count(), 1);
    }

    #[test]
    fn test_overflowing_stride_is_rejected() {
        let stride = usize::MAX / 3 + 1;
        let geometry = RenderGeometry::packed(vec![0.0; 9], Some(stride), None);
        assert_eq!(decode(&geometry), Err(Error::InvalidStride(stride)));

        // Largest stride whose triangle span still fits decodes but holds no vertex
        let geometry = RenderGeometry::packed(vec![0.0; 9], Some(usize::MAX / 3), None);
        let view = decode(&geometry).unwrap();
        assert_eq!(view.vertex_count(), 1);
        assert_eq!(view.position(1), None);
        assert_eq!(view.triangle_count(), 0);
    }

    #[test]
    fn test_hand_built_view_with_bad_stride() {
        let view = BufferView {
            positions: &[0.0; 9],
            stride: 0,
            indices: None,
        };
        assert_eq!(view.vertex_count(), 0);
        assert_eq!(view.triangle_count(), 0);
        assert_eq!(view.validate(), Err(Error::InvalidStride(0)));
    }

    #[test]
    fn test_position_reads_first_three_fields() {
        let vertices = vec![
            1.0, 2.0, 3.0, 9.0, 9.0, 9.0, //
            4.0, 5.0, 6.0, 9.0, 9.0, 9.0,
        ];
        let geometry = RenderGeometry::packed(vertices, Some(6), None);
        let view = decode(&geometry).unwrap();

        assert_eq!(view.vertex_count(), 2);
        assert_eq!(view.position(1), Some(Point3::new(4.0, 5.0, 6.0)));
        assert_eq!(view.position(2), None);
    }

    #[test]
    fn test_last_vertex_may_omit_trailing_fields() {
        // Second vertex has its position but not its extra fields
        let vertices = vec![0.0, 0.0, 0.0, 7.0, 1.0, 2.0, 3.0];
        let geometry = RenderGeometry::packed(vertices, Some(4), None);
        let view = decode(&geometry).unwrap();

        assert_eq!(view.vertex_count(), 2);
        assert_eq!(view.position(1), Some(Point3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_validate_reports_partial_triangles() {
        let geometry = RenderGeometry::attribute(vec![0.0; 9], Some(vec![0, 1, 2, 0]));
        let view = decode(&geometry).unwrap();
        assert_eq!(view.triangle_count(), 1);
        assert!(matches!(view.validate(), Err(Error::MalformedBuffer(_))));

        let geometry = RenderGeometry::attribute(vec![0.0; 12], None);
        let view = decode(&geometry).unwrap();
        assert_eq!(view.triangle_count(), 1);
        assert!(view.validate().is_err());

        let geometry = RenderGeometry::attribute(vec![0.0; 18], None);
        assert!(decode(&geometry).unwrap().validate().is_ok());
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Local-to-world transforms for fragment vertices

use nalgebra::{Matrix4, Point3};

/// Column-major identity, in host element order
pub const IDENTITY_ELEMENTS: [f64; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Build a matrix from a host world-matrix element array
///
/// Elements are column-major (4 columns of 4), so the translation lives in
/// elements 12..=14.
#[inline]
pub fn matrix_from_elements(elements: &[f64; 16]) -> Matrix4<f64> {
    Matrix4::from_column_slice(elements)
}

/// Map a local vertex into world space
///
/// Affine only: `x' = x*m[0] + y*m[4] + z*m[8] + m[12]` and likewise for y'
/// and z'. The projective row is ignored, so no perspective divide happens.
#[inline]
pub fn apply_transform(vertex: &Point3<f64>, matrix: &Matrix4<f64>) -> Point3<f64> {
    let linear = matrix.fixed_view::<3, 3>(0, 0);
    let translation = matrix.fixed_view::<3, 1>(0, 3);
    Point3::from(linear * vertex.coords + translation)
}

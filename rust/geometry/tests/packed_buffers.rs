// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Face reconstruction over packed and attribute buffers of varying shapes

use approx::assert_relative_eq;
use qto_lite_geometry::{
    decode, matrix_from_elements, reconstruct_faces, FaceCollector, FaceSource, Point3,
    RenderGeometry, IDENTITY_ELEMENTS,
};

const X: f32 = 99.0;

#[test]
fn test_stride_six_selects_only_position_fields() {
    // [px, py, pz, nx, ny, nz] per vertex; normals filled with junk
    let vertices = vec![
        0.0, 0.0, 0.0, X, X, X, //
        2.0, 0.0, 0.0, X, X, X, //
        X, X, X, X, X, X, // unreferenced vertex
        0.0, 2.0, 0.0, X, X, X,
    ];
    let geometry = RenderGeometry::packed(vertices, Some(6), Some(vec![0, 1, 3]));
    let view = decode(&geometry).expect("packed buffer decodes");
    assert_eq!(view.stride, 6);

    let mut collector = FaceCollector::new(1);
    collector.push_buffer(&view, &matrix_from_elements(&IDENTITY_ELEMENTS), "m");
    let set = collector.finish();

    assert_eq!(set.total_faces, 1);
    assert_eq!(
        set.faces[0].vertices,
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0)
        ]
    );
}

#[test]
fn test_indexed_face_count_is_whole_triples() {
    let positions: Vec<f32> = (0..30).map(|i| i as f32).collect();

    for index_len in 0..20usize {
        let indices: Vec<u32> = (0..index_len as u32).map(|i| i % 10).collect();
        let geometry = RenderGeometry::attribute(positions.clone(), Some(indices));
        let sources = [FaceSource {
            geometry: &geometry,
            transform: matrix_from_elements(&IDENTITY_ELEMENTS),
            material: "m".into(),
        }];

        let set = reconstruct_faces(&sources, 1);
        let expected = index_len / 3;
        assert_eq!(set.total_faces, expected, "index_len={index_len}");
        let numbers: Vec<u32> = set.iter().map(|f| f.index).collect();
        assert_eq!(numbers, (1..=expected as u32).collect::<Vec<_>>());
    }
}

#[test]
fn test_non_indexed_face_count_is_whole_blocks() {
    for stride in 3..8usize {
        for len in 0..(stride * 3 * 4 + 2) {
            let geometry = RenderGeometry::packed(vec![1.0; len], Some(stride), None);
            let view = decode(&geometry).unwrap();

            let identity = matrix_from_elements(&IDENTITY_ELEMENTS);
            let mut collector = FaceCollector::new(1);
            let emitted = collector.push_buffer(&view, &identity, "m");
            assert_eq!(emitted, len / (stride * 3), "stride={stride} len={len}");
        }
    }
}

#[test]
fn test_transform_applies_to_every_corner() {
    let mut elements = IDENTITY_ELEMENTS;
    // Uniform scale by 2, then translate
    elements[0] = 2.0;
    elements[5] = 2.0;
    elements[10] = 2.0;
    elements[12] = 1.0;
    elements[13] = 1.0;
    elements[14] = 1.0;

    let geometry = RenderGeometry::packed(
        vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        Some(4),
        None,
    );
    let sources = [FaceSource {
        geometry: &geometry,
        transform: matrix_from_elements(&elements),
        material: "m".into(),
    }];

    let set = reconstruct_faces(&sources, 1);
    let [a, b, c] = set.faces[0].vertices;
    assert_relative_eq!(a, Point3::new(3.0, 1.0, 1.0), epsilon = 1e-9);
    assert_relative_eq!(b, Point3::new(1.0, 3.0, 1.0), epsilon = 1e-9);
    assert_relative_eq!(c, Point3::new(1.0, 1.0, 3.0), epsilon = 1e-9);
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extraction pipelines: quantity takeoff over all leaf elements, and
//! detailed metadata (properties + world-space faces) for one element.

use crate::error::Result;
use crate::material::resolve_material_label;
use crate::properties::Property;
use crate::quantities::{aggregate, aggregate_parallel, QuantityConfig, QuantityTakeoff};
use crate::scene::SceneSource;
use qto_lite_geometry::{decode, matrix_from_elements, Face, FaceCollector};
use serde::Serialize;
use std::time::Instant;

/// Everything known about one element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementMetadata {
    pub db_id: u32,
    pub name: Option<String>,
    pub properties: Vec<Property>,
    pub total_faces: usize,
    pub faces: Vec<Face>,
}

/// Bucket every leaf element by family/type and sum its measure.
pub fn extract_quantities<S>(source: &S, config: &QuantityConfig) -> Result<QuantityTakeoff>
where
    S: SceneSource + ?Sized,
{
    let start = Instant::now();

    let leaves = source.leaf_elements()?;
    let records = source.bulk_properties(&leaves, &config.requested_properties())?;

    let parallel = records.len() >= config.parallel_threshold;
    let takeoff = if parallel {
        aggregate_parallel(&records, config)
    } else {
        aggregate(&records, config)
    };

    tracing::info!(
        leaves = leaves.len(),
        records = records.len(),
        buckets = takeoff.len(),
        parallel,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Quantity takeoff complete"
    );

    Ok(takeoff)
}

/// Collect properties and world-space faces of one element.
///
/// Fragments without a render proxy or without decodable geometry are
/// skipped; they do not consume face indices.
pub fn extract_element_metadata<S>(source: &S, db_id: u32) -> Result<ElementMetadata>
where
    S: SceneSource + ?Sized,
{
    let record = source.properties(db_id)?;
    let fragment_ids = source.fragments(db_id)?;

    tracing::debug!(db_id, fragments = fragment_ids.len(), "Extracting element geometry");

    let mut collector = FaceCollector::new(1);

    for fragment_id in fragment_ids {
        let Some(proxy) = source.render_proxy(fragment_id)? else {
            tracing::warn!(db_id, fragment_id, "No render proxy for fragment");
            continue;
        };

        let material = resolve_material_label(proxy.material.as_ref(), Some(&record));

        let Some(geometry) = proxy.geometry.as_ref() else {
            tracing::warn!(db_id, fragment_id, "Fragment has no geometry");
            continue;
        };

        let view = match decode(geometry) {
            Ok(view) => view,
            Err(err) => {
                tracing::warn!(db_id, fragment_id, %err, "Skipping fragment");
                continue;
            }
        };

        let transform = matrix_from_elements(&proxy.matrix_world);
        let emitted = collector.push_buffer(&view, &transform, &material);

        tracing::debug!(
            fragment_id,
            stride = view.stride,
            indexed = view.is_indexed(),
            faces = emitted,
            material = %material,
            "Fragment decoded"
        );
    }

    let face_set = collector.finish();

    tracing::info!(
        db_id,
        name = record.name.as_deref().unwrap_or(""),
        properties = record.properties.len(),
        total_faces = face_set.total_faces,
        "Extracted element metadata"
    );

    Ok(ElementMetadata {
        db_id,
        name: record.name,
        properties: record.properties,
        total_faces: face_set.total_faces,
        faces: face_set.faces,
    })
}

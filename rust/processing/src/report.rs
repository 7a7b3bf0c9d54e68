// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Display rows for takeoff tables and face listings.

use crate::quantities::QuantityTakeoff;
use qto_lite_geometry::Point3;
use serde::Serialize;

/// One line of the quantity table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityRow {
    pub family: String,
    pub type_name: String,
    pub count: usize,
    /// Measure with two decimals and unit, or `-` when nothing was measured
    pub measure: String,
    /// Elements to isolate when the row is picked.
    pub db_ids: Vec<u32>,
}

/// Format a summed measure for display.
pub fn format_measure(value: f64, unit: &str) -> String {
    let rounded = format!("{:.2}", value);
    match rounded.parse::<f64>() {
        Ok(v) if v > 0.0 => {
            if unit.is_empty() {
                rounded
            } else {
                format!("{} {}", rounded, unit)
            }
        }
        _ => "-".to_string(),
    }
}

/// `(x, y, z)` with two decimals.
pub fn format_vertex(vertex: &Point3<f64>) -> String {
    format!("({:.2}, {:.2}, {:.2})", vertex.x, vertex.y, vertex.z)
}

impl QuantityTakeoff {
    /// Table rows in first-occurrence order.
    pub fn rows(&self, unit: &str) -> Vec<QuantityRow> {
        self.iter()
            .map(|(key, bucket)| QuantityRow {
                family: key.family.clone(),
                type_name: key.type_name.clone(),
                count: bucket.count(),
                measure: format_measure(bucket.total_measure, unit),
                db_ids: bucket.db_ids.clone(),
            })
            .collect()
    }
}

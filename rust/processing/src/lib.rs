// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # QTO-Lite Processing
//!
//! Element metadata extraction and quantity takeoff over a host scene graph.
//!
//! - **Quantity takeoff**: leaf elements are bucketed by family/type with a
//!   summed measure ([`extract_quantities`])
//! - **Element metadata**: properties plus numbered world-space faces with
//!   resolved material labels ([`extract_element_metadata`])
//!
//! The host is reached through [`SceneSource`]; [`SceneSnapshot`] implements
//! it over a JSON dump of a loaded scene.
//!
//! ```rust,ignore
//! use qto_lite_processing::{extract_quantities, QuantityConfig, SceneSnapshot};
//!
//! let scene = SceneSnapshot::from_path("scene.json")?;
//! let config = QuantityConfig::default();
//! for row in extract_quantities(&scene, &config)?.rows(&config.measure_unit) {
//!     println!("{} | {} | {} | {}", row.family, row.type_name, row.count, row.measure);
//! }
//! ```

pub mod error;
pub mod extract;
pub mod material;
pub mod properties;
pub mod quantities;
pub mod report;
pub mod scene;

pub use error::{Error, Result};
pub use extract::{extract_element_metadata, extract_quantities, ElementMetadata};
pub use material::{resolve_material_label, MaterialInfo, Rgb, FALLBACK_MATERIAL};
pub use properties::{Property, PropertyRecord, PropertyValue};
pub use quantities::{
    aggregate, aggregate_parallel, classify, BucketKey, QuantityBucket, QuantityConfig,
    QuantityTakeoff, UNKNOWN,
};
pub use report::{format_measure, format_vertex, QuantityRow};
pub use scene::{RenderProxy, SceneNode, SceneSnapshot, SceneSource};

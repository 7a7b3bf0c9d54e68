// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene graph access.
//!
//! [`SceneSource`] is the seam to whatever viewer runtime owns the model:
//! hierarchy, property queries, fragment lists and render proxies.
//! [`SceneSnapshot`] implements it over a JSON dump of a loaded scene.

use crate::error::{Error, Result};
use crate::material::MaterialInfo;
use crate::properties::{Property, PropertyRecord};
use qto_lite_geometry::{RenderGeometry, IDENTITY_ELEMENTS};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Renderable instance of one fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderProxy {
    #[serde(default)]
    pub geometry: Option<RenderGeometry>,
    #[serde(default)]
    pub material: Option<MaterialInfo>,
    /// Column-major world matrix elements.
    #[serde(default = "identity_elements")]
    pub matrix_world: [f64; 16],
}

fn identity_elements() -> [f64; 16] {
    IDENTITY_ELEMENTS
}

impl RenderProxy {
    pub fn new(geometry: RenderGeometry) -> Self {
        Self {
            geometry: Some(geometry),
            material: None,
            matrix_world: IDENTITY_ELEMENTS,
        }
    }

    pub fn with_material(mut self, material: MaterialInfo) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_matrix(mut self, matrix_world: [f64; 16]) -> Self {
        self.matrix_world = matrix_world;
        self
    }
}

/// Queries the extraction pipeline makes against the host scene.
///
/// Every method may fail when the host cannot be reached; extraction treats
/// that as fatal for the call. Implementations are shared across threads
/// by callers that aggregate in parallel.
pub trait SceneSource: Sync {
    /// Elements with no children in the hierarchy.
    fn leaf_elements(&self) -> Result<Vec<u32>>;

    /// Properties of many elements, restricted to `property_names`.
    ///
    /// Unknown ids are omitted from the result.
    fn bulk_properties(
        &self,
        db_ids: &[u32],
        property_names: &[String],
    ) -> Result<Vec<PropertyRecord>>;

    /// Name and full property list of one element.
    fn properties(&self, db_id: u32) -> Result<PropertyRecord>;

    /// Fragment ids making up one element.
    fn fragments(&self, db_id: u32) -> Result<Vec<u32>>;

    /// Render proxy of a fragment; `None` when the host has none for it.
    fn render_proxy(&self, fragment_id: u32) -> Result<Option<RenderProxy>>;
}

/// One node of a snapshot hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    pub db_id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub children: Vec<u32>,
    #[serde(default)]
    pub fragments: Vec<u32>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl SceneNode {
    fn record(&self) -> PropertyRecord {
        PropertyRecord {
            db_id: self.db_id,
            name: self.name.clone(),
            properties: self.properties.clone(),
        }
    }
}

/// In-memory scene loaded from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    pub root: u32,
    #[serde(default)]
    pub nodes: Vec<SceneNode>,
    /// Render proxies by fragment id.
    #[serde(default)]
    pub fragments: FxHashMap<u32, RenderProxy>,
    #[serde(skip)]
    node_index: FxHashMap<u32, usize>,
}

impl SceneSnapshot {
    pub fn new(root: u32, nodes: Vec<SceneNode>, fragments: FxHashMap<u32, RenderProxy>) -> Self {
        let mut snapshot = Self {
            root,
            nodes,
            fragments,
            node_index: FxHashMap::default(),
        };
        snapshot.build_index();
        snapshot
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut snapshot: SceneSnapshot = serde_json::from_str(json)?;
        snapshot.build_index();
        Ok(snapshot)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let snapshot = Self::from_json_str(&json)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            nodes = snapshot.nodes.len(),
            fragments = snapshot.fragments.len(),
            "Loaded scene snapshot"
        );
        Ok(snapshot)
    }

    fn build_index(&mut self) {
        self.node_index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(slot, node)| (node.db_id, slot))
            .collect();
    }

    pub fn node(&self, db_id: u32) -> Option<&SceneNode> {
        self.node_index.get(&db_id).map(|&slot| &self.nodes[slot])
    }

    fn require_node(&self, db_id: u32) -> Result<&SceneNode> {
        self.node(db_id).ok_or(Error::ElementNotFound(db_id))
    }
}

impl SceneSource for SceneSnapshot {
    fn leaf_elements(&self) -> Result<Vec<u32>> {
        let root = self
            .node(self.root)
            .ok_or_else(|| Error::scene(format!("root node {} is missing", self.root)))?;

        // Pre-order walk below the root; ids without a node have no children
        let mut leaves = Vec::new();
        let mut visited = FxHashSet::default();
        visited.insert(root.db_id);
        let mut stack: Vec<u32> = root.children.iter().rev().copied().collect();

        while let Some(db_id) = stack.pop() {
            if !visited.insert(db_id) {
                continue;
            }
            match self.node(db_id) {
                Some(node) if !node.children.is_empty() => {
                    stack.extend(node.children.iter().rev().copied());
                }
                _ => leaves.push(db_id),
            }
        }

        Ok(leaves)
    }

    fn bulk_properties(
        &self,
        db_ids: &[u32],
        property_names: &[String],
    ) -> Result<Vec<PropertyRecord>> {
        Ok(db_ids
            .iter()
            .filter_map(|&db_id| self.node(db_id))
            .map(|node| node.record().restricted_to(property_names))
            .collect())
    }

    fn properties(&self, db_id: u32) -> Result<PropertyRecord> {
        self.require_node(db_id).map(SceneNode::record)
    }

    fn fragments(&self, db_id: u32) -> Result<Vec<u32>> {
        self.require_node(db_id).map(|node| node.fragments.clone())
    }

    fn render_proxy(&self, fragment_id: u32) -> Result<Option<RenderProxy>> {
        Ok(self.fragments.get(&fragment_id).cloned())
    }
}

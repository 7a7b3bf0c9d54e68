// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material label resolution for fragment faces.

use crate::properties::PropertyRecord;
use serde::{Deserialize, Serialize};

/// Prefix viewers give to materials that were exported without a name.
pub const UNNAMED_PREFIX: &str = "Unnamed";

/// Label used when neither the material nor the properties name one.
pub const FALLBACK_MATERIAL: &str = "Unnamed Material";

/// Linear RGB colour with channels in 0..1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Six lowercase hex digits, without a leading `#`.
    pub fn hex_string(&self) -> String {
        #[inline]
        fn channel(c: f32) -> u8 {
            (c.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        format!("{:02x}{:02x}{:02x}", channel(self.r), channel(self.g), channel(self.b))
    }
}

/// Live material object attached to a fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialInfo {
    #[serde(default)]
    pub name: Option<String>,
    /// Viewer material id; 0 is treated as unassigned.
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub color: Option<Rgb>,
}

/// Resolve the label shown next to every face of a fragment.
///
/// The live material name is used unless it is missing or starts with
/// `"Unnamed"`; then the first property whose name contains "material"
/// supplies it. A live material adds its id and colour to the label.
pub fn resolve_material_label(
    material: Option<&MaterialInfo>,
    properties: Option<&PropertyRecord>,
) -> String {
    let mut name = material
        .and_then(|m| m.name.clone())
        .filter(|n| !n.is_empty());

    if name.as_deref().map_or(true, |n| n.starts_with(UNNAMED_PREFIX)) {
        if let Some(prop) = properties.and_then(|p| p.find_name_containing("material")) {
            name = prop.display_value.non_empty_text();
        }
    }

    let name = name.unwrap_or_else(|| FALLBACK_MATERIAL.to_string());

    let Some(material) = material else {
        return name;
    };

    // Viewers number materials from 0; id 0 reads as unassigned
    let mut label = match material.id.filter(|&id| id != 0) {
        Some(id) => format!("{} (ID: {})", name, id),
        None => format!("{} (No ID)", name),
    };
    if let Some(color) = &material.color {
        label.push_str(&format!(" (Color: #{})", color.hex_string()));
    }
    label
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element property records as returned by the host property queries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A property display value.
///
/// Hosts send numbers, strings, booleans or null interchangeably.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    Text(String),
    #[default]
    Null,
}

impl PropertyValue {
    /// True for null and empty text.
    pub fn is_empty(&self) -> bool {
        match self {
            PropertyValue::Null => true,
            PropertyValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Display text, or `None` when the value is empty.
    pub fn non_empty_text(&self) -> Option<String> {
        (!self.is_empty()).then(|| self.to_string())
    }

    /// Read the value as a finite number.
    ///
    /// Text is parsed leniently from its leading numeric prefix, so
    /// `"2.5 m³"` reads as 2.5.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            PropertyValue::Text(s) => fast_float::parse_partial::<f64, _>(s.trim_start())
                .ok()
                .map(|(value, _)| value),
            _ => None,
        }
        .filter(|n| n.is_finite())
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Number(n) => write!(f, "{}", n),
            PropertyValue::Text(s) => f.write_str(s),
            PropertyValue::Null => Ok(()),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Text(s)
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Number(n)
    }
}

/// A single (display name, display value) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub display_name: String,
    #[serde(default)]
    pub display_value: PropertyValue,
}

impl Property {
    pub fn new(display_name: impl Into<String>, display_value: impl Into<PropertyValue>) -> Self {
        Self {
            display_name: display_name.into(),
            display_value: display_value.into(),
        }
    }
}

/// Properties of one element, in host order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub db_id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl PropertyRecord {
    pub fn new(db_id: u32) -> Self {
        Self {
            db_id,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_property(
        mut self,
        display_name: impl Into<String>,
        display_value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.push(Property::new(display_name, display_value));
        self
    }

    /// First property with exactly this display name.
    pub fn get(&self, display_name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.display_name == display_name)
    }

    /// First non-empty property matching one of `aliases`, tried in priority order.
    pub fn first_of<S: AsRef<str>>(&self, aliases: &[S]) -> Option<&Property> {
        aliases.iter().find_map(|alias| {
            self.properties
                .iter()
                .find(|p| p.display_name == alias.as_ref() && !p.display_value.is_empty())
        })
    }

    /// First property whose display name contains `needle`, ignoring case.
    pub fn find_name_containing(&self, needle: &str) -> Option<&Property> {
        let needle = needle.to_lowercase();
        self.properties
            .iter()
            .find(|p| p.display_name.to_lowercase().contains(&needle))
    }

    /// Copy of this record keeping only the named properties.
    ///
    /// An empty filter keeps everything.
    pub fn restricted_to<S: AsRef<str>>(&self, names: &[S]) -> PropertyRecord {
        if names.is_empty() {
            return self.clone();
        }
        PropertyRecord {
            db_id: self.db_id,
            name: self.name.clone(),
            properties: self
                .properties
                .iter()
                .filter(|p| names.iter().any(|n| n.as_ref() == p.display_name))
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_reads_leading_number() {
        let number = |s: &str| PropertyValue::from(s).as_number();

        assert_eq!(number("2.5"), Some(2.5));
        assert_eq!(number("  2.5 m³"), Some(2.5));
        assert_eq!(number("-3"), Some(-3.0));
        assert_eq!(number(".5"), Some(0.5));
        assert_eq!(number("7."), Some(7.0));
        assert_eq!(number("1e3mm"), Some(1000.0));
        assert_eq!(number("1e"), Some(1.0));
        assert_eq!(number("1,234"), Some(1.0));
        assert_eq!(number("m³ 2"), None);
        assert_eq!(number("."), None);
        assert_eq!(number("-"), None);
        assert_eq!(number(""), None);
    }

    #[test]
    fn test_as_number_rejects_non_finite() {
        assert_eq!(PropertyValue::Number(f64::NAN).as_number(), None);
        assert_eq!(PropertyValue::Text("inf".into()).as_number(), None);
        assert_eq!(PropertyValue::Bool(true).as_number(), None);
        assert_eq!(PropertyValue::Null.as_number(), None);
        assert_eq!(PropertyValue::Number(1.5).as_number(), Some(1.5));
    }

    #[test]
    fn test_display_value_deserializes_untagged() {
        let json = r#"[
            {"displayName": "Volume", "displayValue": 2.5},
            {"displayName": "Family", "displayValue": "Wall"},
            {"displayName": "Structural", "displayValue": false},
            {"displayName": "Comments", "displayValue": null},
            {"displayName": "Mark"}
        ]"#;
        let props: Vec<Property> = serde_json::from_str(json).unwrap();

        assert_eq!(props[0].display_value, PropertyValue::Number(2.5));
        assert_eq!(props[1].display_value, PropertyValue::Text("Wall".into()));
        assert_eq!(props[2].display_value, PropertyValue::Bool(false));
        assert_eq!(props[3].display_value, PropertyValue::Null);
        assert_eq!(props[4].display_value, PropertyValue::Null);
    }

    #[test]
    fn test_display_formats_numbers_plainly() {
        assert_eq!(PropertyValue::Number(1.0).to_string(), "1");
        assert_eq!(PropertyValue::Number(2.25).to_string(), "2.25");
        assert_eq!(PropertyValue::Null.to_string(), "");
    }

    #[test]
    fn test_first_of_uses_alias_priority() {
        // "Family" appears first in the record but "Family Name" has priority
        let record = PropertyRecord::new(1)
            .with_property("Family", "Generic")
            .with_property("Family Name", "Wall");

        let found = record.first_of(&["Family Name", "Family"]).unwrap();
        assert_eq!(found.display_value, PropertyValue::from("Wall"));
    }

    #[test]
    fn test_first_of_skips_empty_values() {
        let record = PropertyRecord::new(1)
            .with_property("Family Name", "")
            .with_property("Family", "Wall");

        let found = record.first_of(&["Family Name", "Family"]).unwrap();
        assert_eq!(found.display_name, "Family");
        assert!(record.first_of(&["Type"]).is_none());
    }

    #[test]
    fn test_find_name_containing_ignores_case() {
        let record = PropertyRecord::new(1)
            .with_property("Volume", 1.0)
            .with_property("Structural MATERIAL", "Steel")
            .with_property("Material", "Concrete");

        let found = record.find_name_containing("material").unwrap();
        assert_eq!(found.display_value, PropertyValue::from("Steel"));
    }

    #[test]
    fn test_restricted_to_filters_by_name() {
        let record = PropertyRecord::new(3)
            .with_name("Basic Wall [3]")
            .with_property("Volume", 1.0)
            .with_property("Area", 4.0);

        let filtered = record.restricted_to(&["Volume"]);
        assert_eq!(filtered.properties.len(), 1);
        assert_eq!(filtered.name.as_deref(), Some("Basic Wall [3]"));
        assert_eq!(record.restricted_to::<&str>(&[]), record);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Quantity takeoff - folds element property records into family/type buckets.

use crate::properties::PropertyRecord;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::ser::{Serialize, Serializer};
use std::fmt;

/// Substituted for a missing family or type.
pub const UNKNOWN: &str = "Unknown";

/// Records per rayon task in [`aggregate_parallel`].
const PARALLEL_CHUNK: usize = 1024;

/// Which properties feed the takeoff.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantityConfig {
    /// Family property aliases, highest priority first.
    pub family_keys: Vec<String>,
    /// Type property aliases, highest priority first.
    pub type_keys: Vec<String>,
    /// Numeric property summed per bucket.
    pub measure_key: String,
    /// Unit suffix used when the measure is displayed.
    pub measure_unit: String,
    /// Record count at which extraction switches to parallel aggregation.
    pub parallel_threshold: usize,
}

impl Default for QuantityConfig {
    fn default() -> Self {
        Self {
            family_keys: vec!["Family Name".into(), "Family".into()],
            type_keys: vec!["Type Name".into(), "Type".into()],
            measure_key: "Volume".into(),
            measure_unit: "m³".into(),
            parallel_threshold: 4096,
        }
    }
}

impl QuantityConfig {
    /// Property names to request from the bulk property query.
    pub fn requested_properties(&self) -> Vec<String> {
        let mut names: Vec<String> =
            Vec::with_capacity(self.family_keys.len() + self.type_keys.len() + 1);
        for name in self
            .family_keys
            .iter()
            .chain(&self.type_keys)
            .chain(std::iter::once(&self.measure_key))
        {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }
}

/// Composite bucket key, displayed as `family|type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketKey {
    pub family: String,
    pub type_name: String,
}

impl BucketKey {
    pub fn new(family: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            type_name: type_name.into(),
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.family, self.type_name)
    }
}

/// Elements and summed measure of one family/type pair.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityBucket {
    pub db_ids: Vec<u32>,
    pub total_measure: f64,
}

impl QuantityBucket {
    #[inline]
    pub fn count(&self) -> usize {
        self.db_ids.len()
    }
}

/// Buckets in order of first occurrence.
///
/// Buckets are identified by the composite `family|type` string, so pairs
/// that render to the same string share a bucket. The stored [`BucketKey`]
/// is the first pair seen.
#[derive(Debug, Clone, Default)]
pub struct QuantityTakeoff {
    buckets: Vec<(BucketKey, QuantityBucket)>,
    slots: FxHashMap<String, usize>,
}

impl QuantityTakeoff {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, key: &BucketKey) -> Option<&QuantityBucket> {
        self.slots
            .get(&key.to_string())
            .map(|&slot| &self.buckets[slot].1)
    }

    /// Iterate buckets in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (&BucketKey, &QuantityBucket)> {
        self.buckets.iter().map(|(key, bucket)| (key, bucket))
    }

    fn bucket_mut(&mut self, key: BucketKey) -> &mut QuantityBucket {
        let composite = key.to_string();
        let slot = match self.slots.get(&composite) {
            Some(&slot) => slot,
            None => {
                let slot = self.buckets.len();
                self.slots.insert(composite, slot);
                self.buckets.push((key, QuantityBucket::default()));
                slot
            }
        };
        &mut self.buckets[slot].1
    }

    /// Add one element to its bucket.
    pub fn add(&mut self, key: BucketKey, db_id: u32, measure: f64) {
        let bucket = self.bucket_mut(key);
        bucket.db_ids.push(db_id);
        bucket.total_measure += measure;
    }

    /// Fold another takeoff into this one.
    ///
    /// Buckets new to `self` are appended in `other`'s order.
    pub fn merge(&mut self, other: QuantityTakeoff) {
        for (key, part) in other.buckets {
            let bucket = self.bucket_mut(key);
            bucket.db_ids.extend(part.db_ids);
            bucket.total_measure += part.total_measure;
        }
    }

    /// Sum of the measure over all buckets.
    pub fn total_measure(&self) -> f64 {
        self.buckets.iter().map(|(_, b)| b.total_measure).sum()
    }
}

impl Serialize for QuantityTakeoff {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(key, bucket)| (key.to_string(), bucket)))
    }
}

/// Resolve the bucket key and measure contribution of one record.
pub fn classify(record: &PropertyRecord, config: &QuantityConfig) -> (BucketKey, f64) {
    let resolve = |aliases: &[String]| {
        record
            .first_of(aliases)
            .and_then(|p| p.display_value.non_empty_text())
            .unwrap_or_else(|| UNKNOWN.to_string())
    };

    let key = BucketKey {
        family: resolve(config.family_keys.as_slice()),
        type_name: resolve(config.type_keys.as_slice()),
    };
    let measure = record
        .get(&config.measure_key)
        .and_then(|p| p.display_value.as_number())
        .unwrap_or(0.0);

    (key, measure)
}

/// Sequential fold of records into buckets.
pub fn aggregate(records: &[PropertyRecord], config: &QuantityConfig) -> QuantityTakeoff {
    let mut takeoff = QuantityTakeoff::new();
    for record in records {
        let (key, measure) = classify(record, config);
        takeoff.add(key, record.db_id, measure);
    }
    takeoff
}

/// Parallel fold: per-chunk takeoffs merged in chunk order.
///
/// Produces the same buckets, in the same order, as [`aggregate`].
pub fn aggregate_parallel(records: &[PropertyRecord], config: &QuantityConfig) -> QuantityTakeoff {
    records
        .par_chunks(PARALLEL_CHUNK)
        .map(|chunk| aggregate(chunk, config))
        .reduce(QuantityTakeoff::new, |mut acc, part| {
            acc.merge(part);
            acc
        })
}

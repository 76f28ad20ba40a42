//! Collapsing repeated station labels.
//!
//! Two labels are the same station when their name and (order-independent)
//! line set match. The later label wins but keeps the position of the first,
//! so output order follows first appearance. A collision may also mean two
//! distinct stations happen to share a name and line set, so every one is
//! logged and kept for inspection.

use std::collections::HashMap;

use crate::models::feature::Feature;

#[derive(Debug, Default)]
pub struct StationDeduplicator<'a> {
    positions: HashMap<(String, Vec<String>), usize>,
    stations: Vec<&'a Feature>,
    collisions: Vec<String>,
}

impl<'a> StationDeduplicator<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a feature; anything other than a station label is ignored.
    ///
    /// Returns `true` if an earlier station with the same key was replaced.
    pub fn insert(&mut self, feature: &'a Feature) -> bool {
        let Some(label) = feature.station_label() else {
            return false;
        };
        let key = label.key();

        match self.positions.get(&key) {
            Some(&index) => {
                let station = format!("{} ({})", key.0, key.1.join(","));
                log::warn!("Station {} appears more than once; keeping the later one", station);
                self.stations[index] = feature;
                self.collisions.push(station);
                true
            }
            None => {
                self.positions.insert(key, self.stations.len());
                self.stations.push(feature);
                false
            }
        }
    }

    /// `"<name> (<sorted lines>)"` of every replaced station, one entry per replacement.
    pub fn collisions(&self) -> &[String] {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn into_stations(self) -> Vec<&'a Feature> {
        self.stations
    }
}

/// One station label per key, last occurrence winning.
pub fn dedupe<'a>(features: impl IntoIterator<Item = &'a Feature>) -> Vec<&'a Feature> {
    let mut dedup = StationDeduplicator::new();
    for feature in features {
        dedup.insert(feature);
    }
    dedup.into_stations()
}

//! Axis-aligned bounding boxes over features.

use std::fmt;

use geo::{BoundingRect, Rect};
use serde::{Deserialize, Serialize};

use crate::models::feature::Feature;

/// `[minLng, minLat, maxLng, maxLat]`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl BBox {
    pub fn new(min_lng: f64, min_lat: f64, max_lng: f64, max_lat: f64) -> Self {
        Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        }
    }

    /// True iff `inner` lies inside `self`, boundaries included.
    pub fn contains(&self, inner: &BBox) -> bool {
        self.min_lng <= inner.min_lng
            && self.min_lat <= inner.min_lat
            && self.max_lng >= inner.max_lng
            && self.max_lat >= inner.max_lat
    }

    /// True iff the two boxes share at least one point.
    pub fn intersects(&self, other: &BBox) -> bool {
        self.min_lng <= other.max_lng
            && other.min_lng <= self.max_lng
            && self.min_lat <= other.max_lat
            && other.min_lat <= self.max_lat
    }

    /// Smallest box covering both.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox::new(
            self.min_lng.min(other.min_lng),
            self.min_lat.min(other.min_lat),
            self.max_lng.max(other.max_lng),
            self.max_lat.max(other.max_lat),
        )
    }

    /// Compact JSON array form, as stored in search records.
    pub fn to_json_string(&self) -> String {
        let [a, b, c, d] = <[f64; 4]>::from(*self);
        serde_json::json!([a, b, c, d]).to_string()
    }
}

impl From<[f64; 4]> for BBox {
    fn from([min_lng, min_lat, max_lng, max_lat]: [f64; 4]) -> Self {
        Self::new(min_lng, min_lat, max_lng, max_lat)
    }
}

impl From<BBox> for [f64; 4] {
    fn from(bbox: BBox) -> Self {
        [bbox.min_lng, bbox.min_lat, bbox.max_lng, bbox.max_lat]
    }
}

impl From<Rect<f64>> for BBox {
    fn from(rect: Rect<f64>) -> Self {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.min_lng, self.min_lat, self.max_lng, self.max_lat
        )
    }
}

/// Envelope of a single feature's geometry.
pub fn feature_bbox(feature: &Feature) -> Option<BBox> {
    let geometry = geo::Geometry::<f64>::try_from(feature.geometry.value.clone()).ok()?;
    geometry.bounding_rect().map(BBox::from)
}

/// Envelope over every coordinate of every feature; `None` when empty.
pub fn compute_bbox<'a>(features: impl IntoIterator<Item = &'a Feature>) -> Option<BBox> {
    union_bboxes(features.into_iter().filter_map(feature_bbox))
}

/// Envelope of envelopes; `None` when empty.
pub fn union_bboxes(bboxes: impl IntoIterator<Item = BBox>) -> Option<BBox> {
    bboxes.into_iter().reduce(|acc, b| acc.union(&b))
}

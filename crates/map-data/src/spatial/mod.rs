//! Bounding boxes and declared-extent checks.

pub mod bbox;
pub mod containment;

pub use bbox::{compute_bbox, union_bboxes, BBox};
pub use containment::{check_bounds, BBoxContainmentError, BoundsSubject};

//! Bounding boxes and measurement of paths.
//!
//! Everything here works on the all-cubic form of a path, so arcs and
//! quadratics are measured through their cubic approximations.

mod bbox;
mod measure;

pub use bbox::{cubic_bbox, path_bbox, PathBBox};
pub use measure::{cubic_length, draw_direction, path_area, path_length, point_at_length};

pub(crate) use bbox::bbox_of;

//! Point-in-Polygon (PIP) region resolution.
//!
//! Loads named region polygons from GeoJSON and classifies points into at
//! most one region, using an R-tree of region envelopes as a pre-filter.

mod boundary;
mod geometry;
mod index;
mod service;

pub use boundary::{load_regions, load_regions_file, DuplicatePolicy, LoadOptions};
pub use geometry::{build_polygon, build_ring};
pub use index::RegionSet;
pub use service::{resolve, resolve_batch, resolve_par, ResolveBatch};

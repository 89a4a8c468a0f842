//! Regionfill - point-in-polygon region resolution for record backfill
//!
//! This library provides the region resolver and the batch driver used by the
//! `backfill` binary.

pub mod batch;
pub mod config;
pub mod error;
pub mod models;
pub mod pip;

pub use error::{ResolveError, Result};
pub use models::{GeoPoint, Region, ResolutionResult};
pub use pip::{load_regions, resolve, resolve_batch, resolve_par, RegionSet};

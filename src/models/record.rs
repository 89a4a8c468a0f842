//! Collision record fields read and written by the backfill driver.

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// The subset of a collision row the backfill driver works with.
///
/// Other columns of the row are carried by the table the record was read
/// from and never touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionRecord {
    /// Primary key
    pub id: String,

    pub region: Option<String>,

    pub postal_code: Option<String>,

    pub latitude: Option<f64>,

    pub longitude: Option<f64>,

    /// Set when the region was filled in by the resolver
    pub updated_manually: bool,
}

impl CollisionRecord {
    pub fn has_region(&self) -> bool {
        self.region
            .as_deref()
            .map(|r| !r.trim().is_empty())
            .unwrap_or(false)
    }

    /// Both coordinates, if present. Range is not checked here.
    pub fn point(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        }
    }

    /// Missing region with coordinates present
    pub fn is_candidate(&self) -> bool {
        !self.has_region() && self.point().is_some()
    }
}

//! Input points and per-lookup results.

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, Result};

/// Geographic point (lat/lon)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// WGS84 range check. NaN and infinities are never valid.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && self.lat.abs() <= 90.0
            && self.lon.abs() <= 180.0
    }

    pub fn validate(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(ResolveError::InvalidCoordinate {
                lat: self.lat,
                lon: self.lon,
            })
        }
    }

    /// Geometry point in x=lon, y=lat order
    pub fn to_point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

/// Outcome of resolving one point against a region set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Only present when the reference data carries postal codes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    pub success: bool,
}

impl ResolutionResult {
    pub fn found(name: &str, postal_code: Option<&str>) -> Self {
        Self {
            region: Some(name.to_string()),
            postal_code: postal_code.map(str::to_string),
            success: true,
        }
    }

    pub fn not_found() -> Self {
        Self::default()
    }
}

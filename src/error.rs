use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResolveError>;

#[derive(Error, Debug)]
pub enum ResolveError {
    /// Reference geometry that cannot be used for classification.
    #[error("Malformed geometry in feature {feature}: {reason}")]
    MalformedGeometry { feature: String, reason: String },

    #[error("Duplicate region name: {name}")]
    DuplicateRegionName { name: String },

    #[error("Invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ResolveError {
    pub(crate) fn malformed(feature: impl Into<String>, reason: impl Into<String>) -> Self {
        ResolveError::MalformedGeometry {
            feature: feature.into(),
            reason: reason.into(),
        }
    }

    /// Load-time errors abort initialization; per-point errors do not.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ResolveError::InvalidCoordinate { .. })
    }
}

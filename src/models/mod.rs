//! Core data models for region resolution.

pub mod point;
pub mod record;
pub mod region;

pub use point::{GeoPoint, ResolutionResult};
pub use record::CollisionRecord;
pub use region::Region;

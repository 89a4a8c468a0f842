use geo::Area;
use geo_types::{Coord, LineString, Polygon};

use crate::error::{ResolveError, Result};

/// Build a closed ring from GeoJSON positions (`[lon, lat, ...]`).
///
/// Unclosed rings are closed. Rings with fewer than 3 distinct vertices or
/// with zero area are rejected.
pub fn build_ring(positions: &[Vec<f64>], feature: &str) -> Result<LineString<f64>> {
    let mut ring: Vec<Coord<f64>> = Vec::with_capacity(positions.len() + 1);

    for position in positions {
        match position.as_slice() {
            [lon, lat, ..] => ring.push(Coord { x: *lon, y: *lat }),
            _ => {
                return Err(ResolveError::malformed(
                    feature,
                    format!("position has {} values, need at least 2", position.len()),
                ))
            }
        }
    }

    // Repeated vertices do not count towards the minimum
    let mut distinct = ring.clone();
    distinct.dedup();
    if distinct.len() > 1 && distinct.first() == distinct.last() {
        distinct.pop();
    }
    if distinct.len() < 3 {
        return Err(ResolveError::malformed(
            feature,
            format!("ring has {} distinct vertices, need at least 3", distinct.len()),
        ));
    }

    // Close the ring if needed
    if ring.first() != ring.last() {
        ring.push(ring[0]);
    }

    let ring = LineString::new(ring);
    if Polygon::new(ring.clone(), vec![]).unsigned_area() == 0.0 {
        return Err(ResolveError::malformed(feature, "ring has zero area"));
    }

    Ok(ring)
}

/// Build a polygon from GeoJSON rings. The first ring is the outer boundary,
/// the rest are holes.
pub fn build_polygon(rings: &[Vec<Vec<f64>>], feature: &str) -> Result<Polygon<f64>> {
    let (outer, holes) = rings
        .split_first()
        .ok_or_else(|| ResolveError::malformed(feature, "polygon has no rings"))?;

    let exterior = build_ring(outer, feature)?;
    let interiors = holes
        .iter()
        .map(|hole| build_ring(hole, feature))
        .collect::<Result<Vec<_>>>()?;

    let polygon = Polygon::new(exterior, interiors);
    if polygon.unsigned_area() == 0.0 {
        return Err(ResolveError::malformed(feature, "polygon has zero area"));
    }

    Ok(polygon)
}

//! GeoJSON point overlay for eyeballing results on a map.

use std::io::Write;

use anyhow::Result;
use serde_json::{json, Value};

use crate::models::CollisionRecord;

/// Row cap used by the `backfill` binary unless overridden
pub const OVERLAY_DEFAULT_LIMIT: usize = 200_000;

/// Write records with coordinates as a GeoJSON `FeatureCollection` of points.
///
/// Properties follow the geojson.io simplestyle keys so the file renders
/// directly. Returns the number of features written.
pub fn write_overlay<W: Write>(
    records: &[CollisionRecord],
    writer: W,
    limit: Option<usize>,
) -> Result<usize> {
    let features: Vec<Value> = records
        .iter()
        .filter_map(|r| r.point().filter(|p| p.is_valid()).map(|p| (r, p)))
        .take(limit.unwrap_or(usize::MAX))
        .map(|(record, point)| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [point.lon, point.lat],
                },
                "properties": {
                    "id": record.id,
                    "lat": point.lat,
                    "lon": point.lon,
                    "region": record.region,
                    "auto_resolved": record.updated_manually,
                    "marker-color": "#e31a1c",
                    "marker-size": "small",
                    "marker-symbol": "circle",
                },
            })
        })
        .collect();

    let count = features.len();
    let collection = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    serde_json::to_writer(writer, &collection)?;

    Ok(count)
}

//! Region extraction from GeoJSON reference data.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use geo::MultiPolygon;
use hashbrown::HashMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::geometry::build_polygon;
use super::RegionSet;
use crate::error::{ResolveError, Result};
use crate::models::Region;

/// What to do when two features carry the same region name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Abort the load
    #[default]
    Reject,
    /// Fold the polygons into the first region of that name
    Merge,
}

/// How features are turned into regions
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Property keys tried in order for the region name
    pub name_properties: Vec<String>,

    /// Property keys tried in order for the postal code
    pub postal_properties: Vec<String>,

    pub duplicates: DuplicatePolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            name_properties: ["BoroName", "borough", "BoroughName", "BORONAME", "Boro_Name", "name"]
                .into_iter()
                .map(String::from)
                .collect(),
            postal_properties: ["postal_code", "postalcode", "ZIPCODE", "zip"]
                .into_iter()
                .map(String::from)
                .collect(),
            duplicates: DuplicatePolicy::Reject,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

type Rings = Vec<Vec<Vec<f64>>>;

/// First non-empty property among `keys`, as trimmed text
fn property(properties: &Map<String, Value>, keys: &[String]) -> Option<String> {
    keys.iter().find_map(|key| {
        let text = match properties.get(key)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        (!text.is_empty()).then_some(text)
    })
}

fn resolve_geometry(geometry: Option<RawGeometry>, feature: &str) -> Result<MultiPolygon<f64>> {
    let geometry =
        geometry.ok_or_else(|| ResolveError::malformed(feature, "feature has no geometry"))?;

    let polygons: Vec<Rings> = match geometry.kind.as_str() {
        "Polygon" => vec![serde_json::from_value(geometry.coordinates)
            .map_err(|e| ResolveError::malformed(feature, e.to_string()))?],
        "MultiPolygon" => serde_json::from_value(geometry.coordinates)
            .map_err(|e| ResolveError::malformed(feature, e.to_string()))?,
        other => {
            return Err(ResolveError::malformed(
                feature,
                format!("unsupported geometry type {other}"),
            ))
        }
    };

    if polygons.is_empty() {
        return Err(ResolveError::malformed(feature, "geometry has no polygons"));
    }

    let polygons = polygons
        .iter()
        .map(|rings| build_polygon(rings, feature))
        .collect::<Result<Vec<_>>>()?;

    Ok(MultiPolygon::new(polygons))
}

/// Parse a GeoJSON `FeatureCollection` into an immutable region set.
///
/// Any malformed feature aborts the whole load.
pub fn load_regions<R: Read>(source: R, options: &LoadOptions) -> Result<RegionSet> {
    let collection: FeatureCollection = serde_json::from_reader(source)?;

    let mut regions: Vec<Region> = Vec::with_capacity(collection.features.len());
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for (i, feature) in collection.features.into_iter().enumerate() {
        let properties = feature.properties.unwrap_or_default();

        let name = property(&properties, &options.name_properties).ok_or_else(|| {
            ResolveError::malformed(
                format!("#{i}"),
                format!(
                    "no region name property (tried {})",
                    options.name_properties.join(", ")
                ),
            )
        })?;

        let geometry = resolve_geometry(feature.geometry, &name)?;
        let postal_code = property(&properties, &options.postal_properties);

        if let Some(&existing) = by_name.get(&name) {
            match options.duplicates {
                DuplicatePolicy::Reject => {
                    return Err(ResolveError::DuplicateRegionName { name });
                }
                DuplicatePolicy::Merge => {
                    debug!("Merging duplicate region {}", name);
                    let region = &mut regions[existing];
                    region.geometry.0.extend(geometry.0);
                    if region.postal_code.is_none() {
                        region.postal_code = postal_code;
                    }
                    continue;
                }
            }
        }

        let order = regions.len();
        by_name.insert(name.clone(), order);
        let mut region = Region::new(name, geometry, order);
        region.postal_code = postal_code;
        regions.push(region);
    }

    info!("Loaded {} regions", regions.len());

    Ok(RegionSet::build(regions))
}

/// Load regions from a GeoJSON file. `.gz` files are decompressed.
pub fn load_regions_file(path: &Path, options: &LoadOptions) -> Result<RegionSet> {
    info!("Loading region polygons from {}", path.display());

    let file = BufReader::new(File::open(path)?);
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    load_regions(reader, options)
}

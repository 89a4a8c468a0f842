use std::fs::File;
use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use regionfill::batch::{Backfill, RecordTable};
use regionfill::config::ColumnConfig;
use regionfill::pip::{load_regions, load_regions_file, LoadOptions};
use regionfill::{resolve, resolve_batch, GeoPoint, ResolveError};

/// Square "A" and square "B" with a square hole, as `[lon, lat]` rings.
/// "B" is shifted east so the two do not overlap.
const REGIONS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "BoroName": "A" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[0, 0], [0, 10], [10, 10], [10, 0], [0, 0]]]
      }
    },
    {
      "type": "Feature",
      "properties": { "BoroName": "B" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [
          [[100, 0], [100, 20], [120, 20], [120, 0]],
          [[105, 5], [105, 15], [115, 15], [115, 5], [105, 5]]
        ]
      }
    }
  ]
}"#;

const HOLED_ONLY: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "name": "B" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [
          [[0, 0], [0, 20], [20, 20], [20, 0], [0, 0]],
          [[5, 5], [5, 15], [15, 15], [15, 5], [5, 5]]
        ]
      }
    }
  ]
}"#;

#[test]
fn test_square_region_end_to_end() {
    let set = load_regions(REGIONS.as_bytes(), &LoadOptions::default()).unwrap();

    let hit = resolve(&set, GeoPoint::new(5.0, 5.0)).unwrap();
    assert!(hit.success);
    assert_eq!(hit.region.as_deref(), Some("A"));

    let miss = resolve(&set, GeoPoint::new(50.0, 50.0)).unwrap();
    assert!(!miss.success);
}

#[test]
fn test_hole_end_to_end() {
    let set = load_regions(HOLED_ONLY.as_bytes(), &LoadOptions::default()).unwrap();

    assert!(!resolve(&set, GeoPoint::new(10.0, 10.0)).unwrap().success);

    let outer = resolve(&set, GeoPoint::new(2.0, 2.0)).unwrap();
    assert!(outer.success);
    assert_eq!(outer.region.as_deref(), Some("B"));
}

#[test]
fn test_batch_with_invalid_point_continues() {
    let set = load_regions(REGIONS.as_bytes(), &LoadOptions::default()).unwrap();
    let points = vec![
        GeoPoint::new(5.0, 5.0),
        GeoPoint::new(120.0, 5.0),
        GeoPoint::new(2.0, 102.0),
    ];

    let results: Vec<_> = resolve_batch(&set, points).collect();
    assert_eq!(results.len(), 3);
    assert!(results[0].as_ref().unwrap().success);
    assert!(matches!(
        results[1],
        Err(ResolveError::InvalidCoordinate { .. })
    ));
    assert_eq!(results[2].as_ref().unwrap().region.as_deref(), Some("B"));
}

#[test]
fn test_load_gzipped_file() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("regions.geojson.gz");

    let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
    encoder.write_all(REGIONS.as_bytes()).unwrap();
    encoder.finish().unwrap();

    let set = load_regions_file(&path, &LoadOptions::default()).unwrap();
    assert_eq!(set.len(), 2);
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let err = load_regions_file(&dir.path().join("nope.geojson"), &LoadOptions::default())
        .unwrap_err();
    assert!(matches!(err, ResolveError::Io(_)));
}

#[test]
fn test_csv_backfill_round() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let input = dir.path().join("collisions.csv");
    let output = dir.path().join("collisions_out.csv");

    std::fs::write(
        &input,
        "COLLISION_ID,BOROUGH,LATITUDE,LONGITUDE\n\
         1,,5,5\n\
         2,,2,102\n\
         3,,10,110\n\
         4,A,5,5\n\
         5,,,\n\
         6,,91,5\n",
    )
    .unwrap();

    let set = load_regions(REGIONS.as_bytes(), &LoadOptions::default()).unwrap();
    let mut table = RecordTable::read_path(&input, &ColumnConfig::default()).unwrap();
    let summary = Backfill::default().run(&set, &mut table.records);

    assert_eq!(summary.candidates, 4);
    assert_eq!(summary.resolved, 2);
    assert_eq!(summary.unresolved, 1);
    assert_eq!(summary.invalid, 1);
    assert_eq!(summary.remaining_null, 3);
    assert_eq!(summary.flagged, 2);

    table.write_path(&output).unwrap();
    let written = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = written.lines().collect();

    assert_eq!(
        lines,
        vec![
            "COLLISION_ID,BOROUGH,LATITUDE,LONGITUDE,BOROUGH_UPDATED_MANUALLY",
            "1,A,5,5,true",
            "2,B,2,102,true",
            "3,,10,110,false",
            "4,A,5,5,false",
            "5,,,,false",
            "6,,91,5,false",
        ]
    );
}

//! Point resolution against a loaded region set.

use rayon::prelude::*;
use tracing::debug;

use super::RegionSet;
use crate::error::Result;
use crate::models::{GeoPoint, ResolutionResult};

/// Classify a point into at most one region.
///
/// Out-of-range coordinates are rejected before any geometry is touched.
pub fn resolve(regions: &RegionSet, point: GeoPoint) -> Result<ResolutionResult> {
    let point = point.validate()?;

    let result = match regions.lookup(&point) {
        Some(region) => ResolutionResult::found(&region.name, region.postal_code.as_deref()),
        None => ResolutionResult::not_found(),
    };

    debug!(
        "PIP lookup at ({}, {}): {:?}",
        point.lat, point.lon, result.region
    );

    Ok(result)
}

/// Lazy, order-preserving resolution of a point sequence.
///
/// Yields exactly one item per input point. An invalid point yields an error
/// in its position and iteration continues.
pub fn resolve_batch<I>(regions: &RegionSet, points: I) -> ResolveBatch<'_, I::IntoIter>
where
    I: IntoIterator<Item = GeoPoint>,
{
    ResolveBatch {
        regions,
        points: points.into_iter(),
    }
}

/// Resolve a slice of points across the rayon thread pool.
///
/// Same results and order as [`resolve_batch`].
pub fn resolve_par(regions: &RegionSet, points: &[GeoPoint]) -> Vec<Result<ResolutionResult>> {
    points.par_iter().map(|p| resolve(regions, *p)).collect()
}

/// Iterator returned by [`resolve_batch`]
#[derive(Clone)]
pub struct ResolveBatch<'a, I> {
    regions: &'a RegionSet,
    points: I,
}

impl<I> Iterator for ResolveBatch<'_, I>
where
    I: Iterator<Item = GeoPoint>,
{
    type Item = Result<ResolutionResult>;

    fn next(&mut self) -> Option<Self::Item> {
        self.points.next().map(|p| resolve(self.regions, p))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.points.size_hint()
    }
}

impl<I> ExactSizeIterator for ResolveBatch<'_, I> where I: ExactSizeIterator<Item = GeoPoint> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use crate::models::Region;
    use geo::{polygon, MultiPolygon};

    /// Square "A" (0,0)-(10,10) and square "B" (0,0)-(20,20) with a hole
    /// (5,5)-(15,15), offset so the two do not overlap.
    fn fixture() -> RegionSet {
        let a = polygon![
            (x: 0.0, y: 0.0),
            (x: 0.0, y: 10.0),
            (x: 10.0, y: 10.0),
            (x: 10.0, y: 0.0),
        ];
        let b = polygon!(
            exterior: [
                (x: 100.0, y: 0.0),
                (x: 100.0, y: 20.0),
                (x: 120.0, y: 20.0),
                (x: 120.0, y: 0.0),
            ],
            interiors: [[
                (x: 105.0, y: 5.0),
                (x: 105.0, y: 15.0),
                (x: 115.0, y: 15.0),
                (x: 115.0, y: 5.0),
            ]]
        );
        RegionSet::build(vec![
            Region::new("A", MultiPolygon::new(vec![a]), 0),
            Region::new("B", MultiPolygon::new(vec![b]), 1),
        ])
    }

    #[test]
    fn test_resolve_inside_square() {
        let set = fixture();
        let result = resolve(&set, GeoPoint::new(5.0, 5.0)).unwrap();
        assert_eq!(result, ResolutionResult::found("A", None));
    }

    #[test]
    fn test_resolve_outside_everything() {
        let set = fixture();
        let result = resolve(&set, GeoPoint::new(50.0, 50.0)).unwrap();
        assert!(!result.success);
        assert!(result.region.is_none());
    }

    #[test]
    fn test_resolve_hole() {
        let set = fixture();
        assert!(!resolve(&set, GeoPoint::new(10.0, 110.0)).unwrap().success);

        let result = resolve(&set, GeoPoint::new(2.0, 102.0)).unwrap();
        assert_eq!(result.region.as_deref(), Some("B"));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let set = fixture();
        let p = GeoPoint::new(3.0, 7.0);
        assert_eq!(resolve(&set, p).unwrap(), resolve(&set, p).unwrap());
    }

    #[test]
    fn test_resolve_rejects_bad_latitude() {
        let set = fixture();
        let err = resolve(&set, GeoPoint::new(95.0, 5.0)).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidCoordinate { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_batch_keeps_order_and_survives_bad_points() {
        let set = fixture();
        let points = vec![
            GeoPoint::new(5.0, 5.0),
            GeoPoint::new(-91.0, 5.0),
            GeoPoint::new(50.0, 50.0),
            GeoPoint::new(2.0, 102.0),
        ];

        let results: Vec<_> = resolve_batch(&set, points.clone()).collect();
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].as_ref().unwrap().region.as_deref(), Some("A"));
        assert!(results[1].is_err());
        assert!(!results[2].as_ref().unwrap().success);
        assert_eq!(results[3].as_ref().unwrap().region.as_deref(), Some("B"));
    }

    #[test]
    fn test_batch_empty() {
        let set = fixture();
        assert_eq!(resolve_batch(&set, Vec::<GeoPoint>::new()).count(), 0);
        assert!(resolve_par(&set, &[]).is_empty());
    }

    #[test]
    fn test_batch_is_lazy_and_restartable() {
        let set = fixture();
        let points = [GeoPoint::new(5.0, 5.0), GeoPoint::new(50.0, 50.0)];

        let batch = resolve_batch(&set, points);
        assert_eq!(batch.len(), 2);

        let mut first = batch.clone();
        assert!(first.next().unwrap().unwrap().success);
        drop(first);

        let again: Vec<bool> = batch.map(|r| r.unwrap().success).collect();
        assert_eq!(again, vec![true, false]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let set = fixture();
        let points: Vec<GeoPoint> = (0..2000)
            .map(|i| GeoPoint::new((i % 25) as f64 - 2.5, (i % 130) as f64 - 5.0))
            .collect();

        let sequential: Vec<_> = resolve_batch(&set, points.iter().copied())
            .map(|r| r.unwrap())
            .collect();
        let parallel: Vec<_> = resolve_par(&set, &points)
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(sequential, parallel);
    }
}

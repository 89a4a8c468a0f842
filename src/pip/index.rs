//! Spatial index for region lookups.

use rstar::{RTree, RTreeObject, AABB};
use tracing::info;

use crate::models::{GeoPoint, Region};

/// R-tree entry pointing at a region by load position
#[derive(Debug)]
struct IndexedRegion {
    order: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedRegion {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Immutable set of regions, safe to share across worker threads
#[derive(Debug)]
pub struct RegionSet {
    tree: RTree<IndexedRegion>,
    /// In load order; `regions[i].order == i`
    regions: Vec<Region>,
}

impl RegionSet {
    /// Build the envelope index. `regions` must already be in load order.
    pub fn build(mut regions: Vec<Region>) -> Self {
        info!("Building spatial index for {} regions...", regions.len());

        let indexed: Vec<IndexedRegion> = regions
            .iter_mut()
            .enumerate()
            .filter_map(|(i, region)| {
                region.order = i;
                let (min_x, min_y, max_x, max_y) = region.bbox()?;
                Some(IndexedRegion {
                    order: i,
                    envelope: AABB::from_corners([min_x, min_y], [max_x, max_y]),
                })
            })
            .collect();

        let tree = RTree::bulk_load(indexed);

        Self { tree, regions }
    }

    /// Region whose interior contains the point.
    ///
    /// When several regions match, the one loaded first wins.
    pub fn lookup(&self, point: &GeoPoint) -> Option<&Region> {
        let query_envelope = AABB::from_point([point.lon, point.lat]);

        // Envelope candidates come back in tree order, not load order
        self.tree
            .locate_in_envelope_intersecting(&query_envelope)
            .map(|ir| ir.order)
            .filter(|&i| self.regions[i].contains(point))
            .min()
            .map(|i| &self.regions[i])
    }

    pub fn get(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Iterate over regions in load order
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }
}

//! Backfill of missing region fields over a table of collision records.
//!
//! Selects rows with a missing region and present coordinates, resolves
//! them against a [`RegionSet`], and writes the region back with the
//! auto-resolved flag set.

mod overlay;
mod summary;
mod table;

pub use overlay::{write_overlay, OVERLAY_DEFAULT_LIMIT};
pub use summary::BackfillSummary;
pub use table::RecordTable;

use hashbrown::HashMap;
use tracing::{debug, info, warn};

use crate::models::{CollisionRecord, GeoPoint, ResolutionResult};
use crate::pip::{resolve_batch, resolve_par, RegionSet};

/// Indices of rows with a missing region and both coordinates present,
/// in record order.
pub fn select_candidates(records: &[CollisionRecord]) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.is_candidate())
        .map(|(i, _)| i)
        .collect()
}

/// Write a successful resolution into a record that still lacks a region.
///
/// Returns whether the record changed.
pub fn apply(record: &mut CollisionRecord, result: &ResolutionResult) -> bool {
    if !result.success || record.has_region() {
        return false;
    }
    let Some(region) = &result.region else {
        return false;
    };

    record.region = Some(region.clone());
    if record.postal_code.is_none() {
        record.postal_code = result.postal_code.clone();
    }
    record.updated_manually = true;
    true
}

/// Backfill runner
#[derive(Debug, Clone)]
pub struct Backfill {
    /// Resolve on the rayon pool instead of the calling thread
    pub parallel: bool,
    /// Points resolved between progress callbacks
    pub chunk_size: usize,
}

impl Default for Backfill {
    fn default() -> Self {
        Self {
            parallel: true,
            chunk_size: 10_000,
        }
    }
}

impl Backfill {
    pub fn run(&self, regions: &RegionSet, records: &mut [CollisionRecord]) -> BackfillSummary {
        self.run_with_progress(regions, records, |_, _| {})
    }

    /// Run the backfill, calling `progress(done, total)` after each chunk.
    ///
    /// Every candidate is resolved. The first match per id is then written
    /// to every row of that id whose region is still missing, including rows
    /// that did not match themselves.
    pub fn run_with_progress<F>(
        &self,
        regions: &RegionSet,
        records: &mut [CollisionRecord],
        mut progress: F,
    ) -> BackfillSummary
    where
        F: FnMut(usize, usize),
    {
        let candidates = select_candidates(records);
        let total = candidates.len();

        let mut summary = BackfillSummary {
            total_rows: records.len(),
            candidates: total,
            ..Default::default()
        };

        info!("Candidate rows: {}", total);

        let mut matches: HashMap<String, ResolutionResult> = HashMap::new();
        let mut misses: Vec<usize> = Vec::new();
        let mut invalid: Vec<usize> = Vec::new();

        let chunk_size = self.chunk_size.max(1);
        let mut done = 0;
        progress(done, total);

        for chunk in candidates.chunks(chunk_size) {
            let points: Vec<GeoPoint> = chunk
                .iter()
                .filter_map(|&i| records[i].point())
                .collect();

            let results = if self.parallel {
                resolve_par(regions, &points)
            } else {
                resolve_batch(regions, points.iter().copied()).collect()
            };

            for (&i, result) in chunk.iter().zip(results) {
                match result {
                    Ok(result) if result.success => {
                        if matches.contains_key(&records[i].id) {
                            summary.duplicates += 1;
                        } else {
                            matches.insert(records[i].id.clone(), result);
                        }
                    }
                    Ok(_) => misses.push(i),
                    Err(e) => {
                        if e.is_fatal() {
                            warn!("Record {} could not be resolved: {}", records[i].id, e);
                        } else {
                            debug!("Record {}: {}", records[i].id, e);
                        }
                        invalid.push(i);
                    }
                }
            }

            done += chunk.len();
            progress(done, total);
        }

        if summary.duplicates > 0 {
            info!(
                "Found {} duplicate id matches; keeping first per id",
                summary.duplicates
            );
        }

        for record in records.iter_mut() {
            if let Some(result) = matches.get(&record.id) {
                if apply(record, result) {
                    summary.resolved += 1;
                }
            }
        }

        summary.unresolved = misses.iter().filter(|&&i| !records[i].has_region()).count();
        summary.invalid = invalid.iter().filter(|&&i| !records[i].has_region()).count();
        summary.remaining_null = records.iter().filter(|r| !r.has_region()).count();
        summary.flagged = records.iter().filter(|r| r.updated_manually).count();

        summary
    }
}

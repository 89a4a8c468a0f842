use serde::Serialize;
use tracing::info;

/// Counts reported after a backfill run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackfillSummary {
    pub total_rows: usize,
    pub candidates: usize,
    /// Matches dropped because their id already had one
    pub duplicates: usize,
    /// Rows filled, counting every row of a matched id
    pub resolved: usize,
    /// Valid points outside every region, still missing a region
    pub unresolved: usize,
    /// Points with out-of-range coordinates, still missing a region
    pub invalid: usize,
    /// Rows still missing a region after the run
    pub remaining_null: usize,
    /// Rows carrying the auto-resolved flag
    pub flagged: usize,
}

impl BackfillSummary {
    pub fn log(&self) {
        info!("Backfill summary:");
        info!("  total rows:            {}", self.total_rows);
        info!("  candidate rows:        {}", self.candidates);
        info!("  duplicate id matches:  {}", self.duplicates);
        info!("  resolved:              {}", self.resolved);
        info!("  unresolved:            {}", self.unresolved);
        info!("  invalid coordinates:   {}", self.invalid);
        info!("  remaining null:        {}", self.remaining_null);
        info!("  rows flagged:          {}", self.flagged);
    }
}

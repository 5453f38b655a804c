use tabled::Table;

use crate::{
    info, success,
    types::{BatchOutcome, MatchKind, ResolvedEntity, StatusRow},
    warning,
};

/// Aggregated per-run outcome counts plus one status line per query.
///
/// Built incrementally while the pipeline runs and printed once at the end.
/// Pure aggregation: no network or file access, and printing always
/// terminates, even when every query failed.
#[derive(Default)]
pub struct RunSummary {
    pub attempted: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub malformed: usize,
    pub added: usize,
    pub skipped_duplicates: usize,
    pub failed_chunks: usize,
    rows: Vec<StatusRow>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records rows rejected by the input parser.
    pub fn record_malformed(&mut self, rows: usize) {
        self.malformed += rows;
    }

    /// Records a resolution outcome. `detail` carries flow-specific context,
    /// e.g. the matched catalog name or a track-count breakdown.
    pub fn record_resolved(&mut self, entity: &ResolvedEntity, detail: String) {
        self.attempted += 1;
        match entity.match_kind {
            MatchKind::Exact => {
                self.resolved += 1;
                self.push_row(entity, "found", detail);
            }
            MatchKind::Fallback => {
                self.resolved += 1;
                self.push_row(entity, "found (fallback)", detail);
            }
            MatchKind::NotFound => {
                self.unresolved += 1;
                self.push_row(entity, "not found", detail);
            }
        }
    }

    /// Records a resolved track that was already in the target playlist.
    pub fn record_duplicate(&mut self, entity: &ResolvedEntity) {
        self.attempted += 1;
        self.resolved += 1;
        self.skipped_duplicates += 1;
        let detail = entity.matched.clone().unwrap_or_default();
        self.push_row(entity, "already in playlist", detail);
    }

    /// Folds in the result of one uploader pass.
    pub fn record_batch(&mut self, outcome: BatchOutcome) {
        self.added += outcome.applied;
        self.failed_chunks += outcome.failed_chunks;
    }

    fn push_row(&mut self, entity: &ResolvedEntity, status: &str, detail: String) {
        self.rows.push(StatusRow {
            query: entity.query.label(),
            status: status.to_string(),
            detail,
        });
    }

    /// Prints the final report: per-query status table and total counts.
    pub fn print(&self, title: &str) {
        println!("\n=== {} ===", title);

        if !self.rows.is_empty() {
            println!("{}", Table::new(&self.rows));
        }

        info!("Queries attempted: {}", self.attempted);
        info!("Resolved: {}", self.resolved);
        if self.unresolved > 0 {
            warning!("Not found: {}", self.unresolved);
        }
        if self.malformed > 0 {
            warning!("Malformed input rows skipped: {}", self.malformed);
        }
        if self.skipped_duplicates > 0 {
            info!("Already in playlist: {}", self.skipped_duplicates);
        }
        if self.failed_chunks > 0 {
            warning!("Failed track batches: {}", self.failed_chunks);
        }
        success!("Tracks added: {}", self.added);
    }
}

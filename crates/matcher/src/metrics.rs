// Metrics hooks for the matcher crate.
//
// Callers install a global `MatchMetrics` implementation via [`set_match_metrics`],
// then `DefaultMatcher` reports latency, row count and matched-row count for
// every single or bulk call. No metrics backend is bundled.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

/// Which entry point produced a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Single,
    Bulk,
}

impl MatchKind {
    /// Label used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            MatchKind::Single => "single",
            MatchKind::Bulk => "bulk",
        }
    }
}

/// Metrics observer for match operations.
pub trait MatchMetrics: Send + Sync {
    /// Record the outcome of a match call.
    ///
    /// `rows` is 1 for a single match. `matched` counts rows whose result
    /// carries a catalog record.
    fn record_match(&self, kind: MatchKind, latency: Duration, rows: usize, matched: usize);
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn MatchMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn MatchMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn MatchMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global match metrics recorder.
pub fn set_match_metrics(recorder: Option<Arc<dyn MatchMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

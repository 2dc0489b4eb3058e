//! Scan phases, running counters, and the result of a completed run.

use crate::model::ScanState;
use std::fmt;
use std::time::Duration;

/// Driver state machine.
///
/// `Init -> LoadingState -> Scanning -> Persisting -> Done`, with `Failed`
/// reachable from any phase except `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanPhase {
    /// Validating configuration.
    Init,
    LoadingState,
    Scanning,
    /// Flushing trackers and the state file.
    Persisting,
    Done,
    Failed,
}

impl ScanPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::LoadingState => "LOADING_STATE",
            Self::Scanning => "SCANNING",
            Self::Persisting => "PERSISTING",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        }
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Whether the state machine permits moving from `self` to `next`.
    pub fn can_advance_to(self, next: ScanPhase) -> bool {
        use ScanPhase::*;
        matches!(
            (self, next),
            (Init, LoadingState)
                | (LoadingState, Scanning)
                | (Scanning, Persisting)
                | (Persisting, Done)
                | (Init | LoadingState | Scanning | Persisting, Failed)
        )
    }
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Candidates returned by discovery.
    pub discovered: usize,
    /// Candidates left out by the file limit.
    pub limited: usize,
    /// Candidates handed to the processor.
    pub processed: usize,
    pub scanned: usize,
    pub failed: usize,
    /// Unchanged entries skipped by an incremental run.
    pub skipped: usize,
    /// Known entries not found by discovery.
    pub stale: usize,
}

/// Result of a run that reached `Done`.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub state: ScanState,
    pub stats: ScanStats,
    pub duration: Duration,
}

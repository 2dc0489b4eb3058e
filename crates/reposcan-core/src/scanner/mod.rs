//! Scanner module: drives one full or incremental repository scan.
//!
//! [`ScanDriver`] owns the run's state machine:
//!
//! `INIT -> LOADING_STATE -> SCANNING -> PERSISTING -> DONE`
//!
//! Any infrastructure error (bad configuration, missing or corrupt state,
//! discovery failure, an output that cannot be written) moves the driver to
//! `FAILED` and is returned to the caller. Per-entry processing errors are
//! not fatal: the entry is marked failed, appended to the failure list, and
//! the run continues.
//!
//! Outputs are staged to temporary files first. Nothing replaces a previous
//! output until every one of them has been written, and the scan state is
//! committed last, so a run that fails part-way leaves the previous state
//! file in place for the next incremental run.
pub mod progress;
pub mod source;
pub mod tabular;

pub use progress::{ScanOutcome, ScanPhase, ScanStats};
pub use source::{DirectorySource, EntrySource};
pub use tabular::{EntryProcessor, TabularProcessor};

use crate::analysis::{summarize_coverage, summarize_types};
use crate::config::ScanConfig;
use crate::errors::{ConfigError, ReportError, ScanError, StateError};
use crate::model::format::{format_count, format_seconds};
use crate::model::{Candidate, EntryStatus, ScanState, ScanType};
use crate::platform::check_writable_dir;
use crate::report::{
    stage_json_report, write_path_list, CoverageDescriptor, CoverageTracker, FailureListWriter,
    TypeDescriptor, TypeMapTracker,
};
use crate::store;
use chrono::Utc;
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Runs a scan over the entries of an [`EntrySource`], processing each with
/// an [`EntryProcessor`].
pub struct ScanDriver<S, P> {
    config: ScanConfig,
    source: S,
    processor: P,
    phase: ScanPhase,
}

impl<S: EntrySource, P: EntryProcessor> ScanDriver<S, P> {
    pub fn new(config: ScanConfig, source: S, processor: P) -> Self {
        Self {
            config,
            source,
            processor,
            phase: ScanPhase::Init,
        }
    }

    /// Current phase. `Done` or `Failed` once [`run`](Self::run) has returned.
    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    /// Execute the run to completion.
    ///
    /// A driver runs once; calling `run` again after a terminal phase fails
    /// with a validation error.
    pub fn run(&mut self) -> Result<ScanOutcome, ScanError> {
        if self.phase.is_terminal() {
            return Err(ConfigError::ValidationFailed {
                field: "driver".to_string(),
                message: format!("scan already finished ({})", self.phase),
            }
            .into());
        }

        let started = Instant::now();
        info!(
            "Starting {} scan in {}",
            self.config.scan_type,
            self.config.working_path.display()
        );

        match self.execute() {
            Ok((state, stats)) => {
                self.advance(ScanPhase::Done);
                let duration = started.elapsed();
                info!(
                    "Scan complete: {} scanned, {} failed, {} skipped, {} stale of {} entries in {}",
                    format_count(stats.scanned as u64),
                    format_count(stats.failed as u64),
                    format_count(stats.skipped as u64),
                    format_count(stats.stale as u64),
                    format_count(state.len() as u64),
                    format_seconds(duration)
                );
                let unscanned = state.count_status(EntryStatus::Unscanned);
                if unscanned > 0 {
                    info!("{} entries still unscanned", format_count(unscanned as u64));
                }
                Ok(ScanOutcome {
                    state,
                    stats,
                    duration,
                })
            }
            Err(err) => {
                error!("Scan failed during {} [{}]: {err}", self.phase, err.kind());
                self.advance(ScanPhase::Failed);
                Err(err)
            }
        }
    }

    fn execute(&mut self) -> Result<(ScanState, ScanStats), ScanError> {
        self.validate()?;

        self.advance(ScanPhase::LoadingState);
        let mut state = self.load_state()?;

        self.advance(ScanPhase::Scanning);
        let mut stats = ScanStats::default();
        let mut coverage = CoverageTracker::new();
        let mut type_map = TypeMapTracker::new();
        self.scan(&mut state, &mut stats, &mut coverage, &mut type_map)?;

        self.advance(ScanPhase::Persisting);
        self.persist(&state, &coverage, &type_map)?;

        Ok((state, stats))
    }

    fn advance(&mut self, next: ScanPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal transition {} -> {}",
            self.phase,
            next
        );
        info!("Phase {} -> {}", self.phase, next);
        self.phase = next;
    }

    fn validate(&self) -> Result<(), ScanError> {
        self.config.validate()?;

        let working = &self.config.working_path;
        if !working.is_dir() {
            return Err(ConfigError::WorkingPathMissing(working.clone()).into());
        }
        check_writable_dir(working).map_err(|source| ConfigError::WorkingPathUnwritable {
            path: working.clone(),
            source,
        })?;

        self.source.validate()
    }

    fn load_state(&self) -> Result<ScanState, ScanError> {
        match self.config.scan_type {
            ScanType::Full => Ok(ScanState::new(
                ScanType::Full,
                self.config.working_path.clone(),
            )),
            ScanType::Incr => {
                let mut state = store::load(&self.config.state_path, ScanType::Incr)?;
                if state.working_path != self.config.working_path {
                    warn!(
                        "Scan state was created for working path {}, continuing in {}",
                        state.working_path.display(),
                        self.config.working_path.display()
                    );
                    state.working_path = self.config.working_path.clone();
                }
                Ok(state)
            }
        }
    }

    fn scan(
        &self,
        state: &mut ScanState,
        stats: &mut ScanStats,
        coverage: &mut CoverageTracker,
        type_map: &mut TypeMapTracker,
    ) -> Result<(), ScanError> {
        let mut candidates = self.source.discover()?;
        candidates.sort_by(|a, b| a.id.cmp(&b.id));
        candidates.dedup_by(|a, b| a.id == b.id);
        stats.discovered = candidates.len();
        info!("Discovered {} candidates", format_count(candidates.len() as u64));

        let seen: BTreeSet<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
        stats.stale = state.mark_stale(&seen);
        if stats.stale > 0 {
            info!("{} known entries were not found", format_count(stats.stale as u64));
        }

        let mut work: Vec<&Candidate> = match self.config.scan_type {
            ScanType::Full => candidates.iter().collect(),
            ScanType::Incr => candidates.iter().filter(|c| state.needs_scan(c)).collect(),
        };
        stats.skipped = candidates.len() - work.len();

        if let Some(limit) = self.config.file_limit {
            if work.len() > limit {
                stats.limited = work.len() - limit;
                work.truncate(limit);
                info!(
                    "File limit {} reached, {} candidates left for a later run",
                    format_count(limit as u64),
                    format_count(stats.limited as u64)
                );
            }
        }

        for candidate in &candidates {
            state.register(candidate);
        }

        if let Some(list_path) = &self.config.input_list_path {
            let written = write_path_list(list_path, work.iter().map(|c| c.path.as_path()))?;
            debug!("Wrote {written} input paths to {}", list_path.display());
        }

        for (entry, data) in state.scanned() {
            coverage.record(&entry.id, CoverageDescriptor::from(data));
            type_map.record(&entry.id, TypeDescriptor::from(data));
        }

        let mut failures = FailureListWriter::create(&self.config.failure_list_path)?;

        for candidate in work {
            stats.processed += 1;
            match self.processor.process(candidate) {
                Ok(data) => {
                    coverage.record(&candidate.id, CoverageDescriptor::from(&data));
                    type_map.record(&candidate.id, TypeDescriptor::from(&data));
                    state.record_scanned(candidate, data, Utc::now());
                    stats.scanned += 1;
                }
                Err(err) => {
                    warn!("Failed to scan {}: {err}", candidate.id);
                    coverage.remove(&candidate.id);
                    type_map.remove(&candidate.id);
                    state.record_failed(candidate, Utc::now());
                    failures.append(&candidate.id)?;
                    stats.failed += 1;
                }
            }
        }

        let failed = failures.finish()?;
        if failed > 0 {
            warn!(
                "{} entries failed, listed in {}",
                format_count(failed as u64),
                self.config.failure_list_path.display()
            );
        }
        Ok(())
    }

    fn persist(
        &self,
        state: &ScanState,
        coverage: &CoverageTracker,
        type_map: &TypeMapTracker,
    ) -> Result<(), ScanError> {
        let mut reports = vec![
            coverage.flush(&self.config.coverage_path)?,
            type_map.flush(&self.config.type_map_path)?,
        ];
        if let Some(path) = &self.config.type_summary_path {
            reports.push(stage_json_report(path, &summarize_types(state))?);
        }
        if let Some(path) = &self.config.coverage_summary_path {
            reports.push(stage_json_report(path, &summarize_coverage(state))?);
        }
        let staged_state = store::stage(state, &self.config.state_path)?;

        for staged in reports {
            let target = staged.target().to_path_buf();
            staged.commit().map_err(|source| ReportError::write(&target, source))?;
            debug!("Wrote {}", target.display());
        }

        // Last, so a failed run never leaves a state ahead of its reports.
        staged_state.commit().map_err(|source| StateError::Io {
            path: self.config.state_path.clone(),
            source,
        })?;
        info!(
            "Saved scan state to {} ({} entries)",
            self.config.state_path.display(),
            state.len()
        );
        Ok(())
    }
}

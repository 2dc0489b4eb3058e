//! RepoScan Core: scan state, trackers, and the scan driver.
//!
//! This crate contains all scanning logic with no CLI dependencies. The
//! `RepoScanExec` binary is a thin layer over [`scanner::ScanDriver`].
//!
//! # Modules
//!
//! - [`model`]: Scan state, entries, and per-attribute statistics.
//! - [`store`]: Versioned JSON persistence of the scan state with atomic saves.
//! - [`scanner`]: Entry discovery, per-entry processing, and the run state machine.
//! - [`report`]: Coverage and type-map trackers, failure list, path list.
//! - [`analysis`]: Value classification and cross-entry summaries.
//! - [`config`]: Per-run paths and TOML repository configuration.
//! - [`platform`]: Filesystem permission checks.
//! - [`errors`]: Error types for each subsystem.
pub mod analysis;
pub mod config;
pub mod errors;
pub mod model;
pub mod platform;
pub mod report;
pub mod scanner;
pub mod store;

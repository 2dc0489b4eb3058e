//! End-to-end scan driver tests.
//!
//! These run the real `ScanDriver` against a temporary working directory,
//! either with scripted sources/processors (to pin down exact per-entry
//! outcomes) or with `DirectorySource` + `TabularProcessor` over real CSV
//! files, and then inspect every file the run leaves behind.
use chrono::{DateTime, TimeZone, Utc};
use reposcan_core::config::ScanConfig;
use reposcan_core::errors::{EntryError, ScanError, StateError};
use reposcan_core::model::{
    AttributeStats, Candidate, EntryData, EntryStatus, ScanState, ScanType, ValueKind,
};
use reposcan_core::scanner::{
    DirectorySource, EntryProcessor, EntrySource, ScanDriver, ScanOutcome, ScanPhase,
    TabularProcessor,
};
use reposcan_core::store;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap()
}

/// A source that always returns the same candidates.
struct ListSource(Vec<Candidate>);

impl ListSource {
    /// Candidates with a fixed modification time, so incremental runs see
    /// them as unchanged.
    fn of(ids: &[&str]) -> Self {
        Self(
            ids.iter()
                .map(|id| Candidate::new(*id, format!("/repo/{id}")).with_modified(at(1_000)))
                .collect(),
        )
    }
}

impl EntrySource for ListSource {
    fn discover(&self) -> Result<Vec<Candidate>, ScanError> {
        Ok(self.0.clone())
    }
}

/// Produces one attribute named after the entry; fails the listed ids.
struct FakeProcessor {
    fail: Vec<&'static str>,
}

impl EntryProcessor for FakeProcessor {
    fn process(&self, candidate: &Candidate) -> Result<EntryData, EntryError> {
        if self.fail.contains(&candidate.id.as_str()) {
            return Err(EntryError::rejected(&candidate.id, "unparseable"));
        }
        let mut data = EntryData {
            row_count: 1,
            ..Default::default()
        };
        data.attributes.insert(
            format!("attr_{}", candidate.id).into(),
            AttributeStats::first(ValueKind::Text, candidate.id.len(), 0),
        );
        Ok(data)
    }
}

fn run_scripted(
    work: &Path,
    scan_type: ScanType,
    source: ListSource,
    fail: Vec<&'static str>,
) -> Result<ScanOutcome, ScanError> {
    let config = ScanConfig::new(scan_type, work);
    ScanDriver::new(config, source, FakeProcessor { fail }).run()
}

fn run_dir(work: &Path, repo: &Path, scan_type: ScanType) -> Result<ScanOutcome, ScanError> {
    let config = ScanConfig::new(scan_type, work);
    let source = DirectorySource::new(repo, vec!["csv".to_string()]);
    ScanDriver::new(config, source, TabularProcessor::default()).run()
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn json_keys(path: &Path) -> Vec<String> {
    read_json(path)
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect()
}

fn failure_lines(work: &Path) -> Vec<String> {
    fs::read_to_string(work.join("failed-list.txt"))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// ```text
/// repo/
///   a.csv
///   sub/b.csv
///   readme.txt   (not a candidate)
/// ```
fn build_repo(repo: &Path) {
    fs::create_dir_all(repo.join("sub")).unwrap();
    fs::write(repo.join("a.csv"), "id,value\nx,1.5\ny,22.25\n").unwrap();
    fs::write(repo.join("sub").join("b.csv"), "name,count\nfoo,3\nbar,?\n").unwrap();
    fs::write(repo.join("readme.txt"), "not a table").unwrap();
}

fn entries(state: &ScanState) -> BTreeMap<String, EntryStatus> {
    state
        .entries
        .iter()
        .map(|(id, e)| (id.clone(), e.status))
        .collect()
}

// ── Scenarios ────────────────────────────────────────────────────────────────

/// Full over [A, B] with B failing, then incremental with C added.
#[test]
fn full_then_incremental_scenario() {
    let tmp = TempDir::new().unwrap();
    let work = tmp.path();

    let full = run_scripted(work, ScanType::Full, ListSource::of(&["A", "B"]), vec!["B"]).unwrap();
    assert_eq!(
        entries(&full.state),
        BTreeMap::from([
            ("A".to_string(), EntryStatus::Scanned),
            ("B".to_string(), EntryStatus::Failed),
        ])
    );
    assert_eq!(failure_lines(work), vec!["B"]);
    assert_eq!(json_keys(&work.join("scan-data-coverage.json")), vec!["A"]);
    assert_eq!(json_keys(&work.join("scan-data-type.json")), vec!["A"]);

    let incr = run_scripted(
        work,
        ScanType::Incr,
        ListSource::of(&["A", "B", "C"]),
        vec!["B"],
    )
    .unwrap();
    assert_eq!(
        entries(&incr.state),
        BTreeMap::from([
            ("A".to_string(), EntryStatus::Scanned),
            ("B".to_string(), EntryStatus::Failed),
            ("C".to_string(), EntryStatus::Scanned),
        ])
    );
    assert_eq!(incr.state.get("A"), full.state.get("A"), "A untouched");
    assert_eq!(incr.state.get("B"), full.state.get("B"), "B untouched");
    assert_eq!(incr.stats.processed, 1);
    assert_eq!(incr.stats.skipped, 2);
    assert_eq!(incr.state.scan_type, ScanType::Full, "marker is preserved");

    assert_eq!(json_keys(&work.join("scan-data-coverage.json")), vec!["A", "C"]);
    let coverage = read_json(&work.join("scan-data-coverage.json"));
    assert_eq!(coverage["C"]["attr_C"], 1);
    assert!(failure_lines(work).is_empty(), "B is not retried while unchanged");
}

#[test]
fn incremental_after_full_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let work = tmp.path().join("work");
    let repo = tmp.path().join("repo");
    fs::create_dir_all(&work).unwrap();
    build_repo(&repo);

    let full = run_dir(&work, &repo, ScanType::Full).unwrap();
    assert_eq!(full.stats.scanned, 2);
    let saved_after_full = fs::read_to_string(work.join("scan-data.json")).unwrap();
    let coverage_after_full = fs::read_to_string(work.join("scan-data-coverage.json")).unwrap();

    let incr = run_dir(&work, &repo, ScanType::Incr).unwrap();
    assert_eq!(incr.stats.processed, 0);
    assert_eq!(incr.state, full.state);
    assert_eq!(
        fs::read_to_string(work.join("scan-data.json")).unwrap(),
        saved_after_full
    );
    assert_eq!(
        fs::read_to_string(work.join("scan-data-coverage.json")).unwrap(),
        coverage_after_full
    );
}

#[test]
fn tabular_statistics_reach_the_type_map() {
    let tmp = TempDir::new().unwrap();
    let work = tmp.path().join("work");
    let repo = tmp.path().join("repo");
    fs::create_dir_all(&work).unwrap();
    build_repo(&repo);

    run_dir(&work, &repo, ScanType::Full).unwrap();

    let types = read_json(&work.join("scan-data-type.json"));
    assert_eq!(types["a.csv"]["value"]["kind"], "float");
    assert_eq!(types["a.csv"]["value"]["max_precision"], 2);
    assert_eq!(types["sub/b.csv"]["count"]["kind"], "integer");

    let coverage = read_json(&work.join("scan-data-coverage.json"));
    assert_eq!(coverage["sub/b.csv"]["count"], 1, "`?` is a missing value");
    assert_eq!(coverage["sub/b.csv"]["name"], 2);
}

/// A corrupt state aborts an incremental run before any report is touched.
#[test]
fn corrupt_state_fails_without_touching_reports() {
    let tmp = TempDir::new().unwrap();
    let work = tmp.path();
    fs::write(work.join("scan-data.json"), "{\"version\": 1, \"entries\": [").unwrap();
    fs::write(work.join("scan-data-coverage.json"), "previous coverage").unwrap();
    fs::write(work.join("scan-data-type.json"), "previous types").unwrap();

    let config = ScanConfig::new(ScanType::Incr, work);
    let mut driver = ScanDriver::new(
        config,
        ListSource::of(&["A"]),
        FakeProcessor { fail: Vec::new() },
    );
    let err = driver.run().unwrap_err();

    assert!(
        matches!(err, ScanError::State(StateError::CorruptState { .. })),
        "got {err:?}"
    );
    assert_eq!(driver.phase(), ScanPhase::Failed);
    assert_eq!(
        fs::read_to_string(work.join("scan-data-coverage.json")).unwrap(),
        "previous coverage"
    );
    assert_eq!(
        fs::read_to_string(work.join("scan-data-type.json")).unwrap(),
        "previous types"
    );
}

#[test]
fn incremental_without_state_is_missing_state() {
    let tmp = TempDir::new().unwrap();
    let err = run_scripted(
        tmp.path(),
        ScanType::Incr,
        ListSource::of(&["A"]),
        Vec::new(),
    )
    .unwrap_err();
    assert!(
        matches!(err, ScanError::State(StateError::MissingState(_))),
        "got {err:?}"
    );
    assert!(!tmp.path().join("scan-data.json").exists());
}

#[test]
fn vanished_entries_are_marked_stale() {
    let tmp = TempDir::new().unwrap();
    let work = tmp.path().join("work");
    let repo = tmp.path().join("repo");
    fs::create_dir_all(&work).unwrap();
    build_repo(&repo);

    run_dir(&work, &repo, ScanType::Full).unwrap();
    fs::remove_file(repo.join("sub").join("b.csv")).unwrap();

    let incr = run_dir(&work, &repo, ScanType::Incr).unwrap();
    assert_eq!(incr.stats.stale, 1);
    let b = incr.state.get("sub/b.csv").unwrap();
    assert!(b.stale);
    assert_eq!(b.status, EntryStatus::Scanned, "history is kept");
    assert!(!incr.state.get("a.csv").unwrap().stale);

    let reloaded = store::load(&work.join("scan-data.json"), ScanType::Incr).unwrap();
    assert!(reloaded.get("sub/b.csv").unwrap().stale);
}

#[test]
fn modified_entry_is_rescanned() {
    let tmp = TempDir::new().unwrap();
    let work = tmp.path().join("work");
    let repo = tmp.path().join("repo");
    fs::create_dir_all(&work).unwrap();
    build_repo(&repo);

    let full = run_dir(&work, &repo, ScanType::Full).unwrap();
    assert_eq!(full.state.get("a.csv").unwrap().data.as_ref().unwrap().row_count, 2);

    let a = repo.join("a.csv");
    fs::write(&a, "id,value,extra\nx,1.5,q\ny,2.5,r\nz,3.5,s\n").unwrap();
    let later = SystemTime::now() + Duration::from_secs(3_600);
    fs::File::options()
        .write(true)
        .open(&a)
        .unwrap()
        .set_modified(later)
        .unwrap();

    let incr = run_dir(&work, &repo, ScanType::Incr).unwrap();
    assert_eq!(incr.stats.processed, 1);
    assert_eq!(incr.stats.skipped, 1);
    let data = incr.state.get("a.csv").unwrap().data.as_ref().unwrap();
    assert_eq!(data.row_count, 3);
    assert!(data.attributes.contains_key("extra"));

    let coverage = read_json(&work.join("scan-data-coverage.json"));
    assert_eq!(coverage["a.csv"]["extra"], 3);
}

#[test]
fn failing_entry_is_listed_once_and_never_scanned() {
    let tmp = TempDir::new().unwrap();
    let work = tmp.path().join("work");
    let repo = tmp.path().join("repo");
    fs::create_dir_all(&work).unwrap();
    build_repo(&repo);
    fs::write(repo.join("bad.csv"), "a,b\n1,2\n3\n").unwrap();

    let outcome = run_dir(&work, &repo, ScanType::Full).unwrap();

    assert_eq!(failure_lines(&work), vec!["bad.csv"]);
    let bad = outcome.state.get("bad.csv").unwrap();
    assert_eq!(bad.status, EntryStatus::Failed);
    assert!(bad.data.is_none());
    assert!(!json_keys(&work.join("scan-data-coverage.json")).contains(&"bad.csv".to_string()));
}

/// Every scanned entry has a coverage record and a type-map record, and
/// nothing else does.
#[test]
fn reports_cover_exactly_the_scanned_entries() {
    let tmp = TempDir::new().unwrap();
    let work = tmp.path();

    run_scripted(
        work,
        ScanType::Full,
        ListSource::of(&["p", "q", "r", "s"]),
        vec!["q"],
    )
    .unwrap();
    let incr = run_scripted(
        work,
        ScanType::Incr,
        ListSource::of(&["p", "q", "r", "s", "t"]),
        Vec::new(),
    )
    .unwrap();

    let scanned: Vec<String> = incr.state.scanned().map(|(e, _)| e.id.clone()).collect();
    assert_eq!(scanned, vec!["p", "r", "s", "t"]);
    assert_eq!(json_keys(&work.join("scan-data-coverage.json")), scanned);
    assert_eq!(json_keys(&work.join("scan-data-type.json")), scanned);
}

#[test]
fn file_limit_and_optional_outputs() {
    let tmp = TempDir::new().unwrap();
    let work = tmp.path().join("work");
    let repo = tmp.path().join("repo");
    fs::create_dir_all(&work).unwrap();
    build_repo(&repo);

    let mut config = ScanConfig::new(ScanType::Full, &work);
    config.file_limit = Some(1);
    config.input_list_path = Some(work.join("inputs.txt"));
    config.type_summary_path = Some(work.join("type-summary.json"));
    config.coverage_summary_path = Some(work.join("coverage-summary.json"));
    let source = DirectorySource::new(&repo, vec!["csv".to_string()]);
    let outcome = ScanDriver::new(config, source, TabularProcessor::default())
        .run()
        .unwrap();

    assert_eq!(outcome.stats.discovered, 2);
    assert_eq!(outcome.stats.processed, 1);
    assert_eq!(outcome.state.status_of("a.csv"), Some(EntryStatus::Scanned));
    assert_eq!(outcome.state.status_of("sub/b.csv"), Some(EntryStatus::Unscanned));

    let inputs = fs::read_to_string(work.join("inputs.txt")).unwrap();
    assert_eq!(inputs.lines().count(), 1);
    assert!(inputs.contains("a.csv"));

    let types = read_json(&work.join("type-summary.json"));
    assert_eq!(types["value"]["kind"], "float");
    let coverage = read_json(&work.join("coverage-summary.json"));
    assert_eq!(coverage["id"]["count"], 1);
    assert_eq!(coverage["id"]["instances"][0], "a.csv");
}

#[test]
fn save_leaves_no_temporary_files() {
    let tmp = TempDir::new().unwrap();
    run_scripted(tmp.path(), ScanType::Full, ListSource::of(&["A"]), Vec::new()).unwrap();

    let leftovers: Vec<String> = fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(".reposcan-"))
        .collect();
    assert!(leftovers.is_empty(), "temporary files left: {leftovers:?}");
}

/// Full scan, then an incremental run whose type map cannot be written:
/// the state and coverage files from the full scan must survive untouched.
#[test]
fn failed_persist_keeps_the_previous_run() {
    let tmp = TempDir::new().unwrap();
    let work = tmp.path().join("work");
    let repo = tmp.path().join("repo");
    fs::create_dir_all(&work).unwrap();
    fs::create_dir_all(&repo).unwrap();
    fs::write(repo.join("a.csv"), "id,value\nx,1\n").unwrap();

    run_dir(&work, &repo, ScanType::Full).unwrap();
    let mut config = ScanConfig::new(ScanType::Incr, &work);
    let state_before = fs::read(&config.state_path).unwrap();
    let coverage_before = fs::read(&config.coverage_path).unwrap();

    fs::write(repo.join("b.csv"), "id,value\ny,2\n").unwrap();
    config.type_map_path = work.join("types");
    fs::create_dir(&config.type_map_path).unwrap();
    let state_path = config.state_path.clone();
    let coverage_path = config.coverage_path.clone();

    let source = DirectorySource::new(&repo, vec!["csv".to_string()]);
    let mut driver = ScanDriver::new(config, source, TabularProcessor::default());
    let err = driver.run().unwrap_err();

    assert!(matches!(err, ScanError::Report(_)), "got {err:?}");
    assert_eq!(driver.phase(), ScanPhase::Failed);
    assert_eq!(fs::read(&state_path).unwrap(), state_before);
    assert_eq!(fs::read(&coverage_path).unwrap(), coverage_before);
    assert_eq!(json_keys(&coverage_path), vec!["a.csv"]);

    let state = store::load(&state_path, ScanType::Incr).unwrap();
    assert_eq!(state.get("b.csv"), None);

    let leftovers: Vec<String> = fs::read_dir(&work)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(".reposcan-"))
        .collect();
    assert!(leftovers.is_empty(), "temporary files left: {leftovers:?}");
}

//! Wires parsed flags into a [`ScanDriver`] run.
use crate::args::ScanArgs;
use anyhow::Context;
use reposcan_core::config::RepoConfig;
use reposcan_core::model::ScanType;
use reposcan_core::scanner::{DirectorySource, ScanDriver, ScanOutcome, TabularProcessor};
use tracing::info;

/// Resolve configuration and run one scan.
pub fn run(args: &ScanArgs) -> anyhow::Result<ScanOutcome> {
    let content_type = args.content_type()?;

    let repo_config = match &args.config_path {
        Some(path) => RepoConfig::load(path, &args.config_name)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => RepoConfig::empty(),
    };
    let resolved = repo_config
        .resolve(&content_type, &args.overrides())
        .with_context(|| format!("resolving content type `{content_type}`"))?;

    info!(
        "Content type `{}` from {} (section `{}`{})",
        resolved.name,
        resolved.repo_path.display(),
        repo_config.section_name(),
        if args.mock { ", mock" } else { "" }
    );

    let config = args.scan_config(resolved.file_limit);
    let source = DirectorySource::new(&resolved.repo_path, resolved.extensions);
    let processor = TabularProcessor::with_delimiter(resolved.delimiter);

    let mut driver = ScanDriver::new(config, source, processor);
    let outcome = driver
        .run()
        .with_context(|| {
            format!("{} scan of `{content_type}` failed", ScanType::from(args.scan_type))
        })?;
    Ok(outcome)
}

mod raw;
mod summary;
mod symbols;

use std::time::Instant;

use serde_json::Value;
use tracing::debug;
use voltick_core::config::parse_delimiter;
use voltick_core::{
    CacheMode, Envelope, EnvelopeError, FeedConfig, FeedLoader, FeedSource, SnapshotStore,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::Metadata;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_error(mut self, error: EnvelopeError) -> Self {
        self.errors.push(error);
        self
    }
}

/// Each process starts with an empty store, so the feed is always read.
pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let config = feed_config(cli)?;
    let store = SnapshotStore::new(config.cache_ttl);
    let loader = FeedLoader::new(config);

    run_with(cli, &loader, &store).await
}

pub async fn run_with(
    cli: &Cli,
    loader: &FeedLoader,
    store: &SnapshotStore,
) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();
    let loaded = store.load(loader, CacheMode::Use).await?;
    let snapshot = loaded.snapshot.as_ref();

    let command_result = match &cli.command {
        Command::Summary => summary::run(store, snapshot).await?,
        Command::Raw(args) => raw::run(args, snapshot)?,
        Command::Symbols => symbols::run(snapshot)?,
    };

    let CommandResult {
        data,
        warnings,
        errors,
    } = command_result;

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let mut metadata = Metadata::new(latency_ms, loaded.cache_hit);

    for warning in snapshot.report().warnings() {
        metadata.push_warning(warning);
    }
    if snapshot.is_empty() {
        metadata.push_warning("feed contained no usable rows");
    }
    for warning in warnings {
        metadata.push_warning(warning);
    }

    debug!(
        snapshot = %snapshot.id(),
        cache_hit = loaded.cache_hit,
        warnings = metadata.warnings.len(),
        errors = errors.len(),
        latency_ms,
        "command finished"
    );

    let meta = metadata.into_envelope_meta(snapshot)?;
    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

/// Environment defaults overridden by command-line flags.
fn feed_config(cli: &Cli) -> Result<FeedConfig, CliError> {
    let mut config = FeedConfig::from_env()?;

    if let Some(source) = &cli.source {
        config = config.with_source(FeedSource::parse(source)?);
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }
    if let Some(delimiter) = &cli.delimiter {
        config = config.with_delimiter(parse_delimiter(delimiter)?);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;
    use tempfile::NamedTempFile;

    use super::*;

    const FEED: &str = "\
Symbol,Date,AM/PM,Volume
AAA,2024-01-01,AM,100
AAA,2024-01-01,PM,200
AAA,2023-12-31,AM,150
BBB,2024-02-01,AM,300
CCC,not-a-date,AM,50
";

    fn feed_file(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(text.as_bytes()).expect("write feed");
        file
    }

    fn cli(file: &NamedTempFile, args: &[&str]) -> Cli {
        let path = file.path().to_string_lossy().into_owned();
        let mut argv = vec!["voltick", "--source", path.as_str()];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("arguments parse")
    }

    #[tokio::test]
    async fn summary_reports_each_dated_symbol() {
        let file = feed_file(FEED);
        let envelope = run(&cli(&file, &["summary"])).await.expect("command runs");

        let rows = envelope.data.as_array().expect("array of summaries");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["symbol"], "AAA");
        assert_eq!(rows[0]["most_recent_volume"], 200.0);
        assert_eq!(rows[0]["average_prior_volume"], 125.0);
        assert_eq!(rows[0]["difference"], 75.0);
        assert!(rows[1]["difference"].is_null());
        assert!(!envelope.meta.cache_hit);
        assert!(envelope
            .meta
            .warnings
            .iter()
            .any(|warning| warning.contains("unparsable date")));
    }

    #[tokio::test]
    async fn raw_for_unknown_symbol_is_an_envelope_error() {
        let file = feed_file(FEED);
        let envelope = run(&cli(&file, &["raw", "--symbol", "ZZZ"]))
            .await
            .expect("command runs");

        assert_eq!(envelope.data, Value::Array(Vec::new()));
        assert_eq!(envelope.errors.len(), 1);
        assert_eq!(envelope.errors[0].code, "no_data");
    }

    #[tokio::test]
    async fn symbols_start_with_all() {
        let file = feed_file(FEED);
        let envelope = run(&cli(&file, &["symbols"])).await.expect("command runs");

        assert_eq!(
            envelope.data,
            serde_json::json!(["All", "AAA", "BBB", "CCC"])
        );
    }

    #[tokio::test]
    async fn second_load_from_shared_store_hits_cache() {
        let file = feed_file(FEED);
        let cli = cli(&file, &["symbols"]);
        let loader = FeedLoader::new(feed_config(&cli).expect("config"));
        let store = SnapshotStore::default();

        let first = run_with(&cli, &loader, &store).await.expect("first run");
        let second = run_with(&cli, &loader, &store).await.expect("second run");

        assert!(!first.meta.cache_hit);
        assert!(second.meta.cache_hit);
        assert_eq!(first.meta.snapshot_id, second.meta.snapshot_id);
    }

    #[tokio::test]
    async fn custom_delimiter_is_applied() {
        let file = feed_file("Symbol;Date;Volume\nAAA;2024-01-01;10\nAAA;2024-01-02;20\n");
        let envelope = run(&cli(&file, &["--delimiter", ";", "summary"]))
            .await
            .expect("command runs");

        assert_eq!(envelope.data[0]["most_recent_volume"], 20.0);
        assert_eq!(envelope.data[0]["average_prior_volume"], 10.0);
    }

    #[tokio::test]
    async fn missing_file_is_a_feed_error() {
        let cli = Cli::try_parse_from([
            "voltick",
            "--source",
            "/definitely/not/here/stocks.csv",
            "summary",
        ])
        .expect("arguments parse");

        let error = run(&cli).await.expect_err("load must fail");
        assert_eq!(error.exit_code(), 3);
    }

    #[tokio::test]
    async fn bad_delimiter_is_a_validation_error() {
        let file = feed_file(FEED);
        let error = run(&cli(&file, &["--delimiter", ";;", "summary"]))
            .await
            .expect_err("delimiter must be rejected");

        assert_eq!(error.exit_code(), 2);
    }
}

//! Reading the delimited screener feed.
//!
//! The reader owns the transport boundary: rows with more fields than the
//! header, or with bytes that are not UTF-8, are skipped and counted. Every
//! other row goes through the [`RecordNormalizer`].

use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::header::Column;
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::normalizer::{Discard, RecordNormalizer};
use crate::snapshot::Snapshot;
use crate::{FeedConfig, FeedError, RawObservation, ValidationError};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Where a feed is read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeedSource {
    File(PathBuf),
    Http(String),
}

impl FeedSource {
    /// `http://` and `https://` locations are URLs; anything else (with an
    /// optional `file://` prefix) is a local path.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySource);
        }

        let lowered = trimmed.to_ascii_lowercase();
        if lowered.starts_with("http://") || lowered.starts_with("https://") {
            return Ok(Self::Http(trimmed.to_owned()));
        }

        let path = trimmed.strip_prefix("file://").unwrap_or(trimmed);
        Ok(Self::File(PathBuf::from(path)))
    }
}

impl Display for FeedSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Http(url) => f.write_str(url),
        }
    }
}

impl Serialize for FeedSource {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Counts gathered while reading one feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Data records seen, including skipped ones.
    pub rows_read: usize,
    pub rows_kept: usize,
    pub malformed_rows: usize,
    pub rows_without_symbol: usize,
    pub invalid_dates: usize,
    pub invalid_volumes: usize,
    pub missing_columns: Vec<Column>,
}

impl LoadReport {
    /// Human-readable notes on schema drift and skipped data.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for column in &self.missing_columns {
            warnings.push(match column {
                Column::Symbol => String::from("feed has no Symbol column; every row was dropped"),
                Column::Date => String::from("feed has no Date column; every date is invalid"),
                Column::Session => {
                    String::from("feed has no AM/PM column; every session is unspecified")
                }
                Column::Volume => String::from("feed has no Volume column; every volume is invalid"),
            });
        }

        if self.malformed_rows > 0 {
            warnings.push(format!("{} malformed rows skipped", self.malformed_rows));
        }
        if self.rows_without_symbol > 0 && !self.missing_columns.contains(&Column::Symbol) {
            warnings.push(format!(
                "{} rows dropped without a usable symbol",
                self.rows_without_symbol
            ));
        }
        if self.invalid_dates > 0 && !self.missing_columns.contains(&Column::Date) {
            warnings.push(format!("{} rows have an unparsable date", self.invalid_dates));
        }
        if self.invalid_volumes > 0 && !self.missing_columns.contains(&Column::Volume) {
            warnings.push(format!(
                "{} rows have a non-numeric volume",
                self.invalid_volumes
            ));
        }

        warnings
    }
}

/// Normalized rows of one feed plus what happened while reading it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFeed {
    pub observations: Vec<RawObservation>,
    pub report: LoadReport,
}

/// Parses feed bytes. Only an unreadable header row is an error; an empty
/// feed yields no observations.
pub fn parse_feed(bytes: &[u8], config: &FeedConfig) -> Result<ParsedFeed, FeedError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|cell| String::from_utf8_lossy(cell).into_owned())
        .collect();
    let normalizer = RecordNormalizer::for_headers(&headers, config.thousands_separators.clone());

    let mut report = LoadReport {
        missing_columns: normalizer.columns().missing(),
        ..LoadReport::default()
    };
    for column in &report.missing_columns {
        warn!(column = %column, "expected feed column is missing");
    }

    let mut observations = Vec::new();
    for (row, record) in reader.byte_records().enumerate() {
        report.rows_read += 1;

        let record = match record {
            Ok(record) => record,
            Err(error) => {
                debug!(row, %error, "skipping unreadable row");
                report.malformed_rows += 1;
                continue;
            }
        };

        if record.len() > headers.len() {
            debug!(
                row,
                fields = record.len(),
                expected = headers.len(),
                "skipping row with extra fields"
            );
            report.malformed_rows += 1;
            continue;
        }

        let Ok(cells) = record
            .iter()
            .map(std::str::from_utf8)
            .collect::<Result<Vec<_>, _>>()
        else {
            debug!(row, "skipping row that is not valid UTF-8");
            report.malformed_rows += 1;
            continue;
        };

        match normalizer.normalize(row, &cells) {
            Ok(observation) => {
                if observation.parsed_date.is_none() {
                    report.invalid_dates += 1;
                }
                if observation.volume.is_none() {
                    report.invalid_volumes += 1;
                }
                observations.push(observation);
            }
            Err(Discard::MissingSymbol) => {
                debug!(row, "dropping row without symbol");
                report.rows_without_symbol += 1;
            }
        }
    }

    report.rows_kept = observations.len();
    Ok(ParsedFeed {
        observations,
        report,
    })
}

/// Fetches a feed and turns it into a [`Snapshot`].
#[derive(Clone)]
pub struct FeedLoader {
    config: FeedConfig,
    http: Arc<dyn HttpClient>,
}

impl FeedLoader {
    pub fn new(config: FeedConfig) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_http_client(config: FeedConfig, http: Arc<dyn HttpClient>) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Raw feed bytes from the configured source.
    pub async fn fetch(&self) -> Result<Vec<u8>, FeedError> {
        match &self.config.source {
            FeedSource::File(path) => tokio::fs::read(path).await.map_err(|source| FeedError::Io {
                path: path.display().to_string(),
                source,
            }),
            FeedSource::Http(url) => {
                let request = HttpRequest::get(url.as_str())
                    .with_header("accept", "text/csv, text/plain, */*")
                    .with_timeout_ms(self.config.timeout_ms);
                let response = self
                    .http
                    .execute(request)
                    .await
                    .map_err(|error| FeedError::Transport {
                        url: url.clone(),
                        message: error.message().to_owned(),
                    })?;

                if !response.is_success() {
                    return Err(FeedError::HttpStatus {
                        url: url.clone(),
                        status: response.status,
                    });
                }
                Ok(response.body)
            }
        }
    }

    /// Fetches and parses the feed in one go.
    pub async fn load(&self) -> Result<Snapshot, FeedError> {
        let started = Instant::now();
        let bytes = self.fetch().await?;
        let snapshot = Snapshot::from_bytes(self.config.source.clone(), &bytes, &self.config)?;

        let report = snapshot.report();
        info!(
            source = %self.config.source,
            snapshot = %snapshot.id(),
            rows_read = report.rows_read,
            rows_kept = report.rows_kept,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "feed loaded"
        );
        Ok(snapshot)
    }
}

impl std::fmt::Debug for FeedLoader {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedLoader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

//! # Voltick Core
//!
//! Normalization and volume comparison for scraped stock-screener
//! snapshots.
//!
//! ## Overview
//!
//! A screener producer appends `(Symbol, Date, AM/PM, Volume)` rows to a
//! delimited feed, with drifting headers, free-form dates and thousands
//! separators. This crate turns such a feed into:
//!
//! - a [`VolumeSummary`] per symbol: the most recent volume, the average of
//!   every prior observation, and their difference;
//! - a cleaned, sortable raw view of every row for display.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`aggregation`] | Most-recent selection and prior-average reduction |
//! | [`config`] | Feed configuration and environment overrides |
//! | [`domain`] | Symbols, dates, sessions, observations, summaries |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//! | [`feed`] | Feed sources, CSV reading and load reports |
//! | [`header`] | Header repair and column mapping |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`normalizer`] | Row to observation normalization |
//! | [`raw_view`] | Raw table ordering and symbol options |
//! | [`snapshot`] | Immutable snapshots and the snapshot store |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use voltick_core::{CacheMode, FeedConfig, FeedLoader, SnapshotStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = FeedLoader::new(FeedConfig::from_env()?);
//!     let store = SnapshotStore::default();
//!
//!     let loaded = store.load(&loader, CacheMode::Use).await?;
//!     for (symbol, summary) in store.summaries(&loaded.snapshot).await.iter() {
//!         println!("{symbol}: {:?}", summary.difference);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Bad dates, bad volumes and missing columns never fail a load; they
//! become `None` fields and [`LoadReport`] counts. Only feed transport
//! problems surface as [`FeedError`].

pub mod aggregation;
pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod feed;
pub mod header;
pub mod http_client;
pub mod normalizer;
pub mod raw_view;
pub mod snapshot;

pub use aggregation::{summarize, SummaryTable};
pub use config::{FeedConfig, DEFAULT_FEED_URL};
pub use domain::{
    parse_volume, ObservationDate, RawObservation, SessionPeriod, Symbol, UtcDateTime,
    VolumeSummary,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::{FeedError, ValidationError};
pub use feed::{parse_feed, FeedLoader, FeedSource, LoadReport, ParsedFeed};
pub use header::{repair_header, Column, ColumnMap};
pub use http_client::{
    FixtureHttpClient, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use normalizer::RecordNormalizer;
pub use raw_view::{raw_rows, symbol_options, RawRow, SymbolFilter, ALL_SYMBOLS};
pub use snapshot::{CacheMode, Loaded, Snapshot, SnapshotId, SnapshotStore};

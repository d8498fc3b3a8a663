//! Feed configuration.
//!
//! Defaults mirror the public screener feed; each field can be overridden
//! through `VOLTICK_*` environment variables and then by CLI flags.

use std::env;
use std::time::Duration;

use crate::feed::FeedSource;
use crate::ValidationError;

/// Public screener CSV maintained by the scraper.
pub const DEFAULT_FEED_URL: &str =
    "https://raw.githubusercontent.com/DCruise1/DataPull/main/stocks.csv";

pub const ENV_SOURCE: &str = "VOLTICK_SOURCE";
pub const ENV_TIMEOUT_MS: &str = "VOLTICK_TIMEOUT_MS";
pub const ENV_DELIMITER: &str = "VOLTICK_DELIMITER";
pub const ENV_CACHE_TTL_SECS: &str = "VOLTICK_CACHE_TTL_SECS";

/// How and where a feed is read.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    pub source: FeedSource,
    /// HTTP request budget; unused for file sources.
    pub timeout_ms: u64,
    pub delimiter: u8,
    /// Characters stripped from volume cells before numeric parsing.
    pub thousands_separators: Vec<char>,
    /// How long a loaded snapshot may be reused. `None` never expires.
    pub cache_ttl: Option<Duration>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source: FeedSource::Http(String::from(DEFAULT_FEED_URL)),
            timeout_ms: 10_000,
            delimiter: b',',
            thousands_separators: vec![','],
            cache_ttl: None,
        }
    }
}

impl FeedConfig {
    /// Defaults overridden by any `VOLTICK_*` variables that are set.
    /// Unparsable numeric values are ignored.
    pub fn from_env() -> Result<Self, ValidationError> {
        let mut config = Self::default();

        if let Some(source) = non_empty_var(ENV_SOURCE) {
            config.source = FeedSource::parse(&source)?;
        }
        if let Some(timeout_ms) = non_empty_var(ENV_TIMEOUT_MS).and_then(|v| v.parse().ok()) {
            config.timeout_ms = timeout_ms;
        }
        if let Some(delimiter) = non_empty_var(ENV_DELIMITER) {
            config.delimiter = parse_delimiter(&delimiter)?;
        }
        if let Some(secs) = non_empty_var(ENV_CACHE_TTL_SECS).and_then(|v| v.parse().ok()) {
            config.cache_ttl = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn with_source(mut self, source: FeedSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

/// Accepts one ASCII character, or the escapes `\t` and `tab`.
pub fn parse_delimiter(input: &str) -> Result<u8, ValidationError> {
    let invalid = || ValidationError::InvalidDelimiter {
        value: input.to_owned(),
    };

    match input {
        "\\t" | "tab" => Ok(b'\t'),
        _ => {
            let mut chars = input.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) if ch.is_ascii() => u8::try_from(ch).map_err(|_| invalid()),
                _ => Err(invalid()),
            }
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_feed() {
        let config = FeedConfig::default();
        assert_eq!(config.source, FeedSource::Http(String::from(DEFAULT_FEED_URL)));
        assert_eq!(config.delimiter, b',');
        assert_eq!(config.thousands_separators, vec![',']);
        assert!(config.cache_ttl.is_none());
    }

    #[test]
    fn parses_delimiters() {
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert_eq!(parse_delimiter("\\t"), Ok(b'\t'));
        assert!(matches!(
            parse_delimiter(";;"),
            Err(ValidationError::InvalidDelimiter { .. })
        ));
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("é").is_err());
    }
}

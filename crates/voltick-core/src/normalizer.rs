//! Turns raw feed rows into [`RawObservation`]s.

use crate::header::{Column, ColumnMap};
use crate::{parse_volume, ObservationDate, RawObservation, SessionPeriod, Symbol};

/// Why a row was dropped instead of normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discard {
    /// No symbol column, or the cell is missing or blank.
    MissingSymbol,
}

/// Fills a [`RawObservation`] from one row, defaulting every field whose
/// column is absent: dates and volumes become `None`, sessions become
/// `Unspecified`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordNormalizer {
    columns: ColumnMap,
    thousands_separators: Vec<char>,
}

impl RecordNormalizer {
    pub fn new(columns: ColumnMap, thousands_separators: Vec<char>) -> Self {
        Self {
            columns,
            thousands_separators,
        }
    }

    /// Normalizer for a header row, repaired via [`ColumnMap::resolve`].
    pub fn for_headers<S: AsRef<str>>(headers: &[S], thousands_separators: Vec<char>) -> Self {
        Self::new(ColumnMap::resolve(headers), thousands_separators)
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    /// Normalizes the row at feed position `row`. Rows may be shorter or
    /// longer than the header; missing cells read as absent.
    pub fn normalize<S: AsRef<str>>(
        &self,
        row: usize,
        cells: &[S],
    ) -> Result<RawObservation, Discard> {
        let cell = |column: Column| -> Option<&str> {
            self.columns
                .index(column)
                .and_then(|index| cells.get(index))
                .map(|value| value.as_ref())
        };

        let symbol = cell(Column::Symbol)
            .and_then(|text| Symbol::parse(text).ok())
            .ok_or(Discard::MissingSymbol)?;

        let raw_date = cell(Column::Date).unwrap_or_default().to_owned();
        let parsed_date = ObservationDate::parse(&raw_date);
        let session_period = cell(Column::Session)
            .map(SessionPeriod::parse)
            .unwrap_or_default();
        let raw_volume = cell(Column::Volume).unwrap_or_default().to_owned();
        let volume = parse_volume(&raw_volume, &self.thousands_separators);

        Ok(RawObservation {
            row,
            symbol,
            raw_date,
            parsed_date,
            session_period,
            raw_volume,
            volume,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer(headers: &[&str]) -> RecordNormalizer {
        RecordNormalizer::for_headers(headers, vec![','])
    }

    #[test]
    fn normalizes_a_complete_row() {
        let normalizer = normalizer(&["Symbol", "Date", "AM/PM", "Volume"]);
        let observation = normalizer
            .normalize(4, &["AAA", "2024-01-01", "PM", "1,200"])
            .expect("row is kept");

        assert_eq!(observation.row, 4);
        assert_eq!(observation.symbol.as_str(), "AAA");
        assert_eq!(observation.parsed_date, ObservationDate::from_ymd(2024, 1, 1));
        assert_eq!(observation.session_period, SessionPeriod::Pm);
        assert_eq!(observation.volume, Some(1200.0));
        assert_eq!(observation.raw_volume, "1,200");
    }

    #[test]
    fn missing_columns_fall_back_to_defaults() {
        let normalizer = normalizer(&["Symbol", "Volume"]);
        let observation = normalizer.normalize(0, &["AAA", "10"]).expect("row is kept");

        assert_eq!(observation.raw_date, "");
        assert_eq!(observation.parsed_date, None);
        assert_eq!(observation.session_period, SessionPeriod::Unspecified);
        assert_eq!(observation.volume, Some(10.0));
    }

    #[test]
    fn short_rows_read_missing_cells_as_absent() {
        let normalizer = normalizer(&["Symbol", "Date", "AM/PM", "Volume"]);
        let observation = normalizer.normalize(0, &["AAA", "2024-01-01"]).expect("row is kept");

        assert_eq!(observation.session_period, SessionPeriod::Unspecified);
        assert_eq!(observation.volume, None);
    }

    #[test]
    fn bad_fields_are_kept_as_invalid() {
        let normalizer = normalizer(&["Symbol", "Date", "Volume"]);
        let observation = normalizer
            .normalize(0, &["CCC", "not-a-date", "abc"])
            .expect("row is kept");

        assert_eq!(observation.raw_date, "not-a-date");
        assert_eq!(observation.parsed_date, None);
        assert_eq!(observation.volume, None);
    }

    #[test]
    fn unusual_symbols_are_kept_as_written() {
        let normalizer = normalizer(&["Symbol", "Date"]);
        let observation = normalizer
            .normalize(0, &["  BRK B ", "2024-01-01"])
            .expect("row is kept");

        assert_eq!(observation.symbol.as_str(), "BRK B");
    }

    #[test]
    fn rows_without_symbol_are_discarded() {
        let normalizer = normalizer(&["Symbol", "Date"]);
        assert_eq!(
            normalizer.normalize(0, &["  ", "2024-01-01"]),
            Err(Discard::MissingSymbol)
        );
        assert_eq!(normalizer.normalize::<&str>(1, &[]), Err(Discard::MissingSymbol));

        let headless = RecordNormalizer::for_headers(&["Date"], vec![',']);
        assert_eq!(headless.normalize(0, &["2024-01-01"]), Err(Discard::MissingSymbol));
    }
}

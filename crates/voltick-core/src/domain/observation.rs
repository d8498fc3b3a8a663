use serde::Serialize;

use crate::{ObservationDate, SessionPeriod, Symbol};

/// One normalized screener row.
///
/// `parsed_date` and `volume` are `None` when the feed text could not be
/// understood; the raw text is kept for display either way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawObservation {
    /// Zero-based position in the feed.
    pub row: usize,
    pub symbol: Symbol,
    pub raw_date: String,
    pub parsed_date: Option<ObservationDate>,
    pub session_period: SessionPeriod,
    pub raw_volume: String,
    pub volume: Option<f64>,
}

impl RawObservation {
    /// The `(date, session)` slot used to tell "most recent" rows from prior
    /// ones.
    pub fn slot(&self) -> (Option<ObservationDate>, SessionPeriod) {
        (self.parsed_date, self.session_period)
    }
}

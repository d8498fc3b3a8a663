use serde::Serialize;

use crate::{ObservationDate, SessionPeriod, Symbol};

/// Per-symbol comparison of the most recent volume against the average of
/// every prior observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeSummary {
    pub symbol: Symbol,
    pub average_prior_volume: Option<f64>,
    pub most_recent_volume: Option<f64>,
    pub difference: Option<f64>,
    pub most_recent_date: ObservationDate,
    pub most_recent_session: SessionPeriod,
    /// Prior observations with a valid volume that fed the average.
    pub prior_count: usize,
}

impl VolumeSummary {
    pub fn new(
        symbol: Symbol,
        most_recent_date: ObservationDate,
        most_recent_session: SessionPeriod,
        most_recent_volume: Option<f64>,
        average_prior_volume: Option<f64>,
        prior_count: usize,
    ) -> Self {
        let difference = most_recent_volume
            .zip(average_prior_volume)
            .map(|(recent, average)| recent - average);

        Self {
            symbol,
            average_prior_volume,
            most_recent_volume,
            difference,
            most_recent_date,
            most_recent_session,
            prior_count,
        }
    }
}

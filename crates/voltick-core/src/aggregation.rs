//! Volume comparison engine.
//!
//! For every symbol the engine picks one "most recent" observation and
//! averages the valid volumes of every observation outside its
//! `(date, session)` slot.
//!
//! * The most recent date is the maximum valid `parsed_date`; rows with an
//!   invalid date never win.
//! * On that date the first `PM` row in feed order wins, else the first row.
//! * Rows sharing the winning slot are neither most recent nor prior.
//! * Symbols without any valid date produce no summary.
//!
//! Everything here is a pure function of its input slice.

use std::collections::BTreeMap;

use crate::{ObservationDate, RawObservation, SessionPeriod, Symbol, VolumeSummary};

/// Summaries keyed by symbol, in ascending symbol order.
pub type SummaryTable = BTreeMap<Symbol, VolumeSummary>;

/// Computes one [`VolumeSummary`] per symbol that has a valid date.
pub fn summarize(observations: &[RawObservation]) -> SummaryTable {
    group_by_symbol(observations)
        .into_iter()
        .filter_map(|(symbol, group)| {
            summarize_group(&group).map(|summary| (symbol.clone(), summary))
        })
        .collect()
}

/// Groups observations by symbol, keeping feed order inside each group.
pub fn group_by_symbol(
    observations: &[RawObservation],
) -> BTreeMap<&Symbol, Vec<&RawObservation>> {
    let mut groups: BTreeMap<&Symbol, Vec<&RawObservation>> = BTreeMap::new();
    for observation in observations {
        groups.entry(&observation.symbol).or_default().push(observation);
    }
    groups
}

/// Picks the most recent observation of one symbol's group.
pub fn select_most_recent<'a>(group: &[&'a RawObservation]) -> Option<&'a RawObservation> {
    let max_date = group.iter().filter_map(|observation| observation.parsed_date).max()?;

    let mut tied = group
        .iter()
        .copied()
        .filter(|observation| observation.parsed_date == Some(max_date));

    tied.clone()
        .find(|observation| observation.session_period == SessionPeriod::Pm)
        .or_else(|| tied.next())
}

/// Average of the valid volumes outside `slot`, rounded half to even, and
/// the number of volumes averaged.
pub fn prior_average(
    group: &[&RawObservation],
    slot: (Option<ObservationDate>, SessionPeriod),
) -> (Option<f64>, usize) {
    let (sum, count) = group
        .iter()
        .filter(|observation| observation.slot() != slot)
        .filter_map(|observation| observation.volume)
        .fold((0.0_f64, 0_usize), |(sum, count), volume| (sum + volume, count + 1));

    if count == 0 {
        return (None, 0);
    }

    let average = (sum / count as f64).round_ties_even();
    (Some(average), count)
}

/// Summary for one symbol's group, `None` when no row has a valid date.
pub fn summarize_group(group: &[&RawObservation]) -> Option<VolumeSummary> {
    let most_recent = select_most_recent(group)?;
    let most_recent_date = most_recent.parsed_date?;
    let (average, prior_count) = prior_average(group, most_recent.slot());

    Some(VolumeSummary::new(
        most_recent.symbol.clone(),
        most_recent_date,
        most_recent.session_period,
        most_recent.volume,
        average,
        prior_count,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(
        row: usize,
        symbol: &str,
        date: &str,
        session: SessionPeriod,
        volume: Option<f64>,
    ) -> RawObservation {
        RawObservation {
            row,
            symbol: Symbol::parse(symbol).expect("valid symbol"),
            raw_date: date.to_owned(),
            parsed_date: ObservationDate::parse(date),
            session_period: session,
            raw_volume: volume.map(|v| v.to_string()).unwrap_or_default(),
            volume,
        }
    }

    #[test]
    fn pm_beats_am_and_earlier_dates() {
        let rows = vec![
            observation(0, "AAA", "2024-01-01", SessionPeriod::Am, Some(100.0)),
            observation(1, "AAA", "2024-01-01", SessionPeriod::Pm, Some(200.0)),
            observation(2, "AAA", "2023-12-31", SessionPeriod::Am, Some(150.0)),
        ];
        let group: Vec<&RawObservation> = rows.iter().collect();

        let selected = select_most_recent(&group).expect("has a valid date");
        assert_eq!(selected.row, 1);
    }

    #[test]
    fn first_row_wins_without_pm() {
        let rows = vec![
            observation(0, "AAA", "2023-12-31", SessionPeriod::Pm, Some(5.0)),
            observation(1, "AAA", "2024-01-01", SessionPeriod::Unspecified, Some(7.0)),
            observation(2, "AAA", "2024-01-01", SessionPeriod::Am, Some(9.0)),
        ];
        let group: Vec<&RawObservation> = rows.iter().collect();

        assert_eq!(select_most_recent(&group).map(|o| o.row), Some(1));
    }

    #[test]
    fn first_pm_wins_among_duplicates() {
        let rows = vec![
            observation(0, "AAA", "2024-01-01", SessionPeriod::Pm, Some(1.0)),
            observation(1, "AAA", "2024-01-01", SessionPeriod::Pm, Some(2.0)),
        ];
        let group: Vec<&RawObservation> = rows.iter().collect();

        assert_eq!(select_most_recent(&group).map(|o| o.row), Some(0));
    }

    #[test]
    fn no_valid_date_means_no_selection() {
        let rows = vec![observation(0, "AAA", "garbage", SessionPeriod::Pm, Some(1.0))];
        let group: Vec<&RawObservation> = rows.iter().collect();

        assert!(select_most_recent(&group).is_none());
        assert!(summarize_group(&group).is_none());
    }

    #[test]
    fn duplicates_of_the_winning_slot_are_not_prior() {
        let rows = vec![
            observation(0, "AAA", "2024-01-02", SessionPeriod::Pm, Some(500.0)),
            observation(1, "AAA", "2024-01-02", SessionPeriod::Pm, Some(900.0)),
            observation(2, "AAA", "2024-01-02", SessionPeriod::Am, Some(100.0)),
        ];
        let group: Vec<&RawObservation> = rows.iter().collect();

        let summary = summarize_group(&group).expect("summary");
        assert_eq!(summary.most_recent_volume, Some(500.0));
        assert_eq!(summary.average_prior_volume, Some(100.0));
        assert_eq!(summary.prior_count, 1);
        assert_eq!(summary.difference, Some(400.0));
    }

    #[test]
    fn averages_round_half_to_even() {
        let slot_date = ObservationDate::parse("2024-01-03");
        let rows = vec![
            observation(0, "AAA", "2024-01-01", SessionPeriod::Am, Some(125.0)),
            observation(1, "AAA", "2024-01-02", SessionPeriod::Am, Some(126.0)),
        ];
        let group: Vec<&RawObservation> = rows.iter().collect();
        assert_eq!(prior_average(&group, (slot_date, SessionPeriod::Am)), (Some(126.0), 2));

        let rows = vec![
            observation(0, "AAA", "2024-01-01", SessionPeriod::Am, Some(124.0)),
            observation(1, "AAA", "2024-01-02", SessionPeriod::Am, Some(125.0)),
        ];
        let group: Vec<&RawObservation> = rows.iter().collect();
        assert_eq!(prior_average(&group, (slot_date, SessionPeriod::Am)), (Some(124.0), 2));
    }

    #[test]
    fn invalid_most_recent_volume_yields_null_difference() {
        let rows = vec![
            observation(0, "AAA", "2024-01-02", SessionPeriod::Am, None),
            observation(1, "AAA", "2024-01-01", SessionPeriod::Am, Some(40.0)),
        ];
        let group: Vec<&RawObservation> = rows.iter().collect();

        let summary = summarize_group(&group).expect("summary");
        assert_eq!(summary.most_recent_volume, None);
        assert_eq!(summary.average_prior_volume, Some(40.0));
        assert_eq!(summary.difference, None);
    }

    #[test]
    fn summarize_keys_by_symbol_in_order() {
        let rows = vec![
            observation(0, "ZZZ", "2024-01-01", SessionPeriod::Am, Some(1.0)),
            observation(1, "AAA", "2024-01-01", SessionPeriod::Am, Some(2.0)),
            observation(2, "MMM", "bad", SessionPeriod::Am, Some(3.0)),
        ];

        let table = summarize(&rows);
        let symbols: Vec<&str> = table.keys().map(Symbol::as_str).collect();
        assert_eq!(symbols, vec!["AAA", "ZZZ"]);
    }

    #[test]
    fn empty_input_yields_empty_table() {
        assert!(summarize(&[]).is_empty());
    }
}

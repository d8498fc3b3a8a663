//! Display ordering for the raw observation table.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Serialize, Serializer};
use time::Date;

use crate::{ObservationDate, RawObservation, SessionPeriod, Symbol, ValidationError};

/// Label of the "no filter" entry in the symbol list.
pub const ALL_SYMBOLS: &str = "All";

/// Which rows the raw table shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SymbolFilter {
    #[default]
    All,
    Only(Symbol),
}

impl SymbolFilter {
    /// `All` (any case) or blank selects every symbol.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_SYMBOLS) {
            return Ok(Self::All);
        }
        Symbol::parse(trimmed).map(Self::Only)
    }

    pub fn matches(&self, symbol: &Symbol) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only == symbol,
        }
    }
}

/// One display row; internal-only fields are dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawRow {
    pub symbol: Symbol,
    /// Date text exactly as the feed had it.
    pub date: String,
    #[serde(serialize_with = "serialize_session")]
    pub session: SessionPeriod,
    pub volume: Option<f64>,
    #[serde(serialize_with = "serialize_day")]
    pub date_used: Option<Date>,
}

impl From<&RawObservation> for RawRow {
    fn from(observation: &RawObservation) -> Self {
        Self {
            symbol: observation.symbol.clone(),
            date: observation.raw_date.clone(),
            session: observation.session_period,
            volume: observation.volume,
            date_used: observation.parsed_date.map(ObservationDate::date),
        }
    }
}

/// Rows matching `filter`, sorted by symbol then newest date for `All`, or
/// newest date alone for a single symbol. Invalid dates sort last and ties
/// keep feed order.
pub fn raw_rows(observations: &[RawObservation], filter: &SymbolFilter) -> Vec<RawRow> {
    let mut selected: Vec<&RawObservation> = observations
        .iter()
        .filter(|observation| filter.matches(&observation.symbol))
        .collect();

    match filter {
        SymbolFilter::All => selected.sort_by(|a, b| {
            a.symbol
                .cmp(&b.symbol)
                .then_with(|| newest_first(a.parsed_date, b.parsed_date))
        }),
        SymbolFilter::Only(_) => {
            selected.sort_by(|a, b| newest_first(a.parsed_date, b.parsed_date));
        }
    }

    selected.into_iter().map(RawRow::from).collect()
}

/// `All` followed by every distinct symbol in ascending order.
pub fn symbol_options(observations: &[RawObservation]) -> Vec<String> {
    let distinct: BTreeSet<&str> = observations
        .iter()
        .map(|observation| observation.symbol.as_str())
        .collect();

    std::iter::once(ALL_SYMBOLS)
        .chain(distinct)
        .map(str::to_owned)
        .collect()
}

fn newest_first(a: Option<ObservationDate>, b: Option<ObservationDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn serialize_session<S>(value: &SessionPeriod, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.label())
}

fn serialize_day<S>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(day) => serializer.collect_str(day),
        None => serializer.serialize_none(),
    }
}

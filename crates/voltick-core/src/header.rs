//! Header repair for drifting feed schemas.
//!
//! Scraped CSV headers arrive with stray padding, embedded newlines from
//! wrapped table cells, and the occasional decoration. [`repair_header`]
//! maps one raw header cell to an expected [`Column`] using this fallback
//! order, stopping at the first hit:
//!
//! 1. **Trimmed**: surrounding whitespace removed, exact match.
//! 2. **Compact**: every whitespace character removed (`"Vol\nume"`), exact
//!    match.
//! 3. **Caseless**: compact form, ASCII case-insensitive.
//! 4. **Contains**: compact form contains an expected name, longest names
//!    tried first.
//!
//! [`ColumnMap::resolve`] applies the steps across the whole header row one
//! step at a time, so an exact `Volume` column is never displaced by an
//! earlier `Avg Volume` that would only match at step 4.

use std::fmt::{Display, Formatter};

use serde::Serialize;

/// Columns the normalizer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Symbol,
    Date,
    Session,
    Volume,
}

impl Column {
    pub const ALL: [Self; 4] = [Self::Symbol, Self::Date, Self::Session, Self::Volume];

    /// Header text as the producer is expected to write it.
    pub const fn canonical_name(self) -> &'static str {
        match self {
            Self::Symbol => "Symbol",
            Self::Date => "Date",
            Self::Session => "AM/PM",
            Self::Volume => "Volume",
        }
    }

    fn by_name_length() -> [Self; 4] {
        let mut columns = Self::ALL;
        columns.sort_by_key(|column| std::cmp::Reverse(column.canonical_name().len()));
        columns
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.canonical_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum RepairStep {
    Trimmed,
    Compact,
    Caseless,
    Contains,
}

impl RepairStep {
    const ORDER: [Self; 4] = [Self::Trimmed, Self::Compact, Self::Caseless, Self::Contains];

    fn matches(self, raw: &str, column: Column) -> bool {
        let expected = column.canonical_name();
        match self {
            Self::Trimmed => raw.trim() == expected,
            Self::Compact => compact(raw) == expected,
            Self::Caseless => compact(raw).eq_ignore_ascii_case(expected),
            Self::Contains => compact(raw)
                .to_ascii_lowercase()
                .contains(&expected.to_ascii_lowercase()),
        }
    }
}

fn compact(raw: &str) -> String {
    raw.chars().filter(|ch| !ch.is_whitespace()).collect()
}

/// Maps one raw header cell to the expected column it names, if any.
pub fn repair_header(raw: &str) -> Option<Column> {
    RepairStep::ORDER.into_iter().find_map(|step| {
        Column::by_name_length()
            .into_iter()
            .find(|column| step.matches(raw, *column))
    })
}

/// Position of each expected column in a feed's header row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMap {
    symbol: Option<usize>,
    date: Option<usize>,
    session: Option<usize>,
    volume: Option<usize>,
}

impl ColumnMap {
    /// Resolves the header row. The first header claiming a column at the
    /// earliest repair step wins; later duplicates are ignored.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut map = Self::default();
        let mut claimed = vec![false; headers.len()];

        for step in RepairStep::ORDER {
            for column in Column::by_name_length() {
                if map.index(column).is_some() {
                    continue;
                }
                let found = headers.iter().enumerate().find(|(position, header)| {
                    !claimed[*position] && step.matches(header.as_ref(), column)
                });
                if let Some((position, _)) = found {
                    claimed[position] = true;
                    map.set(column, position);
                }
            }
        }

        map
    }

    pub const fn index(&self, column: Column) -> Option<usize> {
        match column {
            Column::Symbol => self.symbol,
            Column::Date => self.date,
            Column::Session => self.session,
            Column::Volume => self.volume,
        }
    }

    pub const fn has(&self, column: Column) -> bool {
        self.index(column).is_some()
    }

    /// Expected columns absent from the header row, in canonical order.
    pub fn missing(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|column| !self.has(*column))
            .collect()
    }

    fn set(&mut self, column: Column, position: usize) {
        let slot = match column {
            Column::Symbol => &mut self.symbol,
            Column::Date => &mut self.date,
            Column::Session => &mut self.session,
            Column::Volume => &mut self.volume,
        };
        *slot = Some(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repairs_padded_and_wrapped_headers() {
        assert_eq!(repair_header(" Date "), Some(Column::Date));
        assert_eq!(repair_header("Vol\nume"), Some(Column::Volume));
        assert_eq!(repair_header("AM/\nPM"), Some(Column::Session));
        assert_eq!(repair_header("symbol"), Some(Column::Symbol));
    }

    #[test]
    fn falls_back_to_substring_match() {
        assert_eq!(repair_header("Date (UTC)"), Some(Column::Date));
        assert_eq!(repair_header("Market Cap"), None);
    }

    #[test]
    fn exact_header_beats_an_earlier_substring_match() {
        let map = ColumnMap::resolve(&["Avg Volume", "Symbol", "Volume", "Date"]);
        assert_eq!(map.index(Column::Volume), Some(2));
        assert_eq!(map.index(Column::Symbol), Some(1));
        assert_eq!(map.index(Column::Date), Some(3));
        assert_eq!(map.missing(), vec![Column::Session]);
    }

    #[test]
    fn first_duplicate_wins() {
        let map = ColumnMap::resolve(&["Symbol", "Symbol"]);
        assert_eq!(map.index(Column::Symbol), Some(0));
    }

    #[test]
    fn empty_header_row_resolves_nothing() {
        let map = ColumnMap::resolve::<&str>(&[]);
        assert_eq!(map.missing(), Column::ALL.to_vec());
    }
}

use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Wall-clock instant in UTC, kept to whole seconds.
///
/// Stamps when a snapshot was loaded and when an envelope was generated.
/// Feed dates use [`ObservationDate`](crate::ObservationDate) instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    pub fn now() -> Self {
        Self::from_offset(OffsetDateTime::now_utc())
    }

    /// Converts to UTC and drops sub-second precision.
    pub fn from_offset(value: OffsetDateTime) -> Self {
        let utc = value.to_offset(time::UtcOffset::UTC);
        Self(utc.replace_nanosecond(0).unwrap_or(utc))
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0.format(&Rfc3339) {
            Ok(text) => f.write_str(&text),
            Err(_) => Err(std::fmt::Error),
        }
    }
}

impl Serialize for UtcDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn normalizes_to_utc_seconds() {
        let stamp = UtcDateTime::from_offset(datetime!(2024-01-05 18:30:15.75 +02:00));
        assert_eq!(stamp.to_string(), "2024-01-05T16:30:15Z");
    }

    #[test]
    fn serializes_as_rfc3339_string() {
        let stamp = UtcDateTime::from_offset(datetime!(2024-01-01 00:00:00 UTC));
        let value = serde_json::to_value(stamp).expect("serializes");
        assert_eq!(value, "2024-01-01T00:00:00Z");
    }
}

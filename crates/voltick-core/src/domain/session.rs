use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Trading-session marker distinguishing the two snapshots a producer may
/// take on the same calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPeriod {
    Am,
    Pm,
    #[default]
    Unspecified,
}

impl SessionPeriod {
    /// Lenient parse: `AM`/`PM` in any case after trimming, anything else
    /// is `Unspecified`.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("am") {
            Self::Am
        } else if trimmed.eq_ignore_ascii_case("pm") {
            Self::Pm
        } else {
            Self::Unspecified
        }
    }

    /// Display label; empty for `Unspecified`.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Am => "AM",
            Self::Pm => "PM",
            Self::Unspecified => "",
        }
    }
}

impl Display for SessionPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Screener ticker as it appears in the feed.
///
/// Surrounding whitespace is trimmed; anything else, including inner spaces
/// and case, is kept so that the symbol groups exactly as the producer
/// wrote it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_preserves_case() {
        let parsed = Symbol::parse(" BRK.b ").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "BRK.b");
    }

    #[test]
    fn rejects_blank_symbol() {
        let err = Symbol::parse(" \n ").expect_err("must fail");
        assert_eq!(err, ValidationError::EmptySymbol);
    }

    #[test]
    fn keeps_inner_spaces_and_long_names() {
        assert_eq!(Symbol::parse(" BRK B ").expect("parses").as_str(), "BRK B");

        let long = "X".repeat(40);
        assert_eq!(Symbol::parse(&long).expect("parses").as_str(), long);
    }
}

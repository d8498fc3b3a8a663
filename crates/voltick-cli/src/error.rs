use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] voltick_core::ValidationError),

    #[error(transparent)]
    Feed(#[from] voltick_core::FeedError),

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Feed(_) => 3,
            Self::Serialization(_) => 4,
            Self::StrictModeViolation { .. } => 5,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voltick_core::{FeedError, ValidationError};

    #[test]
    fn maps_categories_to_exit_codes() {
        assert_eq!(CliError::from(ValidationError::EmptySymbol).exit_code(), 2);
        assert_eq!(
            CliError::from(FeedError::HttpStatus {
                url: String::from("https://example.test/stocks.csv"),
                status: 404,
            })
            .exit_code(),
            3
        );
        assert_eq!(
            CliError::StrictModeViolation {
                warning_count: 1,
                error_count: 0,
            }
            .exit_code(),
            5
        );
        assert_eq!(
            CliError::from(std::io::Error::other("closed pipe")).exit_code(),
            10
        );
    }
}

//! # Domain Models
//!
//! Canonical types for screener observations and volume summaries.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated screener ticker |
//! | [`ObservationDate`] | Feed date/time with a best-effort parser |
//! | [`SessionPeriod`] | AM/PM snapshot marker |
//! | [`RawObservation`] | One normalized feed row |
//! | [`VolumeSummary`] | Most recent vs. average prior volume per symbol |
//! | [`UtcDateTime`] | UTC timestamp for load and generation metadata |
//!
//! Unparsable dates and volumes are modelled as `None`, never as errors: a
//! row with bad fields still shows up in the raw view.

mod observation;
mod observation_date;
mod session;
mod summary;
mod symbol;
mod timestamp;
mod volume;

pub use observation::RawObservation;
pub use observation_date::ObservationDate;
pub use session::SessionPeriod;
pub use summary::VolumeSummary;
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
pub use volume::parse_volume;

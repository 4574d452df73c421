//! Match-list assembly for VEX Robotics Competition divisions.
//!
//! [`MatchListProjector`] turns the matches a [`MatchSource`] returns into
//! ordered [`MatchRow`]s, overlays best-effort score predictions, and
//! publishes everything as immutable [`MatchListSnapshot`]s.

pub use config::{ProjectorConfig, RefreshPolicy};
pub use error::{MatchesError, Result, SourceError};
pub use model::*;
pub use projector::{MatchListProjector, PredictOutcome, ProjectorEvent, RefreshOutcome};
pub use source::MatchSource;

pub mod config;
pub mod error;
pub mod favorites;
pub mod model;
pub mod projection;
pub mod projector;
pub mod source;

#[cfg(test)]
pub(crate) mod fake_source;

use serde::Serialize;

use super::{Alliance, Match, MatchRow};
use crate::projection;

/// Where the prediction overlay is in its lifecycle.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PredictionState {
    #[default]
    Off,
    Calculating,
    On,
}

/// An immutable view of a division's match list, published as a unit.
///
/// Rows, matches and flags always belong to the same publication, so a
/// reader holding a snapshot can never pair new rows with a stale flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchListSnapshot {
    pub(crate) generation: u64,
    pub(crate) matches: Vec<Match>,
    pub(crate) rows: Vec<MatchRow>,
    pub(crate) predictions_enabled: bool,
    pub(crate) prediction_state: PredictionState,
    pub(crate) loading: bool,
}

impl MatchListSnapshot {
    /// The state before the first fetch has published.
    pub(crate) fn initial() -> Self {
        Self {
            generation: 0,
            matches: Vec::new(),
            rows: Vec::new(),
            predictions_enabled: false,
            prediction_state: PredictionState::Off,
            loading: true,
        }
    }

    /// Increases by one on every publication.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn rows(&self) -> &[MatchRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&MatchRow> {
        self.rows.get(index)
    }

    pub fn predictions_enabled(&self) -> bool {
        self.predictions_enabled
    }

    pub fn prediction_state(&self) -> PredictionState {
        self.prediction_state
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// True once loading has finished and there is nothing to show.
    pub fn is_empty(&self) -> bool {
        !self.loading && self.rows.is_empty()
    }

    /// Score text for one side of a row, derived from the match data and the
    /// prediction flag of this snapshot. Empty when there is nothing to show.
    pub fn score_for(&self, index: usize, side: Alliance) -> String {
        self.matches
            .get(index)
            .and_then(|m| projection::score_display(m, self.predictions_enabled, side))
            .map(|score| score.to_string())
            .unwrap_or_default()
    }

    pub fn is_predicted(&self, index: usize) -> bool {
        self.rows.get(index).is_some_and(|row| row.is_predicted)
    }
}

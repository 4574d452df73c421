use async_trait::async_trait;

use crate::error::{MatchesError, SourceError};
use crate::model::{Division, Match};

/// The data service a [`MatchListProjector`](crate::MatchListProjector) reads from.
///
/// One source represents one event; divisions select the bracket within it.
#[async_trait]
pub trait MatchSource: Send + Sync + 'static {
    /// Fetch the division's matches in schedule order.
    async fn fetch_matches(&self, division: &Division) -> Result<Vec<Match>, SourceError>;

    /// Compute the per-team ratings that predictions are derived from.
    async fn calculate_team_performance_ratings(
        &self,
        division: &Division,
    ) -> Result<(), SourceError>;

    /// Run the predictor and return the division's matches with their
    /// prediction fields populated.
    ///
    /// Sources without a predictor keep the default, which reports
    /// [`MatchesError::PredictorUnavailable`].
    async fn predict_matches(&self, division: &Division) -> Result<Vec<Match>, SourceError> {
        Err(Box::new(MatchesError::PredictorUnavailable {
            division: division.id,
        }))
    }
}

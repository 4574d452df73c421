/// Boxed error returned by a [`MatchSource`](crate::MatchSource) implementation.
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// All errors that can occur while assembling a division's match list.
///
/// None of these reach the renderer as a failure: the projector absorbs them
/// and reports them alongside the degraded snapshot it published.
#[derive(thiserror::Error, Debug)]
pub enum MatchesError {
    /// The match list for a division could not be fetched.
    #[error("failed to fetch matches for division {division}: {source}")]
    Fetch { division: u32, source: SourceError },

    /// Team performance ratings could not be computed.
    #[error("failed to calculate performance ratings for division {division}: {source}")]
    Ratings { division: u32, source: SourceError },

    /// The predictor ran but could not produce predictions.
    #[error("failed to predict matches for division {division}: {source}")]
    Prediction { division: u32, source: SourceError },

    /// The source has no predictor at all.
    #[error("no predictor available for division {division}")]
    PredictorUnavailable { division: u32 },

    /// The background worker running a refresh panicked or was cancelled.
    /// A failed predict worker is reported as [`MatchesError::Prediction`].
    #[error("match list worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl MatchesError {
    /// True for failures that only affect the prediction overlay.
    pub fn is_prediction_failure(&self) -> bool {
        matches!(
            self,
            MatchesError::Prediction { .. } | MatchesError::PredictorUnavailable { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MatchesError>;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use crate::error::{MatchesError, SourceError};
use crate::model::{Division, Match};
use crate::source::MatchSource;

/// Lets a test park a fetch or prediction mid-flight and release it later.
#[derive(Default)]
pub(crate) struct Hold {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
pub(crate) struct FakeSource {
    pub matches: Mutex<Vec<Match>>,
    /// `None` behaves like a source without a predictor.
    pub predicted: Mutex<Option<Vec<Match>>>,
    pub fail_fetch: AtomicBool,
    pub fail_ratings: AtomicBool,
    pub fail_predict: AtomicBool,
    pub fetch_calls: AtomicU64,
    pub hold: Option<Arc<Hold>>,
    pub predict_hold: Option<Arc<Hold>>,
}

impl FakeSource {
    pub fn with_matches(matches: Vec<Match>) -> Self {
        Self {
            matches: Mutex::new(matches),
            ..Self::default()
        }
    }

    pub fn predicting(mut self, predicted: Vec<Match>) -> Self {
        self.predicted = Mutex::new(Some(predicted));
        self
    }

    pub fn holding(mut self) -> (Self, Arc<Hold>) {
        let hold = Arc::new(Hold::default());
        self.hold = Some(Arc::clone(&hold));
        (self, hold)
    }

    pub fn holding_predictions(mut self) -> (Self, Arc<Hold>) {
        let hold = Arc::new(Hold::default());
        self.predict_hold = Some(Arc::clone(&hold));
        (self, hold)
    }
}

#[async_trait]
impl MatchSource for FakeSource {
    async fn fetch_matches(&self, _division: &Division) -> Result<Vec<Match>, SourceError> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(hold) = &self.hold {
            hold.entered.notify_one();
            hold.release.notified().await;
        }
        if self.fail_fetch.load(Ordering::Relaxed) {
            return Err("match list unavailable".into());
        }
        Ok(self.matches.lock().await.clone())
    }

    async fn calculate_team_performance_ratings(
        &self,
        _division: &Division,
    ) -> Result<(), SourceError> {
        if self.fail_ratings.load(Ordering::Relaxed) {
            return Err("not enough completed matches".into());
        }
        Ok(())
    }

    async fn predict_matches(&self, division: &Division) -> Result<Vec<Match>, SourceError> {
        if let Some(hold) = &self.predict_hold {
            hold.entered.notify_one();
            hold.release.notified().await;
        }
        if self.fail_predict.load(Ordering::Relaxed) {
            return Err("predictor diverged".into());
        }
        self.predicted
            .lock()
            .await
            .clone()
            .ok_or_else(|| {
                Box::new(MatchesError::PredictorUnavailable {
                    division: division.id,
                }) as SourceError
            })
    }
}

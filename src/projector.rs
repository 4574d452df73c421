use std::sync::Arc;

use tokio::sync::{broadcast, watch, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::config::{ProjectorConfig, RefreshPolicy};
use crate::error::{MatchesError, SourceError};
use crate::model::{Division, Match, MatchListSnapshot, MatchRow, PredictionState};
use crate::projection::project_rows;
use crate::source::MatchSource;

const EVENT_CAPACITY: usize = 64;

/// Change notifications for renderers that do not want to diff snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectorEvent {
    /// The row sequence or loading state of `generation` differs from the previous one.
    RowsChanged { generation: u64 },
    /// The prediction flag or its lifecycle state changed.
    PredictionsChanged {
        generation: u64,
        enabled: bool,
        state: PredictionState,
    },
}

/// Result of [`MatchListProjector::refresh`].
#[derive(Debug)]
pub enum RefreshOutcome {
    /// A snapshot was published. `degraded` holds the failure that was
    /// absorbed on the way, if any.
    Published {
        generation: u64,
        degraded: Option<MatchesError>,
    },
    /// Another refresh or predict was in flight and the policy is [`RefreshPolicy::Drop`].
    Skipped,
}

/// Result of [`MatchListProjector::predict`].
#[derive(Debug)]
pub enum PredictOutcome {
    /// Predictions are now enabled and visible.
    Enabled { generation: u64 },
    /// Predictions were turned off while the predictor was running. The new
    /// match data was published without the overlay.
    Superseded { generation: u64 },
    /// The predictor failed or does not exist; displayed rows are unchanged.
    Unavailable(MatchesError),
    /// Another refresh or predict was in flight and the policy is [`RefreshPolicy::Drop`].
    Skipped,
}

/// Output of a background fetch, handed back for publication.
struct Fetched {
    matches: Option<Vec<Match>>,
    rows: Vec<MatchRow>,
    predictions_enabled: bool,
    error: Option<MatchesError>,
}

impl Fetched {
    fn failed(error: MatchesError) -> Self {
        Self {
            matches: None,
            rows: Vec::new(),
            predictions_enabled: false,
            error: Some(error),
        }
    }
}

/// Keeps one division's match list and its display rows up to date.
///
/// Fetches run on a spawned tokio task. Their results are published as a
/// single [`MatchListSnapshot`] swap, so readers always see rows, matches and
/// prediction flags from the same publication.
///
/// # Examples
///
/// ```no_run
/// # use roboscout_matches::{Alliance, Division, MatchListProjector, MatchSource};
/// # async fn example(source: impl MatchSource) {
/// let projector = MatchListProjector::new(source, Division::new(1, "Science"));
/// projector.refresh().await;
/// projector.predict().await;
///
/// let snapshot = projector.snapshot();
/// for row in snapshot.rows() {
///     println!(
///         "{} {} {}-{}",
///         row.display_name,
///         row.time_label,
///         snapshot.score_for(row.index, Alliance::Red),
///         snapshot.score_for(row.index, Alliance::Blue),
///     );
/// }
/// # }
/// ```
pub struct MatchListProjector<S: MatchSource> {
    source: Arc<S>,
    division: Division,
    config: ProjectorConfig,
    gate: Mutex<()>,
    snapshot: watch::Sender<Arc<MatchListSnapshot>>,
    events: broadcast::Sender<ProjectorEvent>,
}

impl<S: MatchSource> MatchListProjector<S> {
    /// Create a projector with default settings.
    pub fn new(source: S, division: Division) -> Self {
        Self::with_config(source, division, ProjectorConfig::default())
    }

    /// Create a projector using the provided [`ProjectorConfig`].
    pub fn with_config(source: S, division: Division, config: ProjectorConfig) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(MatchListSnapshot::initial()));
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            source: Arc::new(source),
            division,
            config,
            gate: Mutex::new(()),
            snapshot,
            events,
        }
    }

    pub fn division(&self) -> &Division {
        &self.division
    }

    pub fn title(&self) -> String {
        self.division.title()
    }

    pub fn config(&self) -> &ProjectorConfig {
        &self.config
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> Arc<MatchListSnapshot> {
        Arc::clone(&self.snapshot.borrow())
    }

    /// Watch for new snapshots.
    pub fn subscribe(&self) -> watch::Receiver<Arc<MatchListSnapshot>> {
        self.snapshot.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<ProjectorEvent> {
        self.events.subscribe()
    }

    pub fn loading(&self) -> bool {
        self.snapshot.borrow().loading()
    }

    /// Fetch the division's matches and ratings, then publish fresh rows.
    ///
    /// A ratings failure still publishes the fetched matches, with
    /// predictions forced off. A fetch failure keeps the last published
    /// matches and also turns predictions off.
    #[instrument(skip(self), fields(division = self.division.id))]
    pub async fn refresh(&self) -> RefreshOutcome {
        let Some(_guard) = self.acquire().await else {
            debug!("refresh already in flight, skipping");
            return RefreshOutcome::Skipped;
        };

        let source = Arc::clone(&self.source);
        let division = self.division.clone();
        let config = self.config.clone();
        let predictions_enabled = self.snapshot.borrow().predictions_enabled();
        let worker = tokio::spawn(async move {
            fetch_and_project(source.as_ref(), &division, &config, predictions_enabled).await
        });
        let fetched = worker
            .await
            .unwrap_or_else(|e| Fetched::failed(MatchesError::Worker(e)));

        let Fetched {
            matches,
            rows,
            predictions_enabled: projected_with,
            error,
        } = fetched;
        let generation = self.publish(|current| {
            let (matches, rows, enabled) = match matches {
                Some(matches) => {
                    // predictions may have been switched off while the fetch was running
                    let enabled = projected_with && current.predictions_enabled;
                    let rows = if enabled == projected_with {
                        rows
                    } else {
                        project_rows(&matches, &self.config.projection(enabled))
                    };
                    (matches, rows, enabled)
                }
                None => {
                    let matches = current.matches.clone();
                    let rows = project_rows(&matches, &self.config.projection(false));
                    (matches, rows, false)
                }
            };
            MatchListSnapshot {
                generation: current.generation,
                matches,
                rows,
                predictions_enabled: enabled,
                prediction_state: if enabled {
                    PredictionState::On
                } else {
                    PredictionState::Off
                },
                loading: false,
            }
        });

        if let Some(e) = &error {
            warn!(error = %e, generation, "match list refresh degraded");
        }
        RefreshOutcome::Published {
            generation,
            degraded: error,
        }
    }

    /// Start a refresh on its own task.
    pub fn spawn_refresh(self: &Arc<Self>) -> JoinHandle<RefreshOutcome> {
        let projector = Arc::clone(self);
        tokio::spawn(async move { projector.refresh().await })
    }

    /// Ask the source for predictions and turn the overlay on if it succeeds.
    ///
    /// Failures are absorbed: the displayed rows stay exactly as they were.
    #[instrument(skip(self), fields(division = self.division.id))]
    pub async fn predict(&self) -> PredictOutcome {
        let Some(_guard) = self.acquire().await else {
            debug!("prediction already in flight, skipping");
            return PredictOutcome::Skipped;
        };

        self.publish(|current| MatchListSnapshot {
            prediction_state: PredictionState::Calculating,
            ..current.clone()
        });

        let source = Arc::clone(&self.source);
        let division = self.division.clone();
        let config = self.config.clone();
        let worker = tokio::spawn(async move {
            let matches = source
                .predict_matches(&division)
                .await
                .map_err(|e| prediction_error(&division, e))?;
            let rows = project_rows(&matches, &config.projection(true));
            Ok::<_, MatchesError>((matches, rows))
        });
        let predicted = worker
            .await
            .map_err(|e| MatchesError::Prediction {
                division: self.division.id,
                source: Box::new(e),
            })
            .and_then(|r| r);

        match predicted {
            Ok((matches, rows)) => {
                let mut superseded = false;
                let generation = self.publish(|current| {
                    superseded = current.prediction_state != PredictionState::Calculating;
                    let (rows, enabled, state) = if superseded {
                        let rows = project_rows(&matches, &self.config.projection(false));
                        (rows, false, PredictionState::Off)
                    } else {
                        (rows, true, PredictionState::On)
                    };
                    MatchListSnapshot {
                        generation: current.generation,
                        matches,
                        rows,
                        predictions_enabled: enabled,
                        prediction_state: state,
                        loading: false,
                    }
                });
                if superseded {
                    debug!(generation, "predictions turned off while calculating");
                    PredictOutcome::Superseded { generation }
                } else {
                    debug!(generation, "predictions enabled");
                    PredictOutcome::Enabled { generation }
                }
            }
            Err(e) => {
                match &e {
                    MatchesError::PredictorUnavailable { .. } => debug!(error = %e, "no predictor"),
                    _ => warn!(error = %e, "prediction failed"),
                }
                self.publish(|current| MatchListSnapshot {
                    prediction_state: if current.predictions_enabled {
                        PredictionState::On
                    } else {
                        PredictionState::Off
                    },
                    ..current.clone()
                });
                PredictOutcome::Unavailable(e)
            }
        }
    }

    /// Hide the prediction overlay and re-derive every row from actual scores.
    ///
    /// Returns the generation of the published snapshot. The match data is untouched.
    #[instrument(skip(self), fields(division = self.division.id))]
    pub fn disable_predictions(&self) -> u64 {
        self.publish(|current| MatchListSnapshot {
            generation: current.generation,
            matches: current.matches.clone(),
            rows: project_rows(&current.matches, &self.config.projection(false)),
            predictions_enabled: false,
            prediction_state: PredictionState::Off,
            loading: current.loading,
        })
    }

    async fn acquire(&self) -> Option<MutexGuard<'_, ()>> {
        match self.config.refresh_policy {
            RefreshPolicy::Drop => self.gate.try_lock().ok(),
            RefreshPolicy::Queue => Some(self.gate.lock().await),
        }
    }

    /// Swap in the snapshot built from the current one and notify listeners.
    fn publish(&self, build: impl FnOnce(&MatchListSnapshot) -> MatchListSnapshot) -> u64 {
        let mut generation = 0;
        self.snapshot.send_modify(|current| {
            let previous: &MatchListSnapshot = current;
            let mut next = build(previous);
            next.generation = previous.generation + 1;
            generation = next.generation;

            // a send error only means nobody is listening
            if next.rows != previous.rows || next.loading != previous.loading {
                let _ = self.events.send(ProjectorEvent::RowsChanged { generation });
            }
            if next.predictions_enabled != previous.predictions_enabled
                || next.prediction_state != previous.prediction_state
            {
                let _ = self.events.send(ProjectorEvent::PredictionsChanged {
                    generation,
                    enabled: next.predictions_enabled,
                    state: next.prediction_state,
                });
            }

            debug!(
                generation,
                rows = next.rows.len(),
                predictions_enabled = next.predictions_enabled,
                prediction_state = %next.prediction_state,
                "published match list snapshot"
            );
            *current = Arc::new(next);
        });
        generation
    }
}

async fn fetch_and_project<S: MatchSource>(
    source: &S,
    division: &Division,
    config: &ProjectorConfig,
    predictions_enabled: bool,
) -> Fetched {
    let matches = match source.fetch_matches(division).await {
        Ok(matches) => matches,
        Err(e) => {
            return Fetched::failed(MatchesError::Fetch {
                division: division.id,
                source: e,
            })
        }
    };

    let (predictions_enabled, error) =
        match source.calculate_team_performance_ratings(division).await {
            Ok(()) => (predictions_enabled, None),
            Err(e) => (
                false,
                Some(MatchesError::Ratings {
                    division: division.id,
                    source: e,
                }),
            ),
        };

    let rows = project_rows(&matches, &config.projection(predictions_enabled));
    debug!(count = matches.len(), division = division.id, "fetched match list");
    Fetched {
        matches: Some(matches),
        rows,
        predictions_enabled,
        error,
    }
}

fn prediction_error(division: &Division, source: SourceError) -> MatchesError {
    match source.downcast::<MatchesError>() {
        Ok(e) => *e,
        Err(source) => MatchesError::Prediction {
            division: division.id,
            source,
        },
    }
}

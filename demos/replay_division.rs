use std::collections::HashMap;

use async_trait::async_trait;
use tracing_subscriber::EnvFilter;

use roboscout_matches::{
    Alliance, Division, Match, MatchListProjector, MatchSource, SourceError, TeamRef,
};

/// Serves a fixed schedule and predicts each unscored match from the teams' ids.
struct Replay {
    matches: Vec<Match>,
}

#[async_trait]
impl MatchSource for Replay {
    async fn fetch_matches(&self, _division: &Division) -> Result<Vec<Match>, SourceError> {
        Ok(self.matches.clone())
    }

    async fn calculate_team_performance_ratings(
        &self,
        _division: &Division,
    ) -> Result<(), SourceError> {
        Ok(())
    }

    async fn predict_matches(&self, _division: &Division) -> Result<Vec<Match>, SourceError> {
        Ok(self
            .matches
            .iter()
            .cloned()
            .map(|mut m| {
                if !m.completed() {
                    m.predicted = true;
                    m.predicted_red_score = m.red_alliance.iter().map(|t| t.id % 40).sum();
                    m.predicted_blue_score = m.blue_alliance.iter().map(|t| t.id % 40).sum();
                }
                m
            })
            .collect())
    }
}

fn schedule() -> Vec<Match> {
    let json = serde_json::json!([
        {
            "name": "Qualifier #1",
            "scheduled": "2024-04-25T09:00:00",
            "started": "2024-04-25T09:04:00",
            "red_alliance": [{"id": 11, "number": "229V"}, {"id": 12, "number": "1234A"}],
            "blue_alliance": [{"id": 13, "number": "99X"}, {"id": 14, "number": "7K"}],
            "red_score": 112,
            "blue_score": 97,
            "scored": true
        },
        {
            "name": "Qualifier #2",
            "scheduled": "2024-04-25T09:30:00",
            "started": null,
            "red_alliance": [{"id": 13, "number": "99X"}, {"id": 11, "number": "229V"}],
            "blue_alliance": [{"id": 12, "number": "1234A"}, {"id": 14, "number": "7K"}],
            "red_score": 0,
            "blue_score": 0
        },
        {
            "name": "Practice Final #1",
            "scheduled": null,
            "started": null,
            "red_alliance": [{"id": 14, "number": "7K"}, {"id": 12, "number": "1234A"}],
            "blue_alliance": [{"id": 11, "number": "229V"}, {"id": 13, "number": "99X"}],
            "red_score": 0,
            "blue_score": 0
        }
    ]);
    serde_json::from_value(json).unwrap()
}

fn team_labels(matches: &[Match]) -> HashMap<u32, String> {
    matches
        .iter()
        .flat_map(|m| m.red_alliance.iter().chain(&m.blue_alliance))
        .map(|TeamRef { id, number }| (*id, number.clone()))
        .collect()
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let matches = schedule();
    let labels = team_labels(&matches);
    let projector = MatchListProjector::new(Replay { matches }, Division::new(1, "Science"));

    projector.refresh().await;
    projector.predict().await;

    let snapshot = projector.snapshot();
    println!("{}", projector.title());
    for row in snapshot.rows() {
        let red = row.team_labels(Alliance::Red, &labels);
        let blue = row.team_labels(Alliance::Blue, &labels);
        println!(
            "{:<6} {:>8}  {:>6} {:>6} {:>4} - {:<4} {:<6} {:<6}{}",
            row.display_name,
            row.time_label,
            red[0],
            red[1],
            snapshot.score_for(row.index, Alliance::Red),
            snapshot.score_for(row.index, Alliance::Blue),
            blue[0],
            blue[1],
            if row.is_predicted { "  (predicted)" } else { "" },
        );
    }
}

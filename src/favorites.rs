use std::collections::HashMap;

use chrono::NaiveDate;
use itertools::Itertools;
use serde::Serialize;

use crate::model::EventSummary;

/// Starred team numbers, kept in display order.
///
/// Teams sort by the number embedded in their label ("229V" before
/// "1234A"); labels with the same number fall back to lexical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FavoriteTeams {
    teams: Vec<String>,
}

impl FavoriteTeams {
    pub fn new(teams: impl IntoIterator<Item = String>) -> Self {
        let mut favorites = Self {
            teams: teams.into_iter().unique().collect_vec(),
        };
        favorites.sort();
        favorites
    }

    /// Add a team. Returns false if it was already a favorite.
    pub fn insert(&mut self, team: impl Into<String>) -> bool {
        let team = team.into();
        if self.contains(&team) {
            return false;
        }
        self.teams.push(team);
        self.sort();
        true
    }

    pub fn remove(&mut self, team: &str) -> bool {
        let before = self.teams.len();
        self.teams.retain(|t| t != team);
        self.teams.len() != before
    }

    pub fn contains(&self, team: &str) -> bool {
        self.teams.iter().any(|t| t == team)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.teams
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    fn sort(&mut self) {
        self.teams.sort();
        self.teams.sort_by_key(|team| team_number_value(team));
    }
}

/// Digits of a team label read as one number; 0 when there are none.
fn team_number_value(team: &str) -> u64 {
    team.chars()
        .filter(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .unwrap_or_default()
}

/// Starred event SKUs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FavoriteEvents {
    skus: Vec<String>,
}

impl FavoriteEvents {
    pub fn new(skus: impl IntoIterator<Item = String>) -> Self {
        let mut skus = skus.into_iter().unique().collect_vec();
        skus.sort();
        Self { skus }
    }

    pub fn is_favorited(&self, sku: &str) -> bool {
        self.skus.iter().any(|s| s == sku)
    }

    pub fn insert(&mut self, sku: impl Into<String>) -> bool {
        let sku = sku.into();
        if self.is_favorited(&sku) {
            return false;
        }
        self.skus.push(sku);
        true
    }

    pub fn remove(&mut self, sku: &str) -> bool {
        let before = self.skus.len();
        self.skus.retain(|s| s != sku);
        self.skus.len() != before
    }

    pub fn as_slice(&self) -> &[String] {
        &self.skus
    }

    /// Order most recent first. Events missing from `events`, or without a
    /// start date, are treated as starting `today`.
    pub fn sort_by_start(&mut self, events: &HashMap<String, EventSummary>, today: NaiveDate) {
        self.skus.sort_by_key(|sku| {
            std::cmp::Reverse(
                events
                    .get(sku)
                    .and_then(|event| event.start)
                    .unwrap_or(today),
            )
        });
    }
}

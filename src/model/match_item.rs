use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One side of a match.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Alliance {
    Red,
    Blue,
}

/// A team as referenced from an alliance slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: u32,
    pub number: String,
}

impl TeamRef {
    pub fn new(id: u32, number: impl Into<String>) -> Self {
        Self {
            id,
            number: number.into(),
        }
    }
}

/// A single match in a division's schedule, as returned by the data service.
///
/// Identity is the match's position in the list it was fetched with; the
/// service does not guarantee that positions survive a refetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Free-text round label, e.g. "Qualifier #12".
    pub name: String,
    pub scheduled: Option<NaiveDateTime>,
    pub started: Option<NaiveDateTime>,
    pub red_alliance: [TeamRef; 2],
    pub blue_alliance: [TeamRef; 2],
    pub red_score: u32,
    pub blue_score: u32,
    /// Set by the service once the actual scores are final.
    #[serde(default)]
    pub scored: bool,
    #[serde(default)]
    pub predicted: bool,
    #[serde(default)]
    pub predicted_red_score: u32,
    #[serde(default)]
    pub predicted_blue_score: u32,
}

impl Match {
    pub fn completed(&self) -> bool {
        self.scored
    }

    pub fn alliance(&self, side: Alliance) -> &[TeamRef; 2] {
        match side {
            Alliance::Red => &self.red_alliance,
            Alliance::Blue => &self.blue_alliance,
        }
    }

    pub fn score(&self, side: Alliance) -> u32 {
        match side {
            Alliance::Red => self.red_score,
            Alliance::Blue => self.blue_score,
        }
    }

    /// Predicted score for `side`. Only meaningful when `predicted` is set.
    pub fn predicted_score(&self, side: Alliance) -> u32 {
        match side {
            Alliance::Red => self.predicted_red_score,
            Alliance::Blue => self.predicted_blue_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alliance_parses_lowercase() {
        assert_eq!("red".parse::<Alliance>().unwrap(), Alliance::Red);
        assert_eq!(Alliance::Blue.to_string(), "blue");
        assert!("green".parse::<Alliance>().is_err());
    }

    #[test]
    fn test_match_deserializes_without_prediction_fields() {
        let json = serde_json::json!({
            "name": "Qualifier #4",
            "scheduled": "2024-04-25T09:30:00",
            "started": null,
            "red_alliance": [{"id": 1, "number": "229V"}, {"id": 2, "number": "1234A"}],
            "blue_alliance": [{"id": 3, "number": "99X"}, {"id": 4, "number": "7K"}],
            "red_score": 0,
            "blue_score": 0
        });
        let m: Match = serde_json::from_value(json).unwrap();

        assert!(!m.completed());
        assert!(!m.predicted);
        assert_eq!(m.alliance(Alliance::Blue)[0].number, "99X");
        assert_eq!(m.predicted_score(Alliance::Red), 0);
    }
}

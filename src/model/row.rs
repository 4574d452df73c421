use std::collections::HashMap;

use serde::Serialize;

use super::Alliance;

/// A renderable row derived from one [`Match`](super::Match).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRow {
    /// Position of the source match in the list it was projected from.
    pub index: usize,
    pub display_name: String,
    pub time_label: String,
    /// Slot order is significant: slot 0 is always the top display line.
    pub red_team_ids: [u32; 2],
    pub blue_team_ids: [u32; 2],
    pub is_predicted: bool,
    /// `None` means nothing should be shown for the score.
    pub red_score_display: Option<u32>,
    pub blue_score_display: Option<u32>,
}

impl MatchRow {
    pub fn team_ids(&self, side: Alliance) -> [u32; 2] {
        match side {
            Alliance::Red => self.red_team_ids,
            Alliance::Blue => self.blue_team_ids,
        }
    }

    pub fn score_display(&self, side: Alliance) -> Option<u32> {
        match side {
            Alliance::Red => self.red_score_display,
            Alliance::Blue => self.blue_score_display,
        }
    }

    /// Resolve the alliance's team ids to display labels. Unknown ids render blank.
    pub fn team_labels(&self, side: Alliance, labels: &HashMap<u32, String>) -> [String; 2] {
        self.team_ids(side)
            .map(|id| labels.get(&id).cloned().unwrap_or_default())
    }
}

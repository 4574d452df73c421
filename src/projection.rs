use std::fmt::Write;

use chrono::NaiveDateTime;
use itertools::Itertools;

use crate::config::{DEFAULT_TIME_FORMAT, DEFAULT_TIME_PLACEHOLDER};
use crate::model::{Alliance, Match, MatchRow};

/// Round-type long forms and their short labels, applied left to right.
const ROUND_ABBREVIATIONS: [(&str, &str); 3] =
    [("Qualifier", "Q"), ("Practice", "P"), ("Final", "F")];

/// Inputs to a projection that do not come from the match itself.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionContext<'a> {
    pub predictions_enabled: bool,
    pub time_format: &'a str,
    pub time_placeholder: &'a str,
}

impl Default for ProjectionContext<'_> {
    fn default() -> Self {
        Self {
            predictions_enabled: false,
            time_format: DEFAULT_TIME_FORMAT,
            time_placeholder: DEFAULT_TIME_PLACEHOLDER,
        }
    }
}

/// Shorten a round label: "Qualifier #3" becomes "Q3".
///
/// Whitespace and `#` are dropped first so that multi-word labels collapse
/// into a compact tag ("Practice Final #1" becomes "PF1"). Substitutions
/// repeat until none applies, so the result contains no long form.
pub fn abbreviate_round_name(name: &str) -> String {
    let mut name = name.split_whitespace().join("").replace('#', "");
    loop {
        let next = ROUND_ABBREVIATIONS
            .iter()
            .fold(name.clone(), |name, &(long, short)| name.replace(long, short));
        if next == name {
            return name;
        }
        name = next;
    }
}

/// Format the start time, falling back to the scheduled time, then to `placeholder`.
pub fn time_label(m: &Match, format: &str, placeholder: &str) -> String {
    m.started
        .or(m.scheduled)
        .and_then(|at| format_time(at, format))
        .unwrap_or_else(|| placeholder.to_string())
}

fn format_time(at: NaiveDateTime, format: &str) -> Option<String> {
    let mut label = String::new();
    // chrono reports bad format specifiers as a fmt error
    write!(label, "{}", at.format(format)).ok()?;
    Some(label)
}

pub fn is_predicted(m: &Match, predictions_enabled: bool) -> bool {
    m.predicted && predictions_enabled
}

/// The score to show for one side, or `None` if the match has nothing to show yet.
///
/// Predictions win over actual scores while the overlay is enabled; actual
/// scores are shown once the match is completed, including zeroes.
pub fn score_display(m: &Match, predictions_enabled: bool, side: Alliance) -> Option<u32> {
    let predicted = is_predicted(m, predictions_enabled);
    if predicted {
        Some(m.predicted_score(side))
    } else if m.completed() {
        Some(m.score(side))
    } else {
        None
    }
}

pub fn project_row(index: usize, m: &Match, ctx: &ProjectionContext<'_>) -> MatchRow {
    MatchRow {
        index,
        display_name: abbreviate_round_name(&m.name),
        time_label: time_label(m, ctx.time_format, ctx.time_placeholder),
        red_team_ids: m.red_alliance.each_ref().map(|team| team.id),
        blue_team_ids: m.blue_alliance.each_ref().map(|team| team.id),
        is_predicted: is_predicted(m, ctx.predictions_enabled),
        red_score_display: score_display(m, ctx.predictions_enabled, Alliance::Red),
        blue_score_display: score_display(m, ctx.predictions_enabled, Alliance::Blue),
    }
}

/// Project every match into a row, preserving fetch order.
pub fn project_rows(matches: &[Match], ctx: &ProjectionContext<'_>) -> Vec<MatchRow> {
    matches
        .iter()
        .enumerate()
        .map(|(index, m)| project_row(index, m, ctx))
        .collect_vec()
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::TeamRef;

    pub(crate) fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, 25)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .unwrap()
    }

    pub(crate) fn sample_match(name: &str) -> Match {
        Match {
            name: name.to_string(),
            scheduled: None,
            started: None,
            red_alliance: [TeamRef::new(1, "229V"), TeamRef::new(2, "1234A")],
            blue_alliance: [TeamRef::new(3, "99X"), TeamRef::new(4, "7K")],
            red_score: 0,
            blue_score: 0,
            scored: false,
            predicted: false,
            predicted_red_score: 0,
            predicted_blue_score: 0,
        }
    }

    pub(crate) fn completed(name: &str, red: u32, blue: u32) -> Match {
        Match {
            red_score: red,
            blue_score: blue,
            scored: true,
            ..sample_match(name)
        }
    }

    pub(crate) fn predicted(name: &str, red: u32, blue: u32) -> Match {
        Match {
            predicted: true,
            predicted_red_score: red,
            predicted_blue_score: blue,
            ..sample_match(name)
        }
    }

    fn ctx(predictions_enabled: bool) -> ProjectionContext<'static> {
        ProjectionContext {
            predictions_enabled,
            ..ProjectionContext::default()
        }
    }

    #[test]
    fn test_abbreviate_round_name() {
        assert_eq!(abbreviate_round_name("Qualifier #3"), "Q3");
        assert_eq!(abbreviate_round_name("Practice Final #1"), "PF1");
        assert_eq!(abbreviate_round_name("Final #2-1"), "F2-1");
        assert_eq!(abbreviate_round_name("Quarterfinal #1-1"), "Quarterfinal1-1");
        assert_eq!(abbreviate_round_name("Fi nal #1"), "F1");
        assert_eq!(abbreviate_round_name("Fi#nal"), "F");
        assert_eq!(abbreviate_round_name("Practiceractice"), "P");
    }

    #[test]
    fn test_abbreviate_round_name_is_idempotent() {
        for name in [
            "Qualifier #3",
            "Practice Final #1",
            "Round of 16 #4-1",
            "Q12",
            "",
            "Fi nal #1",
            "Fi#nal",
            "Practiceractice",
        ] {
            let once = abbreviate_round_name(name);
            assert_eq!(abbreviate_round_name(&once), once, "{name}");
        }
    }

    #[test]
    fn test_time_label_prefers_started() {
        let m = Match {
            started: Some(at(14, 5)),
            scheduled: Some(at(13, 0)),
            ..sample_match("Q1")
        };
        assert_eq!(time_label(&m, DEFAULT_TIME_FORMAT, " "), "2:05 PM");
    }

    #[test]
    fn test_time_label_falls_back_to_scheduled_then_blank() {
        let scheduled = Match {
            scheduled: Some(at(9, 30)),
            ..sample_match("Q1")
        };
        assert_eq!(time_label(&scheduled, DEFAULT_TIME_FORMAT, " "), "9:30 AM");
        assert_eq!(time_label(&sample_match("Q1"), DEFAULT_TIME_FORMAT, " "), " ");
    }

    #[test]
    fn test_time_label_with_invalid_format_uses_placeholder() {
        let m = Match {
            scheduled: Some(at(9, 30)),
            ..sample_match("Q1")
        };
        assert_eq!(time_label(&m, "%Q", "-"), "-");
    }

    #[test]
    fn test_unplayed_unpredicted_match_has_no_scores() {
        let row = project_row(0, &sample_match("Q1"), &ctx(true));
        assert_eq!(row.red_score_display, None);
        assert_eq!(row.blue_score_display, None);
        assert!(!row.is_predicted);
    }

    #[test]
    fn test_predictions_override_completed_scores_when_enabled() {
        let m = Match {
            predicted: true,
            predicted_red_score: 40,
            predicted_blue_score: 35,
            ..completed("Q1", 10, 20)
        };

        let on = project_row(0, &m, &ctx(true));
        assert!(on.is_predicted);
        assert_eq!((on.red_score_display, on.blue_score_display), (Some(40), Some(35)));

        let off = project_row(0, &m, &ctx(false));
        assert!(!off.is_predicted);
        assert_eq!((off.red_score_display, off.blue_score_display), (Some(10), Some(20)));
    }

    #[test]
    fn test_flag_never_fabricates_predictions() {
        let row = project_row(0, &completed("Q1", 0, 0), &ctx(true));
        assert!(!row.is_predicted);
        assert_eq!(row.red_score_display, Some(0));
        assert_eq!(row.blue_score_display, Some(0));
    }

    #[test]
    fn test_project_rows_end_to_end() {
        let matches = vec![
            completed("Qualifier #1", 10, 20),
            Match {
                scheduled: Some(at(9, 30)),
                ..sample_match("Qualifier #2")
            },
            predicted("Qualifier #3", 5, 6),
        ];
        let rows = project_rows(&matches, &ctx(true));

        assert_eq!(rows.len(), 3);
        assert_eq!(rows.iter().map(|r| r.index).collect_vec(), [0, 1, 2]);

        assert_eq!(rows[0].display_name, "Q1");
        assert_eq!((rows[0].red_score_display, rows[0].blue_score_display), (Some(10), Some(20)));
        assert!(!rows[0].is_predicted);

        assert_eq!(rows[1].time_label, "9:30 AM");
        assert_eq!((rows[1].red_score_display, rows[1].blue_score_display), (None, None));
        assert!(!rows[1].is_predicted);

        assert_eq!((rows[2].red_score_display, rows[2].blue_score_display), (Some(5), Some(6)));
        assert!(rows[2].is_predicted);
        assert_eq!(rows[2].red_team_ids, [1, 2]);
        assert_eq!(rows[2].blue_team_ids, [3, 4]);
    }

    #[test]
    fn test_toggle_round_trip_restores_rows() {
        let matches = vec![completed("Q1", 3, 4), predicted("Q2", 7, 8)];
        let before = project_rows(&matches, &ctx(false));
        let during = project_rows(&matches, &ctx(true));
        let after = project_rows(&matches, &ctx(false));

        assert_ne!(before, during);
        assert_eq!(before, after);
    }
}

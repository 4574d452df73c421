use serde::{Deserialize, Serialize};

use crate::projection::ProjectionContext;

/// chrono pattern for a 12-hour clock with minute precision, e.g. "2:45 PM".
pub const DEFAULT_TIME_FORMAT: &str = "%-I:%M %p";

/// Label used when a match has neither a start nor a scheduled time.
pub const DEFAULT_TIME_PLACEHOLDER: &str = " ";

/// What to do with a refresh or predict request issued while another one is
/// still in flight.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RefreshPolicy {
    /// Ignore the new request.
    #[default]
    Drop,
    /// Wait for the in-flight request; requests publish in issuance order.
    Queue,
}

/// Settings for a [`MatchListProjector`](crate::MatchListProjector).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectorConfig {
    pub time_format: String,
    pub time_placeholder: String,
    pub refresh_policy: RefreshPolicy,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            time_placeholder: DEFAULT_TIME_PLACEHOLDER.to_string(),
            refresh_policy: RefreshPolicy::default(),
        }
    }
}

impl ProjectorConfig {
    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    pub fn with_time_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.time_placeholder = placeholder.into();
        self
    }

    pub fn with_refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.refresh_policy = policy;
        self
    }

    pub(crate) fn projection(&self, predictions_enabled: bool) -> ProjectionContext<'_> {
        ProjectionContext {
            predictions_enabled,
            time_format: &self.time_format,
            time_placeholder: &self.time_placeholder,
        }
    }
}

use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Summary of a competition event, as shown in a favorites listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    pub start: Option<NaiveDate>,
}

impl EventSummary {
    /// "City, Region, Country" with blank parts dropped.
    pub fn location(&self) -> String {
        [&self.city, &self.region, &self.country]
            .into_iter()
            .filter(|part| !part.is_empty())
            .join(", ")
            .replace("United States", "USA")
    }
}

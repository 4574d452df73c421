use serde::{Deserialize, Serialize};

/// A bracket or sub-tournament grouping of matches within an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Division {
    pub id: u32,
    pub name: String,
}

impl Division {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Screen title for this division's match list.
    pub fn title(&self) -> String {
        format!("{} Match List", self.name)
    }
}

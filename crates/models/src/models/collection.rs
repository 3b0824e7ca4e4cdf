use serde::{Deserialize, Serialize};

use super::Visibility;

/// A curated grouping of works.
///
/// Collections carry no workflow state; read access is gated on visibility
/// alone.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Collection {
    pub id: String,
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub visibility: Visibility,
}

impl Collection {
    pub fn first_title(&self) -> &str {
        self.title.first().map(String::as_str).unwrap_or_default()
    }
}

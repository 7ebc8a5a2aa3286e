// file: src/models/version.rs
// description: section version change log entries
// reference: static version history keyed by section id

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Addition,
    Modification,
    Deletion,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Addition => "addition",
            ChangeType::Modification => "modification",
            ChangeType::Deletion => "deletion",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionChange {
    pub id: String,
    pub section_id: String,
    pub timestamp: DateTime<Utc>,
    pub author: String,
    #[serde(default)]
    pub previous_content: String,
    #[serde(default)]
    pub new_content: String,
    #[serde(rename = "type")]
    pub change_type: ChangeType,
}

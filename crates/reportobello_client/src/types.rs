use serde::{Deserialize, Serialize};

/// One stored version of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub template: String,
    pub version: u32,
}

/// A past report build as listed by the API. Timestamps are ISO 8601 strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub filename: Option<String>,
    pub requested_version: i64,
    pub actual_version: i64,
    pub template_name: String,
    pub started_at: String,
    pub finished_at: String,
    pub expires_at: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub data: String,
    #[serde(default = "default_data_type")]
    pub data_type: String,
    #[serde(default)]
    pub hash: String,
}

impl Report {
    pub fn was_successful(&self) -> bool {
        self.error_message.is_none()
    }
}

fn default_data_type() -> String {
    "json".to_string()
}

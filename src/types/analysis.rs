use serde::{Deserialize, Serialize};

/// Best-effort metadata extracted from a URL by the analysis endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub suggested_category: Option<SuggestedCategory>,
}

/// A category suggestion, either an id or a category name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SuggestedCategory {
    Id(i64),
    Name(String),
}

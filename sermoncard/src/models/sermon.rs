use serde::{Deserialize, Serialize};

/// Structured result of one generation call.
///
/// Every field is required on the wire: a response missing either object or
/// any of their fields does not deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SermonOutput {
    pub summary_card: SummaryCardData,
    pub infographic: InfographicData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCardData {
    pub date: String,
    pub subject: String,
    pub core_message: Vec<String>,
    pub scripture: String,
    pub action_points: Vec<String>,
    pub hashtags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfographicData {
    pub title: String,
    pub subtitle: String,
    pub scripture: String,
}

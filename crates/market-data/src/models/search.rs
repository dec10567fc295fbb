use serde::{Deserialize, Serialize};

/// One candidate from a fund search, used to originate new holdings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundSearchResult {
    /// Instrument code (e.g. "110022").
    pub code: String,
    /// Fund display name.
    pub name: String,
    /// Fund category as reported by the upstream (e.g. "混合型-偏股").
    pub category: Option<String>,
}

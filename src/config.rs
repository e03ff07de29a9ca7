//! Extractor configuration

use serde::{Deserialize, Serialize};

/// Header Exchange adds to journal report envelopes
pub const DEFAULT_JOURNAL_HEADER: &str = "X-MS-Journal-Report";

/// Settings shared by every call on an [`Extractor`](crate::Extractor)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Header whose presence marks a journal report, matched case-insensitively
    pub journal_header: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            journal_header: DEFAULT_JOURNAL_HEADER.to_string(),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single brand with its resolved display name and absolute logo URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandRecord {
    pub name: String,
    pub logo: String,
    /// Filename-derived hash of the logo, kept for debugging name resolution.
    #[serde(rename = "hash", default, skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    Success,
    Fallback,
    Error,
}

impl std::fmt::Display for ExtractionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionStatus::Success => write!(f, "success"),
            ExtractionStatus::Fallback => write!(f, "fallback"),
            ExtractionStatus::Error => write!(f, "error"),
        }
    }
}

/// Outcome of one extraction pass over a page.
///
/// Built once by the extractor and never mutated afterwards; the caller
/// decides how to persist it and whether an `Error` status fails the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    records: Vec<BrandRecord>,
    status: ExtractionStatus,
    error: Option<String>,
}

impl ExtractionResult {
    #[must_use]
    pub fn success(records: Vec<BrandRecord>) -> Self {
        Self {
            records,
            status: ExtractionStatus::Success,
            error: None,
        }
    }

    #[must_use]
    pub fn fallback(records: Vec<BrandRecord>) -> Self {
        Self {
            records,
            status: ExtractionStatus::Fallback,
            error: None,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            records: Vec::new(),
            status: ExtractionStatus::Error,
            error: Some(message.into()),
        }
    }

    #[must_use]
    pub fn records(&self) -> &[BrandRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<BrandRecord> {
        self.records
    }

    #[must_use]
    pub fn status(&self) -> ExtractionStatus {
        self.status
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == ExtractionStatus::Error
    }
}

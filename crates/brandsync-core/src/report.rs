//! On-disk report shapes consumed by the static site.
//!
//! Both modes share the same summary fields; capture mode appends the
//! captured markup and stylesheet alongside them.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::records::{BrandRecord, ExtractionResult, ExtractionStatus};

pub const FALLBACK_MESSAGE: &str = "fallback data used - check selectors";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordReport {
    pub last_updated: DateTime<Utc>,
    pub source_url: String,
    pub total_brands: usize,
    pub status: ExtractionStatus,
    pub brands: Vec<BrandRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecordReport {
    /// Builds the report for a finished extraction.
    ///
    /// `mapping_info` is only attached to successful runs; fallback runs get
    /// the fixed "check selectors" message instead.
    #[must_use]
    pub fn from_result(
        result: ExtractionResult,
        source_url: &str,
        last_updated: DateTime<Utc>,
        mapping_info: Option<String>,
    ) -> Self {
        let status = result.status();
        let error = result.error_message().map(str::to_owned);
        let brands = result.into_records();
        let (message, mapping_info) = match status {
            ExtractionStatus::Success => (None, mapping_info),
            ExtractionStatus::Fallback => (Some(FALLBACK_MESSAGE.to_string()), None),
            ExtractionStatus::Error => (None, None),
        };
        Self {
            last_updated,
            source_url: source_url.to_string(),
            total_brands: brands.len(),
            status,
            brands,
            message,
            mapping_info,
            error,
        }
    }

    /// Error-shaped report written when a run fails before or during extraction.
    #[must_use]
    pub fn error(source_url: &str, last_updated: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            last_updated,
            source_url: source_url.to_string(),
            total_brands: 0,
            status: ExtractionStatus::Error,
            brands: Vec::new(),
            message: None,
            mapping_info: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureReport {
    #[serde(flatten)]
    pub summary: RecordReport,
    pub complete_html: String,
    pub raw_html: String,
    pub raw_css: String,
    pub image_count: usize,
    pub used_classes: Vec<String>,
}

impl CaptureReport {
    /// Summary block for a successful capture. Capture mode produces no
    /// structured records, so `total_brands` carries the captured image count.
    #[must_use]
    pub fn success_summary(
        source_url: &str,
        last_updated: DateTime<Utc>,
        image_count: usize,
    ) -> RecordReport {
        RecordReport {
            last_updated,
            source_url: source_url.to_string(),
            total_brands: image_count,
            status: ExtractionStatus::Success,
            brands: Vec::new(),
            message: None,
            mapping_info: None,
            error: None,
        }
    }

    #[must_use]
    pub fn error(source_url: &str, last_updated: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            summary: RecordReport::error(source_url, last_updated, message),
            complete_html: String::new(),
            raw_html: String::new(),
            raw_css: String::new(),
            image_count: 0,
            used_classes: Vec::new(),
        }
    }
}

/// Serializes `report` as pretty JSON and writes it to `path`.
///
/// # Errors
///
/// Returns an I/O error if serialization fails or the file cannot be written.
pub fn write_report<T: Serialize>(path: &Path, report: &T) -> std::io::Result<()> {
    let mut bytes = serde_json::to_vec_pretty(report)?;
    bytes.push(b'\n');
    write_atomic(path, &bytes)
}

/// Writes `contents` to a sibling temp file, then renames it over `path` so
/// readers never observe a half-written file.
///
/// # Errors
///
/// Returns an I/O error if the temp file cannot be written or renamed.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = temp_path(path);
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

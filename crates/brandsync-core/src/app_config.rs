use std::path::PathBuf;

use crate::policy::{DedupPolicy, EmptyPolicy, SortOrder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Page the brands are scraped from.
    pub source_url: String,
    /// Scheme+host prefixed onto root-relative logo URLs.
    pub origin: String,
    pub output_path: PathBuf,
    /// Standalone HTML written next to the JSON in capture mode.
    pub html_output_path: PathBuf,
    /// `None` selects the built-in name map.
    pub name_map_path: Option<PathBuf>,
    pub navigation_timeout_secs: u64,
    pub user_agent: String,
    pub dedup_policy: DedupPolicy,
    pub sort_order: SortOrder,
    pub empty_policy: EmptyPolicy,
    /// Labels that appear on the page next to logos but are not brands.
    pub deny_names: Vec<String>,
    pub fetch_stylesheets: bool,
    pub log_level: String,
}

pub mod app_config;
pub mod config;
pub mod name_map;
pub mod policy;
pub mod records;
pub mod report;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use name_map::{load_name_map, NameMap, NameMapEntry};
pub use policy::{DedupPolicy, EmptyPolicy, SortOrder};
pub use records::{BrandRecord, ExtractionResult, ExtractionStatus};
pub use report::{write_atomic, write_report, CaptureReport, RecordReport};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read name map file {path}: {source}")]
    NameMapIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse name map file: {0}")]
    NameMapParse(#[from] serde_yaml::Error),

    #[error("name map validation failed: {0}")]
    Validation(String),
}

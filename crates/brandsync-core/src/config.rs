use std::path::PathBuf;
use std::str::FromStr;

use url::Url;

use crate::app_config::AppConfig;
use crate::policy::{DedupPolicy, EmptyPolicy, SortOrder};
use crate::ConfigError;

pub const DEFAULT_SOURCE_URL: &str = "https://www.essilorluxottica.com/en/brands/eyewear/";

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const DEFAULT_DENY_NAMES: &str = "Eyecare s,EssilorLuxottica,Eyewear,Direct to consumer";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        parse_bool_flag(&or_default(var, default)).ok_or_else(|| {
            invalid(var, "expected one of: true, false, 1, 0, yes, no".to_string())
        })
    };

    let source_url = or_default("BRANDSYNC_SOURCE_URL", DEFAULT_SOURCE_URL);
    let Some(source_origin) = origin_of(&source_url) else {
        return Err(invalid(
            "BRANDSYNC_SOURCE_URL",
            format!("'{source_url}' is not an http(s) URL"),
        ));
    };

    let origin = match lookup("BRANDSYNC_ORIGIN") {
        Ok(raw) => origin_of(&raw).ok_or_else(|| {
            invalid("BRANDSYNC_ORIGIN", format!("'{raw}' is not an http(s) URL"))
        })?,
        Err(_) => source_origin,
    };

    let output_path = PathBuf::from(or_default("BRANDSYNC_OUTPUT_PATH", "brands.json"));
    let html_output_path =
        PathBuf::from(or_default("BRANDSYNC_HTML_OUTPUT_PATH", "brands.html"));
    let name_map_path = lookup("BRANDSYNC_NAME_MAP_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let navigation_timeout_secs = parse_u64("BRANDSYNC_NAVIGATION_TIMEOUT_SECS", "60")?;
    if navigation_timeout_secs == 0 {
        return Err(invalid(
            "BRANDSYNC_NAVIGATION_TIMEOUT_SECS",
            "timeout must be greater than zero".to_string(),
        ));
    }

    let user_agent = or_default("BRANDSYNC_USER_AGENT", DEFAULT_USER_AGENT);

    let dedup_policy: DedupPolicy = parse_policy(
        &or_default("BRANDSYNC_DEDUP_POLICY", "name"),
        "BRANDSYNC_DEDUP_POLICY",
    )?;
    let sort_order: SortOrder = parse_policy(
        &or_default("BRANDSYNC_SORT_ORDER", "alphabetical"),
        "BRANDSYNC_SORT_ORDER",
    )?;
    let empty_policy: EmptyPolicy = parse_policy(
        &or_default("BRANDSYNC_EMPTY_POLICY", "fallback"),
        "BRANDSYNC_EMPTY_POLICY",
    )?;

    let deny_names = parse_list(&or_default("BRANDSYNC_DENY_NAMES", DEFAULT_DENY_NAMES));
    let fetch_stylesheets = parse_bool("BRANDSYNC_FETCH_STYLESHEETS", "true")?;
    let log_level = or_default("BRANDSYNC_LOG_LEVEL", "info");

    Ok(AppConfig {
        source_url,
        origin,
        output_path,
        html_output_path,
        name_map_path,
        navigation_timeout_secs,
        user_agent,
        dedup_policy,
        sort_order,
        empty_policy,
        deny_names,
        fetch_stylesheets,
        log_level,
    })
}

fn parse_policy<T: FromStr<Err = String>>(raw: &str, var: &str) -> Result<T, ConfigError> {
    raw.parse::<T>().map_err(|reason| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    })
}

/// Scheme, host and port of an http(s) URL: `https://a.com/x/y?q=1` becomes
/// `https://a.com`. Returns `None` for anything that is not an absolute
/// http(s) URL with a host.
#[must_use]
pub fn origin_of(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }
    Some(url.origin().ascii_serialization())
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

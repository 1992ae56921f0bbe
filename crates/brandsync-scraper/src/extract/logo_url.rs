//! Logo URL normalization and rejection rules.

use reqwest::Url;

/// URL fragments that mark layout filler rather than a brand logo.
const REJECTED_URL_MARKERS: &[&str] = &["placeholder", "default", "spacer"];

/// Makes a raw `src` value absolute.
///
/// Root-relative paths are prefixed with `origin`; protocol-relative paths
/// inherit the origin's scheme; other relative paths are resolved against
/// `base` (the page URL). Values that already carry a scheme pass through
/// unchanged. Returns `None` for blank or unresolvable values.
#[must_use]
pub fn absolutize_logo(raw: &str, origin: &str, base: Option<&Url>) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(rest) = raw.strip_prefix("//") {
        let scheme = origin.split_once("://").map_or("https", |(s, _)| s);
        return Some(format!("{scheme}://{rest}"));
    }

    if raw.starts_with('/') {
        return Some(format!("{}{raw}", origin.trim_end_matches('/')));
    }

    if Url::parse(raw).is_ok() {
        return Some(raw.to_string());
    }

    let fallback_base;
    let base = if let Some(base) = base {
        base
    } else {
        fallback_base = Url::parse(&format!("{}/", origin.trim_end_matches('/'))).ok()?;
        &fallback_base
    };
    base.join(raw).ok().map(|u| u.to_string())
}

/// Returns the first rejected marker contained in `logo`, if any.
#[must_use]
pub fn rejected_marker(logo: &str) -> Option<&'static str> {
    let lower = logo.to_ascii_lowercase();
    REJECTED_URL_MARKERS
        .iter()
        .copied()
        .find(|marker| lower.contains(marker))
}

#[must_use]
pub fn is_rejected_logo(logo: &str) -> bool {
    rejected_marker(logo).is_some()
}

/// Last path segment of `logo`, ignoring query string and fragment.
#[must_use]
pub fn filename_of(logo: &str) -> &str {
    let path = logo.split(['?', '#']).next().unwrap_or_default();
    path.rsplit('/').next().unwrap_or_default()
}

/// Filename up to its first `.`; this is the key into the name map.
#[must_use]
pub fn derive_hash(logo: &str) -> &str {
    filename_of(logo).split('.').next().unwrap_or_default()
}

//! Brand record extraction from a rendered brands page.
//!
//! Images are collected by an ordered list of [`ImageRule`]s. An image is
//! processed only by the first rule that matches it, keyed by its resolved
//! URL, so redundant rules never produce duplicate candidates. Each
//! candidate then gets a name (see [`name`]), is filtered, deduplicated,
//! and optionally sorted.

pub mod logo_url;
pub mod name;

use std::collections::HashSet;

use brandsync_core::{
    AppConfig, BrandRecord, DedupPolicy, EmptyPolicy, ExtractionResult, NameMap, SortOrder,
};
use chrono::{DateTime, Utc};
use reqwest::Url;

use crate::dom::DocumentModel;
use logo_url::{absolutize_logo, derive_hash, rejected_marker};
use name::{resolve_name, NameSource, MIN_NAME_CHARS};

/// One selector in the candidate-collection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRule {
    pub label: &'static str,
    pub selector: &'static str,
}

const fn rule(label: &'static str, selector: &'static str) -> ImageRule {
    ImageRule { label, selector }
}

/// Candidate-collection policy, highest priority first.
pub const IMAGE_RULES: &[ImageRule] = &[
    rule("alt-brand", r#"img[alt*="brand"]"#),
    rule("alt-Brand", r#"img[alt*="Brand"]"#),
    rule("src-brand", r#"img[src*="brand"]"#),
    rule("src-logo", r#"img[src*="logo"]"#),
    rule("class-brand", r#"[class*="brand"] img"#),
    rule("class-Brand", r#"[class*="Brand"] img"#),
    rule("class-logo", r#"[class*="logo"] img"#),
    rule("class-grid", r#"[class*="grid"] img"#),
    rule("class-Grid", r#"[class*="Grid"] img"#),
    rule("grid-item", ".grid-item img"),
    rule("figure", "figure img"),
    rule("brand", ".brand img"),
    rule("logo", ".logo img"),
    rule("data-brand", "[data-brand] img"),
];

/// Attributes holding the image URL; lazy-loaded images keep it in `data-*`.
const SRC_ATTRIBUTES: &[&str] = &["src", "data-src", "data-lazy-src"];

/// Labels next to logos on the eyewear page that are section headings, not brands.
pub const DEFAULT_DENY_NAMES: &[&str] = &[
    "Eyecare s",
    "EssilorLuxottica",
    "Eyewear",
    "Direct to consumer",
];

const FALLBACK_BRANDS: &[(&str, &str)] = &[
    ("Ray-Ban", "000000"),
    ("Oakley", "ff6600"),
    ("Persol", "8B4513"),
];

pub const FALLBACK_HASH: &str = "fallback";

pub const NO_BRANDS_MESSAGE: &str =
    "no brands found on page; the page structure has likely changed";

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Scheme+host prefixed onto root-relative logo URLs.
    pub origin: String,
    /// Page URL used to resolve document-relative logo URLs.
    pub page_url: Option<String>,
    pub dedup: DedupPolicy,
    pub sort: SortOrder,
    pub empty_policy: EmptyPolicy,
    pub deny_names: Vec<String>,
    pub scraped_at: DateTime<Utc>,
}

impl ExtractOptions {
    #[must_use]
    pub fn new(origin: impl Into<String>, scraped_at: DateTime<Utc>) -> Self {
        Self {
            origin: origin.into(),
            page_url: None,
            dedup: DedupPolicy::default(),
            sort: SortOrder::default(),
            empty_policy: EmptyPolicy::default(),
            deny_names: DEFAULT_DENY_NAMES.iter().map(|s| (*s).to_string()).collect(),
            scraped_at,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig, page_url: &str, scraped_at: DateTime<Utc>) -> Self {
        Self {
            origin: config.origin.clone(),
            page_url: Some(page_url.to_string()),
            dedup: config.dedup_policy,
            sort: config.sort_order,
            empty_policy: config.empty_policy,
            deny_names: config.deny_names.clone(),
            scraped_at,
        }
    }
}

/// An image matched by a rule, before name resolution.
#[derive(Debug, Clone)]
pub struct CandidateImage<N> {
    pub node: N,
    /// Absolute logo URL.
    pub logo: String,
    pub rule: &'static str,
}

/// Runs `rules` in order and returns each distinct image once, attributed to
/// the first rule that matched it.
///
/// Images without a usable URL are skipped. Selectors that fail to parse are
/// logged and skipped.
pub fn collect_candidates<D: DocumentModel>(
    doc: &D,
    rules: &[ImageRule],
    origin: &str,
    base: Option<&Url>,
) -> Vec<CandidateImage<D::Node>> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();

    for rule in rules {
        let nodes = match doc.select(rule.selector) {
            Ok(nodes) => nodes,
            Err(e) => {
                tracing::warn!(rule = rule.label, error = %e, "skipping image rule");
                continue;
            }
        };
        if nodes.is_empty() {
            tracing::debug!(rule = rule.label, "image rule matched nothing");
            continue;
        }

        let mut added = 0usize;
        for node in nodes {
            let Some(logo) = image_url(doc, node)
                .and_then(|raw| absolutize_logo(&raw, origin, base))
            else {
                continue;
            };
            if !seen.insert(logo.clone()) {
                continue;
            }
            candidates.push(CandidateImage {
                node,
                logo,
                rule: rule.label,
            });
            added += 1;
        }
        tracing::debug!(rule = rule.label, added, "image rule evaluated");
    }

    candidates
}

/// Raw image URL of `node`, falling back to lazy-loading attributes.
pub(crate) fn image_url<D: DocumentModel>(doc: &D, node: D::Node) -> Option<String> {
    SRC_ATTRIBUTES
        .iter()
        .find_map(|attr| doc.non_empty_attr(node, attr))
}

/// Extracts named brand records from `doc`.
///
/// Never fails: an empty outcome is reported through the result status
/// according to `options.empty_policy`.
pub fn extract<D: DocumentModel>(
    doc: &D,
    names: &NameMap,
    options: &ExtractOptions,
) -> ExtractionResult {
    let base = options.page_url.as_deref().and_then(|u| Url::parse(u).ok());
    let candidates = collect_candidates(doc, IMAGE_RULES, &options.origin, base.as_ref());
    tracing::debug!(candidates = candidates.len(), "collected candidate images");

    let mut records = Vec::new();
    for candidate in candidates {
        let resolved = resolve_name(doc, candidate.node, &candidate.logo, names);
        if let Some(reason) = rejection_reason(
            &candidate.logo,
            &resolved.name,
            resolved.source,
            &options.deny_names,
        ) {
            tracing::debug!(
                logo = %candidate.logo,
                name = %resolved.name,
                rule = candidate.rule,
                reason,
                "rejected candidate"
            );
            continue;
        }

        let hash = derive_hash(&candidate.logo);
        records.push(BrandRecord {
            name: resolved.name,
            source_hash: (!hash.is_empty()).then(|| hash.to_string()),
            logo: candidate.logo,
            scraped_at: Some(options.scraped_at),
        });
    }

    let mut records = dedup_records(records, options.dedup);
    if options.sort == SortOrder::Alphabetical {
        sort_records(&mut records);
    }

    if !records.is_empty() {
        tracing::info!(count = records.len(), "extracted brand records");
        return ExtractionResult::success(records);
    }

    match options.empty_policy {
        EmptyPolicy::Fallback => {
            tracing::warn!("no brands found, using fallback records");
            ExtractionResult::fallback(fallback_records())
        }
        EmptyPolicy::Fail => {
            tracing::error!("no brands found and fallback is disabled");
            ExtractionResult::error(NO_BRANDS_MESSAGE)
        }
    }
}

fn rejection_reason(
    logo: &str,
    name: &str,
    source: NameSource,
    deny_names: &[String],
) -> Option<&'static str> {
    if let Some(marker) = rejected_marker(logo) {
        return Some(marker);
    }
    if !source.is_url_derived() && name.chars().count() < MIN_NAME_CHARS {
        return Some("name too short");
    }
    if deny_names.iter().any(|d| d.eq_ignore_ascii_case(name)) {
        return Some("deny-listed name");
    }
    None
}

/// Keeps the first record for each dedup key, preserving order.
#[must_use]
pub fn dedup_records(records: Vec<BrandRecord>, policy: DedupPolicy) -> Vec<BrandRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| {
            let key = match policy {
                DedupPolicy::Name => (r.name.to_lowercase(), None),
                DedupPolicy::NameAndLogo => (r.name.to_lowercase(), Some(r.logo.clone())),
            };
            seen.insert(key)
        })
        .collect()
}

/// Case-insensitive alphabetical order; ties keep a stable, case-sensitive order.
pub fn sort_records(records: &mut [BrandRecord]) {
    records.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Fixed placeholder set reported when the page yields nothing.
#[must_use]
pub fn fallback_records() -> Vec<BrandRecord> {
    FALLBACK_BRANDS
        .iter()
        .map(|(name, colour)| BrandRecord {
            name: (*name).to_string(),
            logo: format!("https://via.placeholder.com/200x100/{colour}/ffffff?text={name}"),
            source_hash: Some(FALLBACK_HASH.to_string()),
            scraped_at: None,
        })
        .collect()
}

#[cfg(test)]
#[path = "../extract_test.rs"]
mod tests;

//! Display-name resolution for a candidate logo image.
//!
//! The chain stops at the first step that yields a usable name:
//! name map → image attributes → nearby label → filename → placeholder.

use std::sync::LazyLock;

use brandsync_core::name_map::is_content_hash;
use brandsync_core::NameMap;
use regex::Regex;

use super::logo_url::{derive_hash, filename_of};
use crate::dom::DocumentModel;

static DECORATIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)logo|brand|®|™|©").expect("valid decorative regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Image attributes consulted for a name, in priority order.
const NAME_ATTRIBUTES: &[&str] = &["alt", "title", "data-brand", "data-name"];

/// Nearest ancestor searched for a visible label.
pub const LABEL_CONTAINER_SELECTOR: &str =
    r#"[class*="brand"], [class*="Brand"], .grid-item, figure, div"#;

/// First element inside the label container whose text is taken as the name.
pub const LABEL_SELECTOR: &str = r#"h1, h2, h3, h4, h5, h6, .name, .title, [class*="name"], [class*="title"], span, p"#;

pub const UNKNOWN_BRAND: &str = "Unknown Brand";

/// Names shorter than this are treated as noise.
pub const MIN_NAME_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    NameMap,
    Attribute,
    Label,
    Filename,
    Placeholder,
}

impl NameSource {
    /// Names built from the logo URL itself rather than from page text or the map.
    #[must_use]
    pub fn is_url_derived(self) -> bool {
        matches!(self, NameSource::Filename | NameSource::Placeholder)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub name: String,
    pub source: NameSource,
}

/// Resolves the display name for the image at `node` whose absolute URL is `logo`.
pub fn resolve_name<D: DocumentModel>(
    doc: &D,
    node: D::Node,
    logo: &str,
    names: &NameMap,
) -> ResolvedName {
    if let Some(mapped) = names.resolve(derive_hash(logo)) {
        return ResolvedName {
            name: mapped.to_string(),
            source: NameSource::NameMap,
        };
    }

    let page_text = attribute_name(doc, node)
        .map(|n| (n, NameSource::Attribute))
        .or_else(|| label_name(doc, node).map(|n| (n, NameSource::Label)));

    if let Some((raw, source)) = page_text {
        let cleaned = clean_name(&raw);
        if cleaned.chars().count() >= MIN_NAME_CHARS {
            return ResolvedName {
                name: cleaned,
                source,
            };
        }
    }

    name_from_filename(filename_of(logo))
}

fn attribute_name<D: DocumentModel>(doc: &D, node: D::Node) -> Option<String> {
    NAME_ATTRIBUTES
        .iter()
        .find_map(|attr| doc.non_empty_attr(node, attr))
}

fn label_name<D: DocumentModel>(doc: &D, node: D::Node) -> Option<String> {
    let container = match doc.closest(node, LABEL_CONTAINER_SELECTOR) {
        Ok(Some(container)) => container,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "label container lookup failed");
            return None;
        }
    };
    let label = match doc.select_within(container, LABEL_SELECTOR) {
        Ok(labels) => labels.into_iter().next()?,
        Err(e) => {
            tracing::warn!(error = %e, "label lookup failed");
            return None;
        }
    };
    let text = doc.text(label);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Strips decorative tokens ("logo", "brand", trademark glyphs) and collapses
/// whitespace.
#[must_use]
pub fn clean_name(raw: &str) -> String {
    let stripped = DECORATIVE_RE.replace_all(raw, "");
    WHITESPACE_RE.replace_all(&stripped, " ").trim().to_string()
}

/// Derives a name from the logo filename.
///
/// `ray-ban_sun.png` becomes "Ray Ban Sun"; a 32-character hex hash becomes
/// "Brand 184a2d28" rather than exposing the raw hash.
#[must_use]
pub fn name_from_filename(filename: &str) -> ResolvedName {
    let stem = filename.split('.').next().unwrap_or_default();

    if is_content_hash(stem) {
        return ResolvedName {
            name: format!("Brand {}", &stem[..8]),
            source: NameSource::Filename,
        };
    }

    let spaced = stem.replace(['-', '_'], " ");
    let collapsed = WHITESPACE_RE.replace_all(&spaced, " ");
    let titled = title_case(collapsed.trim());
    if titled.is_empty() {
        return ResolvedName {
            name: UNKNOWN_BRAND.to_string(),
            source: NameSource::Placeholder,
        };
    }
    ResolvedName {
        name: titled,
        source: NameSource::Filename,
    }
}

/// Upper-cases the first character of every word, leaving the rest untouched.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        let is_word = c.is_alphanumeric();
        if is_word && !in_word {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        in_word = is_word;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::HtmlDocument;

    fn resolve_first_img(markup: &str, logo: &str) -> ResolvedName {
        let doc = HtmlDocument::parse(markup);
        let img = doc.select("img").unwrap()[0];
        resolve_name(&doc, img, logo, &NameMap::builtin())
    }

    #[test]
    fn name_map_wins_over_alt_text() {
        let got = resolve_first_img(
            r#"<img src="/m/184a2d28553c2b50231eb421f7213e45.png" alt="Something Else">"#,
            "https://x/m/184a2d28553c2b50231eb421f7213e45.png",
        );
        assert_eq!(got.name, "Ray-Ban");
        assert_eq!(got.source, NameSource::NameMap);
    }

    #[test]
    fn attributes_are_tried_in_priority_order() {
        let got = resolve_first_img(
            r#"<img src="/a.png" alt=" " title="Persol Logo" data-brand="Ignored">"#,
            "https://x/a.png",
        );
        assert_eq!(got.name, "Persol");
        assert_eq!(got.source, NameSource::Attribute);

        let got = resolve_first_img(
            r#"<img src="/a.png" data-name="Vogue Eyewear">"#,
            "https://x/a.png",
        );
        assert_eq!(got.name, "Vogue Eyewear");
    }

    #[test]
    fn label_inside_brand_container_is_used() {
        let got = resolve_first_img(
            r#"<ul><li class="brand-card"><img src="/x1.png"><h3> Oliver   Peoples </h3></li></ul>"#,
            "https://x/x1.png",
        );
        assert_eq!(got.name, "Oliver Peoples");
        assert_eq!(got.source, NameSource::Label);
    }

    #[test]
    fn short_page_text_falls_through_to_filename() {
        let got = resolve_first_img(
            r#"<img src="/miu-miu.png" alt="®">"#,
            "https://x/miu-miu.png",
        );
        assert_eq!(got.name, "Miu Miu");
        assert_eq!(got.source, NameSource::Filename);
    }

    #[test]
    fn clean_name_strips_decorative_tokens() {
        assert_eq!(clean_name("Prada® LOGO"), "Prada");
        assert_eq!(clean_name("  Dolce\n&   Gabbana™ "), "Dolce & Gabbana");
        assert_eq!(clean_name("Brand"), "");
    }

    #[test]
    fn filename_is_title_cased() {
        assert_eq!(name_from_filename("emporio_armani-eyewear.svg").name, "Emporio Armani Eyewear");
        assert_eq!(name_from_filename("a.png").name, "A");
    }

    #[test]
    fn hash_filename_becomes_truncated_placeholder() {
        let got = name_from_filename("0123456789abcdef0123456789abcdef.png");
        assert_eq!(got.name, "Brand 01234567");
    }

    #[test]
    fn empty_filename_is_unknown_brand() {
        let got = name_from_filename("");
        assert_eq!(got.name, UNKNOWN_BRAND);
        assert_eq!(got.source, NameSource::Placeholder);
        assert_eq!(name_from_filename("--.png").name, UNKNOWN_BRAND);
    }
}

//! Capture mode: lift the brand section's markup and styles off the page.
//!
//! Instead of structured records this produces a styled snapshot of the
//! smallest subtree holding the logo grid, so it can be replayed as a
//! standalone page.

mod css;
mod page;

use std::collections::{BTreeSet, HashSet};

use crate::dom::DocumentModel;
use crate::error::ScraperError;
use crate::extract::logo_url::is_rejected_logo;
use crate::extract::{image_url, IMAGE_RULES};

pub use css::filter_style_rules;
pub use page::{render_standalone_page, SYNC_FOOTER};

/// A container must hold at least this many brand-like images to qualify.
pub const MIN_BRAND_IMAGES: usize = 5;

/// Container selectors, highest priority first.
pub const CONTAINER_SELECTORS: &[&str] = &[
    r#"[class*="brand-grid"]"#,
    r#"[class*="brands"]"#,
    r#"[class*="brand"]"#,
    r#"[class*="Brand"]"#,
    r#"[class*="logo"]"#,
    r#"[class*="grid"]"#,
    r#"[class*="Grid"]"#,
    "section",
    "main",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedSection {
    /// Serialized markup of the container, including its own tag.
    pub markup: String,
    /// Stylesheet rules relevant to the container.
    pub css: String,
    pub image_count: usize,
    /// Every class used inside the container, sorted.
    pub used_classes: Vec<String>,
    /// Selector that located the container; `None` when it was computed as the
    /// common ancestor of the brand images.
    pub located_by: Option<&'static str>,
}

/// Locates the brand section and captures its markup and relevant CSS.
///
/// # Errors
///
/// Returns [`ScraperError::NoContainerFound`] when no subtree holds at least
/// [`MIN_BRAND_IMAGES`] brand-like images.
pub fn capture_brand_section<D: DocumentModel>(
    doc: &D,
) -> Result<CapturedSection, ScraperError> {
    let brand_images = brand_like_images(doc);
    tracing::debug!(count = brand_images.len(), "found brand-like images");

    let (container, located_by) = find_container(doc, &brand_images)?;

    let used_classes = used_classes(doc, container);
    let css = filter_style_rules(&doc.style_sheets().join("\n"), &used_classes);
    let image_count = doc
        .select_within(container, "img")
        .map(|imgs| imgs.len())
        .unwrap_or_default();

    tracing::info!(
        located_by = located_by.unwrap_or("common ancestor"),
        image_count,
        classes = used_classes.len(),
        "captured brand section"
    );

    Ok(CapturedSection {
        markup: doc.outer_html(container),
        css,
        image_count,
        used_classes: used_classes.into_iter().collect(),
        located_by,
    })
}

/// Images any extraction rule would consider, minus filler images, in
/// document order.
fn brand_like_images<D: DocumentModel>(doc: &D) -> Vec<D::Node> {
    let mut matched: HashSet<D::Node> = HashSet::new();
    for rule in IMAGE_RULES {
        match doc.select(rule.selector) {
            Ok(nodes) => matched.extend(nodes),
            Err(e) => tracing::warn!(rule = rule.label, error = %e, "skipping image rule"),
        }
    }

    doc.select("img")
        .unwrap_or_default()
        .into_iter()
        .filter(|img| matched.contains(img))
        .filter(|img| image_url(doc, *img).is_some_and(|src| !is_rejected_logo(&src)))
        .collect()
}

fn find_container<D: DocumentModel>(
    doc: &D,
    brand_images: &[D::Node],
) -> Result<(D::Node, Option<&'static str>), ScraperError> {
    let brand_set: HashSet<D::Node> = brand_images.iter().copied().collect();

    for selector in CONTAINER_SELECTORS {
        let containers = match doc.select(selector) {
            Ok(nodes) => nodes,
            Err(e) => {
                tracing::warn!(selector, error = %e, "skipping container selector");
                continue;
            }
        };

        let smallest = containers
            .into_iter()
            .filter_map(|c| {
                let stats = container_stats(doc, c, &brand_set);
                (stats.brand_images >= MIN_BRAND_IMAGES).then_some((c, stats.subtree_size))
            })
            .min_by_key(|(_, size)| *size)
            .map(|(c, _)| c);

        if let Some(container) = smallest {
            return Ok((container, Some(*selector)));
        }
    }

    if brand_images.len() >= MIN_BRAND_IMAGES {
        if let Some(ancestor) = common_ancestor(doc, brand_images) {
            return Ok((ancestor, None));
        }
    }

    Err(ScraperError::NoContainerFound {
        brand_images: brand_images.len(),
        required: MIN_BRAND_IMAGES,
    })
}

struct ContainerStats {
    brand_images: usize,
    subtree_size: usize,
}

/// Brand-image count and element count of `container`'s subtree, from a
/// single descendant walk.
fn container_stats<D: DocumentModel>(
    doc: &D,
    container: D::Node,
    brand_set: &HashSet<D::Node>,
) -> ContainerStats {
    let descendants = doc.select_within(container, "*").unwrap_or_default();
    ContainerStats {
        brand_images: descendants.iter().filter(|n| brand_set.contains(n)).count(),
        subtree_size: descendants.len(),
    }
}

/// Nearest element containing every node in `nodes`.
fn common_ancestor<D: DocumentModel>(doc: &D, nodes: &[D::Node]) -> Option<D::Node> {
    let (first, rest) = nodes.split_first()?;
    doc.ancestors(*first)
        .into_iter()
        .find(|candidate| rest.iter().all(|n| doc.contains(*candidate, *n)))
}

fn used_classes<D: DocumentModel>(doc: &D, container: D::Node) -> BTreeSet<String> {
    let mut classes: BTreeSet<String> = doc.classes(container).into_iter().collect();
    for node in doc.select_within(container, "[class]").unwrap_or_default() {
        classes.extend(doc.classes(node));
    }
    classes
}

//! Discovery of the "show more brands" control.
//!
//! Pages often render only part of the brand grid until a control is
//! activated. Without a script engine, activating a control means following
//! the link it carries.

use crate::dom::DocumentModel;

/// Lower-case phrases that identify a reveal control.
pub const REVEAL_PHRASES: &[&str] = &["view brands", "show brands", "see all", "view all", "show all"];

const CANDIDATE_SELECTOR: &str = "button, a, div, span";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealControl {
    /// Whitespace-collapsed text of the control.
    pub text: String,
    /// Link target of the control or of the anchor wrapping it.
    pub href: Option<String>,
}

impl RevealControl {
    /// Link worth following: same-page anchors and `javascript:` URLs need a
    /// script engine and are excluded.
    #[must_use]
    pub fn navigable_href(&self) -> Option<&str> {
        let href = self.href.as_deref()?.trim();
        let lower = href.to_ascii_lowercase();
        if href.is_empty() || href.starts_with('#') || lower.starts_with("javascript:") {
            return None;
        }
        Some(href)
    }
}

/// Finds the first reveal control in document order.
///
/// A wrapper whose text merely contains a matching control is skipped in
/// favour of the innermost matching element.
pub fn find_reveal_control<D: DocumentModel>(doc: &D) -> Option<RevealControl> {
    let candidates = match doc.select(CANDIDATE_SELECTOR) {
        Ok(nodes) => nodes,
        Err(e) => {
            tracing::warn!(error = %e, "reveal control lookup failed");
            return None;
        }
    };

    let matches: Vec<(D::Node, String)> = candidates
        .into_iter()
        .filter_map(|node| {
            let text = collapse_whitespace(&doc.text(node));
            let lower = text.to_lowercase();
            REVEAL_PHRASES
                .iter()
                .any(|p| lower.contains(p))
                .then_some((node, text))
        })
        .collect();

    let (node, text) = matches
        .iter()
        .find(|(outer, _)| {
            !matches
                .iter()
                .any(|(inner, _)| inner != outer && doc.contains(*outer, *inner))
        })?
        .clone();

    let href = control_href(doc, node);
    tracing::debug!(text = %text, href = ?href, "found reveal control");
    Some(RevealControl { text, href })
}

fn control_href<D: DocumentModel>(doc: &D, node: D::Node) -> Option<String> {
    if let Ok(Some(anchor)) = doc.closest(node, "a[href]") {
        return doc.non_empty_attr(anchor, "href");
    }
    doc.select_within(node, "a[href]")
        .ok()?
        .into_iter()
        .find_map(|a| doc.non_empty_attr(a, "href"))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

//! Queryable document capability used by extraction and capture.
//!
//! The extractor never touches a concrete HTML tree; it only talks to a
//! [`DocumentModel`]. [`HtmlDocument`] backs it with a parsed `scraper::Html`
//! so a page snapshot (fetched or constructed in a test) can be queried the
//! same way a live browser DOM would be.

mod html;

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::ScraperError;

pub use html::HtmlDocument;

pub trait DocumentModel {
    /// Opaque handle to an element in this document.
    type Node: Copy + Eq + Hash + Debug;

    /// All elements matching `selector`, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSelector`] if `selector` does not parse.
    fn select(&self, selector: &str) -> Result<Vec<Self::Node>, ScraperError>;

    /// Descendants of `scope` matching `selector`, in document order.
    /// `scope` itself is never included.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSelector`] if `selector` does not parse.
    fn select_within(
        &self,
        scope: Self::Node,
        selector: &str,
    ) -> Result<Vec<Self::Node>, ScraperError>;

    /// Nearest inclusive ancestor of `node` matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSelector`] if `selector` does not parse.
    fn closest(&self, node: Self::Node, selector: &str)
        -> Result<Option<Self::Node>, ScraperError>;

    /// Parent element, or `None` for the root element.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Concatenated text content of `node` and its descendants.
    fn text(&self, node: Self::Node) -> String;

    fn attr(&self, node: Self::Node, name: &str) -> Option<String>;

    /// Lower-case local tag name.
    fn tag_name(&self, node: Self::Node) -> String;

    fn classes(&self, node: Self::Node) -> Vec<String>;

    /// Serialized markup of `node` including its own tag.
    fn outer_html(&self, node: Self::Node) -> String;

    /// Raw text of every stylesheet known to the document.
    fn style_sheets(&self) -> Vec<String>;

    /// Proper ancestors of `node`, nearest first.
    fn ancestors(&self, node: Self::Node) -> Vec<Self::Node> {
        let mut out = Vec::new();
        let mut current = self.parent(node);
        while let Some(parent) = current {
            out.push(parent);
            current = self.parent(parent);
        }
        out
    }

    /// Returns `true` if `node` is `ancestor` or lies inside it.
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> bool {
        if ancestor == node {
            return true;
        }
        let mut current = self.parent(node);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    /// Trimmed attribute value, treating blank values as absent.
    fn non_empty_attr(&self, node: Self::Node, name: &str) -> Option<String> {
        self.attr(node, name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

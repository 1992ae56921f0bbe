use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};

use super::DocumentModel;
use crate::error::ScraperError;

/// A parsed HTML snapshot.
///
/// Stylesheets come from inline `<style>` blocks plus any external sheets the
/// caller fetched and attached with [`HtmlDocument::with_style_sheets`].
pub struct HtmlDocument {
    html: Html,
    external_styles: Vec<String>,
}

impl HtmlDocument {
    #[must_use]
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
            external_styles: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_style_sheets(mut self, sheets: Vec<String>) -> Self {
        self.external_styles.extend(sheets);
        self
    }

    /// `href` values of `<link rel="stylesheet">` elements, in document order.
    #[must_use]
    pub fn stylesheet_links(&self) -> Vec<String> {
        let Ok(nodes) = self.select(r#"link[rel~="stylesheet"][href]"#) else {
            return Vec::new();
        };
        nodes
            .into_iter()
            .filter_map(|id| self.non_empty_attr(id, "href"))
            .collect()
    }

    fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(id).and_then(ElementRef::wrap)
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ScraperError> {
    Selector::parse(selector).map_err(|e| ScraperError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

impl DocumentModel for HtmlDocument {
    type Node = NodeId;

    fn select(&self, selector: &str) -> Result<Vec<NodeId>, ScraperError> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).map(|el| el.id()).collect())
    }

    fn select_within(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, ScraperError> {
        let sel = parse_selector(selector)?;
        let Some(scope) = self.element(scope) else {
            return Ok(Vec::new());
        };
        Ok(scope
            .select(&sel)
            .filter(|el| el.id() != scope.id())
            .map(|el| el.id())
            .collect())
    }

    fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>, ScraperError> {
        let sel = parse_selector(selector)?;
        let Some(start) = self.element(node) else {
            return Ok(None);
        };
        Ok(std::iter::once(start)
            .chain(start.ancestors().filter_map(ElementRef::wrap))
            .find(|el| sel.matches(el))
            .map(|el| el.id()))
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.element(node)?
            .parent()
            .and_then(ElementRef::wrap)
            .map(|el| el.id())
    }

    fn text(&self, node: NodeId) -> String {
        self.element(node)
            .map(|el| el.text().collect::<String>())
            .unwrap_or_default()
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.value().attr(name).map(str::to_owned)
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.element(node)
            .map(|el| el.value().name().to_ascii_lowercase())
            .unwrap_or_default()
    }

    fn classes(&self, node: NodeId) -> Vec<String> {
        self.element(node)
            .map(|el| el.value().classes().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    fn outer_html(&self, node: NodeId) -> String {
        self.element(node).map(|el| el.html()).unwrap_or_default()
    }

    fn style_sheets(&self) -> Vec<String> {
        let inline = self
            .select("style")
            .unwrap_or_default()
            .into_iter()
            .map(|id| self.text(id));
        inline.chain(self.external_styles.iter().cloned()).collect()
    }
}

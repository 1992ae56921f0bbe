//! Page loading for one run: fetch or read the snapshot, follow the reveal
//! control once, and gather external stylesheets for capture mode.

use std::path::Path;

use anyhow::Context;
use brandsync_core::AppConfig;
use brandsync_scraper::{find_reveal_control, resolve_url, HtmlDocument, PageLoader};

/// Markup ready for extraction, plus where it came from.
pub(crate) struct LoadedPage {
    /// URL the markup was served from; relative logo URLs resolve against it.
    pub url: String,
    pub markup: String,
    /// External stylesheets, already fetched. Empty for sync runs.
    pub style_sheets: Vec<String>,
}

impl LoadedPage {
    pub(crate) fn document(&self) -> HtmlDocument {
        HtmlDocument::parse(&self.markup).with_style_sheets(self.style_sheets.clone())
    }
}

/// Loads the page for this run.
///
/// A local snapshot is used as-is: it is not expanded through its reveal
/// control and its linked stylesheets are not fetched.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be read or the page cannot be
/// fetched (timeout, 404, other non-2xx status, network failure).
pub(crate) async fn load_page(
    config: &AppConfig,
    html_file: Option<&Path>,
    with_style_sheets: bool,
) -> anyhow::Result<LoadedPage> {
    if let Some(path) = html_file {
        let markup = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read HTML snapshot {}", path.display()))?;
        tracing::info!(path = %path.display(), bytes = markup.len(), "loaded HTML snapshot");
        if let Some(control) = find_reveal_control(&HtmlDocument::parse(&markup)) {
            tracing::info!(text = %control.text, "reveal control present in snapshot, not followed");
        }
        return Ok(LoadedPage {
            url: config.source_url.clone(),
            markup,
            style_sheets: Vec::new(),
        });
    }

    let loader = PageLoader::new(config.navigation_timeout_secs, &config.user_agent)
        .context("failed to build page loader")?;

    tracing::info!(url = %config.source_url, "loading brands page");
    let markup = loader.fetch(&config.source_url).await?;
    let mut page = follow_reveal_control(&loader, config.source_url.clone(), markup).await;

    if with_style_sheets && config.fetch_stylesheets {
        let links = HtmlDocument::parse(&page.markup).stylesheet_links();
        page.style_sheets = loader.fetch_style_sheets(&page.url, &links).await;
    }

    Ok(page)
}

/// Follows the page's reveal control at most once. Any failure keeps the
/// original page.
async fn follow_reveal_control(loader: &PageLoader, url: String, markup: String) -> LoadedPage {
    let target = {
        let doc = HtmlDocument::parse(&markup);
        match find_reveal_control(&doc) {
            None => {
                tracing::debug!("no reveal control found");
                None
            }
            Some(control) => {
                let href = control.navigable_href().map(str::to_owned);
                if href.is_none() {
                    tracing::info!(text = %control.text, "reveal control needs a script engine, skipping");
                }
                href
            }
        }
    };

    let revealed = match target.map(|href| resolve_url(&url, &href)) {
        Some(Ok(next)) if next != url => {
            tracing::info!(url = %next, "following reveal control");
            loader.fetch_optional(&next).await.map(|body| (next, body))
        }
        Some(Err(e)) => {
            tracing::warn!(error = %e, "reveal control target is not a valid URL");
            None
        }
        _ => None,
    };

    let (url, markup) = revealed.unwrap_or((url, markup));
    LoadedPage {
        url,
        markup,
        style_sheets: Vec::new(),
    }
}

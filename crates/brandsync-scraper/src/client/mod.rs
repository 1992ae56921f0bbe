//! HTTP loading of the brands page and its stylesheets.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::ScraperError;

/// Fetches page snapshots with a configured user agent and navigation timeout.
///
/// 404 and other non-2xx responses are typed errors; a request exceeding the
/// timeout is reported as [`ScraperError::NavigationTimeout`] so the caller
/// can treat it as run-fatal.
pub struct PageLoader {
    client: Client,
    timeout_secs: u64,
}

impl PageLoader {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            timeout_secs,
        })
    }

    /// Fetches `url` and returns the response body as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::NavigationTimeout`] when the request exceeds the timeout.
    /// - [`ScraperError::NotFound`] on HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ScraperError::Http`] on network or TLS failure.
    pub async fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        tracing::debug!(url, "fetching page");

        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,text/css;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await.map_err(|e| self.classify(url, e))?;
        tracing::debug!(url, bytes = body.len(), "fetched page");
        Ok(body)
    }

    /// Best-effort fetch: failures are logged and yield `None`.
    pub async fn fetch_optional(&self, url: &str) -> Option<String> {
        match self.fetch(url).await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!(url, error = %e, "optional fetch failed, continuing without it");
                None
            }
        }
    }

    /// Fetches every stylesheet in `hrefs`, resolved against `page_url`.
    /// Sheets that fail to resolve or load are skipped.
    pub async fn fetch_style_sheets(&self, page_url: &str, hrefs: &[String]) -> Vec<String> {
        let mut sheets = Vec::with_capacity(hrefs.len());
        for href in hrefs {
            let url = match resolve_url(page_url, href) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(href = %href, error = %e, "skipping stylesheet");
                    continue;
                }
            };
            if let Some(css) = self.fetch_optional(&url).await {
                sheets.push(css);
            }
        }
        tracing::debug!(requested = hrefs.len(), loaded = sheets.len(), "loaded external stylesheets");
        sheets
    }

    fn classify(&self, url: &str, error: reqwest::Error) -> ScraperError {
        if error.is_timeout() {
            ScraperError::NavigationTimeout {
                url: url.to_owned(),
                timeout_secs: self.timeout_secs,
            }
        } else {
            ScraperError::Http(error)
        }
    }
}

/// Resolves `href` against `base`, returning an absolute URL string.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if `base` is not a URL or `href`
/// cannot be joined onto it.
pub fn resolve_url(base: &str, href: &str) -> Result<String, ScraperError> {
    let base_url = Url::parse(base).map_err(|e| ScraperError::InvalidUrl {
        url: base.to_owned(),
        reason: e.to_string(),
    })?;
    base_url
        .join(href.trim())
        .map(|u| u.to_string())
        .map_err(|e| ScraperError::InvalidUrl {
            url: href.to_owned(),
            reason: e.to_string(),
        })
}

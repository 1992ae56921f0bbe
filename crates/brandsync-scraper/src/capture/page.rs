//! Standalone page rendering for a captured brand section.

use chrono::{DateTime, SecondsFormat, Utc};

use super::CapturedSection;

/// Footer note marking the page as machine-maintained.
pub const SYNC_FOOTER: &str = "synced daily via automation";

const PAGE_CSS: &str = "\
body { margin: 0; font-family: system-ui, -apple-system, \"Segoe UI\", sans-serif; background: #fff; color: #222; }
.brandsync-wrapper { max-width: 1200px; margin: 0 auto; padding: 24px; }
.brandsync-wrapper img { max-width: 100%; height: auto; }
.brandsync-footer { text-align: center; font-size: 12px; color: #777; padding: 16px; }";

/// Wraps the captured markup and styles in a self-contained HTML document.
///
/// A `<base>` element pointing at `source_url` keeps relative image URLs
/// resolvable when the file is opened elsewhere.
#[must_use]
pub fn render_standalone_page(
    section: &CapturedSection,
    source_url: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let base = html_escape::encode_double_quoted_attribute(source_url);
    let link_text = html_escape::encode_text(source_url);
    let timestamp = generated_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    // Captured CSS must not be able to close the style element early.
    let css = section.css.replace("</style", "<\\/style");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<base href="{base}">
<title>Brands</title>
<style>
{PAGE_CSS}
</style>
<style>
{css}
</style>
</head>
<body>
<main class="brandsync-wrapper">
{markup}
</main>
<footer class="brandsync-footer">
Source: <a href="{base}">{link_text}</a> &middot; updated {timestamp} &middot; {SYNC_FOOTER}
</footer>
</body>
</html>
"#,
        markup = section.markup,
    )
}

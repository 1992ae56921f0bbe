//! The two run modes. Each one writes exactly one JSON report to the
//! configured output path; a failed run writes an error-shaped report and
//! returns the error so the process exits non-zero.

use std::path::Path;

use anyhow::Context;
use brandsync_core::{
    load_name_map, write_atomic, write_report, AppConfig, BrandRecord, CaptureReport, NameMap,
    RecordReport,
};
use brandsync_scraper::{
    capture_brand_section, extract, render_standalone_page, ExtractOptions,
};
use chrono::{DateTime, Utc};

use crate::page::load_page;

/// Records listed in the end-of-run log summary.
const SUMMARY_LIMIT: usize = 10;

pub(crate) async fn run_sync(config: &AppConfig, html_file: Option<&Path>) -> anyhow::Result<()> {
    let started = Utc::now();
    match sync_report(config, html_file, started).await {
        Ok(report) => {
            write_report(&config.output_path, &report).with_context(|| {
                format!("failed to write report {}", config.output_path.display())
            })?;
            if let Some(error) = report.error {
                anyhow::bail!("extraction failed: {error}");
            }
            log_summary(&report.brands);
            tracing::info!(
                path = %config.output_path.display(),
                status = %report.status,
                total = report.total_brands,
                "sync complete"
            );
            Ok(())
        }
        Err(e) => {
            let report = RecordReport::error(&config.source_url, started, format!("{e:#}"));
            write_failure_report(&config.output_path, &report);
            Err(e)
        }
    }
}

async fn sync_report(
    config: &AppConfig,
    html_file: Option<&Path>,
    started: DateTime<Utc>,
) -> anyhow::Result<RecordReport> {
    let names = load_names(config)?;
    let page = load_page(config, html_file, false).await?;

    let options = ExtractOptions::from_config(config, &page.url, started);
    let result = extract(&page.document(), &names, &options);

    let mapping_info = format!("name map covers {} brands", names.len());
    Ok(RecordReport::from_result(
        result,
        &config.source_url,
        started,
        Some(mapping_info),
    ))
}

pub(crate) async fn run_capture(
    config: &AppConfig,
    html_file: Option<&Path>,
) -> anyhow::Result<()> {
    let started = Utc::now();
    match capture_report(config, html_file, started).await {
        Ok(report) => {
            write_atomic(&config.html_output_path, report.complete_html.as_bytes())
                .with_context(|| {
                    format!(
                        "failed to write standalone page {}",
                        config.html_output_path.display()
                    )
                })?;
            write_report(&config.output_path, &report).with_context(|| {
                format!("failed to write report {}", config.output_path.display())
            })?;
            tracing::info!(
                path = %config.output_path.display(),
                html = %config.html_output_path.display(),
                images = report.image_count,
                "capture complete"
            );
            Ok(())
        }
        Err(e) => {
            let report = CaptureReport::error(&config.source_url, started, format!("{e:#}"));
            write_failure_report(&config.output_path, &report);
            Err(e)
        }
    }
}

async fn capture_report(
    config: &AppConfig,
    html_file: Option<&Path>,
    started: DateTime<Utc>,
) -> anyhow::Result<CaptureReport> {
    let page = load_page(config, html_file, true).await?;
    let section = capture_brand_section(&page.document())?;
    // Relative URLs in the markup resolve against the page it came from.
    let complete_html = render_standalone_page(&section, &page.url, started);

    Ok(CaptureReport {
        summary: CaptureReport::success_summary(&config.source_url, started, section.image_count),
        complete_html,
        raw_html: section.markup,
        raw_css: section.css,
        image_count: section.image_count,
        used_classes: section.used_classes,
    })
}

fn load_names(config: &AppConfig) -> anyhow::Result<NameMap> {
    match &config.name_map_path {
        Some(path) => {
            let names = load_name_map(path)?;
            tracing::info!(path = %path.display(), entries = names.len(), "loaded name map");
            Ok(names)
        }
        None => Ok(NameMap::builtin()),
    }
}

/// Best-effort write of an error report; the original error is what the
/// caller reports, so a write failure here is only logged.
fn write_failure_report<T: serde::Serialize>(path: &Path, report: &T) {
    if let Err(e) = write_report(path, report) {
        tracing::error!(path = %path.display(), error = %e, "failed to write error report");
    }
}

fn log_summary(records: &[BrandRecord]) {
    for record in records.iter().take(SUMMARY_LIMIT) {
        let hash = record.source_hash.as_deref().unwrap_or_default();
        let short = hash.get(..8).unwrap_or(hash);
        tracing::info!(name = %record.name, hash = %short, "brand");
    }
    if records.len() > SUMMARY_LIMIT {
        tracing::info!("... and {} more", records.len() - SUMMARY_LIMIT);
    }
}

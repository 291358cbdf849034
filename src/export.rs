use crate::client::MediawikiApi;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportStats {
    pub pages_written: u64,
    pub properties_found: u64,
}

/// Output path of a page record; path separators and colons in the title become `_`.
pub fn record_path(output_dir: &Path, title: &str) -> PathBuf {
    let stem: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c => c,
        })
        .collect();
    output_dir.join(format!("{}.json", stem))
}

/// Fetches every member of `Category:<category>` and writes one pretty-printed
/// JSON `PageRecord` per page into `output_dir`.
pub async fn export_category(
    api: &MediawikiApi,
    category: &str,
    output_dir: impl AsRef<Path>,
) -> Result<ExportStats> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let titles = api
        .fetch_category(category)
        .await
        .with_context(|| format!("Failed to list Category:{}", category))?;
    info!(category, pages = titles.len(), "Exporting category");

    let pb = make_progress_bar(titles.len() as u64, "Exporting");
    let mut stats = ExportStats::default();

    for title in &titles {
        pb.set_message(title.clone());
        let record = api
            .fetch_page(title)
            .await
            .with_context(|| format!("Failed to fetch page: {}", title))?;

        let path = record_path(output_dir, title);
        let file = File::create(&path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &record)
            .with_context(|| format!("Failed to write page record: {:?}", path))?;

        stats.pages_written += 1;
        stats.properties_found += record.properties.len() as u64;
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        pages = stats.pages_written,
        properties = stats.properties_found,
        "Export complete"
    );

    Ok(stats)
}

/// Page-count bar; callers put the page being processed in the message column.
pub(crate) fn make_progress_bar(total: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} {prefix:<10} {pos:>4}/{len:<4} [{bar:24.green/white}] {wide_msg}",
        )
        .unwrap()
        .progress_chars("#>-"),
    );
    pb.set_prefix(label.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

use crate::client::MediawikiApi;
use crate::export::make_progress_bar;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const PAGE_FILE_EXTENSION: &str = "wiki";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportStats {
    pub pages_created: u64,
    pub bytes_uploaded: u64,
}

/// `*.wiki` files of `dir` as `(title, path)`, sorted by file name.
///
/// The title is the file stem with underscores read as spaces.
pub fn page_files(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    if !dir.is_dir() {
        bail!("Input directory does not exist: {:?}", dir);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read directory: {:?}", dir))? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(PAGE_FILE_EXTENSION) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            files.push((stem.replace('_', " "), path.clone()));
        }
    }
    files.sort_by(|a, b| a.1.cmp(&b.1));

    Ok(files)
}

/// Creates or replaces one page per `*.wiki` file in `dir`, stopping at the first failure.
pub async fn import_dir(api: &MediawikiApi, dir: impl AsRef<Path>) -> Result<ImportStats> {
    let files = page_files(dir.as_ref())?;
    info!(pages = files.len(), "Importing pages");

    let pb = make_progress_bar(files.len() as u64, "Importing");
    let mut stats = ImportStats::default();

    for (title, path) in &files {
        pb.set_message(title.clone());
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read page file: {:?}", path))?;
        api.create_page(title, &text)
            .await
            .with_context(|| format!("Failed to create page: {}", title))?;

        stats.pages_created += 1;
        stats.bytes_uploaded += text.len() as u64;
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(pages = stats.pages_created, "Import complete");

    Ok(stats)
}

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tokio::fs;
use tracing::info;

use crate::{error::Result, format::format_notes_markdown, types::AnalysisResult};

const NOTES_SUFFIX: &str = "_notes.md";

/// `"My: Video?!"` becomes `my_video_notes.md`
pub fn notes_filename(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            stem.push(c.to_ascii_lowercase());
        } else if !stem.is_empty() && !stem.ends_with('_') {
            stem.push('_');
        }
    }
    let stem = stem.trim_end_matches('_');

    if stem.is_empty() {
        format!("video{}", NOTES_SUFFIX)
    } else {
        format!("{}{}", stem, NOTES_SUFFIX)
    }
}

/// Where notes land when no directory is given
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Write the notes document into `dir`, returning the file path
pub async fn save_notes(result: &AnalysisResult, dir: &Path, generated: NaiveDate) -> Result<PathBuf> {
    fs::create_dir_all(dir).await?;
    let path = dir.join(notes_filename(&result.metadata.title));
    fs::write(&path, format_notes_markdown(result, generated)).await?;
    info!(path = %path.display(), "notes exported");
    Ok(path)
}

/// Save a result as pretty JSON
pub async fn save_result_json(result: &AnalysisResult, path: &Path) -> Result<()> {
    let pretty_json = serde_json::to_string_pretty(result)?;
    fs::write(path, &pretty_json).await?;
    Ok(())
}

/// Load a result saved by [`save_result_json`]
pub async fn load_result_json(path: &Path) -> Result<AnalysisResult> {
    let json_content = fs::read_to_string(path).await?;
    let result: AnalysisResult = serde_json::from_str(&json_content)?;
    Ok(result)
}

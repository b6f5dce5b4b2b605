//! Markdown file writer
//!
//! Persists converted pages under the output directory at the path chosen by
//! [`resolve_output_path`], creating parent directories as needed.

use crate::output::path::resolve_output_path;
use crate::WebmarkError;
use std::path::PathBuf;

/// Writes converted Markdown documents under one output directory
#[derive(Debug, Clone)]
pub struct MarkdownWriter {
    output_dir: PathBuf,
}

impl MarkdownWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Path the document for `url` is written to
    pub fn path_for(&self, url: &str) -> Result<PathBuf, WebmarkError> {
        Ok(resolve_output_path(&self.output_dir, url)?)
    }

    /// Writes `markdown` for `url`, returning the file path
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - The file that was written
    /// * `Err(WebmarkError)` - The URL could not be mapped or the write failed
    pub async fn write(&self, url: &str, markdown: &str) -> Result<PathBuf, WebmarkError> {
        let path = self.path_for(url)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, markdown).await?;

        tracing::info!("Saved {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_directories() {
        let dir = TempDir::new().unwrap();
        let writer = MarkdownWriter::new(dir.path());

        let path = writer
            .write("https://example.com/docs/api/auth", "# Auth")
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("docs/api/auth.md"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Auth");
    }

    #[tokio::test]
    async fn test_write_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let writer = MarkdownWriter::new(dir.path());

        writer.write("https://example.com/", "first").await.unwrap();
        let path = writer.write("https://example.com/", "second").await.unwrap();

        assert_eq!(path, dir.path().join("index.md"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[tokio::test]
    async fn test_write_rejects_invalid_url() {
        let dir = TempDir::new().unwrap();
        let writer = MarkdownWriter::new(dir.path());

        let result = writer.write("not a url", "content").await;
        assert!(matches!(result, Err(WebmarkError::UrlError(_))));
    }
}

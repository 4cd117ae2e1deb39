//! Files on the local filesystem.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{decode_text, guess_mime_type, FileSource, SourceError};

/// A file on disk, described by its metadata at open time
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    name: String,
    size: u64,
    mime_type: String,
}

impl LocalFile {
    /// Stat a path and capture its name, size and guessed MIME type
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = guess_mime_type(&name).to_string();

        Ok(Self {
            path,
            name,
            size: metadata.len(),
            mime_type,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FileSource for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    async fn read_text(&self) -> Result<String, SourceError> {
        let bytes = tokio::fs::read(&self.path).await?;
        decode_text(bytes)
    }
}

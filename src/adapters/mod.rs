//! File sources for the upload boundary.
//!
//! Adapters give intake a uniform view of a file, whether it comes from
//! the local filesystem or is held in memory.

pub mod local;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use local::LocalFile;
pub use memory::MemoryFile;

/// Errors reading a file's content
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Content is not valid UTF-8 text")]
    NotText,
}

/// A file offered for upload
#[async_trait]
pub trait FileSource: Send + Sync {
    /// File name, including extension
    fn name(&self) -> &str;

    /// Declared size in bytes
    fn size(&self) -> u64;

    /// Declared MIME type (may be empty)
    fn mime_type(&self) -> &str;

    /// Read the full text content
    async fn read_text(&self) -> Result<String, SourceError>;
}

/// Decode raw bytes as text, rejecting binary content
pub(crate) fn decode_text(bytes: Vec<u8>) -> Result<String, SourceError> {
    String::from_utf8(bytes).map_err(|_| SourceError::NotText)
}

/// Guess a MIME type from a file name's extension
pub fn guess_mime_type(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

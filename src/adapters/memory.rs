//! In-memory files, e.g. bytes received from a drop surface.

use async_trait::async_trait;

use super::{decode_text, FileSource, SourceError};

#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Plain-text file with a `text/plain` MIME type
    pub fn text(name: impl Into<String>, content: &str) -> Self {
        Self::new(name, "text/plain", content.as_bytes().to_vec())
    }
}

#[async_trait]
impl FileSource for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    async fn read_text(&self) -> Result<String, SourceError> {
        decode_text(self.bytes.clone())
    }
}

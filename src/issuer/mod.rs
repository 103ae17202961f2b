//! Seams to the collaborators that read file content and send requests.

use std::{fmt, sync::Arc};

use bytes::Bytes;

use crate::{descriptor::RequestDescriptor, error::BlobError};

/// In-memory request issuer that records every request.
pub mod memory;
pub use memory::{IssuedRequest, MemoryIssuer};

/// Async source of a file's binary content.
#[async_trait::async_trait]
pub trait BlobSource: Send + Sync + 'static {
    /// Reads the full file content.
    async fn read(&self) -> Result<Bytes, BlobError>;
}

#[async_trait::async_trait]
impl BlobSource for Bytes {
    async fn read(&self) -> Result<Bytes, BlobError> {
        Ok(self.clone())
    }
}

/// A file handed to an uploader.
#[derive(Clone)]
pub struct UploadFile {
    /// File name reported to the server.
    pub name: String,
    /// MIME type of the content.
    pub content_type: mime::Mime,
    source: Arc<dyn BlobSource>,
}

impl UploadFile {
    /// Creates a file backed by an arbitrary blob source.
    pub fn new(
        name: impl Into<String>,
        content_type: mime::Mime,
        source: impl BlobSource,
    ) -> Self {
        Self {
            name: name.into(),
            content_type,
            source: Arc::new(source),
        }
    }

    /// Creates a file whose content is already in memory.
    pub fn from_bytes(
        name: impl Into<String>,
        content_type: mime::Mime,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self::new(name, content_type, bytes.into())
    }

    /// Reads the file content from its source.
    pub async fn read(&self) -> Result<FilePayload, BlobError> {
        let bytes = self.source.read().await?;
        Ok(FilePayload {
            name: self.name.clone(),
            content_type: self.content_type.clone(),
            bytes,
        })
    }
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// File content read and ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    /// File name reported to the server.
    pub name: String,
    /// MIME type of the content.
    pub content_type: mime::Mime,
    /// File bytes.
    pub bytes: Bytes,
}

impl FilePayload {
    /// Returns the payload size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Async trait abstraction for the transport that sends upload requests.
#[async_trait::async_trait]
pub trait RequestIssuer: Send + Sync + 'static {
    /// Issuer-specific output returned after a successful send.
    type Output: Send;
    /// Issuer-specific error surfaced on send failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends one upload request.
    async fn issue(
        &self,
        request: RequestDescriptor,
        file: FilePayload,
    ) -> Result<Self::Output, Self::Error>;
}

/// Failure reported by [`NoopIssuer`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no request issuer configured; choose a concrete issuer")]
pub struct NoIssuerError;

/// Placeholder issuer used as the default backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopIssuer;

#[async_trait::async_trait]
impl RequestIssuer for NoopIssuer {
    type Output = ();
    type Error = NoIssuerError;

    async fn issue(
        &self,
        _request: RequestDescriptor,
        _file: FilePayload,
    ) -> Result<Self::Output, Self::Error> {
        Err(NoIssuerError)
    }
}

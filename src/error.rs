use thiserror::Error;

use crate::scope::FileId;

/// Configuration-time validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The upload endpoint was empty.
    #[error("request endpoint cannot be empty")]
    EmptyEndpoint,
    /// The multipart file part name was empty.
    #[error("input name cannot be empty")]
    EmptyInputName,
    /// The header parameter prefix cannot start a valid header name.
    #[error("invalid header parameter prefix `{prefix}`")]
    InvalidHeaderPrefix {
        /// The rejected prefix.
        prefix: String,
    },
    /// Uploads only support POST and PUT.
    #[error("unsupported upload method `{method}`")]
    UnsupportedMethod {
        /// The rejected method.
        method: String,
    },
}

/// A rendered header that cannot be sent over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The header name is not a valid HTTP token.
    #[error("invalid header name `{name}`")]
    InvalidName {
        /// Rendered header name.
        name: String,
    },
    /// The header value contains bytes HTTP does not allow.
    #[error("invalid value for header `{name}`")]
    InvalidValue {
        /// Rendered header name.
        name: String,
    },
}

/// Failure reading a file's content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlobError {
    /// Generic read failure with message context.
    #[error("{message}")]
    Message {
        /// Read failure message.
        message: String,
    },
}

impl BlobError {
    /// Creates a blob error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

/// Runtime error type for upload operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UploadError {
    /// Configuration error surfaced at runtime.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Reading the file's content failed.
    #[error(transparent)]
    Blob(#[from] BlobError),
    /// The file id was never registered with the uploader.
    #[error("unknown file id {id}")]
    UnknownFile {
        /// Requested file id.
        id: FileId,
    },
    /// The upload was cancelled before its request was issued.
    #[error("upload of file {id} was cancelled")]
    Cancelled {
        /// Cancelled file id.
        id: FileId,
    },
    /// The request issuer failed to send the request.
    #[error("transport failed for file {id}: {source}")]
    Transport {
        /// File whose request failed.
        id: FileId,
        /// Issuer-specific failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

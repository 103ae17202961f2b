#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Parameter and header delivery for file-upload requests.
//!
//! An [`Uploader`] keeps uploader-wide params and custom headers with per-file
//! overrides, decides where params travel (query string, body fields or
//! headers) and renders each file's request into a [`RequestDescriptor`] for a
//! [`RequestIssuer`] to send.

/// Insertion-ordered value bags.
pub mod bag;
/// Fluent builder API.
pub mod builder;
/// Request configuration.
pub mod config;
/// Rendered request descriptors.
pub mod descriptor;
/// Descriptor encoding.
pub mod encoder;
/// Error types exposed by this crate.
pub mod error;
/// Blob and transport collaborator traits.
pub mod issuer;
/// Params mode and delivery target selection.
pub mod mode;
/// Uploader-wide values with per-file overrides.
pub mod scope;
/// Upload session and pending uploads.
pub mod uploader;
/// Parameter and header values.
pub mod value;

pub use bag::ValueBag;
pub use builder::UploaderBuilder;
pub use config::RequestConfig;
pub use descriptor::{RenderedMap, RequestDescriptor};
pub use encoder::RequestEncoder;
pub use error::{BlobError, ConfigError, HeaderError, UploadError};
pub use issuer::{
    BlobSource, FilePayload, IssuedRequest, MemoryIssuer, NoIssuerError, NoopIssuer,
    RequestIssuer, UploadFile,
};
pub use mode::{select_target, select_transport, DeliveryTarget, ParamsMode, Transport};
pub use scope::{effective, FileId, Scoped};
pub use uploader::{PendingUpload, Uploader};
pub use value::ValueSource;

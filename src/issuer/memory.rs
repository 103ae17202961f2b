use std::{convert::Infallible, sync::Arc};

use tokio::sync::RwLock;

use super::{FilePayload, RequestIssuer};
use crate::descriptor::RequestDescriptor;

/// A request captured by [`MemoryIssuer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedRequest {
    /// Request metadata.
    pub descriptor: RequestDescriptor,
    /// File content sent with the request.
    pub file: FilePayload,
}

/// Issuer that keeps every request in memory instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct MemoryIssuer {
    requests: Arc<RwLock<Vec<IssuedRequest>>>,
}

impl MemoryIssuer {
    /// Creates an empty issuer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every request issued so far, in issue order.
    pub async fn requests(&self) -> Vec<IssuedRequest> {
        self.requests.read().await.clone()
    }

    /// Returns the number of requests issued so far.
    pub async fn len(&self) -> usize {
        self.requests.read().await.len()
    }

    /// Returns `true` when nothing was issued.
    pub async fn is_empty(&self) -> bool {
        self.requests.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl RequestIssuer for MemoryIssuer {
    type Output = RequestDescriptor;
    type Error = Infallible;

    async fn issue(
        &self,
        request: RequestDescriptor,
        file: FilePayload,
    ) -> Result<Self::Output, Self::Error> {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            file_id = request.file_id.index(),
            url = request.url.as_str(),
            size = file.size(),
            "memory issuer: recorded request"
        );

        self.requests.write().await.push(IssuedRequest {
            descriptor: request.clone(),
            file,
        });
        Ok(request)
    }
}

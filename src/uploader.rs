use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    bag::ValueBag,
    builder::UploaderBuilder,
    config::RequestConfig,
    encoder::RequestEncoder,
    error::{ConfigError, UploadError},
    issuer::{NoopIssuer, RequestIssuer, UploadFile},
    mode::{select_target, select_transport, DeliveryTarget},
    scope::{FileId, Scoped},
};

#[derive(Debug)]
struct QueuedFile {
    file: UploadFile,
    uuid: Uuid,
    cancel: CancellationToken,
    submitted: bool,
}

/// Upload session owning the file queue and the parameter and header scopes.
///
/// Parameters, custom headers and the endpoint each have an uploader-wide
/// value plus independent per-file overrides. A per-file override replaces
/// the uploader-wide value for that file; it is never merged with it.
#[derive(Debug)]
pub struct Uploader<I = NoopIssuer> {
    config: RequestConfig,
    params: Scoped<ValueBag>,
    headers: Scoped<ValueBag>,
    endpoints: Scoped<String>,
    files: Vec<QueuedFile>,
    issuer: I,
}

impl Uploader<NoopIssuer> {
    /// Creates a fluent builder with default configuration.
    pub fn builder() -> UploaderBuilder {
        UploaderBuilder::default()
    }
}

impl<I> Uploader<I> {
    /// Creates an uploader with default configuration.
    pub fn new(issuer: I) -> Self {
        Self::from_parts(RequestConfig::default(), issuer)
    }

    /// Creates an uploader with explicit validated configuration.
    pub fn with_config(issuer: I, config: RequestConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, issuer))
    }

    pub(crate) fn from_parts(config: RequestConfig, issuer: I) -> Self {
        Self {
            params: Scoped::new(config.params.clone()),
            headers: Scoped::new(config.custom_headers.clone()),
            endpoints: Scoped::new(config.endpoint.clone()),
            files: Vec::new(),
            config,
            issuer,
        }
    }

    /// Returns the configuration the uploader was created with.
    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// Returns the request issuer.
    pub fn issuer(&self) -> &I {
        &self.issuer
    }

    /// Replaces the uploader-wide params, or one file's params when `file` is set.
    ///
    /// Takes effect for requests prepared after the call returns.
    pub fn set_params(&mut self, params: impl Into<ValueBag>, file: Option<FileId>) {
        self.params.set(params.into(), file);
    }

    /// Returns the params in effect for `file`, or the uploader-wide params.
    pub fn params(&self, file: Option<FileId>) -> &ValueBag {
        match file {
            Some(id) => self.params.effective(id),
            None => self.params.global(),
        }
    }

    /// Replaces the uploader-wide custom headers, or one file's headers when
    /// `file` is set.
    pub fn set_custom_headers(&mut self, headers: impl Into<ValueBag>, file: Option<FileId>) {
        self.headers.set(headers.into(), file);
    }

    /// Returns the custom headers in effect for `file`, or the uploader-wide headers.
    pub fn custom_headers(&self, file: Option<FileId>) -> &ValueBag {
        match file {
            Some(id) => self.headers.effective(id),
            None => self.headers.global(),
        }
    }

    /// Replaces the uploader-wide endpoint, or one file's endpoint when `file` is set.
    pub fn set_endpoint(&mut self, endpoint: impl Into<String>, file: Option<FileId>) {
        self.endpoints.set(endpoint.into(), file);
    }

    /// Returns the endpoint in effect for `file`, or the uploader-wide endpoint.
    pub fn endpoint(&self, file: Option<FileId>) -> &str {
        match file {
            Some(id) => self.endpoints.effective(id),
            None => self.endpoints.global(),
        }
    }

    /// Queues one file and returns its id.
    pub fn add_file(&mut self, file: UploadFile) -> FileId {
        let id = FileId(self.files.len());
        self.files.push(QueuedFile {
            file,
            uuid: Uuid::new_v4(),
            cancel: CancellationToken::new(),
            submitted: false,
        });

        #[cfg(feature = "tracing")]
        tracing::debug!(file_id = id.index(), "uploader: queued file");

        id
    }

    /// Queues files in order and returns their ids.
    pub fn add_files(&mut self, files: impl IntoIterator<Item = UploadFile>) -> Vec<FileId> {
        files.into_iter().map(|file| self.add_file(file)).collect()
    }

    /// Returns the number of queued files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Returns a queued file.
    pub fn file(&self, id: FileId) -> Option<&UploadFile> {
        self.files.get(id.index()).map(|queued| &queued.file)
    }

    /// Returns the UUID assigned to a queued file.
    pub fn uuid(&self, id: FileId) -> Option<Uuid> {
        self.files.get(id.index()).map(|queued| queued.uuid)
    }

    /// Cancels a file's upload.
    ///
    /// A prepared upload whose content has not been read yet issues nothing.
    pub fn cancel(&self, id: FileId) -> Result<(), UploadError> {
        let queued = self.queued(id)?;
        queued.cancel.cancel();

        #[cfg(feature = "tracing")]
        tracing::debug!(file_id = id.index(), "uploader: cancelled file");

        Ok(())
    }

    /// Returns a handle that cancels a file's upload when triggered.
    ///
    /// The handle stays usable while the uploader is borrowed by
    /// [`Uploader::upload`] or [`Uploader::upload_stored_files`].
    pub fn cancel_handle(&self, id: FileId) -> Result<CancellationToken, UploadError> {
        Ok(self.queued(id)?.cancel.clone())
    }

    /// Returns `true` when a file's upload was cancelled.
    pub fn is_cancelled(&self, id: FileId) -> bool {
        self.files
            .get(id.index())
            .is_some_and(|queued| queued.cancel.is_cancelled())
    }

    /// Captures everything needed to upload `id` as it stands right now.
    ///
    /// The returned upload owns copies of the effective params, headers and
    /// endpoint, so later changes to the uploader do not reach it.
    pub fn prepare(&self, id: FileId) -> Result<PendingUpload, UploadError> {
        let queued = self.queued(id)?;
        let mode = self.config.params_mode;
        let target = select_target(mode);
        let transport = select_transport(mode, self.config.force_multipart);

        let encoder = RequestEncoder::new(self.endpoints.snapshot(id))
            .method(self.config.method.clone())
            .transport(transport)
            .header_param_prefix(self.config.header_param_prefix.clone())
            .input_name(self.config.input_name.clone());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            file_id = id.index(),
            mode = mode.as_str(),
            target = ?target,
            transport = ?transport,
            "uploader: prepared upload"
        );

        Ok(PendingUpload {
            id,
            uuid: queued.uuid,
            file: queued.file.clone(),
            params: self.params.snapshot(id),
            headers: self.headers.snapshot(id),
            target,
            encoder,
            cancel: queued.cancel.clone(),
        })
    }

    fn queued(&self, id: FileId) -> Result<&QueuedFile, UploadError> {
        self.files
            .get(id.index())
            .ok_or(UploadError::UnknownFile { id })
    }
}

impl<I> Uploader<I>
where
    I: RequestIssuer,
{
    /// Uploads one queued file.
    pub async fn upload(&mut self, id: FileId) -> Result<I::Output, UploadError> {
        let pending = self.prepare(id)?;
        if let Some(queued) = self.files.get_mut(id.index()) {
            queued.submitted = true;
        }
        pending.run(&self.issuer).await
    }

    /// Uploads every queued file that has not been submitted yet.
    ///
    /// Requests are prepared up front and then run concurrently. Results are
    /// returned in file id order.
    pub async fn upload_stored_files(&mut self) -> Vec<(FileId, Result<I::Output, UploadError>)> {
        let mut ids = Vec::new();
        for (index, queued) in self.files.iter_mut().enumerate() {
            if !queued.submitted {
                queued.submitted = true;
                ids.push(FileId(index));
            }
        }

        let this = &*self;
        let runs = ids.into_iter().map(move |id| {
            let prepared = this.prepare(id);
            async move {
                match prepared {
                    Ok(upload) => (id, upload.run(&this.issuer).await),
                    Err(err) => (id, Err(err)),
                }
            }
        });
        futures::future::join_all(runs).await
    }
}

/// An upload whose parameters and headers are already fixed.
#[derive(Debug)]
pub struct PendingUpload {
    id: FileId,
    uuid: Uuid,
    file: UploadFile,
    params: ValueBag,
    headers: ValueBag,
    target: DeliveryTarget,
    encoder: RequestEncoder,
    cancel: CancellationToken,
}

impl PendingUpload {
    /// Returns the file id.
    pub fn file_id(&self) -> FileId {
        self.id
    }

    /// Returns the captured params.
    pub fn params(&self) -> &ValueBag {
        &self.params
    }

    /// Returns the captured custom headers.
    pub fn headers(&self) -> &ValueBag {
        &self.headers
    }

    /// Returns where params will be delivered.
    pub fn target(&self) -> DeliveryTarget {
        self.target
    }

    /// Reads the file, builds the request and hands both to `issuer`.
    ///
    /// Deferred params are evaluated after the read completes. Cancellation
    /// before that point yields [`UploadError::Cancelled`] and nothing is issued.
    pub async fn run<I>(self, issuer: &I) -> Result<I::Output, UploadError>
    where
        I: RequestIssuer,
    {
        let id = self.id;
        let payload = tokio::select! {
            biased;

            () = self.cancel.cancelled() => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    file_id = id.index(),
                    "uploader: cancelled before read completed"
                );
                return Err(UploadError::Cancelled { id });
            }

            read = self.file.read() => read?,
        };

        if self.cancel.is_cancelled() {
            return Err(UploadError::Cancelled { id });
        }

        let request = self
            .encoder
            .encode(id, self.uuid, &self.params, &self.headers, self.target);

        issuer
            .issue(request, payload)
            .await
            .map_err(|err| UploadError::Transport {
                id,
                source: Box::new(err),
            })
    }
}

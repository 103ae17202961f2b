#![allow(missing_docs)]

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::Notify;
use upload_params::{
    BlobError, BlobSource, FileId, MemoryIssuer, ParamsMode, UploadError, UploadFile, Uploader,
    ValueBag, ValueSource,
};

/// Blob source that resolves only after `release` is notified.
struct GatedBlob {
    release: Arc<Notify>,
}

#[async_trait::async_trait]
impl BlobSource for GatedBlob {
    async fn read(&self) -> Result<Bytes, BlobError> {
        self.release.notified().await;
        Ok(Bytes::from_static(b"gated"))
    }
}

struct FailingBlob;

#[async_trait::async_trait]
impl BlobSource for FailingBlob {
    async fn read(&self) -> Result<Bytes, BlobError> {
        Err(BlobError::new("blob download failed"))
    }
}

fn body_uploader() -> Uploader<MemoryIssuer> {
    Uploader::builder()
        .issuer(MemoryIssuer::new())
        .endpoint("/test/upload")
        .params_mode(ParamsMode::Body)
        .params(ValueBag::new().with("foo", "bar"))
        .build()
        .expect("config should validate")
}

fn bytes_file() -> UploadFile {
    UploadFile::from_bytes("a.txt", mime::TEXT_PLAIN, Bytes::from_static(b"hello"))
}

#[tokio::test]
async fn prepared_upload_ignores_later_param_changes() {
    let mut uploader = body_uploader();
    let id = uploader.add_file(bytes_file());

    let pending = uploader.prepare(id).expect("file is queued");
    uploader.set_params(ValueBag::new().with("foo", "changed"), None);
    uploader.set_params(ValueBag::new(), Some(id));

    let request = pending
        .run(uploader.issuer())
        .await
        .expect("upload should succeed");
    assert_eq!(request.fields.get("foo"), Some("bar"));

    let later = uploader.upload(id).await.expect("upload should succeed");
    assert!(later.fields.is_empty());
}

#[tokio::test]
async fn deferred_params_are_evaluated_after_the_read_resolves() {
    let release = Arc::new(Notify::new());
    let counter = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let seen = Arc::clone(&counter);

    let mut uploader = body_uploader();
    uploader.set_params(
        ValueBag::new().with(
            "count",
            ValueSource::deferred(move || {
                seen.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                "evaluated".to_owned()
            }),
        ),
        None,
    );
    let id = uploader.add_file(UploadFile::new(
        "gated.bin",
        mime::APPLICATION_OCTET_STREAM,
        GatedBlob {
            release: Arc::clone(&release),
        },
    ));

    let pending = uploader.prepare(id).expect("file is queued");
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 0);

    release.notify_one();
    let request = pending
        .run(uploader.issuer())
        .await
        .expect("upload should succeed");

    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(request.fields.get("count"), Some("evaluated"));
}

#[tokio::test]
async fn cancelling_before_read_resolves_issues_nothing() {
    let release = Arc::new(Notify::new());
    let mut uploader = body_uploader();
    let id = uploader.add_file(UploadFile::new(
        "gated.bin",
        mime::APPLICATION_OCTET_STREAM,
        GatedBlob {
            release: Arc::clone(&release),
        },
    ));

    let pending = uploader.prepare(id).expect("file is queued");
    uploader.cancel(id).expect("file is queued");
    assert!(uploader.is_cancelled(id));

    let result = pending.run(uploader.issuer()).await;
    assert!(matches!(result, Err(UploadError::Cancelled { id: cancelled }) if cancelled == id));
    assert!(uploader.issuer().is_empty().await);
}

#[tokio::test]
async fn cancelled_file_is_skipped_by_stored_upload() {
    let mut uploader = body_uploader();
    let ids = uploader.add_files([bytes_file(), bytes_file()]);
    uploader.cancel(ids[0]).expect("file is queued");

    let results = uploader.upload_stored_files().await;

    assert!(matches!(results[0].1, Err(UploadError::Cancelled { .. })));
    assert!(results[1].1.is_ok());
    let requests = uploader.issuer().requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].descriptor.file_id, ids[1]);
}

#[tokio::test]
async fn cancel_handle_stops_an_upload_already_in_flight() {
    let release = Arc::new(Notify::new());
    let mut uploader = body_uploader();
    let id = uploader.add_file(UploadFile::new(
        "gated.bin",
        mime::APPLICATION_OCTET_STREAM,
        GatedBlob {
            release: Arc::clone(&release),
        },
    ));
    let handle = uploader.cancel_handle(id).expect("file is queued");

    let (results, ()) = tokio::join!(uploader.upload_stored_files(), async {
        tokio::task::yield_now().await;
        handle.cancel();
        release.notify_one();
    });

    assert_eq!(results.len(), 1);
    assert!(matches!(results[0].1, Err(UploadError::Cancelled { id: cancelled }) if cancelled == id));
    assert!(uploader.is_cancelled(id));
    assert!(uploader.issuer().is_empty().await);
}

#[tokio::test]
async fn cancel_handle_rejects_unknown_files() {
    let uploader = body_uploader();
    assert!(matches!(
        uploader.cancel_handle(FileId(3)),
        Err(UploadError::UnknownFile { id }) if id == FileId(3)
    ));
}

#[tokio::test]
async fn stored_upload_only_sends_new_files() {
    let mut uploader = body_uploader();
    uploader.add_file(bytes_file());
    assert_eq!(uploader.upload_stored_files().await.len(), 1);

    uploader.add_file(bytes_file());
    let second = uploader.upload_stored_files().await;
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].0, FileId(1));
    assert_eq!(uploader.issuer().len().await, 2);
}

#[tokio::test]
async fn unknown_file_ids_are_rejected() {
    let mut uploader = body_uploader();

    assert!(matches!(
        uploader.prepare(FileId(3)),
        Err(UploadError::UnknownFile { id }) if id == FileId(3)
    ));
    assert!(matches!(
        uploader.cancel(FileId(3)),
        Err(UploadError::UnknownFile { .. })
    ));
    assert!(matches!(
        uploader.upload(FileId(3)).await,
        Err(UploadError::UnknownFile { .. })
    ));
}

#[tokio::test]
async fn blob_read_failures_surface_without_issuing() {
    let mut uploader = body_uploader();
    let id = uploader.add_file(UploadFile::new("broken", mime::TEXT_PLAIN, FailingBlob));

    let result = uploader.upload(id).await;

    assert!(matches!(result, Err(UploadError::Blob(_))));
    assert!(uploader.issuer().is_empty().await);
}

#[tokio::test]
async fn default_issuer_reports_transport_failure() {
    let mut uploader = Uploader::builder().build().expect("default config is valid");
    let id = uploader.add_file(bytes_file());

    let result = uploader.upload(id).await;

    assert!(matches!(result, Err(UploadError::Transport { id: failed, .. }) if failed == id));
}

#[tokio::test]
async fn per_file_endpoint_is_used_for_that_file_only() {
    let mut uploader = body_uploader();
    let ids = uploader.add_files([bytes_file(), bytes_file()]);
    uploader.set_endpoint("/special/upload", Some(ids[1]));

    uploader.upload_stored_files().await;

    let requests = uploader.issuer().requests().await;
    let url_for = |id: FileId| {
        requests
            .iter()
            .find(|request| request.descriptor.file_id == id)
            .map(|request| request.descriptor.url.clone())
    };
    assert_eq!(url_for(ids[0]).as_deref(), Some("/test/upload"));
    assert_eq!(url_for(ids[1]).as_deref(), Some("/special/upload"));
}

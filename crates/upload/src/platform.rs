//! Remote collaborators of the upload flow.
//!
//! `kobiton_api::Client` implements both traits. Keeping the orchestrator
//! behind traits lets the workflow be tested without a network.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use kobiton_api::{Client, NotifyResponse, ProcessingState, UploadUrlResponse};

/// Boxed future returned by the collaborator traits.
pub type ApiFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, kobiton_api::Error>> + Send + 'a>>;

/// The Kobiton API calls the upload flow needs.
pub trait Platform: Send + Sync {
    /// Asks for a presigned storage location for `filename`.
    fn request_upload_url<'a>(
        &'a self,
        filename: &'a str,
        app_id: u64,
    ) -> ApiFuture<'a, UploadUrlResponse>;

    /// Registers a build already stored at `app_path`.
    fn notify_uploaded<'a>(
        &'a self,
        app_path: &'a str,
        filename: &'a str,
    ) -> ApiFuture<'a, NotifyResponse>;

    /// Current processing state; `None` while the version is not visible.
    fn processing_state(&self, version_id: u64) -> ApiFuture<'_, Option<ProcessingState>>;

    /// Sets the display name of a version.
    fn rename<'a>(&'a self, version_id: u64, new_name: &'a str) -> ApiFuture<'a, ()>;
}

/// Destination for the build binary.
pub trait BlobStore: Send + Sync {
    /// PUTs the file at `path` to `url`. `Ok(false)` means storage
    /// answered with something other than 200.
    fn upload<'a>(&'a self, url: &'a str, path: &'a Path) -> ApiFuture<'a, bool>;
}

impl Platform for Client {
    fn request_upload_url<'a>(
        &'a self,
        filename: &'a str,
        app_id: u64,
    ) -> ApiFuture<'a, UploadUrlResponse> {
        Box::pin(Client::request_upload_url(self, filename, app_id))
    }

    fn notify_uploaded<'a>(
        &'a self,
        app_path: &'a str,
        filename: &'a str,
    ) -> ApiFuture<'a, NotifyResponse> {
        Box::pin(Client::notify_uploaded(self, app_path, filename))
    }

    fn processing_state(&self, version_id: u64) -> ApiFuture<'_, Option<ProcessingState>> {
        Box::pin(self.get_processing_state(version_id))
    }

    fn rename<'a>(&'a self, version_id: u64, new_name: &'a str) -> ApiFuture<'a, ()> {
        Box::pin(Client::rename(self, version_id, new_name))
    }
}

impl BlobStore for Client {
    fn upload<'a>(&'a self, url: &'a str, path: &'a Path) -> ApiFuture<'a, bool> {
        Box::pin(self.upload_to_storage(url, path))
    }
}

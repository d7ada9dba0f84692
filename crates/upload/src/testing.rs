//! Scripted collaborators shared by the unit tests.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use kobiton_api::{Error, NotifyResponse, ProcessingState, UploadUrlResponse};

use crate::platform::{ApiFuture, BlobStore, Platform};
use crate::sleeper::Sleeper;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    UploadUrl { filename: String, app_id: u64 },
    Blob { url: String, path: PathBuf },
    Notify { app_path: String, filename: String },
    ProcessingState(u64),
    Rename(u64, String),
}

pub fn api_error(status: u16, body: &str) -> Error {
    Error::Api {
        status,
        body: body.into(),
    }
}

/// Platform and blob store in one, so a single call log shows ordering.
///
/// Unscripted calls succeed with fixed defaults, except state queries,
/// which fail once the script runs out.
pub struct MockPlatform {
    upload_url: Mutex<Option<Result<UploadUrlResponse, Error>>>,
    blob: Mutex<Option<Result<bool, Error>>>,
    notify: Mutex<Option<Result<NotifyResponse, Error>>>,
    states: Mutex<VecDeque<Result<Option<ProcessingState>, Error>>>,
    rename: Mutex<Option<Result<(), Error>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            upload_url: Mutex::new(None),
            blob: Mutex::new(None),
            notify: Mutex::new(None),
            states: Mutex::new(VecDeque::new()),
            rename: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_upload_url(self, reply: Result<UploadUrlResponse, Error>) -> Self {
        *self.upload_url.lock().unwrap() = Some(reply);
        self
    }

    pub fn with_blob(self, reply: Result<bool, Error>) -> Self {
        *self.blob.lock().unwrap() = Some(reply);
        self
    }

    pub fn with_notify(self, reply: Result<NotifyResponse, Error>) -> Self {
        *self.notify.lock().unwrap() = Some(reply);
        self
    }

    pub fn with_states(
        self,
        replies: impl IntoIterator<Item = Result<Option<ProcessingState>, Error>>,
    ) -> Self {
        self.states.lock().unwrap().extend(replies);
        self
    }

    pub fn with_rename(self, reply: Result<(), Error>) -> Self {
        *self.rename.lock().unwrap() = Some(reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Platform for MockPlatform {
    fn request_upload_url<'a>(
        &'a self,
        filename: &'a str,
        app_id: u64,
    ) -> ApiFuture<'a, UploadUrlResponse> {
        self.record(Call::UploadUrl {
            filename: filename.into(),
            app_id,
        });
        let reply = self.upload_url.lock().unwrap().take().unwrap_or_else(|| {
            Ok(UploadUrlResponse {
                app_path: "p1".into(),
                url: "https://s3/x".into(),
            })
        });
        Box::pin(async move { reply })
    }

    fn notify_uploaded<'a>(
        &'a self,
        app_path: &'a str,
        filename: &'a str,
    ) -> ApiFuture<'a, NotifyResponse> {
        self.record(Call::Notify {
            app_path: app_path.into(),
            filename: filename.into(),
        });
        let reply = self.notify.lock().unwrap().take().unwrap_or(Ok(NotifyResponse {
            version_id: 555,
            app_id: None,
        }));
        Box::pin(async move { reply })
    }

    fn processing_state(&self, version_id: u64) -> ApiFuture<'_, Option<ProcessingState>> {
        self.record(Call::ProcessingState(version_id));
        let reply = self
            .states
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(api_error(599, "no scripted state")));
        Box::pin(async move { reply })
    }

    fn rename<'a>(&'a self, version_id: u64, new_name: &'a str) -> ApiFuture<'a, ()> {
        self.record(Call::Rename(version_id, new_name.into()));
        let reply = self.rename.lock().unwrap().take().unwrap_or(Ok(()));
        Box::pin(async move { reply })
    }
}

impl BlobStore for MockPlatform {
    fn upload<'a>(&'a self, url: &'a str, path: &'a Path) -> ApiFuture<'a, bool> {
        self.record(Call::Blob {
            url: url.into(),
            path: path.to_path_buf(),
        });
        let reply = self.blob.lock().unwrap().take().unwrap_or(Ok(true));
        Box::pin(async move { reply })
    }
}

/// Records requested sleeps instead of waiting.
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(
        &self,
        duration: Duration,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send + '_>> {
        self.sleeps.lock().unwrap().push(duration);
        Box::pin(async {})
    }
}

//! Upload orchestrator: sequences the remote steps of one build upload.

use kobiton_api::{Client, ClientConfig, basic_authorization};
use tracing::{debug, info};

use crate::error::{Stage, UploadError};
use crate::platform::{BlobStore, Platform};
use crate::poll::{PollConfig, wait_until_ready};
use crate::request::UploadRequest;
use crate::sleeper::{Sleeper, TokioSleeper};

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub version_id: u64,
    pub app_path: String,
    /// Display name applied to the version, if one was requested.
    pub renamed_to: Option<String>,
}

/// Runtime settings for [`upload_build`].
#[derive(Debug, Clone, Default)]
pub struct UploadSettings {
    pub client: ClientConfig,
    pub poll: PollConfig,
}

/// Uploads one build to Kobiton with the real HTTP client.
///
/// This is the single entry point for callers: it derives the
/// authorization header from the request's credentials, builds the
/// client and runs the full pipeline.
pub async fn upload_build(
    request: &UploadRequest,
    settings: &UploadSettings,
) -> Result<UploadOutcome, UploadError> {
    let authorization = basic_authorization(request.username(), request.api_key());
    let client =
        Client::new(&authorization, settings.client.clone()).map_err(UploadError::Client)?;

    UploadOrchestrator::new(&client, &client, &TokioSleeper)
        .with_poll_config(settings.poll)
        .run(request)
        .await
}

/// Drives the upload pipeline against abstract collaborators.
pub struct UploadOrchestrator<'a> {
    platform: &'a dyn Platform,
    blob: &'a dyn BlobStore,
    sleeper: &'a dyn Sleeper,
    poll: PollConfig,
}

impl<'a> UploadOrchestrator<'a> {
    pub fn new(
        platform: &'a dyn Platform,
        blob: &'a dyn BlobStore,
        sleeper: &'a dyn Sleeper,
    ) -> Self {
        Self {
            platform,
            blob,
            sleeper,
            poll: PollConfig::default(),
        }
    }

    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Runs the pipeline. The first failure ends the run; earlier steps
    /// are not undone.
    pub async fn run(&self, request: &UploadRequest) -> Result<UploadOutcome, UploadError> {
        let filename = request.filename();

        // 1. Presigned upload location
        info!("Getting S3 upload URL...");
        let pair = self
            .platform
            .request_upload_url(filename, request.app_id())
            .await
            .map_err(UploadError::remote(Stage::UploadUrl))?;
        info!("Got S3 upload URL.");
        debug!(app_path = %pair.app_path, url = %pair.url, "upload location");

        // 2. Storage PUT
        info!("Uploading the build to Amazon S3 storage...");
        let uploaded = self
            .blob
            .upload(&pair.url, request.file())
            .await
            .map_err(UploadError::remote(Stage::BlobUpload))?;
        if !uploaded {
            return Err(UploadError::BlobUpload);
        }
        info!("Successfully uploaded the build to Amazon S3 storage.");

        // 3. Register with Kobiton
        let record = self
            .platform
            .notify_uploaded(&pair.app_path, filename)
            .await
            .map_err(UploadError::remote(Stage::Notify))?;
        let version_id = record.version_id;
        info!(version_id, "Successfully uploaded the build to Kobiton!");

        // 4. Optional rename once processed
        let renamed_to = match request.name() {
            Some(name) => {
                let attempts =
                    wait_until_ready(self.platform, self.sleeper, version_id, &self.poll).await?;
                debug!(version_id, attempts, "build processed");

                info!("Updating version name to {name}");
                self.platform
                    .rename(version_id, name)
                    .await
                    .map_err(UploadError::remote(Stage::Rename))?;
                Some(name.to_string())
            }
            None => None,
        };

        Ok(UploadOutcome {
            version_id,
            app_path: pair.app_path,
            renamed_to,
        })
    }
}

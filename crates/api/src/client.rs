//! Kobiton API client.
//!
//! Async HTTP client using `reqwest` with Basic authentication. Storage
//! uploads use a second client without the `Authorization` header, since
//! presigned URLs carry their own credentials.

use std::path::Path;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::types::{
    AppVersion, NotifyRequest, NotifyResponse, ProcessingState, RenameRequest, UploadUrlRequest,
    UploadUrlResponse,
};

pub const DEFAULT_BASE_URL: &str = "https://api.kobiton.com/v1";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Storage tag marking an object as not yet registered with Kobiton.
const UNSAVED_TAGGING: &str = "unsaved=true";

/// Errors from the Kobiton client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("status code {status}, message from server: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid credentials")]
    InvalidCredentials,
}

/// Connection settings for [`Client`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Kobiton API client.
pub struct Client {
    http: reqwest::Client,
    storage: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Creates a new client sending `authorization` with every API call.
    ///
    /// `authorization` is a full header value, see
    /// [`basic_authorization`](crate::auth::basic_authorization).
    pub fn new(authorization: &str, config: ClientConfig) -> Result<Self, Error> {
        let mut auth = HeaderValue::from_str(authorization).map_err(|_| Error::InvalidCredentials)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;
        let storage = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            storage,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Sends a request and turns any non-2xx status into [`Error::Api`].
    async fn send(&self, req: RequestBuilder) -> Result<Response, Error> {
        let resp = req.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp)
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, Error> {
        let body = self.send(req).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Requests a presigned storage URL for a new build of `app_id`.
    pub async fn request_upload_url(
        &self,
        filename: &str,
        app_id: u64,
    ) -> Result<UploadUrlResponse, Error> {
        let req = self
            .http
            .post(self.url("/apps/uploadUrl"))
            .header(ACCEPT, "application/json")
            .json(&UploadUrlRequest { filename, app_id });

        self.send_json(req).await
    }

    /// Registers a build already uploaded to `app_path`.
    pub async fn notify_uploaded(
        &self,
        app_path: &str,
        filename: &str,
    ) -> Result<NotifyResponse, Error> {
        let req = self
            .http
            .post(self.url("/apps"))
            .json(&NotifyRequest { filename, app_path });

        self.send_json(req).await
    }

    /// Returns the processing state of a version.
    ///
    /// A 404 is `Ok(None)`: freshly registered versions take a moment to
    /// become visible.
    pub async fn get_processing_state(
        &self,
        version_id: u64,
    ) -> Result<Option<ProcessingState>, Error> {
        let resp = self
            .http
            .get(self.url(&format!("/app/versions/{version_id}")))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        let status = resp.status();

        if status == StatusCode::NOT_FOUND {
            debug!(version_id, "version not visible yet");
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let version: AppVersion = serde_json::from_slice(&resp.bytes().await?)?;
        Ok(version.state)
    }

    /// Sets the display name of a version.
    pub async fn rename(&self, version_id: u64, new_name: &str) -> Result<(), Error> {
        let req = self
            .http
            .post(self.url(&format!("/app/versions/{version_id}/rename")))
            .json(&RenameRequest { new_name });

        self.send(req).await?;
        Ok(())
    }

    /// PUTs the file at `path` to a presigned storage URL.
    ///
    /// Returns `Ok(true)` only for a 200 response. Any other status is
    /// logged and reported as `Ok(false)`; transport failures are errors.
    pub async fn upload_to_storage(&self, url: &str, path: &Path) -> Result<bool, Error> {
        let data = tokio::fs::read(path).await?;
        debug!(path = %path.display(), bytes = data.len(), "read build file");

        let resp = self
            .storage
            .put(url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header("x-amz-tagging", UNSAVED_TAGGING)
            .body(data)
            .send()
            .await?;
        let status = resp.status();

        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "uploading the binary to S3 failed");
            return Ok(false);
        }

        Ok(true)
    }
}

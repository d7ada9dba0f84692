//! Request and response bodies for the Kobiton API.

use serde::{Deserialize, Serialize};

/// Body of `POST /apps/uploadUrl`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest<'a> {
    pub filename: &'a str,
    pub app_id: u64,
}

/// Presigned upload location returned by `POST /apps/uploadUrl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    /// Server-assigned storage key for the build.
    pub app_path: String,
    /// Presigned PUT destination.
    pub url: String,
}

/// Body of `POST /apps`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyRequest<'a> {
    pub filename: &'a str,
    pub app_path: &'a str,
}

/// Artifact record created by `POST /apps`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyResponse {
    pub version_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<u64>,
}

/// Body of `POST /app/versions/{id}/rename`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest<'a> {
    pub new_name: &'a str,
}

/// Subset of `GET /app/versions/{id}` the upload flow reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppVersion {
    #[serde(default)]
    pub state: Option<ProcessingState>,
}

/// Server-side processing state of an app version.
///
/// Only `OK` is terminal; any other value means the build is still being
/// processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProcessingState {
    Ready,
    Other(String),
}

impl ProcessingState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl From<String> for ProcessingState {
    fn from(s: String) -> Self {
        if s == "OK" { Self::Ready } else { Self::Other(s) }
    }
}

impl From<ProcessingState> for String {
    fn from(state: ProcessingState) -> Self {
        match state {
            ProcessingState::Ready => "OK".into(),
            ProcessingState::Other(s) => s,
        }
    }
}

impl std::fmt::Display for ProcessingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready => f.write_str("OK"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

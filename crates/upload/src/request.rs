//! Validated upload parameters.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::UploadError;

/// Everything needed for one upload run.
///
/// Construction validates every field, so a value of this type is always
/// safe to hand to the orchestrator. Fields cannot change afterwards.
#[derive(Clone)]
pub struct UploadRequest {
    username: String,
    api_key: String,
    file: PathBuf,
    filename: String,
    app_id: u64,
    name: Option<String>,
}

impl UploadRequest {
    /// Validates the raw parameters.
    ///
    /// Rejects empty credentials, an empty or missing build file, and an
    /// app id of 0. An empty `name` is treated as no name.
    pub fn new(
        username: impl Into<String>,
        api_key: impl Into<String>,
        file: impl Into<PathBuf>,
        app_id: u64,
        name: Option<String>,
    ) -> Result<Self, UploadError> {
        let username = username.into();
        let api_key = api_key.into();
        let file = file.into();

        if api_key.is_empty() {
            return Err(UploadError::Validation(
                "No API key given, pass using `--api-key <token>`".into(),
            ));
        }
        if username.is_empty() {
            return Err(UploadError::Validation(
                "No username/email given, pass using `--username <username/email>`".into(),
            ));
        }
        if file.as_os_str().is_empty() {
            return Err(UploadError::Validation(
                "No build file given, pass using `--file <file_path>`".into(),
            ));
        }
        if app_id == 0 {
            return Err(UploadError::Validation(
                "No app ID or value 0 given, pass using `--app-id <app_id>`".into(),
            ));
        }
        if !file.is_file() {
            return Err(UploadError::Validation(format!(
                "build file not found: {}",
                file.display()
            )));
        }

        let filename = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                UploadError::Validation(format!("build file has no name: {}", file.display()))
            })?;

        Ok(Self {
            username,
            api_key,
            file,
            filename,
            app_id,
            name: name.filter(|n| !n.is_empty()),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Base name of the build file, as sent to Kobiton.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn app_id(&self) -> u64 {
        self.app_id
    }

    /// Display name to apply once the build is processed.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadRequest")
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .field("file", &self.file)
            .field("app_id", &self.app_id)
            .field("name", &self.name)
            .finish()
    }
}

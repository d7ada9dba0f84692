//! Upload error types.

/// Remote step of the upload flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    UploadUrl,
    BlobUpload,
    Notify,
    ProcessingState,
    Rename,
}

impl Stage {
    fn failure_prefix(self) -> &'static str {
        match self {
            Self::UploadUrl => "S3 URL retrieval failed",
            Self::BlobUpload => "Uploading the binary to S3 failed",
            Self::Notify => "Kobiton could not be notified",
            Self::ProcessingState => "App status could not be received",
            Self::Rename => "App could not be renamed",
        }
    }
}

/// Errors that end an upload run.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("{0}")]
    Validation(String),

    #[error("could not create API client: {0}")]
    Client(#[source] kobiton_api::Error),

    #[error("{}", remote_message(.stage, .source))]
    Remote {
        stage: Stage,
        #[source]
        source: kobiton_api::Error,
    },

    #[error("Failed to upload the build to Amazon S3 storage.")]
    BlobUpload,

    #[error("App is taking a long time to process, could not rename.")]
    ProcessingTimeout { attempts: u32 },
}

impl UploadError {
    pub(crate) fn remote(stage: Stage) -> impl FnOnce(kobiton_api::Error) -> Self {
        move |source| Self::Remote { stage, source }
    }

    /// HTTP status of a rejected API call, if that is what ended the run.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote {
                source: kobiton_api::Error::Api { status, .. },
                ..
            } => Some(*status),
            _ => None,
        }
    }
}

fn remote_message(stage: &Stage, source: &kobiton_api::Error) -> String {
    let stage = *stage;
    let prefix = stage.failure_prefix();
    let kobiton_api::Error::Api { status, body } = source else {
        return format!("{prefix}: {source}");
    };

    match stage {
        Stage::UploadUrl => format!("{prefix} status code {status}, message from server: {body}"),
        Stage::BlobUpload => format!("{prefix} with status code {status}, message: {body}"),
        Stage::ProcessingState => format!("{prefix}: {status}, message: {body}"),
        Stage::Notify | Stage::Rename => {
            format!("{prefix}, status code: {status}, message: {body}")
        }
    }
}

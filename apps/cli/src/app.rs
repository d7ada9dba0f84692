//! Wires arguments and configuration into one upload run.

use kobiton_upload::{UploadError, UploadRequest, upload_build};

use crate::cli::Args;
use crate::config::Config;

/// Validates the inputs and runs the upload.
pub async fn run(args: Args, config: Config) -> anyhow::Result<()> {
    let request = build_request(&args, &config)?;
    tracing::debug!(?request, "upload request validated");

    let settings = config.settings(args.base_url.as_deref());
    let outcome = upload_build(&request, &settings).await?;

    tracing::info!(
        version_id = outcome.version_id,
        app_path = %outcome.app_path,
        name = outcome.renamed_to.as_deref().unwrap_or("-"),
        "upload finished"
    );
    Ok(())
}

/// Merges flags/env with the config file. Flags and env win.
fn build_request(args: &Args, config: &Config) -> Result<UploadRequest, UploadError> {
    let username = args
        .username
        .clone()
        .or_else(|| config.username.clone())
        .unwrap_or_default();
    let api_key = args
        .api_key
        .clone()
        .or_else(|| config.api_key.clone())
        .unwrap_or_default();

    UploadRequest::new(
        username,
        api_key,
        args.file.clone().unwrap_or_default(),
        args.app_id.unwrap_or(0),
        args.name.clone(),
    )
}

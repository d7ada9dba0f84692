//! Build upload flow for Kobiton.
//!
//! This crate implements the **workflow** for pushing one mobile build
//! to Kobiton. The HTTP details live in `kobiton-api`; the orchestrator
//! only talks to the [`Platform`] and [`BlobStore`] traits, so the whole
//! pipeline can be exercised with mocks.
//!
//! # Pipeline
//!
//! 1. **Upload URL**: ask Kobiton for a presigned storage location
//! 2. **Storage**: PUT the build file to that location
//! 3. **Notify**: register the uploaded build, yielding a version id
//! 4. **Poll**: (only with a display name) wait until the version is `OK`
//! 5. **Rename**: (only with a display name) set the version's name
//!
//! Every failure aborts the run. Nothing is rolled back.

pub mod error;
pub mod orchestrator;
pub mod platform;
pub mod poll;
pub mod request;
pub mod sleeper;

#[cfg(test)]
mod testing;

pub use error::{Stage, UploadError};
pub use orchestrator::{UploadOrchestrator, UploadOutcome, UploadSettings, upload_build};
pub use platform::{ApiFuture, BlobStore, Platform};
pub use poll::{PollConfig, PollState};
pub use request::UploadRequest;
pub use sleeper::{Sleeper, TokioSleeper};

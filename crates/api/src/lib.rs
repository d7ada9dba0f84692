//! Kobiton REST API client for build uploads.
//!
//! Provides an async client for the [Kobiton](https://kobiton.com) API v1:
//! requesting a presigned upload URL, registering the uploaded build,
//! polling a version's processing state and renaming it. The binary itself
//! goes straight to the presigned storage URL, never through the API.

pub mod auth;
pub mod client;
pub mod types;

pub use auth::basic_authorization;
pub use client::{Client, ClientConfig, DEFAULT_BASE_URL, Error};
pub use types::{AppVersion, NotifyResponse, ProcessingState, UploadUrlResponse};

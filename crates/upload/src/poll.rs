//! Bounded wait for a version to finish server-side processing.

use std::time::Duration;

use kobiton_api::ProcessingState;
use tracing::{debug, info, warn};

use crate::error::{Stage, UploadError};
use crate::platform::Platform;
use crate::sleeper::Sleeper;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

/// Poll budget. The attempt count, not elapsed time, bounds the wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
        }
    }
}

/// State of the poll loop after a given number of state queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Polling { attempts: u32 },
    Ready { attempts: u32 },
    TimedOut { attempts: u32 },
}

impl PollState {
    /// Folds one query result into the loop state.
    ///
    /// A ready answer wins even on the last allowed attempt.
    pub fn advance(self, observed: Option<&ProcessingState>, max_attempts: u32) -> Self {
        let Self::Polling { attempts } = self else {
            return self;
        };
        let attempts = attempts + 1;

        if observed.is_some_and(ProcessingState::is_ready) {
            Self::Ready { attempts }
        } else if attempts >= max_attempts {
            Self::TimedOut { attempts }
        } else {
            Self::Polling { attempts }
        }
    }
}

/// Polls `version_id` until it reports `OK`.
///
/// Returns the number of state queries made. A 404 from the platform
/// counts as "not ready yet"; any other API failure ends the wait.
pub async fn wait_until_ready(
    platform: &dyn Platform,
    sleeper: &dyn Sleeper,
    version_id: u64,
    config: &PollConfig,
) -> Result<u32, UploadError> {
    let mut state = PollState::Polling { attempts: 0 };

    loop {
        match state {
            PollState::Polling { .. } => {
                info!("Waiting for build to finish processing...");
                let observed = platform
                    .processing_state(version_id)
                    .await
                    .map_err(UploadError::remote(Stage::ProcessingState))?;

                state = state.advance(observed.as_ref(), config.max_attempts);
                debug!(version_id, ?observed, ?state, "processing state polled");

                if matches!(state, PollState::Polling { .. }) {
                    sleeper.sleep(config.interval).await;
                }
            }
            PollState::Ready { attempts } => return Ok(attempts),
            PollState::TimedOut { attempts } => {
                warn!(version_id, attempts, "build still processing, giving up");
                return Err(UploadError::ProcessingTimeout { attempts });
            }
        }
    }
}

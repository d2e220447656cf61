//! Period generation settings

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_RETRY_BACKOFF_MS: u64 = 10_000;
const MAX_PREVIEW_WINDOWS: usize = 52;

/// Tuning for the generation and preview handlers.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// Pause before the single retry of a transient store failure
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Number of upcoming windows listed by the preview endpoint
    #[serde(default = "default_preview_window_count")]
    pub preview_window_count: usize,
}

impl GenerationConfig {
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.retry_backoff_ms > MAX_RETRY_BACKOFF_MS {
            return Err(ValidationError::RetryBackoffTooLarge);
        }
        if !(1..=MAX_PREVIEW_WINDOWS).contains(&self.preview_window_count) {
            return Err(ValidationError::InvalidPreviewWindowCount);
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            retry_backoff_ms: default_retry_backoff_ms(),
            preview_window_count: default_preview_window_count(),
        }
    }
}

fn default_retry_backoff_ms() -> u64 {
    200
}

fn default_preview_window_count() -> usize {
    6
}

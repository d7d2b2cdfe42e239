use std::time::Duration;

use serde::Deserialize;

use crate::controller::SubmissionSettings;
use crate::rate_limit::{MAX_ATTEMPTS, RateLimitPolicy, STORAGE_KEY, WINDOW};

/// Tunables of the contact form, deserializable from a config file section.
///
/// Every key is optional; missing keys fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContactSettings {
    pub max_attempts: u32,
    pub window_secs: u64,
    pub revert_delay_ms: u64,
    pub recipient_label: String,
    pub phone_placeholder: String,
    pub storage_key: String,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            window_secs: WINDOW.as_secs(),
            revert_delay_ms: 3_000,
            recipient_label: "Astreus".into(),
            phone_placeholder: "Not provided".into(),
            storage_key: STORAGE_KEY.into(),
        }
    }
}

impl ContactSettings {
    pub fn policy(&self) -> RateLimitPolicy {
        RateLimitPolicy {
            max_attempts: self.max_attempts,
            window: Duration::from_secs(self.window_secs),
        }
    }

    pub fn submission(&self) -> SubmissionSettings {
        SubmissionSettings {
            revert_delay: Duration::from_millis(self.revert_delay_ms),
            recipient_label: self.recipient_label.clone(),
            phone_placeholder: self.phone_placeholder.clone(),
        }
    }
}

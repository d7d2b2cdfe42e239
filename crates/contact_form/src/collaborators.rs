//! Capability interfaces the submission controller talks to.
//!
//! - `NoticeChannel`: fire-and-forget user notices (toasts, status lines)
//! - `ConfirmationPrompt`: modal yes/no decisions
//! - `NotificationSender`: delivers the validated payload
//!
//! Front-ends provide the implementations; the core never renders or sends
//! anything itself.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::errors::DeliveryError;
use crate::state::FormData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// A user-facing notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(title: impl Into<String>, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
        }
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, Severity::Info)
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, Severity::Success)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, Severity::Error)
    }
}

pub trait NoticeChannel: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Answer of a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Confirmed,
    Cancelled,
}

/// Read-only summary shown before sending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recap {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
}

impl From<&FormData> for Recap {
    fn from(data: &FormData) -> Self {
        Self {
            name: data.name.clone(),
            email: data.email.clone(),
            phone: data.phone().map(str::to_string),
            subject: data.subject.clone(),
        }
    }
}

pub trait ConfirmationPrompt: Send + Sync {
    /// Show the recap and ask whether to send.
    fn confirm_send<'a>(&'a self, recap: &'a Recap) -> BoxFuture<'a, Decision>;

    /// Ask whether a non-empty form should really be cleared.
    fn confirm_clear(&self) -> BoxFuture<'_, Decision>;
}

/// Structured payload handed to the notification sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundPayload {
    pub sender_name: String,
    pub sender_email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub recipient_label: String,
}

impl OutboundPayload {
    /// Build from a validated snapshot. A missing phone becomes `phone_placeholder`.
    /// The email is sent trimmed, as it was validated.
    pub fn from_form(data: &FormData, phone_placeholder: &str, recipient_label: &str) -> Self {
        Self {
            sender_name: data.name.clone(),
            sender_email: data.email.trim().to_string(),
            phone: data
                .phone()
                .map_or_else(|| phone_placeholder.to_string(), str::to_string),
            subject: data.subject.clone(),
            message: data.message.clone(),
            recipient_label: recipient_label.to_string(),
        }
    }
}

pub trait NotificationSender: Send + Sync {
    /// Deliver `payload`. Any error is treated as a delivery failure; timeouts
    /// are the implementation's business.
    fn send(&self, payload: OutboundPayload) -> BoxFuture<'_, Result<(), DeliveryError>>;
}

//! Submission state machine.
//!
//! ```text
//!   idle ──submit intent──► validate_all ──fail──► idle (notice)
//!                               │ ok
//!                               ▼
//!                  awaiting confirmation ──cancel──► idle, form untouched
//!                               │ confirm
//!                               ▼
//!                     rate limiter ──limited──► idle (notice)
//!                               │ allowed
//!                               ▼
//!                          submitting ──► success (form reset) ─┐
//!                                    └──► error (form kept)  ───┴─► idle after delay
//! ```
//!
//! The status is published through a `watch` channel so a front-end can
//! observe the cosmetic `success`/`error` → `idle` revert without polling.
//! Only one send is ever in flight: `confirm` holds `&mut self` across the
//! await and the status gate rejects re-entry.

use std::sync::Arc;
use std::time::Duration;

use strum::Display;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::collaborators::{
    ConfirmationPrompt, Decision, Notice, NoticeChannel, NotificationSender, OutboundPayload,
    Recap,
};
use crate::field::Field;
use crate::rate_limit::{RateDecision, RateLimiter};
use crate::state::FormState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

/// Result of one pass through the submit flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Whole-form validation failed; field errors are populated.
    Invalid,
    /// The user backed out at the confirmation step.
    Cancelled,
    RateLimited { minutes_remaining: u64 },
    Sent,
    /// The sender rejected; the form keeps its values for a retry.
    DeliveryFailed,
    /// Nothing to do: no pending confirmation, or a send is in flight.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    AlreadyEmpty,
    Cleared,
    Cancelled,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionSettings {
    pub revert_delay: Duration,
    pub recipient_label: String,
    pub phone_placeholder: String,
}

/// External capabilities the controller depends on.
#[derive(Clone)]
pub struct Collaborators {
    pub sender: Arc<dyn NotificationSender>,
    pub prompt: Arc<dyn ConfirmationPrompt>,
    pub notices: Arc<dyn NoticeChannel>,
}

pub struct SubmissionController {
    form: FormState,
    limiter: RateLimiter,
    collaborators: Collaborators,
    settings: SubmissionSettings,
    status: Arc<watch::Sender<SubmissionStatus>>,
    awaiting_confirmation: bool,
    pending_revert: Option<CancellationToken>,
}

impl SubmissionController {
    pub fn new(
        limiter: RateLimiter,
        collaborators: Collaborators,
        settings: SubmissionSettings,
    ) -> Self {
        let (status, _) = watch::channel(SubmissionStatus::Idle);
        Self {
            form: FormState::default(),
            limiter,
            collaborators,
            settings,
            status: Arc::new(status),
            awaiting_confirmation: false,
            pending_revert: None,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn status(&self) -> SubmissionStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionStatus> {
        self.status.subscribe()
    }

    pub fn is_awaiting_confirmation(&self) -> bool {
        self.awaiting_confirmation
    }

    /// Submit and clear are both disabled while a send is in flight.
    pub fn can_submit(&self) -> bool {
        self.status() != SubmissionStatus::Submitting
    }

    pub fn can_clear(&self) -> bool {
        self.can_submit()
    }

    /// Edit a field. An edit while a confirmation is pending withdraws it,
    /// since the recap no longer matches the form.
    pub fn update_field(&mut self, field: Field, value: &str) -> bool {
        if self.awaiting_confirmation {
            debug!(%field, "edit during confirmation; withdrawing it");
            self.awaiting_confirmation = false;
        }
        self.form.update_field(field, value)
    }

    pub fn handle_blur(&mut self, field: Field) {
        self.form.handle_blur(field);
    }

    /// Step one of a submission: validate and, if the form is complete,
    /// enter the confirmation gate. Returns the recap to present.
    ///
    /// No storage or network side effects happen here.
    pub fn request_submit(&mut self) -> Option<Recap> {
        if !self.can_submit() {
            debug!("submit requested while a send is in flight; ignored");
            return None;
        }
        if !self.form.validate_all() {
            self.notify(Notice::error(
                "Invalid fields",
                "Please fix the errors in the form.",
            ));
            return None;
        }
        self.awaiting_confirmation = true;
        Some(Recap::from(self.form.data()))
    }

    /// Back out of the confirmation step. The form stays exactly as entered.
    pub fn cancel(&mut self) {
        if self.awaiting_confirmation {
            debug!("submission cancelled at confirmation");
        }
        self.awaiting_confirmation = false;
    }

    /// Confirmation accepted: consult the rate limiter, then send.
    pub async fn confirm(&mut self) -> SubmitOutcome {
        if !self.awaiting_confirmation || !self.can_submit() {
            return SubmitOutcome::Ignored;
        }
        self.awaiting_confirmation = false;

        if let RateDecision::Limited { minutes_remaining } = self.limiter.check_and_record() {
            self.notify(Notice::error(
                "Submission limit reached",
                format!("Please wait {minutes_remaining} minutes before sending again."),
            ));
            return SubmitOutcome::RateLimited { minutes_remaining };
        }

        // a fresher status must not be clobbered by an older revert
        self.cancel_pending_revert();
        self.status.send_replace(SubmissionStatus::Submitting);

        let payload = OutboundPayload::from_form(
            self.form.data(),
            &self.settings.phone_placeholder,
            &self.settings.recipient_label,
        );
        let delivered = self.collaborators.sender.send(payload).await;
        let outcome = match delivered {
            Ok(()) => {
                info!("contact message delivered");
                self.status.send_replace(SubmissionStatus::Success);
                self.form.reset_form();
                self.notify(Notice::success(
                    "Message sent!",
                    "We will get back to you soon.",
                ));
                SubmitOutcome::Sent
            }
            Err(e) => {
                warn!(reason = %e.reason, "contact message delivery failed");
                self.status.send_replace(SubmissionStatus::Error);
                self.notify(Notice::error(
                    "Failed to send message",
                    "Something went wrong while sending your message. Please try again.",
                ));
                SubmitOutcome::DeliveryFailed
            }
        };
        self.schedule_revert();
        outcome
    }

    /// Full submit flow, asking the injected prompt for confirmation.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.can_submit() {
            return SubmitOutcome::Ignored;
        }
        let Some(recap) = self.request_submit() else {
            return SubmitOutcome::Invalid;
        };
        let prompt = Arc::clone(&self.collaborators.prompt);
        match prompt.confirm_send(&recap).await {
            Decision::Confirmed => self.confirm().await,
            Decision::Cancelled => {
                self.cancel();
                SubmitOutcome::Cancelled
            }
        }
    }

    /// Clear every field after the user confirms. An empty form is left alone.
    pub async fn clear(&mut self) -> ClearOutcome {
        if !self.can_clear() {
            return ClearOutcome::Ignored;
        }
        if self.form.is_empty() {
            return ClearOutcome::AlreadyEmpty;
        }
        let prompt = Arc::clone(&self.collaborators.prompt);
        match prompt.confirm_clear().await {
            Decision::Confirmed => {
                self.awaiting_confirmation = false;
                self.form.reset_form();
                self.notify(Notice::info("Form cleared", "All fields were reset."));
                ClearOutcome::Cleared
            }
            Decision::Cancelled => ClearOutcome::Cancelled,
        }
    }

    fn notify(&self, notice: Notice) {
        debug!(title = %notice.title, severity = ?notice.severity, "notice");
        self.collaborators.notices.notify(notice);
    }

    fn schedule_revert(&mut self) {
        self.cancel_pending_revert();
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let status = Arc::clone(&self.status);
        let delay = self.settings.revert_delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    status.send_if_modified(|s| {
                        if matches!(s, SubmissionStatus::Success | SubmissionStatus::Error) {
                            *s = SubmissionStatus::Idle;
                            true
                        } else {
                            false
                        }
                    });
                }
            }
        });
        self.pending_revert = Some(token);
    }

    fn cancel_pending_revert(&mut self) {
        if let Some(token) = self.pending_revert.take() {
            token.cancel();
        }
    }
}

impl Drop for SubmissionController {
    fn drop(&mut self) {
        self.cancel_pending_revert();
    }
}

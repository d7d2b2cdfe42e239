//! Contact form core.
//!
//! Field validation, per-session form state, an advisory client-side rate
//! limiter and the submission state machine that ties them together. Every
//! side effect (durable storage, user notices, confirmation dialogs and the
//! actual message delivery) goes through a capability trait injected at
//! construction, so front-ends decide how they are realised.
//!
//! ```ignore
//! let storage = Arc::new(InMemoryStorage::default());
//! let limiter = RateLimiter::new(storage, RateLimitPolicy::default());
//! let mut controller = SubmissionController::new(
//!     limiter,
//!     Collaborators { sender, prompt, notices },
//!     ContactSettings::default().submission(),
//! );
//! controller.update_field(Field::Name, "John Silva");
//! let outcome = controller.submit().await;
//! ```

pub mod collaborators;
pub mod controller;
pub mod errors;
pub mod field;
pub mod rate_limit;
pub mod settings;
pub mod state;
pub mod storage;
pub mod validator;

pub use collaborators::{
    ConfirmationPrompt, Decision, NoticeChannel, NotificationSender, Notice, OutboundPayload,
    Recap, Severity,
};
pub use controller::{
    ClearOutcome, Collaborators, SubmissionController, SubmissionSettings, SubmissionStatus,
    SubmitOutcome,
};
pub use errors::{DeliveryError, StorageError};
pub use field::Field;
pub use rate_limit::{
    Clock, ManualClock, RateDecision, RateLimitPolicy, RateLimitRecord, RateLimiter, SystemClock,
};
pub use settings::ContactSettings;
pub use state::{FormData, FormState, ValidationState};
pub use storage::{ClientStorage, FileStorage, InMemoryStorage};
pub use validator::{FieldError, validate};

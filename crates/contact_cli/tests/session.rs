//! Console sessions driven by scripted input.

use std::sync::{Arc, Mutex};

use contact_cli::app::{limiter, run_session};
use contact_cli::console::Console;
use contact_form::{
    Collaborators, ContactSettings, DeliveryError, Field, InMemoryStorage, NotificationSender,
    OutboundPayload, SubmissionController, SubmitOutcome,
};
use futures::future::BoxFuture;
use futures::FutureExt;
use pretty_assertions::assert_eq;

#[derive(Default)]
struct Outbox {
    sent: Mutex<Vec<OutboundPayload>>,
    fail: bool,
}

impl Outbox {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn sent(&self) -> Vec<OutboundPayload> {
        self.sent.lock().unwrap().clone()
    }
}

impl NotificationSender for Outbox {
    fn send(&self, payload: OutboundPayload) -> BoxFuture<'_, Result<(), DeliveryError>> {
        async move {
            self.sent.lock().unwrap().push(payload);
            if self.fail {
                Err(DeliveryError::new("smtp down"))
            } else {
                Ok(())
            }
        }
        .boxed()
    }
}

fn session(
    input: &'static str,
    assume_yes: bool,
    outbox: Arc<Outbox>,
) -> (SubmissionController, Arc<Console<&'static [u8]>>) {
    let console = Arc::new(Console::new(input.as_bytes(), assume_yes));
    let settings = ContactSettings::default();
    let controller = SubmissionController::new(
        limiter(Arc::new(InMemoryStorage::default()), &settings),
        Collaborators {
            sender: outbox,
            prompt: console.clone(),
            notices: console.clone(),
        },
        settings.submission(),
    );
    (controller, console)
}

#[tokio::test]
async fn typed_form_is_sent_after_confirmation() {
    let outbox = Arc::new(Outbox::default());
    let (controller, console) = session(
        "John Silva\njohn@example.com\n\nQuote\nHello there, testing.\ny\n",
        false,
        outbox.clone(),
    );

    let outcome = run_session(controller, &console, &[]).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Sent);

    let sent = outbox.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].sender_email, "john@example.com");
    assert_eq!(sent[0].phone, "Not provided");
}

#[tokio::test]
async fn invalid_input_is_asked_again() {
    let outbox = Arc::new(Outbox::default());
    let (controller, console) = session(
        "J\nJohn Silva\nnot-an-email\njohn@example.com\n123\n(86) 99436-9763\nHi\nQuote\nshort\nHello there, testing.\ny\n",
        false,
        outbox.clone(),
    );

    let outcome = run_session(controller, &console, &[]).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Sent);

    let sent = outbox.sent();
    assert_eq!(sent[0].sender_name, "John Silva");
    assert_eq!(sent[0].phone, "(86) 99436-9763");
    assert_eq!(sent[0].message, "Hello there, testing.");
}

#[tokio::test]
async fn prefilled_form_with_yes_reads_nothing() {
    let outbox = Arc::new(Outbox::default());
    let (controller, console) = session("", true, outbox.clone());
    let prefilled = [
        (Field::Name, "John Silva"),
        (Field::Email, "john@example.com"),
        (Field::Phone, ""),
        (Field::Subject, "Quote"),
        (Field::Message, "Hello there, testing."),
    ];

    let outcome = run_session(controller, &console, &prefilled).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Sent);
    assert_eq!(outbox.sent().len(), 1);
}

#[tokio::test]
async fn declined_confirmation_and_kept_form_sends_nothing() {
    let outbox = Arc::new(Outbox::default());
    let (controller, console) = session(
        "John Silva\njohn@example.com\n\nQuote\nHello there, testing.\nn\nn\n",
        false,
        outbox.clone(),
    );

    let outcome = run_session(controller, &console, &[]).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Cancelled);
    assert!(outbox.sent().is_empty());
}

#[tokio::test]
async fn closed_input_ends_the_session_with_an_error() {
    let outbox = Arc::new(Outbox::default());
    let (controller, console) = session("John Silva\n", false, outbox.clone());

    assert!(run_session(controller, &console, &[]).await.is_err());
    assert!(outbox.sent().is_empty());
}

#[tokio::test]
async fn retrying_a_failing_sender_runs_into_the_throttle() {
    let outbox = Arc::new(Outbox::failing());
    let (controller, console) = session("", true, outbox.clone());
    let prefilled = [
        (Field::Name, "John Silva"),
        (Field::Email, "john@example.com"),
        (Field::Phone, ""),
        (Field::Subject, "Quote"),
        (Field::Message, "Hello there, testing."),
    ];

    let outcome = run_session(controller, &console, &prefilled).await.unwrap();
    assert_eq!(
        outcome,
        SubmitOutcome::RateLimited {
            minutes_remaining: 60
        }
    );
    assert_eq!(outbox.sent().len(), 3);
}

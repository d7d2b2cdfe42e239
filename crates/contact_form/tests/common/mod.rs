//! Shared fakes for the submission flow tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use contact_form::{
    Collaborators, ConfirmationPrompt, ContactSettings, Decision, DeliveryError, Field,
    InMemoryStorage, ManualClock, Notice, NoticeChannel, NotificationSender, OutboundPayload,
    RateLimiter, Recap, SubmissionController,
};
use futures::FutureExt;
use futures::future::BoxFuture;

pub const T0: i64 = 1_700_000_000_000;

#[derive(Default)]
pub struct RecordingNotices {
    seen: Mutex<Vec<Notice>>,
}

impl RecordingNotices {
    pub fn titles(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }

    pub fn last(&self) -> Option<Notice> {
        self.seen.lock().unwrap().last().cloned()
    }
}

impl NoticeChannel for RecordingNotices {
    fn notify(&self, notice: Notice) {
        self.seen.lock().unwrap().push(notice);
    }
}

pub struct ScriptedPrompt {
    send_decision: Mutex<Decision>,
    clear_decision: Mutex<Decision>,
    shown: Mutex<Vec<Recap>>,
    clear_asked: AtomicUsize,
}

impl Default for ScriptedPrompt {
    fn default() -> Self {
        Self {
            send_decision: Mutex::new(Decision::Confirmed),
            clear_decision: Mutex::new(Decision::Confirmed),
            shown: Mutex::default(),
            clear_asked: AtomicUsize::new(0),
        }
    }
}

impl ScriptedPrompt {
    pub fn answer_send(&self, decision: Decision) {
        *self.send_decision.lock().unwrap() = decision;
    }

    pub fn answer_clear(&self, decision: Decision) {
        *self.clear_decision.lock().unwrap() = decision;
    }

    pub fn recaps(&self) -> Vec<Recap> {
        self.shown.lock().unwrap().clone()
    }

    pub fn clear_prompts(&self) -> usize {
        self.clear_asked.load(Ordering::SeqCst)
    }
}

impl ConfirmationPrompt for ScriptedPrompt {
    fn confirm_send<'a>(&'a self, recap: &'a Recap) -> BoxFuture<'a, Decision> {
        self.shown.lock().unwrap().push(recap.clone());
        let decision = *self.send_decision.lock().unwrap();
        futures::future::ready(decision).boxed()
    }

    fn confirm_clear(&self) -> BoxFuture<'_, Decision> {
        self.clear_asked.fetch_add(1, Ordering::SeqCst);
        let decision = *self.clear_decision.lock().unwrap();
        futures::future::ready(decision).boxed()
    }
}

#[derive(Default)]
pub struct FakeSender {
    fail: AtomicBool,
    sent: Mutex<Vec<OutboundPayload>>,
}

impl FakeSender {
    pub fn fail_with_next(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn payloads(&self) -> Vec<OutboundPayload> {
        self.sent.lock().unwrap().clone()
    }
}

impl NotificationSender for FakeSender {
    fn send(&self, payload: OutboundPayload) -> BoxFuture<'_, Result<(), DeliveryError>> {
        self.sent.lock().unwrap().push(payload);
        let result = if self.fail.load(Ordering::SeqCst) {
            Err(DeliveryError::new("mail relay unreachable"))
        } else {
            Ok(())
        };
        futures::future::ready(result).boxed()
    }
}

pub struct Harness {
    pub controller: SubmissionController,
    pub notices: Arc<RecordingNotices>,
    pub prompt: Arc<ScriptedPrompt>,
    pub sender: Arc<FakeSender>,
    pub clock: Arc<ManualClock>,
}

pub fn harness() -> Harness {
    harness_with_storage(Arc::new(InMemoryStorage::default()))
}

pub fn harness_with_storage(storage: Arc<InMemoryStorage>) -> Harness {
    let settings = ContactSettings::default();
    let clock = Arc::new(ManualClock::at(T0));
    let limiter = RateLimiter::new(storage, settings.policy()).with_clock(clock.clone());
    let notices = Arc::new(RecordingNotices::default());
    let prompt = Arc::new(ScriptedPrompt::default());
    let sender = Arc::new(FakeSender::default());
    let controller = SubmissionController::new(
        limiter,
        Collaborators {
            sender: sender.clone(),
            prompt: prompt.clone(),
            notices: notices.clone(),
        },
        settings.submission(),
    );
    Harness {
        controller,
        notices,
        prompt,
        sender,
        clock,
    }
}

pub fn fill_valid(controller: &mut SubmissionController) {
    controller.update_field(Field::Name, "John Silva");
    controller.update_field(Field::Email, "a@b.com");
    controller.update_field(Field::Subject, "Hi!");
    controller.update_field(Field::Message, "Hello there, testing.");
}

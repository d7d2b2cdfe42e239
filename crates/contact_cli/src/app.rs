use std::sync::Arc;

use chrono::DateTime;
use color_eyre::eyre::{bail, eyre};
use color_eyre::Result;
use contact_form::{
    ClearOutcome, ClientStorage, Clock, Collaborators, ContactSettings, Decision, Field,
    FileStorage, NotificationSender, RateLimitPolicy, RateLimitRecord, RateLimiter,
    SubmissionController, SubmitOutcome, SystemClock,
};
use tokio::io::AsyncBufRead;
use tracing::{debug, info};

use crate::cli::SubmitArgs;
use crate::config::Config;
use crate::console::{field_prompt, Console};
use crate::sender::{EmailJsSender, LogSender};

pub fn limiter(storage: Arc<dyn ClientStorage>, settings: &ContactSettings) -> RateLimiter {
    RateLimiter::new(storage, settings.policy()).with_key(settings.storage_key.clone())
}

fn build_sender(args: &SubmitArgs, config: &Config) -> Result<Arc<dyn NotificationSender>> {
    if args.dry_run {
        return Ok(Arc::new(LogSender));
    }
    let emailjs = config.emailjs.clone().ok_or_else(|| {
        eyre!("no [emailjs] section configured; add one to config.toml or use --dry-run")
    })?;
    Ok(Arc::new(EmailJsSender::new(emailjs)?))
}

/// `contact submit`
pub async fn submit(args: SubmitArgs, config: &Config) -> Result<SubmitOutcome> {
    let sender = build_sender(&args, config)?;
    let storage = Arc::new(FileStorage::open(config.storage_path())?);
    let console = Arc::new(Console::stdin(args.yes));
    let controller = SubmissionController::new(
        limiter(storage, &config.contact),
        Collaborators {
            sender,
            prompt: console.clone(),
            notices: console.clone(),
        },
        config.contact.submission(),
    );
    run_session(controller, &console, &args.prefilled()).await
}

/// Drive one form session to a terminal outcome.
///
/// Prefilled values are entered and blurred first; every field that is still
/// untouched or shows an error is then asked for on the console. Returns the
/// outcome that ended the session.
pub async fn run_session<R>(
    mut controller: SubmissionController,
    console: &Console<R>,
    prefilled: &[(Field, &str)],
) -> Result<SubmitOutcome>
where
    R: AsyncBufRead + Unpin + Send,
{
    for (field, value) in prefilled {
        controller.update_field(*field, value);
        controller.handle_blur(*field);
    }

    loop {
        for field in Field::all() {
            fill_field(console, &mut controller, field).await?;
        }

        let outcome = controller.submit().await;
        debug!(?outcome, "submission finished");
        match outcome {
            // only fields with a visible error are asked again
            SubmitOutcome::Invalid if controller.form().has_visible_errors() => continue,
            SubmitOutcome::Invalid => return Ok(outcome),
            SubmitOutcome::Cancelled => match controller.clear().await {
                ClearOutcome::Cleared => continue,
                _ => return Ok(outcome),
            },
            SubmitOutcome::DeliveryFailed => {
                if console.decide("Try again?").await == Decision::Confirmed {
                    continue;
                }
                return Ok(outcome);
            }
            SubmitOutcome::Sent | SubmitOutcome::RateLimited { .. } | SubmitOutcome::Ignored => {
                return Ok(outcome)
            }
        }
    }
}

async fn fill_field<R>(
    console: &Console<R>,
    controller: &mut SubmissionController,
    field: Field,
) -> Result<()>
where
    R: AsyncBufRead + Unpin + Send,
{
    loop {
        let form = controller.form();
        if form.validation().is_touched(field) && form.visible_error(field).is_none() {
            return Ok(());
        }
        if let Some(err) = form.visible_error(field) {
            println!("  ✖ {}: {err}", field.label());
        }
        let prompt = field_prompt(field, form);
        let Some(line) = console.ask(&prompt).await? else {
            bail!("input closed before the form was complete");
        };
        if controller.update_field(field, &line) {
            println!("  (cut to {} characters)", field.max_len());
        }
        controller.handle_blur(field);
    }
}

/// `contact limits`
pub fn limits(config: &Config) -> Result<String> {
    let storage = Arc::new(FileStorage::open(config.storage_path())?);
    let limiter = limiter(storage, &config.contact);
    let record = limiter.peek();
    info!(?record, "inspected rate limit record");
    Ok(limit_summary(record, limiter.policy(), SystemClock.now_millis()))
}

pub fn limit_summary(
    record: Option<RateLimitRecord>,
    policy: RateLimitPolicy,
    now_ms: i64,
) -> String {
    let max = policy.max_attempts;
    let window_ms = i64::try_from(policy.window.as_millis()).unwrap_or(i64::MAX);
    let Some(record) = record else {
        return format!("No submissions recorded. {max} of {max} attempts available.");
    };
    let elapsed = now_ms.saturating_sub(record.window_start).max(0);
    if elapsed > window_ms {
        return format!("Previous window has expired. {max} of {max} attempts available.");
    }
    let left = max.saturating_sub(record.attempts);
    let resets_at = DateTime::from_timestamp_millis(record.window_start.saturating_add(window_ms))
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".into());
    format!(
        "{} of {max} attempts used, {left} left. Window resets at {resets_at}.",
        record.attempts
    )
}

//! Line-based terminal dialogs: notices, confirmations and field input.

use std::io::{self, Write};

use contact_form::{
    ConfirmationPrompt, Decision, Field, FormState, Notice, NoticeChannel, Recap, Severity,
};
use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Terminal console. Input is read line by line from `R` and output goes to stdout.
///
/// One instance serves as both `NoticeChannel` and `ConfirmationPrompt`,
/// and it also reads field values, so all input goes through one reader.
pub struct Console<R = BufReader<Stdin>> {
    lines: Mutex<Lines<R>>,
    assume_yes: bool,
}

impl Console {
    pub fn stdin(assume_yes: bool) -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), assume_yes)
    }
}

impl<R> Console<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R, assume_yes: bool) -> Self {
        Self {
            lines: Mutex::new(reader.lines()),
            assume_yes,
        }
    }

    /// Print `question` and read one line. `None` once input is closed.
    pub async fn ask(&self, question: &str) -> io::Result<Option<String>> {
        print!("{question}");
        io::stdout().flush()?;
        self.lines.lock().await.next_line().await
    }

    /// Yes/no question defaulting to no. `--yes` answers it without reading.
    pub async fn decide(&self, question: &str) -> Decision {
        if self.assume_yes {
            return Decision::Confirmed;
        }
        match self.ask(&format!("{question} [y/N] ")).await {
            Ok(Some(answer)) if is_yes(&answer) => Decision::Confirmed,
            Ok(_) => Decision::Cancelled,
            Err(e) => {
                warn!("reading answer failed: {e}");
                Decision::Cancelled
            }
        }
    }
}

impl<R> NoticeChannel for Console<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    fn notify(&self, notice: Notice) {
        info!(title = %notice.title, severity = ?notice.severity, "notice");
        println!("{}", render_notice(&notice));
    }
}

impl<R> ConfirmationPrompt for Console<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    fn confirm_send<'a>(&'a self, recap: &'a Recap) -> BoxFuture<'a, Decision> {
        async move {
            println!("{}", render_recap(recap));
            self.decide("Confirm and send?").await
        }
        .boxed()
    }

    fn confirm_clear(&self) -> BoxFuture<'_, Decision> {
        async move { self.decide("Clear all fields?").await }.boxed()
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

pub fn render_notice(notice: &Notice) -> String {
    let marker = match notice.severity {
        Severity::Info => "i",
        Severity::Success => "✔",
        Severity::Error => "✖",
    };
    format!("{marker} {}: {}", notice.title, notice.description)
}

pub fn render_recap(recap: &Recap) -> String {
    let mut lines = vec![
        "Please review your message:".to_string(),
        format!("  {}: {}", Field::Name.label(), recap.name),
        format!("  {}: {}", Field::Email.label(), recap.email),
    ];
    if let Some(phone) = &recap.phone {
        lines.push(format!("  {}: {phone}", Field::Phone.label()));
    }
    lines.push(format!("  {}: {}", Field::Subject.label(), recap.subject));
    lines.join("\n")
}

/// Input prompt with the live character counter, e.g. `Message [0/1000]: `.
pub fn field_prompt(field: Field, form: &FormState) -> String {
    let optional = if field.is_required() { "" } else { " (optional)" };
    format!(
        "{}{optional} [{}/{}]: ",
        field.label(),
        form.char_count(field),
        field.max_len()
    )
}

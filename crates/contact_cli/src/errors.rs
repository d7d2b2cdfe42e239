//! Error and panic reporting for the `contact` binary.
//!
//! Errors bubble up as `color_eyre::Report`. A panic is written to the log
//! file first, then shown to the user, and the process exits with failure.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use color_eyre::Result;
use tracing::error;

static INSTALLED: OnceLock<PathBuf> = OnceLock::new();

/// Install the eyre and panic hooks. Later calls are no-ops.
pub fn init(log_file: &Path) -> Result<()> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .panic_section(panic_section(log_file))
        .capture_span_trace_by_default(false)
        .display_location_section(false)
        .display_env_section(false)
        .try_into_hooks()?;
    eyre_hook.install()?;

    let log_hint = log_file.to_path_buf();
    std::panic::set_hook(Box::new(move |panic_info| {
        let report = panic_hook.panic_report(panic_info).to_string();
        error!("contact panicked: {}", strip_ansi_escapes::strip_str(&report));

        #[cfg(not(debug_assertions))]
        {
            use human_panic::{handle_dump, metadata, print_msg};
            let metadata = metadata!();
            let dump = handle_dump(&metadata, panic_info);
            if print_msg(dump, &metadata).is_err() {
                eprintln!("{report}");
            }
            eprintln!("Log: {}", log_hint.display());
        }

        #[cfg(debug_assertions)]
        {
            let _ = &log_hint;
            better_panic::Settings::auto()
                .most_recent_first(false)
                .lineno_suffix(true)
                .verbosity(better_panic::Verbosity::Full)
                .create_panic_handler()(panic_info);
        }

        std::process::exit(libc::EXIT_FAILURE);
    }));

    let _ = INSTALLED.set(log_file.to_path_buf());
    Ok(())
}

/// Extra section printed under every panic report.
pub fn panic_section(log_file: &Path) -> String {
    format!(
        "contact crashed unexpectedly. Details were written to {}",
        log_file.display()
    )
}

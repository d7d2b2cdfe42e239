use color_eyre::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{self, Dirs};

/// Route `tracing` output to `<data_dir>/contact_cli.log`.
///
/// The console belongs to the prompts, so nothing is logged to stdout.
/// `CONTACT_CLI_LOGLEVEL` (or `RUST_LOG`) overrides the default level.
pub fn init(dirs: &Dirs) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::never(&dirs.data, config::LOG_FILE.as_str());
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    #[cfg(debug_assertions)]
    let default_level = "info";
    #[cfg(not(debug_assertions))]
    let default_level = "warn";

    let env_filter = EnvFilter::try_from_env(config::LOG_ENV.as_str())
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(false)
        .with_writer(non_blocking)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(guard)
}

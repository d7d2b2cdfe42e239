use clap::Parser;
use color_eyre::Result;
use contact_cli::cli::{Cli, Cmd};
use contact_cli::config::{Config, Dirs};
use contact_cli::{app, errors, logging};
use contact_form::SubmitOutcome;
use tracing::info;

#[tokio::main]
pub async fn main() -> Result<()> {
    let dirs = Dirs::resolve();
    errors::init(&dirs.log_file())?;
    dirs.create()?;
    let guard = logging::init(&dirs)?;

    let args = Cli::parse();
    let config = Config::new(&dirs)?;
    info!(data_dir = %config.config.data_dir.display(), "contact cli started");

    match args.cmd {
        Cmd::Submit(submit) => {
            let outcome = app::submit(submit, &config).await?;
            info!(?outcome, "session ended");
            if !matches!(outcome, SubmitOutcome::Sent) {
                // flush the log writer before exiting
                drop(guard);
                std::process::exit(libc::EXIT_FAILURE);
            }
        }
        Cmd::Limits => println!("{}", app::limits(&config)?),
    }
    Ok(())
}

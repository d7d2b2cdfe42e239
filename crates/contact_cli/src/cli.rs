// src/cli.rs
use clap::{Args, Parser, Subcommand};
use contact_form::Field;

#[derive(Parser, Debug)]
#[command(name = "contact", version, about = "Send a message through the contact form")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Fill in and send a contact message (prompts for anything missing)
    Submit(SubmitArgs),
    /// Show the submission throttle for this machine
    Limits,
}

#[derive(Args, Debug, Default)]
pub struct SubmitArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub subject: Option<String>,
    #[arg(long)]
    pub message: Option<String>,
    /// Answer every confirmation with yes
    #[arg(short, long)]
    pub yes: bool,
    /// Log the payload instead of delivering it
    #[arg(long)]
    pub dry_run: bool,
}

impl SubmitArgs {
    /// Values passed on the command line, in form order.
    pub fn prefilled(&self) -> Vec<(Field, &str)> {
        Field::all()
            .filter_map(|field| {
                let value = match field {
                    Field::Name => &self.name,
                    Field::Email => &self.email,
                    Field::Phone => &self.phone,
                    Field::Subject => &self.subject,
                    Field::Message => &self.message,
                };
                value.as_deref().map(|v| (field, v))
            })
            .collect()
    }
}

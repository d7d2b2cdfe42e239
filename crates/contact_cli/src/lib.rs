//! Terminal front-end for the contact form.
//!
//! Wires the `contact_form` core to stdin/stdout dialogs, a file-backed
//! client storage in the data directory and an EmailJS delivery back-end.

pub mod app;
pub mod cli;
pub mod config;
pub mod console;
pub mod errors;
pub mod logging;
pub mod sender;

//! Terminal output
//!
//! Tables go to stdout; notifications, prompts and errors go to stderr.

use colored::Colorize;
use donation_core::{AdminError, AdminResult};
use donation_ui::{FormErrors, Notification, NotificationLevel, Notifier};
use std::io::{BufRead, Write};

/// Prints notifications to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        let label = match notification.level {
            NotificationLevel::Info => "info".blue(),
            NotificationLevel::Success => "success".green(),
            NotificationLevel::Warning => "warning".yellow(),
            NotificationLevel::Error => "error".red(),
        };
        eprintln!("{}: {}", label.bold(), notification.text);
    }
}

/// Print each field error on its own line
pub fn print_form_errors(errors: &FormErrors) {
    for error in errors.iter() {
        eprintln!("  {} {}", format!("{}:", error.field).yellow(), error.message);
    }
}

/// Ask a yes/no question; anything but `y`/`yes` is a no
pub fn confirm(prompt: &str) -> AdminResult<bool> {
    eprint!("{} [y/N]: ", prompt);
    std::io::stderr().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

/// Read one line from stdin after a prompt
pub fn prompt_line(prompt: &str) -> AdminResult<String> {
    eprint!("{}", prompt);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Text shown for a failed command
pub fn error_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<AdminError>() {
        Some(admin) => admin.user_message(),
        None => format!("{:#}", err),
    }
}

/// Print a failed command to stderr
pub fn report_error(err: &anyhow::Error) {
    eprintln!("{} {}", "error:".red().bold(), error_message(err));
}

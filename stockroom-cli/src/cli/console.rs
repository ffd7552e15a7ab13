//! Terminal rendering of operator notifications

use colored::*;

use crate::notify::{ImportObserver, Notifier, Severity};

/// Prints alerts as they arrive; errors and warnings go to stderr
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl ConsoleObserver {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for ConsoleObserver {
    fn alert(&mut self, message: &str, severity: Severity) {
        log::debug!("[{}] {}", severity, message);
        match severity {
            Severity::Info => println!("{} {}", "•".cyan(), message),
            Severity::Success => println!("{} {}", "✓".green().bold(), message),
            Severity::Warning => eprintln!("{} {}", "⚠".yellow().bold(), message.yellow()),
            Severity::Error => eprintln!("{} {}", "✗".red().bold(), message.red()),
        }
    }
}

impl ImportObserver for ConsoleObserver {
    fn success(&mut self, summary: &str) {
        println!("{} {}", "✓".green().bold(), summary.green());
    }

    fn close(&mut self) {
        log::debug!("Import session closed");
    }
}

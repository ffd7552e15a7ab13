//! Operator notifications
//!
//! Everything the engine and the route guard want the operator to see goes
//! through these traits. The CLI prints them; tests record them.

use std::fmt;

/// How loudly a notification should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Success => write!(f, "success"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Receives alerts (warnings, errors, info) as they happen
pub trait Notifier {
    fn alert(&mut self, message: &str, severity: Severity);
}

/// Callbacks the import engine invokes on its embedder
pub trait ImportObserver: Notifier {
    /// Full-batch success, with a summary message
    fn success(&mut self, summary: &str);

    /// The engine closed itself (catalog failure, expired session, halted
    /// or partially failed batch)
    fn close(&mut self);
}

/// One recorded observer callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Alert { message: String, severity: Severity },
    Success(String),
    Closed,
}

/// Observer that keeps every callback in order
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    pub events: Vec<Notification>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All alerts with the given severity, oldest first
    pub fn alerts(&self, severity: Severity) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Notification::Alert { message, severity: s } if *s == severity => {
                    Some(message.as_str())
                }
                _ => None,
            })
            .collect()
    }

    pub fn alert_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, Notification::Alert { .. }))
            .count()
    }

    pub fn successes(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Notification::Success(summary) => Some(summary.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn was_closed(&self) -> bool {
        self.events.iter().any(|event| matches!(event, Notification::Closed))
    }
}

impl Notifier for RecordingObserver {
    fn alert(&mut self, message: &str, severity: Severity) {
        self.events.push(Notification::Alert {
            message: message.to_string(),
            severity,
        });
    }
}

impl ImportObserver for RecordingObserver {
    fn success(&mut self, summary: &str) {
        self.events.push(Notification::Success(summary.to_string()));
    }

    fn close(&mut self) {
        self.events.push(Notification::Closed);
    }
}

use crate::error::FetchError;
use colored::Colorize;
use std::cell::RefCell;

/// Where the failure path reports to.
///
/// Called from continuations on the single event-loop thread, so
/// implementations are free to use interior mutability without locks.
pub trait Notifier {
    fn failure(&self, label: &str, err: &FetchError);

    /// Blocking user-visible message. The console version cannot block.
    fn alert(&self, message: &str);
}

/// Logs through the `log` facade and prints alerts to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn failure(&self, label: &str, err: &FetchError) {
        log::error!("{label} was NOT successful: {err}");
    }

    fn alert(&self, message: &str) {
        eprintln!("{} {}", "[alert]".red().bold(), message.yellow());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Failure { label: String, error: FetchError },
    Alert(String),
}

/// Keeps every notice in memory. Used by tests and by callers that want to
/// inspect what went wrong after the loop has drained.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: RefCell<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn failure_count(&self) -> usize {
        self.notices
            .borrow()
            .iter()
            .filter(|n| matches!(n, Notice::Failure { .. }))
            .count()
    }

    pub fn alert_count(&self) -> usize {
        self.notices
            .borrow()
            .iter()
            .filter(|n| matches!(n, Notice::Alert(_)))
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn failure(&self, label: &str, err: &FetchError) {
        log::error!("{label} was NOT successful: {err}");
        self.notices.borrow_mut().push(Notice::Failure {
            label: label.to_string(),
            error: err.clone(),
        });
    }

    fn alert(&self, message: &str) {
        self.notices
            .borrow_mut()
            .push(Notice::Alert(message.to_string()));
    }
}

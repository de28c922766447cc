//! Notification sink shared by the HTTP client and the route guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Failures surface to the user through a [`Notifier`] before they reach the
//! caller. The browser build feeds a toast signal; SSR and tests use
//! [`LogNotifier`] or a recording double.

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;

use serde::{Deserialize, Serialize};

/// Four-level severity for user-visible notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// Sink for user-visible notifications.
pub trait Notifier {
    fn notify(&self, severity: Severity, title: &str, message: Option<&str>);

    fn success(&self, title: &str, message: Option<&str>) {
        self.notify(Severity::Success, title, message);
    }

    fn error(&self, title: &str, message: Option<&str>) {
        self.notify(Severity::Error, title, message);
    }

    fn warning(&self, title: &str, message: Option<&str>) {
        self.notify(Severity::Warning, title, message);
    }

    fn info(&self, title: &str, message: Option<&str>) {
        self.notify(Severity::Info, title, message);
    }
}

/// Notifier that only writes to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, severity: Severity, title: &str, message: Option<&str>) {
        let line = format_line(severity, title, message);
        match severity {
            Severity::Error => leptos::logging::error!("{line}"),
            Severity::Warning => leptos::logging::warn!("{line}"),
            Severity::Success | Severity::Info => leptos::logging::log!("{line}"),
        }
    }
}

fn format_line(severity: Severity, title: &str, message: Option<&str>) -> String {
    match message {
        Some(message) if !message.is_empty() => format!("[{}] {title}: {message}", severity.as_str()),
        _ => format!("[{}] {title}", severity.as_str()),
    }
}

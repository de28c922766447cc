//! Queue of user-visible notifications awaiting display.
//!
//! DESIGN
//! ======
//! Plain data so it can sit inside an `RwSignal` and be tested natively.
//! Rendering and the dismissal timer live with the component layer.

#[cfg(test)]
#[path = "toast_test.rs"]
mod toast_test;

use serde::{Deserialize, Serialize};

use crate::util::notify::Severity;

/// One queued notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub id: u64,
    pub severity: Severity,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Milliseconds before auto-dismissal.
    pub duration_ms: u32,
}

/// Ordered toast queue with monotonically increasing ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToastState {
    pub toasts: Vec<Toast>,
    next_id: u64,
    default_duration_ms: u32,
}

impl Default for ToastState {
    fn default() -> Self {
        Self::with_duration(5000)
    }
}

impl ToastState {
    #[must_use]
    pub fn with_duration(default_duration_ms: u32) -> Self {
        Self { toasts: Vec::new(), next_id: 1, default_duration_ms }
    }

    /// Append a toast and return its id. `None` duration uses the default.
    pub fn push(&mut self, severity: Severity, title: &str, message: Option<&str>, duration_ms: Option<u32>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            severity,
            title: title.to_owned(),
            message: message.filter(|m| !m.is_empty()).map(str::to_owned),
            duration_ms: duration_ms.unwrap_or(self.default_duration_ms),
        });
        id
    }

    /// Drop the toast with `id`; returns whether one was removed.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Empty the queue. Ids keep counting up.
    pub fn clear(&mut self) {
        self.toasts.clear();
    }
}

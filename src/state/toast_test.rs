use super::*;

#[test]
fn push_assigns_increasing_ids_and_default_duration() {
    let mut q = ToastState::default();
    let a = q.push(Severity::Error, "Server Error", Some("Please try again later."), None);
    let b = q.push(Severity::Info, "Saved", None, Some(1500));

    assert_eq!((a, b), (1, 2));
    assert_eq!(q.toasts[0].duration_ms, 5000);
    assert_eq!(q.toasts[1].duration_ms, 1500);
    assert_eq!(q.toasts[0].message.as_deref(), Some("Please try again later."));
}

#[test]
fn empty_message_is_dropped() {
    let mut q = ToastState::default();
    q.push(Severity::Warning, "Validation Error", Some(""), None);
    assert_eq!(q.toasts[0].message, None);
}

#[test]
fn remove_targets_one_id() {
    let mut q = ToastState::with_duration(100);
    let a = q.push(Severity::Success, "a", None, None);
    let b = q.push(Severity::Success, "b", None, None);

    assert!(q.remove(a));
    assert!(!q.remove(a));
    assert_eq!(q.toasts.iter().map(|t| t.id).collect::<Vec<_>>(), vec![b]);
}

#[test]
fn ids_keep_increasing_after_clear() {
    let mut q = ToastState::default();
    q.push(Severity::Info, "a", None, None);
    q.clear();
    assert!(q.toasts.is_empty());
    assert_eq!(q.push(Severity::Info, "b", None, None), 2);
}

#[test]
fn toast_serializes_camel_case() {
    let mut q = ToastState::default();
    q.push(Severity::Error, "x", None, None);
    let value = serde_json::to_value(&q.toasts[0]).unwrap();
    assert_eq!(value, serde_json::json!({"id": 1, "severity": "error", "title": "x", "durationMs": 5000}));
}

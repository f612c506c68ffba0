//! 通知层集成测试：组合渠道、兜底、标题截断

use std::sync::Arc;

use agent_notify::notification::channels::{CompositeNotifier, MemoryNotifier};
use agent_notify::notification::{
    build_title, DispatchOutcome, Notification, NotificationDispatcher, NotificationLevel, Notifier, NotifyError,
    TitleOptions,
};

struct AlwaysFails;

impl Notifier for AlwaysFails {
    fn name(&self) -> &str {
        "always-fails"
    }

    fn notify(&self, _notification: &Notification) -> Result<(), NotifyError> {
        Err(NotifyError::DispatchFailed("backend exploded".into()))
    }
}

fn sample() -> Notification {
    Notification::new("[Agent] Done", "Duration: 2s\nExit code: 0", NotificationLevel::Success)
}

#[test]
fn test_composite_succeeds_if_any_backend_succeeds() {
    let memory = Arc::new(MemoryNotifier::new());
    let composite = CompositeNotifier::new(vec![Box::new(AlwaysFails), Box::new(memory.clone())]);

    assert!(composite.notify(&sample()).is_ok());
    assert_eq!(memory.count(), 1);
}

#[test]
fn test_composite_fails_when_all_fail() {
    let composite = CompositeNotifier::new(vec![Box::new(AlwaysFails), Box::new(AlwaysFails)]);
    let err = composite.notify(&sample()).unwrap_err();
    assert!(err.to_string().contains("backend exploded"));
}

#[test]
fn test_dispatcher_falls_back_once() {
    let fallback = Arc::new(MemoryNotifier::new());
    let dispatcher = NotificationDispatcher::new(Box::new(AlwaysFails)).with_fallback(Box::new(fallback.clone()));

    assert!(matches!(dispatcher.dispatch(&sample()), DispatchOutcome::FellBack(_)));
    assert_eq!(fallback.count(), 1);
}

#[test]
fn test_title_never_exceeds_limit() {
    for len in [1, 100, 115, 116, 117, 500] {
        let options = TitleOptions::new("Agent").with_tool_name(Some("n".repeat(len)));
        let title = build_title(Some(1), &options);
        assert!(title.chars().count() <= 120, "len {len} -> {}", title.chars().count());
        if len > 110 {
            assert!(title.ends_with("..."));
        }
    }
}

#[test]
fn test_notification_serializes_level_lowercase() {
    let value = serde_json::to_value(sample()).unwrap();
    assert_eq!(value["level"], "success");
}

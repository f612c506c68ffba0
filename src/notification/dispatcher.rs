//! 通知分发器 - 发送通知，失败时回退到控制台

use tracing::{info, warn};

use super::channel::{Notification, Notifier};
use super::channels::ConsoleNotifier;

/// 发送结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 由首选渠道送达
    Delivered,
    /// 首选渠道失败，已改用控制台
    FellBack(String),
}

/// 通知分发器
pub struct NotificationDispatcher {
    notifier: Box<dyn Notifier>,
    fallback: Box<dyn Notifier>,
}

impl NotificationDispatcher {
    pub fn new(notifier: Box<dyn Notifier>) -> Self {
        Self {
            notifier,
            fallback: Box::new(ConsoleNotifier::new()),
        }
    }

    /// 替换兜底渠道（测试用，正常情况下总是控制台）
    pub fn with_fallback(mut self, fallback: Box<dyn Notifier>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn channel_name(&self) -> &str {
        self.notifier.name()
    }

    /// 发送；首选渠道出错时只重试一次，且只对兜底渠道重试
    pub fn dispatch(&self, notification: &Notification) -> DispatchOutcome {
        match self.notifier.notify(notification) {
            Ok(()) => DispatchOutcome::Delivered,
            Err(e) => {
                warn!(
                    channel = self.notifier.name(),
                    "Desktop notification failed: {}. Falling back to console output.", e
                );
                info!("Use --channel console to avoid desktop notifier errors in headless sessions.");
                if let Err(fallback_err) = self.fallback.notify(notification) {
                    warn!(channel = self.fallback.name(), error = %fallback_err, "Fallback notifier failed");
                }
                DispatchOutcome::FellBack(e.to_string())
            }
        }
    }
}

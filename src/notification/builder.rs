//! 通知系统构建器 - 根据渠道选择具体的 Notifier

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::channel::Notifier;
use super::channels::{desktop_notifier, CompositeNotifier, ConsoleNotifier};
use super::dispatcher::NotificationDispatcher;

/// 通知渠道选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    Desktop,
    Console,
    /// 桌面 + 控制台
    Both,
}

impl Channel {
    /// 从配置的渠道列表推导默认渠道
    pub fn from_configured(channels: &[String]) -> Self {
        let has = |name: &str| channels.iter().any(|c| c.eq_ignore_ascii_case(name));
        match (has("console"), has("desktop")) {
            (true, true) => Channel::Both,
            (true, false) => Channel::Console,
            _ => Channel::Desktop,
        }
    }
}

/// 通知系统构建器
pub struct NotificationBuilder {
    channel: Channel,
}

impl NotificationBuilder {
    pub fn new() -> Self {
        Self {
            channel: Channel::default(),
        }
    }

    /// 设置渠道
    pub fn channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    /// 构建 Notifier；桌面渠道不可用时退化为控制台
    pub fn build_notifier(&self) -> Box<dyn Notifier> {
        match self.channel {
            Channel::Console => Box::new(ConsoleNotifier::new()),
            Channel::Both => {
                let mut notifiers: Vec<Box<dyn Notifier>> = Vec::with_capacity(2);
                match desktop_notifier() {
                    Ok(desktop) => notifiers.push(desktop),
                    Err(e) => {
                        info!(error = %e, "Desktop notifier unavailable. Falling back to console only.")
                    }
                }
                notifiers.push(Box::new(ConsoleNotifier::new()));
                Box::new(CompositeNotifier::new(notifiers))
            }
            Channel::Desktop => match desktop_notifier() {
                Ok(desktop) => desktop,
                Err(e) => {
                    warn!("Desktop notifier unavailable: {}. Falling back to console output.", e);
                    Box::new(ConsoleNotifier::new())
                }
            },
        }
    }

    /// 构建带控制台兜底的分发器
    pub fn build(self) -> NotificationDispatcher {
        NotificationDispatcher::new(self.build_notifier())
    }
}

impl Default for NotificationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

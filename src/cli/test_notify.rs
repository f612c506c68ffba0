// src/cli/test_notify.rs
//! test-notify 命令 - 发送一条示例通知，检查安装和渠道

use clap::Args;

use super::build_dispatcher;
use crate::config::AppConfig;
use crate::notification::{Channel, DispatchOutcome, Notification, NotificationLevel};

pub const TEST_NOTIFICATION_BODY: &str = "agent-notify is installed and can send notifications.";

/// test-notify 命令参数
#[derive(Args, Debug)]
pub struct TestNotifyArgs {
    /// Notification channel (defaults to the configured channels)
    #[arg(long, value_enum, ignore_case = true)]
    pub channel: Option<Channel>,
}

pub fn test_notification(config: &AppConfig) -> Notification {
    Notification::new(
        format!("[{}] Test Notification", config.title_prefix),
        TEST_NOTIFICATION_BODY,
        NotificationLevel::Info,
    )
}

/// 处理 test-notify 命令
pub fn handle_test_notify(args: TestNotifyArgs, config: &AppConfig) -> i32 {
    let dispatcher = build_dispatcher(config, args.channel);
    if let DispatchOutcome::FellBack(reason) = dispatcher.dispatch(&test_notification(config)) {
        tracing::debug!(channel = dispatcher.channel_name(), %reason, "Test notification used console fallback");
    }
    0
}

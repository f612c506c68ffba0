//! CLI command handling

pub mod emit;
pub mod hook;
pub mod run;
pub mod tail;
pub mod test_notify;
pub mod watch;

pub use emit::*;
pub use hook::*;
pub use run::*;
pub use tail::*;
pub use test_notify::*;
pub use watch::*;

use clap::Args;

use crate::config::AppConfig;
use crate::notification::{Channel, NotificationBuilder, NotificationDispatcher};

/// 各命令共用的通知展示参数
#[derive(Args, Debug, Clone, Default)]
pub struct DisplayArgs {
    /// Tool name shown in notification title
    #[arg(long)]
    pub name: Option<String>,

    /// Override notification title
    #[arg(long)]
    pub title: Option<String>,

    /// Notification channel (defaults to the configured channels)
    #[arg(long, value_enum, ignore_case = true)]
    pub channel: Option<Channel>,
}

/// 按命令行或配置选择渠道，构建分发器
pub fn build_dispatcher(config: &AppConfig, channel: Option<Channel>) -> NotificationDispatcher {
    NotificationBuilder::new()
        .channel(channel.unwrap_or_else(|| config.default_channel()))
        .build()
}

/// 转为进程退出码；被信号终止（负数）时按 shell 惯例映射为 128 + 信号值
pub fn process_exit_code(code: i32) -> i32 {
    if code < 0 {
        128i32.saturating_add(code.saturating_neg())
    } else {
        code
    }
}

/// 轮询间隔参数：至少 0.05 秒
pub(crate) fn parse_poll_interval(value: &str) -> Result<f64, String> {
    let interval: f64 = value.parse().map_err(|_| format!("invalid number: {}", value))?;
    if !interval.is_finite() || interval < 0.05 {
        return Err(format!("{} is not in the range >= 0.05", value));
    }
    Ok(interval)
}

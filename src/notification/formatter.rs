//! 消息格式化模块 - 将运行/监控结果转换为通知标题和正文
//!
//! 标题: `[<tool>] Done|Failed`（可被覆盖），最多 120 字符
//! 正文: 时长、退出码、最后几行输出，最多 700 字符

use serde_json::json;

use super::channel::{Metadata, Notification};
use super::level::NotificationLevel;
use crate::infra::timefmt::format_duration;
use crate::result::{RunResult, WatchResult};

/// Notification text constants
pub mod msg {
    pub const DONE: &str = "Done";
    pub const FAILED: &str = "Failed";
    pub const UNKNOWN: &str = "unknown";
    pub const TAIL: &str = "Tail:";
    pub const TASK_EVENT_RECEIVED: &str = "Task event received.";
}

/// 标题参数
#[derive(Debug, Clone, Default)]
pub struct TitleOptions {
    /// 显式指定的工具名
    pub tool_name: Option<String>,
    /// 完整覆盖标题
    pub title_override: Option<String>,
    /// 没有工具名时使用（配置中的 title_prefix）
    pub default_tool_name: String,
}

impl TitleOptions {
    pub fn new(default_tool_name: impl Into<String>) -> Self {
        Self {
            default_tool_name: default_tool_name.into(),
            ..Self::default()
        }
    }

    pub fn with_tool_name(mut self, tool_name: Option<String>) -> Self {
        self.tool_name = tool_name.filter(|name| !name.is_empty());
        self
    }

    pub fn with_title_override(mut self, title: Option<String>) -> Self {
        self.title_override = title.filter(|title| !title.is_empty());
        self
    }
}

/// 按字符数截断，超出时以 `...` 结尾；上限不超过 3 时直接截断
pub fn truncate(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    if limit <= 3 {
        return value.chars().take(limit).collect();
    }
    let mut out: String = value.chars().take(limit - 3).collect();
    out.push_str("...");
    out
}

/// 构建标题；退出码未知时视为 Done
pub fn build_title(exit_code: Option<i32>, options: &TitleOptions) -> String {
    if let Some(title) = &options.title_override {
        return truncate(title, super::channel::MAX_TITLE_LENGTH);
    }

    let status = match exit_code {
        Some(code) if code != 0 => msg::FAILED,
        _ => msg::DONE,
    };
    let label = options
        .tool_name
        .as_deref()
        .unwrap_or(&options.default_tool_name);
    truncate(&format!("[{}] {}", label, status), super::channel::MAX_TITLE_LENGTH)
}

/// 构建正文
pub fn build_body(duration_seconds: f64, exit_code: Option<i32>, output_tail: &[String]) -> String {
    let mut lines = vec![
        format!("Duration: {}", format_duration(duration_seconds)),
        format!(
            "Exit code: {}",
            exit_code.map_or_else(|| msg::UNKNOWN.to_string(), |code| code.to_string())
        ),
    ];
    if !output_tail.is_empty() {
        lines.push(msg::TAIL.to_string());
        lines.extend(output_tail.iter().cloned());
    }
    truncate(&lines.join("\n"), super::channel::MAX_BODY_LENGTH)
}

/// 运行结果 → 通知
pub fn run_notification(result: &RunResult, options: &TitleOptions) -> Notification {
    let options = if options.tool_name.is_none() {
        options.clone().with_tool_name(result.tool_name.clone())
    } else {
        options.clone()
    };

    let title = build_title(Some(result.exit_code), &options);
    let body = build_body(result.duration_seconds, Some(result.exit_code), &result.output_tail);

    let mut metadata = Metadata::new();
    metadata.insert("command".into(), json!(result.command));
    metadata.insert("duration_seconds".into(), json!(result.duration_seconds));
    metadata.insert("exit_code".into(), json!(result.exit_code));

    Notification::new(title, body, NotificationLevel::from_exit_code(Some(result.exit_code)))
        .with_metadata(metadata)
}

/// 监控结果 → 通知
pub fn watch_notification(result: &WatchResult, options: &TitleOptions) -> Notification {
    let title = build_title(result.exit_code, options);
    let tail = [
        format!("PID: {}", result.pid),
        format!("Already exited: {}", result.already_exited),
    ];
    let body = build_body(result.duration_seconds, result.exit_code, &tail);

    let mut metadata = Metadata::new();
    metadata.insert("pid".into(), json!(result.pid));
    metadata.insert("duration_seconds".into(), json!(result.duration_seconds));
    metadata.insert("exit_code".into(), json!(result.exit_code));
    metadata.insert("already_exited".into(), json!(result.already_exited));

    Notification::new(title, body, NotificationLevel::from_exit_code(result.exit_code))
        .with_metadata(metadata)
}

/// Hook 任务事件 → 通知（总是按成功处理）
pub fn task_notification(body_lines: &[String], metadata: Metadata, options: &TitleOptions) -> Notification {
    let title = build_title(Some(0), options);
    let rendered: Vec<&str> = body_lines
        .iter()
        .map(String::as_str)
        .filter(|line| !line.trim().is_empty())
        .collect();
    let body = if rendered.is_empty() {
        msg::TASK_EVENT_RECEIVED.to_string()
    } else {
        rendered.join("\n")
    };

    Notification::new(title, body, NotificationLevel::Success).with_metadata(metadata)
}

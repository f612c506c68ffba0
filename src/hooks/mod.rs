// src/hooks/mod.rs
//! Agent CLI hook 适配器模块
//!
//! 每个适配器负责：读取 payload、判断事件是否匹配、生成通知正文。
//! 发送通知由 CLI 层完成。

pub mod payload;

pub mod claude;
pub mod codex;
pub mod gemini;
pub mod ollama;

use std::io::Read;

use thiserror::Error;
use tracing::{debug, info};

use crate::notification::Metadata;
pub use payload::{Payload, PayloadError};

/// 适配器渲染出的通知内容
#[derive(Debug, Clone, PartialEq)]
pub struct HookNotification {
    pub event: String,
    pub body_lines: Vec<String>,
    pub metadata: Metadata,
}

/// 不发送通知的情况（不是错误）
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HookSkip {
    #[error("{0} payload missing event details. Skipping notification.")]
    MissingEvent(&'static str),
    #[error("event '{actual}' does not match '{target}'")]
    EventMismatch { actual: String, target: String },
    #[error("payload is not complete yet")]
    Incomplete,
}

/// Agent CLI hook 适配器 trait
pub trait HookAdapter: Send + Sync {
    /// 来源标识，写入 metadata.source
    fn source(&self) -> &'static str;

    /// 日志中的来源名，如 "Claude hook"
    fn label(&self) -> &'static str;

    /// 标题中默认的工具名
    fn default_name(&self) -> &'static str;

    /// 读取 payload；`positional` 只有部分适配器使用
    fn read_payload(&self, positional: &[String], stdin: &mut dyn Read) -> Result<Payload, PayloadError>;

    /// 生成通知内容
    fn render(&self, payload: &Payload) -> Result<HookNotification, HookSkip>;
}

/// 读取并渲染；跳过时记录原因并返回 None
pub fn evaluate(
    adapter: &dyn HookAdapter,
    positional: &[String],
    stdin: &mut dyn Read,
) -> Option<HookNotification> {
    let payload = match adapter.read_payload(positional, stdin) {
        Ok(payload) => payload,
        Err(e) => {
            info!(source = adapter.source(), "{}", e);
            return None;
        }
    };

    match adapter.render(&payload) {
        Ok(notification) => Some(notification),
        Err(skip @ HookSkip::MissingEvent(_)) => {
            info!(source = adapter.source(), "{}", skip);
            None
        }
        Err(skip) => {
            debug!(source = adapter.source(), reason = %skip, "Hook event ignored");
            None
        }
    }
}

/// 值非空时追加 `Label: value` 行
pub(crate) fn push_line(lines: &mut Vec<String>, label: &str, value: &str) {
    if !value.is_empty() {
        lines.push(format!("{}: {}", label, value));
    }
}

/// 原始字段值，缺失时为 null
pub(crate) fn raw_field(payload: &Payload, key: &str) -> serde_json::Value {
    payload.get(key).cloned().unwrap_or(serde_json::Value::Null)
}

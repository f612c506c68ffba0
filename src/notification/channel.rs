//! 通知渠道 trait 定义

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use super::formatter::truncate;
use super::level::NotificationLevel;

/// 标题最大字符数
pub const MAX_TITLE_LENGTH: usize = 120;
/// 正文最大字符数
pub const MAX_BODY_LENGTH: usize = 700;

/// 通知元数据（值为任意标量或 JSON）
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// 通知消息
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub level: NotificationLevel,
    pub metadata: Metadata,
}

impl Notification {
    /// 创建消息，标题和正文按上限截断
    pub fn new(title: impl AsRef<str>, message: impl AsRef<str>, level: NotificationLevel) -> Self {
        Self {
            title: truncate(title.as_ref(), MAX_TITLE_LENGTH),
            message: truncate(message.as_ref(), MAX_BODY_LENGTH),
            level,
            metadata: Metadata::new(),
        }
    }

    /// 设置元数据
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// 添加一项元数据
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// 通知发送失败
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotifyError {
    /// 当前系统/环境下无法使用该渠道
    #[error("{0}")]
    Unavailable(String),
    /// 发送过程中失败
    #[error("{0}")]
    DispatchFailed(String),
}

impl NotifyError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, NotifyError::Unavailable(_))
    }
}

/// 通知渠道 trait
pub trait Notifier: Send + Sync {
    /// 渠道名称（用于日志）
    fn name(&self) -> &str;

    /// 同步发送
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        (**self).notify(notification)
    }
}

impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        (**self).notify(notification)
    }
}

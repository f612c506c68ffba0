//! 通知抽象层 - 统一管理所有通知渠道
//!
//! # 设计目标
//! 1. 统一接口：所有渠道实现 `Notifier` trait
//! 2. 渠道解耦：桌面、控制台、组合渠道各自独立
//! 3. 兜底：`NotificationDispatcher` 在首选渠道失败时改用控制台
//!
//! # 使用示例
//! ```ignore
//! use agent_notify::notification::{Channel, NotificationBuilder, Notification, NotificationLevel};
//!
//! let dispatcher = NotificationBuilder::new().channel(Channel::Console).build();
//! dispatcher.dispatch(&Notification::new("[codex] Done", "Exit code: 0", NotificationLevel::Success));
//! ```

pub mod builder;
pub mod channel;
pub mod channels;
pub mod dispatcher;
pub mod formatter;
pub mod level;

pub use builder::{Channel, NotificationBuilder};
pub use channel::{Metadata, Notification, Notifier, NotifyError, MAX_BODY_LENGTH, MAX_TITLE_LENGTH};
pub use dispatcher::{DispatchOutcome, NotificationDispatcher};
pub use formatter::{build_body, build_title, run_notification, task_notification, truncate, watch_notification, TitleOptions};
pub use level::NotificationLevel;

//! agent-notify - 命令运行结束、进程退出或 agent 任务完成时发送通知

pub mod cli;
pub mod config;
pub mod hooks;
pub mod infra;
pub mod notification;
pub mod result;

pub use config::{load_config, AppConfig};
pub use hooks::{HookAdapter, HookNotification, HookSkip, Payload, PayloadError};
pub use infra::{
    format_duration, LinePattern, LogTailer, OutputBufferError, OutputRingBuffer, ProcessRunner, ProcessWatcher,
    RunError, RunOptions, WatchError,
};
pub use notification::{
    Channel, DispatchOutcome, Notification, NotificationBuilder, NotificationDispatcher, NotificationLevel, Notifier,
    NotifyError,
};
pub use result::{RunResult, WatchResult};

//! 控制台渠道 - 把通知写到 stderr，任何环境下都可用

use std::io::{self, Write};
use std::sync::Mutex;

use crate::notification::channel::{Notification, Notifier, NotifyError};

/// 控制台渠道
pub struct ConsoleNotifier {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stderr()))
    }

    /// 写到指定的 writer（测试用）
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// 渲染为两段文本：`[agent-notify:<level>] <title>` 和正文
    pub fn render(notification: &Notification) -> String {
        format!(
            "[agent-notify:{}] {}\n{}\n",
            notification.level, notification.title, notification.message
        )
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ConsoleNotifier {
    fn name(&self) -> &str {
        "console"
    }

    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let rendered = Self::render(notification);
        // 锁被毒化时仍然继续写，控制台渠道不能失败
        let mut writer = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writer.write_all(rendered.as_bytes());
        let _ = writer.flush();
        Ok(())
    }
}

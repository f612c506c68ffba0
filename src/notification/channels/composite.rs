//! 组合渠道 - 广播到多个渠道，至少一个成功即成功

use tracing::{debug, warn};

use crate::notification::channel::{Notification, Notifier, NotifyError};

pub struct CompositeNotifier {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl CompositeNotifier {
    pub fn new(notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self { notifiers }
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.notifiers.iter().map(|n| n.name()).collect()
    }
}

impl Notifier for CompositeNotifier {
    fn name(&self) -> &str {
        "composite"
    }

    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut errors = Vec::new();
        let mut delivered = false;

        for notifier in &self.notifiers {
            match notifier.notify(notification) {
                Ok(()) => {
                    debug!(channel = notifier.name(), "Notification delivered");
                    delivered = true;
                }
                Err(e) => {
                    warn!(channel = notifier.name(), error = %e, "Channel send failed");
                    errors.push(e);
                }
            }
        }

        if delivered || errors.is_empty() {
            return Ok(());
        }

        let joined = errors
            .iter()
            .map(ToString::to_string)
            .filter(|message| !message.is_empty())
            .collect::<Vec<_>>()
            .join("; ");
        Err(NotifyError::DispatchFailed(if joined.is_empty() {
            "all notifiers failed".to_string()
        } else {
            joined
        }))
    }
}

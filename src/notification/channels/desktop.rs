//! 桌面渠道 - 调用各平台原生通知命令
//!
//! - macOS: `osascript -e 'display notification ...'`
//! - Windows: PowerShell + BurntToast 模块
//! - Linux: `notify-send`

use std::process::{Command, Output};

use tracing::debug;

use crate::notification::channel::{Notification, Notifier, NotifyError};
use crate::notification::level::NotificationLevel;

/// BurntToast 模块缺失时 PowerShell 脚本的退出码
const BURNT_TOAST_MISSING: i32 = 2;

/// 按当前平台选择桌面渠道
pub fn desktop_notifier() -> Result<Box<dyn Notifier>, NotifyError> {
    match std::env::consts::OS {
        "macos" => Ok(Box::new(MacOsNotifier::new())),
        "windows" => Ok(Box::new(WindowsNotifier::new())),
        "linux" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => {
            Ok(Box::new(LinuxNotifier::new()))
        }
        other => Err(NotifyError::Unavailable(format!(
            "Desktop notifications are not implemented for {}",
            other
        ))),
    }
}

fn run_command(command: &mut Command, label: &str) -> Result<Output, NotifyError> {
    command
        .output()
        .map_err(|e| NotifyError::DispatchFailed(format!("failed to run {}: {}", label, e)))
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

/// macOS 通知中心
pub struct MacOsNotifier {
    osascript: String,
}

impl MacOsNotifier {
    pub fn new() -> Self {
        Self {
            osascript: "osascript".to_string(),
        }
    }

    pub fn script(notification: &Notification) -> String {
        format!(
            "display notification \"{}\" with title \"{}\"",
            escape_applescript(&notification.message),
            escape_applescript(&notification.title)
        )
    }
}

impl Default for MacOsNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for MacOsNotifier {
    fn name(&self) -> &str {
        "desktop-macos"
    }

    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        if which::which(&self.osascript).is_err() {
            return Err(NotifyError::Unavailable(
                "osascript is not available on this system".into(),
            ));
        }

        let script = Self::script(notification);
        let output = run_command(Command::new(&self.osascript).args(["-e", &script]), "osascript")?;
        if !output.status.success() {
            return Err(NotifyError::DispatchFailed(format!(
                "osascript failed with code {}: {}",
                output.status.code().unwrap_or(-1),
                stderr_text(&output)
            )));
        }
        debug!(channel = "desktop-macos", "Notification sent");
        Ok(())
    }
}

/// Windows toast（BurntToast）
pub struct WindowsNotifier;

impl WindowsNotifier {
    pub fn new() -> Self {
        Self
    }

    pub fn script(notification: &Notification) -> String {
        let title = escape_powershell_single_quoted(&notification.title);
        let message = escape_powershell_single_quoted(&notification.message);
        [
            "$ErrorActionPreference = 'Stop'".to_string(),
            "if (Get-Module -ListAvailable -Name BurntToast) {".to_string(),
            "  Import-Module BurntToast | Out-Null".to_string(),
            format!("  New-BurntToastNotification -Text @('{}', '{}') | Out-Null", title, message),
            "  exit 0".to_string(),
            "}".to_string(),
            format!("exit {}", BURNT_TOAST_MISSING),
        ]
        .join("\n")
    }
}

impl Default for WindowsNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for WindowsNotifier {
    fn name(&self) -> &str {
        "desktop-windows"
    }

    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        if !cfg!(target_os = "windows") {
            return Err(NotifyError::Unavailable(
                "Windows notifier is only available on Windows".into(),
            ));
        }
        if which::which("powershell").is_err() {
            return Err(NotifyError::Unavailable("powershell is not available".into()));
        }

        let script = Self::script(notification);
        let output = run_command(
            Command::new("powershell").args([
                "-NoProfile",
                "-ExecutionPolicy",
                "Bypass",
                "-Command",
                &script,
            ]),
            "powershell",
        )?;

        match output.status.code() {
            Some(0) => Ok(()),
            Some(BURNT_TOAST_MISSING) => Err(NotifyError::Unavailable(
                "No Windows desktop notification backend available. \
                 Install the BurntToast PowerShell module."
                    .into(),
            )),
            code => Err(NotifyError::DispatchFailed(format!(
                "PowerShell notifier failed with code {}: {}",
                code.unwrap_or(-1),
                stderr_text(&output)
            ))),
        }
    }
}

/// freedesktop 通知（notify-send）
pub struct LinuxNotifier;

impl LinuxNotifier {
    pub fn new() -> Self {
        Self
    }

    pub fn urgency(level: NotificationLevel) -> &'static str {
        match level {
            NotificationLevel::Failure => "critical",
            NotificationLevel::Success | NotificationLevel::Info => "normal",
        }
    }
}

impl Default for LinuxNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for LinuxNotifier {
    fn name(&self) -> &str {
        "desktop-linux"
    }

    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        if which::which("notify-send").is_err() {
            return Err(NotifyError::Unavailable(
                "notify-send is not available on this system".into(),
            ));
        }
        let has_session = std::env::var_os("DISPLAY").is_some()
            || std::env::var_os("WAYLAND_DISPLAY").is_some()
            || std::env::var_os("DBUS_SESSION_BUS_ADDRESS").is_some();
        if !has_session {
            return Err(NotifyError::Unavailable(
                "no graphical session detected (DISPLAY/WAYLAND_DISPLAY unset)".into(),
            ));
        }

        let output = run_command(
            Command::new("notify-send").args([
                "--app-name=agent-notify",
                "--urgency",
                Self::urgency(notification.level),
                "--",
                &notification.title,
                &notification.message,
            ]),
            "notify-send",
        )?;
        if !output.status.success() {
            return Err(NotifyError::DispatchFailed(format!(
                "notify-send failed with code {}: {}",
                output.status.code().unwrap_or(-1),
                stderr_text(&output)
            )));
        }
        Ok(())
    }
}

pub fn escape_applescript(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

pub fn escape_powershell_single_quoted(value: &str) -> String {
    value.replace('\'', "''")
}

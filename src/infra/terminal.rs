//! 终端辅助 - 前台应用检测与提示音

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use clap::ValueEnum;
use tracing::{debug, info};

/// 被视为"用户正在看终端"的前台应用
pub const TERMINAL_APP_NAMES: &[&str] = &[
    "Terminal",
    "iTerm2",
    "Warp",
    "WezTerm",
    "Alacritty",
    "kitty",
    "Ghostty",
    "Hyper",
    "Tabby",
];

const MACOS_PING_SOUNDS: &[&str] = &[
    "/System/Library/Sounds/Ping.aiff",
    "/System/Library/Sounds/Glass.aiff",
];

/// 通知后的提示音
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Chime {
    #[default]
    None,
    Bell,
    Ping,
}

pub fn is_terminal_app(name: &str) -> bool {
    TERMINAL_APP_NAMES.contains(&name.trim())
}

/// 用户是否正在使用终端（仅 macOS 可判断，其他平台始终返回 false）
pub fn is_user_focused_on_terminal() -> bool {
    if !cfg!(target_os = "macos") || which::which("osascript").is_err() {
        return false;
    }

    let script = "tell application \"System Events\" \
                  to get name of first application process whose frontmost is true";
    let output = match Command::new("osascript").args(["-e", script]).output() {
        Ok(output) => output,
        Err(e) => {
            info!(error = %e, "Unable to detect frontmost app");
            return false;
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        info!(
            error = if stderr.is_empty() { "unknown osascript error" } else { stderr },
            "Unable to detect frontmost app"
        );
        return false;
    }

    let frontmost = String::from_utf8_lossy(&output.stdout);
    debug!(frontmost = %frontmost.trim(), "Detected frontmost app");
    is_terminal_app(&frontmost)
}

/// 播放提示音；ping 在不支持的平台上退化为终端响铃
pub fn play_chime(chime: Chime) {
    match chime {
        Chime::None => {}
        Chime::Bell => ring_bell(),
        Chime::Ping => {
            if !play_ping() {
                ring_bell();
            }
        }
    }
}

fn ring_bell() {
    let mut stderr = std::io::stderr();
    if let Err(e) = stderr.write_all(b"\x07").and_then(|_| stderr.flush()) {
        info!(error = %e, "Bell chime failed");
    }
}

fn play_ping() -> bool {
    if cfg!(target_os = "macos") {
        let Ok(afplay) = which::which("afplay") else {
            info!("afplay not found; falling back to terminal bell");
            return false;
        };
        for sound in MACOS_PING_SOUNDS {
            if !Path::new(sound).exists() {
                continue;
            }
            if run_quietly(Command::new(&afplay).arg(sound)) {
                return true;
            }
        }
        info!("Unable to play macOS ping sound; falling back to terminal bell");
        return false;
    }

    if cfg!(target_os = "windows") {
        let played = run_quietly(Command::new("powershell").args([
            "-NoProfile",
            "-ExecutionPolicy",
            "Bypass",
            "-Command",
            "[console]::beep(1000,220)",
        ]));
        if !played {
            info!("Windows ping chime failed; falling back to terminal bell");
        }
        return played;
    }

    false
}

fn run_quietly(command: &mut Command) -> bool {
    command
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

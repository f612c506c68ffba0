// src/cli/tail.rs
//! Tail 命令 - 跟踪日志文件，出现指定模式时发送通知

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;

use super::{build_dispatcher, parse_poll_interval, DisplayArgs};
use crate::config::AppConfig;
use crate::infra::tail::{LinePattern, LogTailer, TailMatch};
use crate::notification::{Notification, NotificationLevel};

/// Tail 命令参数
#[derive(Args, Debug)]
pub struct TailArgs {
    /// Log file to follow
    #[arg(long)]
    pub file: PathBuf,

    /// Pattern that triggers notification
    #[arg(long)]
    pub pattern: String,

    /// Treat the pattern as a regular expression
    #[arg(long)]
    pub regex: bool,

    #[command(flatten)]
    pub display: DisplayArgs,

    /// Polling interval in seconds
    #[arg(long, default_value_t = 0.5, value_parser = parse_poll_interval)]
    pub poll_interval: f64,
}

/// 匹配结果 → 通知
pub fn tail_notification(
    found: &TailMatch,
    pattern: &str,
    path: &Path,
    display: &DisplayArgs,
    config: &AppConfig,
) -> Notification {
    let title = display.title.clone().unwrap_or_else(|| {
        format!(
            "[{}] Done",
            display.name.as_deref().unwrap_or(&config.title_prefix)
        )
    });
    let body = format!(
        "Pattern '{}' detected in {:.2}s\nFile: {}",
        pattern,
        found.duration_seconds,
        path.display()
    );
    Notification::new(title, body, NotificationLevel::Info)
        .with_meta("file", path.display().to_string())
        .with_meta("pattern", pattern)
        .with_meta("line", found.line.clone())
        .with_meta("duration_seconds", found.duration_seconds)
}

/// 处理 tail 命令
pub fn handle_tail(args: TailArgs, config: &AppConfig) -> Result<i32> {
    if !args.file.is_file() {
        bail!("File not found: {}", args.file.display());
    }
    let pattern = if args.regex {
        LinePattern::regex(&args.pattern)?
    } else {
        LinePattern::contains(args.pattern.clone())
    };

    let dispatcher = build_dispatcher(config, args.display.channel);
    let tailer = LogTailer::new(&args.file, pattern, Duration::from_secs_f64(args.poll_interval));
    let found = tailer.wait_for_match()?;

    dispatcher.dispatch(&tail_notification(
        &found,
        &args.pattern,
        &args.file,
        &args.display,
        config,
    ));
    Ok(0)
}

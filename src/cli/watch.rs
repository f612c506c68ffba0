// src/cli/watch.rs
//! Watch 命令 - 监控已有 PID，退出后发送通知

use anyhow::Result;
use clap::Args;
use tracing::debug;

use super::{build_dispatcher, parse_poll_interval, process_exit_code, DisplayArgs};
use crate::config::AppConfig;
use crate::infra::process::infer_tool_name_from_pid;
use crate::infra::watcher::ProcessWatcher;
use crate::notification::{watch_notification, TitleOptions};

/// Watch 命令参数
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// PID to monitor until exit
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub pid: u32,

    #[command(flatten)]
    pub display: DisplayArgs,

    /// Polling interval in seconds (defaults to the configured interval)
    #[arg(long, value_parser = parse_poll_interval)]
    pub poll_interval: Option<f64>,
}

/// 处理 watch 命令；能拿到退出码时以它退出，否则为 0
pub fn handle_watch(args: WatchArgs, config: &AppConfig) -> Result<i32> {
    let dispatcher = build_dispatcher(config, args.display.channel);
    // 进程退出后就查不到名字了，先推断
    let tool_name = args.display.name.clone().or_else(|| infer_tool_name_from_pid(args.pid));

    let watcher = ProcessWatcher::new(args.poll_interval.unwrap_or(config.poll_interval))?;
    let result = watcher.wait_for_exit(args.pid)?;
    debug!(
        pid = result.pid,
        exit_code = ?result.exit_code,
        already_exited = result.already_exited,
        "Watched process finished"
    );

    let options = TitleOptions::new(&config.title_prefix)
        .with_tool_name(tool_name)
        .with_title_override(args.display.title);
    dispatcher.dispatch(&watch_notification(&result, &options));

    Ok(result.exit_code.map(process_exit_code).unwrap_or(0))
}

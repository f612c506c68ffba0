// src/cli/run.rs
//! Run 命令 - 运行命令并在结束后发送通知

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use clap::Args;
use tracing::debug;

use super::{build_dispatcher, process_exit_code, DisplayArgs};
use crate::config::AppConfig;
use crate::infra::process::infer_tool_name_from_command;
use crate::infra::runner::{ProcessRunner, RunError, RunOptions};
use crate::notification::{run_notification, TitleOptions};

/// 找不到可执行文件
pub const EXIT_NOT_FOUND: i32 = 127;
/// 被 Ctrl-C 中断
pub const EXIT_INTERRUPTED: i32 = 130;

/// Run 命令参数
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub display: DisplayArgs,

    /// Include last N lines of combined stdout/stderr in notification body
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub tail_lines: Option<u64>,

    /// Disable output capture
    #[arg(long)]
    pub no_capture: bool,

    /// Command to run (use `--` before it)
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// 处理 run 命令，返回进程退出码
pub fn handle_run(args: RunArgs, config: &AppConfig, interrupt: Arc<AtomicBool>) -> i32 {
    let dispatcher = build_dispatcher(config, args.display.channel);
    let tool_name = args
        .display
        .name
        .clone()
        .or_else(|| infer_tool_name_from_command(&args.command));

    let options = RunOptions {
        tool_name: tool_name.clone(),
        capture_output: !args.no_capture,
        tail_lines: args
            .tail_lines
            .map(|lines| lines as usize)
            .unwrap_or(config.tail_lines),
    };

    let runner = ProcessRunner::new().with_interrupt_flag(interrupt);
    let result = match runner.run(&args.command, &options) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{}", e);
            return match e {
                RunError::NotFound { .. } => EXIT_NOT_FOUND,
                RunError::Interrupted => EXIT_INTERRUPTED,
                _ => 1,
            };
        }
    };

    debug!(
        exit_code = result.exit_code,
        duration = result.duration_seconds,
        "Command finished"
    );

    let options = TitleOptions::new(&config.title_prefix)
        .with_tool_name(tool_name)
        .with_title_override(args.display.title);
    dispatcher.dispatch(&run_notification(&result, &options));

    process_exit_code(result.exit_code)
}

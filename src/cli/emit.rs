// src/cli/emit.rs
//! Emit 命令 - 由外部集成提供结果，直接发送完成通知

use chrono::Utc;
use clap::Args;
use tracing::debug;

use super::{build_dispatcher, DisplayArgs};
use crate::config::AppConfig;
use crate::infra::process::infer_tool_name_from_command;
use crate::notification::{run_notification, TitleOptions};
use crate::result::RunResult;

/// Emit 命令参数
#[derive(Args, Debug)]
pub struct EmitArgs {
    #[command(flatten)]
    pub display: DisplayArgs,

    /// Command string to include
    #[arg(long)]
    pub command: String,

    /// Elapsed duration in seconds
    #[arg(long, value_parser = parse_duration_seconds)]
    pub duration_seconds: f64,

    /// Command exit code
    #[arg(long, allow_hyphen_values = true)]
    pub exit_code: i32,
}

fn parse_duration_seconds(value: &str) -> Result<f64, String> {
    let seconds: f64 = value.parse().map_err(|_| format!("invalid number: {}", value))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("{} is not in the range >= 0", value));
    }
    Ok(seconds)
}

/// 由 emit 参数构造运行结果；引号不配对时保留整段命令
pub fn emitted_result(command_text: &str, duration_seconds: f64, exit_code: i32, name: Option<String>) -> RunResult {
    let parsed = shell_words::split(command_text).unwrap_or_else(|e| {
        debug!(error = %e, "Failed to split command, keeping it as one word");
        vec![command_text.to_string()]
    });
    let tool_name = name.or_else(|| infer_tool_name_from_command(&parsed));
    let command = if parsed.is_empty() {
        vec![command_text.to_string()]
    } else {
        parsed
    };

    let now = Utc::now();
    RunResult {
        command,
        exit_code,
        duration_seconds,
        output_tail: Vec::new(),
        started_at: now,
        ended_at: now,
        tool_name,
    }
}

/// 处理 emit 命令
pub fn handle_emit(args: EmitArgs, config: &AppConfig) -> i32 {
    let dispatcher = build_dispatcher(config, args.display.channel);
    let result = emitted_result(
        &args.command,
        args.duration_seconds,
        args.exit_code,
        args.display.name,
    );

    let options = TitleOptions::new(&config.title_prefix)
        .with_tool_name(result.tool_name.clone())
        .with_title_override(args.display.title);
    dispatcher.dispatch(&run_notification(&result, &options));
    0
}

// src/cli/hook.rs
//! Hook 命令 - 读取 agent CLI 的 hook payload，按事件发送任务级通知
//!
//! 无论是否发送通知，hook 命令都以 0 退出，避免阻塞调用方。

use std::io::Read;

use clap::Args;
use tracing::debug;

use super::{build_dispatcher, DisplayArgs};
use crate::config::AppConfig;
use crate::hooks::claude::{self, ClaudeHook};
use crate::hooks::codex::{self, CodexHook};
use crate::hooks::gemini::{self, GeminiHook};
use crate::hooks::ollama::OllamaHook;
use crate::hooks::{evaluate, HookAdapter, HookNotification};
use crate::infra::terminal::{is_user_focused_on_terminal, play_chime, Chime};
use crate::notification::{task_notification, Notification, TitleOptions};

/// 各 hook 命令共用参数
#[derive(Args, Debug, Clone, Default)]
pub struct HookCommonArgs {
    #[command(flatten)]
    pub display: DisplayArgs,

    /// Skip notifications when your terminal app is frontmost (macOS)
    #[arg(long, overrides_with = "notify_when_focused")]
    pub quiet_when_focused: bool,

    /// Always notify, even when the terminal is frontmost
    #[arg(long, overrides_with = "quiet_when_focused")]
    pub notify_when_focused: bool,

    /// Optional sound after the notification
    #[arg(long, value_enum, ignore_case = true, default_value_t = Chime::None)]
    pub chime: Chime,
}

fn parse_max_chars(value: &str) -> Result<usize, String> {
    let chars: usize = value.parse().map_err(|_| format!("invalid number: {}", value))?;
    if chars < 20 {
        return Err(format!("{} is not in the range >= 20", value));
    }
    Ok(chars)
}

/// claude-hook 参数
#[derive(Args, Debug)]
pub struct ClaudeHookArgs {
    /// Claude hook event name that should trigger a notification
    #[arg(long, default_value = claude::DEFAULT_EVENT)]
    pub event: String,

    /// Maximum user prompt length in the notification body
    #[arg(long, default_value_t = 160, value_parser = parse_max_chars)]
    pub max_user_prompt_chars: usize,

    /// Maximum tool/result text length in the notification body
    #[arg(long, default_value_t = 220, value_parser = parse_max_chars)]
    pub max_result_chars: usize,

    #[command(flatten)]
    pub common: HookCommonArgs,
}

/// gemini-hook 参数
#[derive(Args, Debug)]
pub struct GeminiHookArgs {
    /// Gemini hook event name that should trigger a notification
    #[arg(long, default_value = gemini::DEFAULT_EVENT)]
    pub event: String,

    /// Maximum prompt length in the notification body
    #[arg(long, default_value_t = 160, value_parser = parse_max_chars)]
    pub max_prompt_chars: usize,

    /// Maximum response length in the notification body
    #[arg(long, default_value_t = 220, value_parser = parse_max_chars)]
    pub max_response_chars: usize,

    #[command(flatten)]
    pub common: HookCommonArgs,
}

/// codex-hook 参数
#[derive(Args, Debug)]
pub struct CodexHookArgs {
    /// Codex event type that should trigger a notification
    #[arg(long, default_value = codex::DEFAULT_EVENT)]
    pub event: String,

    /// Maximum input preview length in the notification body
    #[arg(long, default_value_t = 140, value_parser = parse_max_chars)]
    pub max_input_chars: usize,

    /// Maximum assistant message length in the notification body
    #[arg(long, default_value_t = 220, value_parser = parse_max_chars)]
    pub max_assistant_chars: usize,

    #[command(flatten)]
    pub common: HookCommonArgs,

    /// Payload passed by Codex notify (JSON or key=value tokens); stdin is used when absent
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub payload: Vec<String>,
}

/// ollama-hook 参数
#[derive(Args, Debug)]
pub struct OllamaHookArgs {
    /// Maximum response text length in the notification body
    #[arg(long, default_value_t = 220, value_parser = parse_max_chars)]
    pub max_response_chars: usize,

    #[command(flatten)]
    pub common: HookCommonArgs,
}

pub fn handle_claude_hook(args: ClaudeHookArgs, config: &AppConfig) -> i32 {
    let adapter = ClaudeHook {
        target_event: args.event,
        max_user_prompt_chars: args.max_user_prompt_chars,
        max_result_chars: args.max_result_chars,
    };
    handle_hook(&adapter, &[], &args.common, config)
}

pub fn handle_gemini_hook(args: GeminiHookArgs, config: &AppConfig) -> i32 {
    let adapter = GeminiHook {
        target_event: args.event,
        max_prompt_chars: args.max_prompt_chars,
        max_response_chars: args.max_response_chars,
    };
    handle_hook(&adapter, &[], &args.common, config)
}

pub fn handle_codex_hook(args: CodexHookArgs, config: &AppConfig) -> i32 {
    let adapter = CodexHook {
        target_event: args.event,
        max_input_chars: args.max_input_chars,
        max_assistant_chars: args.max_assistant_chars,
    };
    handle_hook(&adapter, &args.payload, &args.common, config)
}

pub fn handle_ollama_hook(args: OllamaHookArgs, config: &AppConfig) -> i32 {
    let adapter = OllamaHook {
        max_response_chars: args.max_response_chars,
    };
    handle_hook(&adapter, &[], &args.common, config)
}

fn handle_hook(adapter: &dyn HookAdapter, positional: &[String], common: &HookCommonArgs, config: &AppConfig) -> i32 {
    let mut stdin = std::io::stdin().lock();
    run_hook(adapter, positional, &mut stdin, common, config);
    0
}

/// hook 结果 → 通知
pub fn hook_notification(
    adapter: &dyn HookAdapter,
    rendered: HookNotification,
    display: &DisplayArgs,
    config: &AppConfig,
) -> Notification {
    let name = display
        .name
        .clone()
        .unwrap_or_else(|| adapter.default_name().to_string());
    let options = TitleOptions::new(&config.title_prefix)
        .with_tool_name(Some(name))
        .with_title_override(display.title.clone());
    task_notification(&rendered.body_lines, rendered.metadata, &options)
}

/// 读取 payload、判断是否发送、发送并播放提示音；返回是否发送
pub fn run_hook(
    adapter: &dyn HookAdapter,
    positional: &[String],
    stdin: &mut dyn Read,
    common: &HookCommonArgs,
    config: &AppConfig,
) -> bool {
    let Some(rendered) = evaluate(adapter, positional, stdin) else {
        return false;
    };

    if common.quiet_when_focused && is_user_focused_on_terminal() {
        debug!(source = adapter.source(), "Terminal is focused, skipping notification");
        return false;
    }

    let dispatcher = build_dispatcher(config, common.display.channel);
    let notification = hook_notification(adapter, rendered, &common.display, config);
    dispatcher.dispatch(&notification);
    play_chime(common.chime);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{Channel, NotificationLevel};
    use serde_json::json;
    use std::io::Cursor;

    fn console_args() -> HookCommonArgs {
        HookCommonArgs {
            display: DisplayArgs {
                channel: Some(Channel::Console),
                ..DisplayArgs::default()
            },
            ..HookCommonArgs::default()
        }
    }

    #[test]
    fn test_hook_notification_title_and_body() {
        let adapter = GeminiHook::default();
        let payload = json!({"hook_event_name": "AfterAgent", "prompt": "hi"});
        let rendered = adapter.render(payload.as_object().unwrap()).unwrap();
        let n = hook_notification(&adapter, rendered, &DisplayArgs::default(), &AppConfig::default());
        assert_eq!(n.title, "[gemini] Done");
        assert_eq!(n.message, "Event: AfterAgent\nPrompt: hi");
        assert_eq!(n.level, NotificationLevel::Success);
        assert_eq!(n.metadata["source"], json!("gemini"));
    }

    #[test]
    fn test_hook_notification_custom_name() {
        let adapter = ClaudeHook::default();
        let rendered = adapter
            .render(json!({"hook_event_name": "Stop"}).as_object().unwrap())
            .unwrap();
        let display = DisplayArgs {
            name: Some("claude".into()),
            ..DisplayArgs::default()
        };
        let n = hook_notification(&adapter, rendered, &display, &AppConfig::default());
        assert_eq!(n.title, "[claude] Done");
    }

    #[test]
    fn test_run_hook_sends_on_match() {
        let mut stdin = Cursor::new(br#"{"hook_event_name":"Stop"}"#.to_vec());
        assert!(run_hook(&ClaudeHook::default(), &[], &mut stdin, &console_args(), &AppConfig::default()));
    }

    #[test]
    fn test_run_hook_skips_mismatch() {
        let mut stdin = Cursor::new(br#"{"hook_event_name":"Notification"}"#.to_vec());
        assert!(!run_hook(&ClaudeHook::default(), &[], &mut stdin, &console_args(), &AppConfig::default()));
    }

    #[test]
    fn test_parse_max_chars() {
        assert_eq!(parse_max_chars("20"), Ok(20));
        assert!(parse_max_chars("19").is_err());
    }
}

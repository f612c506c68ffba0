// src/hooks/claude.rs
//! Claude Code hook 适配器

use std::io::Read;

use serde_json::json;

use super::payload::{event_matches, extract_event, extract_text, read_input, read_json_payload};
use super::{push_line, raw_field, HookAdapter, HookNotification, HookSkip, Payload, PayloadError};
use crate::notification::Metadata;

pub const DEFAULT_EVENT: &str = "Stop";
pub const DEFAULT_NAME: &str = "claude-code";

const REASON_MAX_CHARS: usize = 120;
const TOOL_NAME_MAX_CHARS: usize = 80;
const SESSION_MAX_CHARS: usize = 64;

pub struct ClaudeHook {
    pub target_event: String,
    pub max_user_prompt_chars: usize,
    pub max_result_chars: usize,
}

impl Default for ClaudeHook {
    fn default() -> Self {
        Self {
            target_event: DEFAULT_EVENT.to_string(),
            max_user_prompt_chars: 160,
            max_result_chars: 220,
        }
    }
}

impl HookAdapter for ClaudeHook {
    fn source(&self) -> &'static str {
        "claude"
    }

    fn label(&self) -> &'static str {
        "Claude hook"
    }

    fn default_name(&self) -> &'static str {
        DEFAULT_NAME
    }

    fn read_payload(&self, _positional: &[String], stdin: &mut dyn Read) -> Result<Payload, PayloadError> {
        read_json_payload(&read_input(stdin), self.label())
    }

    fn render(&self, payload: &Payload) -> Result<HookNotification, HookSkip> {
        let event = extract_event(payload);
        if !event_matches(&event, &self.target_event) {
            return Err(HookSkip::EventMismatch {
                actual: event,
                target: self.target_event.clone(),
            });
        }

        let mut body_lines = vec![format!("Event: {}", event)];
        push_line(&mut body_lines, "Reason", &extract_text(payload, &["reason"], REASON_MAX_CHARS));
        push_line(
            &mut body_lines,
            "Prompt",
            &extract_text(payload, &["user_prompt"], self.max_user_prompt_chars),
        );
        push_line(&mut body_lines, "Tool", &extract_text(payload, &["tool_name"], TOOL_NAME_MAX_CHARS));
        push_line(
            &mut body_lines,
            "Result",
            &extract_text(payload, &["tool_result"], self.max_result_chars),
        );
        push_line(&mut body_lines, "Session", &extract_text(payload, &["session_id"], SESSION_MAX_CHARS));

        let mut metadata = Metadata::new();
        metadata.insert("event".into(), json!(event));
        metadata.insert("session_id".into(), raw_field(payload, "session_id"));
        metadata.insert("reason".into(), raw_field(payload, "reason"));
        metadata.insert("tool_name".into(), raw_field(payload, "tool_name"));
        metadata.insert("source".into(), json!(self.source()));

        Ok(HookNotification {
            event,
            body_lines,
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn payload(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_render_stop_event() {
        let hook = ClaudeHook::default();
        let rendered = hook
            .render(&payload(json!({
                "hook_event_name": "Stop",
                "reason": "task complete",
                "user_prompt": "fix   the\nflaky test",
                "tool_name": "Bash",
                "tool_result": "ok",
                "session_id": "abc123"
            })))
            .unwrap();

        assert_eq!(
            rendered.body_lines,
            vec![
                "Event: Stop",
                "Reason: task complete",
                "Prompt: fix the flaky test",
                "Tool: Bash",
                "Result: ok",
                "Session: abc123",
            ]
        );
        assert_eq!(rendered.metadata["source"], json!("claude"));
        assert_eq!(rendered.metadata["session_id"], json!("abc123"));
    }

    #[test]
    fn test_missing_fields_are_null_metadata() {
        let rendered = ClaudeHook::default()
            .render(&payload(json!({"hook_event_name": "stop"})))
            .unwrap();
        assert_eq!(rendered.body_lines, vec!["Event: stop"]);
        assert_eq!(rendered.metadata["reason"], Value::Null);
    }

    #[test]
    fn test_other_event_skipped() {
        let err = ClaudeHook::default()
            .render(&payload(json!({"hook_event_name": "SubagentStop"})))
            .unwrap_err();
        assert!(matches!(err, HookSkip::EventMismatch { .. }));
    }

    #[test]
    fn test_prompt_clipped() {
        let hook = ClaudeHook {
            max_user_prompt_chars: 20,
            ..ClaudeHook::default()
        };
        let rendered = hook
            .render(&payload(json!({"hook_event_name": "Stop", "user_prompt": "x".repeat(50)})))
            .unwrap();
        assert_eq!(rendered.body_lines[1], format!("Prompt: {}...", "x".repeat(17)));
    }
}

// src/hooks/codex.rs
//! Codex CLI notify 适配器
//!
//! Codex 把 payload 作为位置参数传入；没有位置参数时再读 stdin。

use std::io::Read;

use serde_json::{json, Value};

use super::payload::{
    event_matches, extract_codex_event, extract_text, parse_payload_parts, read_input, try_parse_json_object,
};
use super::{push_line, raw_field, HookAdapter, HookNotification, HookSkip, Payload, PayloadError};
use crate::notification::Metadata;

pub const DEFAULT_EVENT: &str = "agent-turn-complete";
pub const DEFAULT_NAME: &str = "codex";

const CWD_MAX_CHARS: usize = 120;
const TURN_MAX_CHARS: usize = 64;

pub struct CodexHook {
    pub target_event: String,
    pub max_input_chars: usize,
    pub max_assistant_chars: usize,
}

impl Default for CodexHook {
    fn default() -> Self {
        Self {
            target_event: DEFAULT_EVENT.to_string(),
            max_input_chars: 140,
            max_assistant_chars: 220,
        }
    }
}

/// 第一个非空的原始值
fn first_present(payload: &Payload, keys: &[&str]) -> Value {
    keys.iter()
        .map(|key| raw_field(payload, key))
        .find(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
        .unwrap_or(Value::Null)
}

impl HookAdapter for CodexHook {
    fn source(&self) -> &'static str {
        "codex"
    }

    fn label(&self) -> &'static str {
        "Codex hook"
    }

    fn default_name(&self) -> &'static str {
        DEFAULT_NAME
    }

    fn read_payload(&self, positional: &[String], stdin: &mut dyn Read) -> Result<Payload, PayloadError> {
        if let Some(payload) = parse_payload_parts(positional) {
            return Ok(payload);
        }
        try_parse_json_object(&read_input(stdin)).ok_or(PayloadError::Missing(self.label()))
    }

    fn render(&self, payload: &Payload) -> Result<HookNotification, HookSkip> {
        let event = extract_codex_event(payload);
        if event.is_empty() {
            return Err(HookSkip::MissingEvent(self.label()));
        }
        if !event_matches(&event, &self.target_event) {
            return Err(HookSkip::EventMismatch {
                actual: event,
                target: self.target_event.clone(),
            });
        }

        let mut body_lines = vec![format!("Event: {}", event)];
        push_line(
            &mut body_lines,
            "Input",
            &extract_text(payload, &["input-messages", "input_messages"], self.max_input_chars),
        );
        push_line(
            &mut body_lines,
            "Assistant",
            &extract_text(
                payload,
                &["last-assistant-message", "last_assistant_message"],
                self.max_assistant_chars,
            ),
        );
        push_line(&mut body_lines, "CWD", &extract_text(payload, &["cwd"], CWD_MAX_CHARS));
        push_line(&mut body_lines, "Turn", &extract_text(payload, &["turn-id", "turn_id"], TURN_MAX_CHARS));

        let mut metadata = Metadata::new();
        metadata.insert("event".into(), json!(event));
        metadata.insert("turn_id".into(), first_present(payload, &["turn-id", "turn_id"]));
        metadata.insert("cwd".into(), raw_field(payload, "cwd"));
        metadata.insert("source".into(), json!(self.source()));

        Ok(HookNotification {
            event,
            body_lines,
            metadata,
        })
    }
}

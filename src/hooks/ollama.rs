// src/hooks/ollama.rs
//! Ollama 输出适配器（`ollama run --format json` 的 JSON 行）

use std::io::Read;

use serde_json::{json, Value};

use super::payload::{extract_text, read_input, read_json_lines_payload};
use super::{push_line, raw_field, HookAdapter, HookNotification, HookSkip, Payload, PayloadError};
use crate::notification::Metadata;

pub const DEFAULT_NAME: &str = "ollama";
const EVENT: &str = "done";

const MODEL_MAX_CHARS: usize = 80;
const DONE_REASON_MAX_CHARS: usize = 80;

pub struct OllamaHook {
    pub max_response_chars: usize,
}

impl Default for OllamaHook {
    fn default() -> Self {
        Self { max_response_chars: 220 }
    }
}

impl HookAdapter for OllamaHook {
    fn source(&self) -> &'static str {
        "ollama"
    }

    fn label(&self) -> &'static str {
        "Ollama hook"
    }

    fn default_name(&self) -> &'static str {
        DEFAULT_NAME
    }

    fn read_payload(&self, _positional: &[String], stdin: &mut dyn Read) -> Result<Payload, PayloadError> {
        read_json_lines_payload(&read_input(stdin), self.label())
    }

    fn render(&self, payload: &Payload) -> Result<HookNotification, HookSkip> {
        // 流式输出中只有最后一条记录 done=true
        if let Some(Value::Bool(false)) = payload.get("done") {
            return Err(HookSkip::Incomplete);
        }

        let mut body_lines = vec![format!("Event: {}", EVENT)];
        push_line(&mut body_lines, "Model", &extract_text(payload, &["model"], MODEL_MAX_CHARS));
        push_line(
            &mut body_lines,
            "Response",
            &extract_text(payload, &["response"], self.max_response_chars),
        );
        push_line(
            &mut body_lines,
            "Reason",
            &extract_text(payload, &["done_reason"], DONE_REASON_MAX_CHARS),
        );

        let mut metadata = Metadata::new();
        metadata.insert("event".into(), json!(EVENT));
        metadata.insert("model".into(), raw_field(payload, "model"));
        metadata.insert("done_reason".into(), raw_field(payload, "done_reason"));
        metadata.insert("source".into(), json!(self.source()));

        Ok(HookNotification {
            event: EVENT.to_string(),
            body_lines,
            metadata,
        })
    }
}

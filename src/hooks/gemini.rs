// src/hooks/gemini.rs
//! Gemini CLI hook 适配器

use std::io::Read;

use serde_json::json;

use super::payload::{event_matches, extract_event, extract_text, read_input, read_json_payload};
use super::{push_line, raw_field, HookAdapter, HookNotification, HookSkip, Payload, PayloadError};
use crate::notification::Metadata;

pub const DEFAULT_EVENT: &str = "AfterAgent";
pub const DEFAULT_NAME: &str = "gemini";

const SESSION_MAX_CHARS: usize = 64;

pub struct GeminiHook {
    pub target_event: String,
    pub max_prompt_chars: usize,
    pub max_response_chars: usize,
}

impl Default for GeminiHook {
    fn default() -> Self {
        Self {
            target_event: DEFAULT_EVENT.to_string(),
            max_prompt_chars: 160,
            max_response_chars: 220,
        }
    }
}

impl HookAdapter for GeminiHook {
    fn source(&self) -> &'static str {
        "gemini"
    }

    fn label(&self) -> &'static str {
        "Gemini hook"
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

        let prompt = extract_text(payload, &["prompt"], self.max_prompt_chars);
        let response = extract_text(payload, &["prompt_response"], self.max_response_chars);

        let mut body_lines = vec![format!("Event: {}", event)];
        push_line(&mut body_lines, "Prompt", &prompt);
        push_line(&mut body_lines, "Response", &response);
        push_line(&mut body_lines, "Session", &extract_text(payload, &["session_id"], SESSION_MAX_CHARS));

        let mut metadata = Metadata::new();
        metadata.insert("event".into(), json!(event));
        metadata.insert("session_id".into(), raw_field(payload, "session_id"));
        metadata.insert("has_prompt".into(), json!(!prompt.is_empty()));
        metadata.insert("has_response".into(), json!(!response.is_empty()));
        metadata.insert("source".into(), json!(self.source()));

        Ok(HookNotification {
            event,
            body_lines,
            metadata,
        })
    }
}

// src/hooks/payload.rs
//! Hook payload 归一化
//!
//! 支持三种输入形态：
//! - 单个 JSON 对象
//! - 多行 JSON（最后一个能解析为对象的行生效）
//! - 位置参数形式的 `key=value` / 成对 token

use std::io::Read;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::notification::formatter::truncate;

/// 归一化前的原始 payload
pub type Payload = Map<String, Value>;

/// 事件字段候选 key
pub const EVENT_KEYS: &[&str] = &["hook_event_name", "event", "type"];
/// 事件名最大字符数
pub const EVENT_MAX_CHARS: usize = 80;

/// 只在旧版 Codex payload 中出现的字段
const CODEX_LEGACY_KEYS: &[&str] = &["thread-id", "turn-id", "input-messages", "last-assistant-message"];
const CODEX_LEGACY_EVENT: &str = "after_agent";

/// 互为别名的事件（归一化之后）
const EVENT_ALIASES: &[&str] = &["after-agent", "agent-turn-complete"];

/// payload 读取失败；调用方记录日志后跳过通知
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("{0} payload missing. Skipping notification.")]
    Missing(&'static str),
    #[error("{0} payload is not valid JSON. Skipping notification.")]
    InvalidJson(&'static str),
    #[error("{0} payload must be a JSON object. Skipping notification.")]
    NotAnObject(&'static str),
    #[error("{0} payload did not include JSON object lines. Skipping notification.")]
    NoJsonLines(&'static str),
}

/// 读取全部 stdin；读取失败按空输入处理
pub fn read_input(input: &mut dyn Read) -> String {
    let mut text = String::new();
    if let Err(e) = input.read_to_string(&mut text) {
        debug!(error = %e, "Failed to read hook payload from stdin");
        text.clear();
    }
    text
}

/// 非字符串值转为展示文本；null 视为空
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(" "),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => value.to_string(),
    }
}

/// 折叠空白后按字符数截断
pub fn clip_for_notification(value: &str, limit: usize) -> String {
    let compact = value.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&compact, limit)
}

/// 按候选 key 依次查找，返回第一个非空的截断结果
pub fn extract_text(payload: &Payload, keys: &[&str], limit: usize) -> String {
    keys.iter()
        .filter_map(|key| payload.get(*key))
        .map(|value| clip_for_notification(&value_text(value), limit))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

/// 显式事件名（可能为空）
pub fn extract_event(payload: &Payload) -> String {
    extract_text(payload, EVENT_KEYS, EVENT_MAX_CHARS)
}

/// Codex 事件名；没有事件字段但带旧版字段时视为 after_agent
pub fn extract_codex_event(payload: &Payload) -> String {
    let explicit = extract_event(payload);
    if !explicit.is_empty() {
        return explicit;
    }
    if CODEX_LEGACY_KEYS.iter().any(|key| payload.contains_key(*key)) {
        return CODEX_LEGACY_EVENT.to_string();
    }
    String::new()
}

pub fn normalize_event_name(name: &str) -> String {
    name.trim().to_lowercase().replace('_', "-")
}

/// 归一化后比较，并处理别名
pub fn event_matches(actual: &str, target: &str) -> bool {
    let actual = normalize_event_name(actual);
    let target = normalize_event_name(target);
    if actual == target {
        return true;
    }
    EVENT_ALIASES.contains(&actual.as_str()) && EVENT_ALIASES.contains(&target.as_str())
}

/// 整段文本按单个 JSON 对象解析
pub fn read_json_payload(text: &str, label: &'static str) -> Result<Payload, PayloadError> {
    if text.trim().is_empty() {
        return Err(PayloadError::Missing(label));
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(PayloadError::NotAnObject(label)),
        Err(_) => Err(PayloadError::InvalidJson(label)),
    }
}

/// 逐行解析，最后一个 JSON 对象行生效
pub fn read_json_lines_payload(text: &str, label: &'static str) -> Result<Payload, PayloadError> {
    if text.trim().is_empty() {
        return Err(PayloadError::Missing(label));
    }
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        })
        .last()
        .ok_or(PayloadError::NoJsonLines(label))
}

/// 宽松解析：空白、非法 JSON、非对象都返回 None
pub fn try_parse_json_object(text: &str) -> Option<Payload> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// 解析位置参数形式的 payload
///
/// 1. 拼接后整体是 JSON 对象则直接使用
/// 2. 含 `=` 的 token 按 `key=value` 解析
/// 3. 其余 token 数为偶数时按成对 key/value 解析
/// 4. 否则（且前两步没有任何结果）整段存为 `raw_payload`
pub fn parse_payload_parts(parts: &[String]) -> Option<Payload> {
    if parts.is_empty() {
        return None;
    }

    let joined = parts.join(" ").trim().to_string();
    if let Some(parsed) = try_parse_json_object(&joined) {
        return Some(parsed);
    }

    let mut result = Payload::new();
    let mut loose: Vec<&str> = Vec::new();
    for part in parts {
        match part.split_once('=') {
            Some((key, value)) => {
                let key = key.trim();
                if !key.is_empty() {
                    result.insert(key.to_string(), Value::String(value.trim().to_string()));
                }
            }
            None => loose.push(part),
        }
    }

    if !loose.is_empty() && loose.len() % 2 == 0 {
        for pair in loose.chunks(2) {
            let key = pair[0].trim();
            if !key.is_empty() {
                result.insert(key.to_string(), Value::String(pair[1].to_string()));
            }
        }
    } else if !loose.is_empty() && result.is_empty() {
        result.insert("raw_payload".into(), Value::String(joined));
    }

    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn parts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_clip_collapses_whitespace() {
        assert_eq!(clip_for_notification("  hello \n\t world  ", 50), "hello world");
        assert_eq!(clip_for_notification("abcdefghij", 6), "abc...");
        assert_eq!(clip_for_notification("abcdefghij", 3), "abc");
        assert_eq!(clip_for_notification("", 10), "");
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!(null)), "");
        assert_eq!(value_text(&json!("x")), "x");
        assert_eq!(value_text(&json!(["fix", "the bug"])), "fix the bug");
        assert_eq!(value_text(&json!(42)), "42");
        assert_eq!(value_text(&json!(true)), "true");
        assert_eq!(value_text(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_extract_text_first_non_empty() {
        let payload = object(json!({"a": "  ", "b": null, "c": "value"}));
        assert_eq!(extract_text(&payload, &["missing", "a", "b", "c"], 20), "value");
        assert_eq!(extract_text(&payload, &["missing"], 20), "");
    }

    #[test]
    fn test_extract_event_key_order() {
        let payload = object(json!({"type": "t", "event": "e", "hook_event_name": "Stop"}));
        assert_eq!(extract_event(&payload), "Stop");
        let payload = object(json!({"type": "agent-turn-complete"}));
        assert_eq!(extract_event(&payload), "agent-turn-complete");
    }

    #[test]
    fn test_codex_legacy_event() {
        let payload = object(json!({"thread-id": "t1", "turn-id": "7"}));
        assert_eq!(extract_codex_event(&payload), "after_agent");
        assert_eq!(extract_codex_event(&object(json!({"cwd": "/tmp"}))), "");
    }

    #[test]
    fn test_event_matches() {
        assert!(event_matches("AfterAgent", "afteragent"));
        assert!(event_matches(" Stop ", "stop"));
        assert!(event_matches("agent_turn_complete", "agent-turn-complete"));
        assert!(event_matches("agent-turn-complete", "after-agent"));
        assert!(event_matches("after_agent", "agent-turn-complete"));
        assert!(!event_matches("SubagentStop", "Stop"));
        assert!(!event_matches("", "Stop"));
    }

    #[test]
    fn test_read_json_payload_errors() {
        assert_eq!(read_json_payload("  ", "Claude hook"), Err(PayloadError::Missing("Claude hook")));
        assert_eq!(read_json_payload("{", "Claude hook"), Err(PayloadError::InvalidJson("Claude hook")));
        assert_eq!(read_json_payload("[1]", "Claude hook"), Err(PayloadError::NotAnObject("Claude hook")));
        assert_eq!(
            PayloadError::NotAnObject("Gemini hook").to_string(),
            "Gemini hook payload must be a JSON object. Skipping notification."
        );
    }

    #[test]
    fn test_json_lines_last_object_wins() {
        let text = "{\"done\":false,\"response\":\"o\"}\nnot json\n[1,2]\n{\"done\":true,\"response\":\"ok\"}\n\n";
        let payload = read_json_lines_payload(text, "Ollama hook").unwrap();
        assert_eq!(payload["done"], json!(true));
        assert_eq!(payload["response"], json!("ok"));

        assert_eq!(
            read_json_lines_payload("garbage\n[1]", "Ollama hook"),
            Err(PayloadError::NoJsonLines("Ollama hook"))
        );
    }

    #[test]
    fn test_parts_json() {
        let payload = parse_payload_parts(&parts(&[r#"{"type":"agent-turn-complete","#, r#""cwd":"/w"}"#])).unwrap();
        assert_eq!(payload["type"], json!("agent-turn-complete"));
        assert_eq!(payload["cwd"], json!("/w"));
    }

    #[test]
    fn test_parts_key_value_and_pairs() {
        let payload = parse_payload_parts(&parts(&["type=agent-turn-complete", "cwd", "/repo"])).unwrap();
        assert_eq!(payload["type"], json!("agent-turn-complete"));
        assert_eq!(payload["cwd"], json!("/repo"));
    }

    #[test]
    fn test_parts_odd_tokens_become_raw_payload() {
        let payload = parse_payload_parts(&parts(&["hello", "there", "world"])).unwrap();
        assert_eq!(payload.len(), 1);
        assert_eq!(payload["raw_payload"], json!("hello there world"));

        // 已有 key=value 时丢弃零散 token
        let payload = parse_payload_parts(&parts(&["type=x", "stray"])).unwrap();
        assert_eq!(payload.len(), 1);
        assert_eq!(payload["type"], json!("x"));
    }

    #[test]
    fn test_parts_empty() {
        assert!(parse_payload_parts(&[]).is_none());
        assert!(parse_payload_parts(&parts(&["=value"])).is_none());
    }

    #[test]
    fn test_read_input() {
        let mut input = std::io::Cursor::new(b"{\"a\":1}".to_vec());
        assert_eq!(read_input(&mut input), "{\"a\":1}");
    }
}

//! Hook 适配器集成测试：stdin/位置参数 → 通知内容

use std::io::Cursor;

use agent_notify::hooks::claude::ClaudeHook;
use agent_notify::hooks::codex::CodexHook;
use agent_notify::hooks::gemini::GeminiHook;
use agent_notify::hooks::ollama::OllamaHook;
use agent_notify::hooks::{evaluate, HookAdapter};

fn stdin(text: &str) -> Cursor<Vec<u8>> {
    Cursor::new(text.as_bytes().to_vec())
}

#[test]
fn test_default_names() {
    assert_eq!(ClaudeHook::default().default_name(), "claude-code");
    assert_eq!(GeminiHook::default().default_name(), "gemini");
    assert_eq!(CodexHook::default().default_name(), "codex");
    assert_eq!(OllamaHook::default().default_name(), "ollama");
}

#[test]
fn test_codex_legacy_alias_matches_after_agent_target() {
    let hook = CodexHook {
        target_event: "after-agent".into(),
        ..CodexHook::default()
    };
    let rendered = evaluate(
        &hook,
        &[r#"{"type":"agent-turn-complete","turn-id":"3"}"#.to_string()],
        &mut stdin(""),
    )
    .unwrap();
    assert_eq!(rendered.body_lines, vec!["Event: agent-turn-complete", "Turn: 3"]);
}

#[test]
fn test_codex_pairwise_tokens() {
    let args: Vec<String> = ["type", "agent-turn-complete", "cwd", "/srv/app"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let rendered = evaluate(&CodexHook::default(), &args, &mut stdin("")).unwrap();
    assert_eq!(rendered.body_lines, vec!["Event: agent-turn-complete", "CWD: /srv/app"]);
}

#[test]
fn test_codex_raw_payload_has_no_event() {
    let args: Vec<String> = ["just", "some", "words"].iter().map(|s| s.to_string()).collect();
    assert!(evaluate(&CodexHook::default(), &args, &mut stdin("")).is_none());
}

#[test]
fn test_gemini_wrong_shape() {
    assert!(evaluate(&GeminiHook::default(), &[], &mut stdin("[\"AfterAgent\"]")).is_none());
}

#[test]
fn test_ollama_only_streaming_line() {
    let hook = OllamaHook::default();
    assert!(evaluate(&hook, &[], &mut stdin("{\"done\":false,\"response\":\"x\"}")).is_none());

    let rendered = evaluate(
        &hook,
        &[],
        &mut stdin("{\"done\":false,\"response\":\"x\"}\n{\"done\":true,\"response\":\"ok\"}"),
    )
    .unwrap();
    assert_eq!(rendered.body_lines, vec!["Event: done", "Response: ok"]);
}

#[test]
fn test_claude_long_result_clipped() {
    let hook = ClaudeHook {
        max_result_chars: 20,
        ..ClaudeHook::default()
    };
    let payload = format!(r#"{{"hook_event_name":"Stop","tool_result":"{}"}}"#, "y".repeat(100));
    let rendered = evaluate(&hook, &[], &mut stdin(&payload)).unwrap();
    assert_eq!(rendered.body_lines[1], format!("Result: {}...", "y".repeat(17)));
}

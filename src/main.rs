//! agent-notify CLI
//!
//! 运行命令、监控 PID、跟踪日志或接收 agent hook，完成后发送桌面/控制台通知

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use agent_notify::cli::{
    handle_claude_hook, handle_codex_hook, handle_emit, handle_gemini_hook, handle_ollama_hook, handle_run,
    handle_tail, handle_test_notify, handle_watch, ClaudeHookArgs, CodexHookArgs, EmitArgs, GeminiHookArgs,
    OllamaHookArgs, RunArgs, TailArgs, TestNotifyArgs, WatchArgs,
};
use agent_notify::config::load_config;
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "agent-notify")]
#[command(about = "Notify when commands, processes, or coding-agent tasks finish")]
#[command(version)]
#[command(after_help = "Config: ~/.config/agent-notify/config.json (JSON, override with AGENT_NOTIFY_CONFIG).\n\
The older ~/.agentnotify/config.toml is not read; copy its keys into the JSON file.")]
struct Cli {
    /// Enable verbose logs
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command, wait for completion, and send notification
    Run(RunArgs),
    /// Send a completion notification from external integrations
    Emit(EmitArgs),
    /// Send notification from Claude Code hook events (task-level)
    ClaudeHook(ClaudeHookArgs),
    /// Send notification from Gemini CLI hook events (task-level)
    GeminiHook(GeminiHookArgs),
    /// Send notification from Codex notify hook payloads (task-level)
    CodexHook(CodexHookArgs),
    /// Send notification from Ollama JSON/JSONL output (use with --format json)
    OllamaHook(OllamaHookArgs),
    /// Watch an existing process ID until it exits
    Watch(WatchArgs),
    /// Watch a log file and notify when a pattern appears
    Tail(TailArgs),
    /// Send a sample notification
    TestNotify(TestNotifyArgs),
}

fn init_tracing(verbose: bool) {
    // RUST_LOG 优先；否则默认只输出 warn，--verbose 时输出 debug
    let default_directive = if verbose {
        "agent_notify=debug"
    } else {
        "agent_notify=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}

/// Ctrl-C 只置位标志，由 runner 负责终止子进程
fn install_interrupt_handler() -> Arc<AtomicBool> {
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        warn!(error = %e, "Failed to install Ctrl-C handler");
    }
    interrupted
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config();

    let code = match cli.command {
        Commands::Run(args) => handle_run(args, &config, install_interrupt_handler()),
        Commands::Emit(args) => handle_emit(args, &config),
        Commands::ClaudeHook(args) => handle_claude_hook(args, &config),
        Commands::GeminiHook(args) => handle_gemini_hook(args, &config),
        Commands::CodexHook(args) => handle_codex_hook(args, &config),
        Commands::OllamaHook(args) => handle_ollama_hook(args, &config),
        Commands::Watch(args) => handle_watch(args, &config).unwrap_or_else(|e| {
            eprintln!("Error: {:#}", e);
            1
        }),
        Commands::Tail(args) => handle_tail(args, &config).unwrap_or_else(|e| {
            eprintln!("Error: {:#}", e);
            1
        }),
        Commands::TestNotify(args) => handle_test_notify(args, &config),
    };

    std::process::exit(code);
}

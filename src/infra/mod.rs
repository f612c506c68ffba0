//! 基础设施层 - 进程运行、PID 监控、输出缓冲、日志跟踪、终端

pub mod output;
pub mod process;
pub mod runner;
pub mod tail;
pub mod terminal;
pub mod timefmt;
pub mod watcher;

pub use output::{OutputBufferError, OutputRingBuffer};
pub use process::{infer_tool_name_from_command, infer_tool_name_from_pid, pid_exists, ProcessScanner};
pub use runner::{ProcessRunner, RunError, RunOptions};
pub use tail::{LinePattern, LogTailer, TailMatch};
pub use terminal::Chime;
pub use timefmt::format_duration;
pub use watcher::{ProcessWatcher, WatchError};

//! 命令运行器 - 启动包装命令，边转发输出边保留最后几行
//!
//! 子进程的 stdout 和 stderr 共用同一个管道的写端，行顺序与子进程写入顺序一致。
//! 读线程按行送入 channel，主循环负责回显和入环形缓冲区，并定期检查中断标志。

use std::io::{self, BufRead, BufReader, PipeReader, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

use super::output::OutputRingBuffer;
use crate::result::RunResult;

/// 中断后等待子进程退出的宽限期
pub const TERMINATE_GRACE_PERIOD: Duration = Duration::from_secs(5);

const INTERRUPT_CHECK_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum RunError {
    #[error("command must not be empty")]
    EmptyCommand,
    #[error("Command not found: {program}")]
    NotFound { program: String },
    #[error("Failed to run command: {0}")]
    Spawn(#[source] io::Error),
    #[error("I/O error while running command: {0}")]
    Io(#[from] io::Error),
    #[error("Interrupted")]
    Interrupted,
}

/// 运行选项
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub tool_name: Option<String>,
    pub capture_output: bool,
    pub tail_lines: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            tool_name: None,
            capture_output: true,
            tail_lines: 20,
        }
    }
}

/// 运行进程并返回结构化的执行信息
pub struct ProcessRunner {
    interrupt: Arc<AtomicBool>,
    grace_period: Duration,
    echo: bool,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self {
            interrupt: Arc::new(AtomicBool::new(false)),
            grace_period: TERMINATE_GRACE_PERIOD,
            echo: true,
        }
    }

    /// 使用外部的中断标志（通常由 Ctrl+C handler 设置）
    pub fn with_interrupt_flag(mut self, interrupt: Arc<AtomicBool>) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// 是否把子进程输出回显到当前 stdout
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn run(&self, command: &[String], options: &RunOptions) -> Result<RunResult, RunError> {
        let program = command.first().ok_or(RunError::EmptyCommand)?;

        let started_at = Utc::now();
        let started = Instant::now();

        let mut cmd = Command::new(program);
        cmd.args(&command[1..]);

        let (exit_code, output_tail) = if options.capture_output {
            let (output, writer) = io::pipe()?;
            let stderr_writer = writer.try_clone()?;
            cmd.stdin(Stdio::inherit())
                .stdout(writer)
                .stderr(stderr_writer);
            let spawned = cmd.spawn();
            // 释放父进程持有的写端，子进程退出后读端才能读到 EOF
            drop(cmd);
            let child = spawned.map_err(|e| spawn_error(program, e))?;
            debug!(pid = child.id(), program = %program, "Spawned command with output capture");
            self.stream_output(child, output, options.tail_lines.max(1))?
        } else {
            let status = cmd.status().map_err(|e| spawn_error(program, e))?;
            // 子进程与我们同属一个进程组，Ctrl+C 已经送达它
            if self.interrupt.load(Ordering::SeqCst) {
                return Err(RunError::Interrupted);
            }
            (exit_code_of(status), Vec::new())
        };

        Ok(RunResult {
            command: command.to_vec(),
            exit_code,
            duration_seconds: started.elapsed().as_secs_f64(),
            output_tail,
            started_at,
            ended_at: Utc::now(),
            tool_name: options.tool_name.clone(),
        })
    }

    fn stream_output(
        &self,
        mut child: Child,
        output: PipeReader,
        tail_lines: usize,
    ) -> Result<(i32, Vec<String>), RunError> {
        let mut ring = match OutputRingBuffer::new(tail_lines) {
            Ok(ring) => ring,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(RunError::Io(io::Error::new(io::ErrorKind::InvalidInput, e)));
            }
        };

        let (tx, rx) = mpsc::channel::<Vec<u8>>();
        let reader = spawn_line_reader(output, tx);

        let stdout = io::stdout();
        loop {
            if self.interrupt.load(Ordering::SeqCst) {
                warn!(pid = child.id(), "Interrupted, terminating child process");
                self.terminate(&mut child);
                return Err(RunError::Interrupted);
            }

            match rx.recv_timeout(INTERRUPT_CHECK_INTERVAL) {
                Ok(line) => {
                    if self.echo {
                        let mut out = stdout.lock();
                        out.write_all(&line)?;
                        out.flush()?;
                    }
                    ring.add_line(&String::from_utf8_lossy(&line));
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        let _ = reader.join();

        let status = child.wait()?;
        Ok((exit_code_of(status), ring.tail()))
    }

    /// 先 SIGTERM，宽限期内没退出再强杀
    fn terminate(&self, child: &mut Child) {
        request_termination(child);

        let deadline = Instant::now() + self.grace_period;
        while Instant::now() < deadline {
            match child.try_wait() {
                Ok(Some(_)) => return,
                Ok(None) => thread::sleep(Duration::from_millis(50)),
                Err(_) => break,
            }
        }

        let _ = child.kill();
        let _ = child.wait();
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_line_reader(source: PipeReader, tx: Sender<Vec<u8>>) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut reader = BufReader::new(source);
        loop {
            let mut line = Vec::new();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => break,
                Ok(_) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    })
}

fn spawn_error(program: &str, error: io::Error) -> RunError {
    if error.kind() == io::ErrorKind::NotFound {
        RunError::NotFound {
            program: program.to_string(),
        }
    } else {
        RunError::Spawn(error)
    }
}

#[cfg(unix)]
fn request_termination(child: &mut Child) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    match i32::try_from(child.id()) {
        Ok(pid) => {
            if kill(Pid::from_raw(pid), Signal::SIGTERM).is_err() {
                let _ = child.kill();
            }
        }
        Err(_) => {
            let _ = child.kill();
        }
    }
}

#[cfg(not(unix))]
fn request_termination(child: &mut Child) {
    let _ = child.kill();
}

/// 退出码；Unix 上被信号终止时返回 `-<signal>`
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_command() {
        let runner = ProcessRunner::new();
        assert!(matches!(
            runner.run(&[], &RunOptions::default()),
            Err(RunError::EmptyCommand)
        ));
    }

    #[test]
    fn test_missing_executable() {
        let runner = ProcessRunner::new();
        let err = runner
            .run(&cmd(&["definitely-not-a-real-binary-4242"]), &RunOptions::default())
            .unwrap_err();
        match err {
            RunError::NotFound { program } => assert_eq!(program, "definitely-not-a-real-binary-4242"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_exit_code_and_tail() {
        let runner = ProcessRunner::new().with_echo(false);
        let options = RunOptions {
            tool_name: Some("sh".into()),
            capture_output: true,
            tail_lines: 2,
        };
        let result = runner
            .run(&cmd(&["sh", "-c", "echo one; echo two; echo three; exit 3"]), &options)
            .unwrap();
        assert_eq!(result.exit_code, 3);
        assert_eq!(result.output_tail, vec!["two", "three"]);
        assert_eq!(result.tool_name.as_deref(), Some("sh"));
        assert!(result.ended_at >= result.started_at);
    }

    #[cfg(unix)]
    #[test]
    fn test_stderr_is_captured() {
        let runner = ProcessRunner::new().with_echo(false);
        let result = runner
            .run(&cmd(&["sh", "-c", "echo oops 1>&2"]), &RunOptions::default())
            .unwrap();
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.output_tail, vec!["oops"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_last_line_follows_write_order() {
        let runner = ProcessRunner::new().with_echo(false);
        let options = RunOptions {
            tail_lines: 1,
            ..RunOptions::default()
        };
        for _ in 0..20 {
            let result = runner
                .run(
                    &cmd(&["sh", "-c", "echo a >&2; echo b; echo c >&2; echo FINAL"]),
                    &options,
                )
                .unwrap();
            assert_eq!(result.output_tail, vec!["FINAL"]);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_no_capture_has_empty_tail() {
        let runner = ProcessRunner::new();
        let options = RunOptions {
            capture_output: false,
            ..RunOptions::default()
        };
        let result = runner.run(&cmd(&["sh", "-c", "exit 4"]), &options).unwrap();
        assert_eq!(result.exit_code, 4);
        assert!(result.output_tail.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_interrupt_terminates_child() {
        let flag = Arc::new(AtomicBool::new(true));
        let runner = ProcessRunner::new()
            .with_echo(false)
            .with_interrupt_flag(flag)
            .with_grace_period(Duration::from_millis(500));
        let started = Instant::now();
        let err = runner
            .run(&cmd(&["sleep", "30"]), &RunOptions::default())
            .unwrap_err();
        assert!(matches!(err, RunError::Interrupted));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[cfg(unix)]
    #[test]
    fn test_signal_exit_code_is_negative() {
        let runner = ProcessRunner::new().with_echo(false);
        let result = runner
            .run(&cmd(&["sh", "-c", "kill -TERM $$"]), &RunOptions::default())
            .unwrap();
        assert_eq!(result.exit_code, -15);
    }
}

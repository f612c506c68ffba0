//! PID 监控 - 轮询等待一个已存在的进程退出
//!
//! 被监控的进程通常不是当前进程的子进程，所以拿不到退出码是正常结果：
//! 只有当 PID 恰好是子进程时，非阻塞 `waitpid` 才能回收并得到退出码，
//! 否则退化为存在性探测，`exit_code` 为 None。

use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use thiserror::Error;
use tracing::debug;

use super::process::pid_exists;
use crate::result::WatchResult;

pub const DEFAULT_POLL_INTERVAL: f64 = 1.0;
pub const DEFAULT_MAX_INTERVAL: f64 = 5.0;
pub const DEFAULT_BACKOFF: f64 = 1.2;

#[derive(Debug, Error, PartialEq)]
pub enum WatchError {
    #[error("pid must be positive, got {0}")]
    InvalidPid(u32),
    #[error("poll_interval must be > 0, got {0}")]
    InvalidPollInterval(f64),
}

/// 非阻塞回收的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reap {
    Exited(i32),
    Running,
    /// 不是子进程或平台不支持
    Unavailable,
}

/// 等待已有 PID 退出
#[derive(Debug, Clone)]
pub struct ProcessWatcher {
    poll_interval: Duration,
    max_interval: Duration,
    backoff: f64,
}

impl ProcessWatcher {
    pub fn new(poll_interval_secs: f64) -> Result<Self, WatchError> {
        if !(poll_interval_secs > 0.0) || !poll_interval_secs.is_finite() {
            return Err(WatchError::InvalidPollInterval(poll_interval_secs));
        }
        let poll_interval = Duration::from_secs_f64(poll_interval_secs);
        Ok(Self {
            poll_interval,
            max_interval: Duration::from_secs_f64(DEFAULT_MAX_INTERVAL).max(poll_interval),
            backoff: DEFAULT_BACKOFF,
        })
    }

    /// 设置最大轮询间隔（不小于初始间隔）
    pub fn with_max_interval(mut self, max_interval_secs: f64) -> Self {
        if max_interval_secs.is_finite() && max_interval_secs > 0.0 {
            self.max_interval = Duration::from_secs_f64(max_interval_secs).max(self.poll_interval);
        }
        self
    }

    /// 设置退避倍数（小于 1 时按 1 处理）
    pub fn with_backoff(mut self, backoff: f64) -> Self {
        self.backoff = if backoff.is_finite() { backoff.max(1.0) } else { 1.0 };
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// 阻塞直到进程退出；没有超时，取消由调用方负责
    pub fn wait_for_exit(&self, pid: u32) -> Result<WatchResult, WatchError> {
        if pid == 0 || i32::try_from(pid).is_err() {
            return Err(WatchError::InvalidPid(pid));
        }

        let started_at = Utc::now();
        let started = Instant::now();

        if !pid_exists(pid) {
            debug!(pid, "Process not running at watch start");
            return Ok(WatchResult::already_exited(pid, started_at));
        }

        let mut interval = self.poll_interval;
        let mut can_reap = cfg!(unix);

        loop {
            if can_reap {
                match try_reap(pid) {
                    Reap::Exited(exit_code) => {
                        debug!(pid, exit_code, "Reaped child process");
                        return Ok(WatchResult {
                            pid,
                            duration_seconds: started.elapsed().as_secs_f64(),
                            exit_code: Some(exit_code),
                            started_at,
                            ended_at: Utc::now(),
                            already_exited: false,
                        });
                    }
                    Reap::Running => {}
                    Reap::Unavailable => {
                        debug!(pid, "Not a child process, falling back to existence probe");
                        can_reap = false;
                    }
                }
            }

            if !pid_exists(pid) {
                return Ok(WatchResult {
                    pid,
                    duration_seconds: started.elapsed().as_secs_f64(),
                    exit_code: None,
                    started_at,
                    ended_at: Utc::now(),
                    already_exited: false,
                });
            }

            thread::sleep(interval);
            interval = interval.mul_f64(self.backoff).min(self.max_interval);
        }
    }
}

impl Default for ProcessWatcher {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs_f64(DEFAULT_POLL_INTERVAL),
            max_interval: Duration::from_secs_f64(DEFAULT_MAX_INTERVAL),
            backoff: DEFAULT_BACKOFF,
        }
    }
}

#[cfg(unix)]
fn try_reap(pid: u32) -> Reap {
    use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return Reap::Unavailable;
    };
    match waitpid(Pid::from_raw(raw), Some(WaitPidFlag::WNOHANG)) {
        Ok(WaitStatus::Exited(_, code)) => Reap::Exited(code),
        Ok(WaitStatus::Signaled(_, signal, _)) => Reap::Exited(-(signal as i32)),
        Ok(_) => Reap::Running,
        // ECHILD: 不是当前进程的子进程
        Err(_) => Reap::Unavailable,
    }
}

#[cfg(not(unix))]
fn try_reap(_pid: u32) -> Reap {
    Reap::Unavailable
}

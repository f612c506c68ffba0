//! 运行结果与监控结果

use chrono::{DateTime, Utc};
use serde::Serialize;

/// 包装命令的执行结果
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub command: Vec<String>,
    pub exit_code: i32,
    pub duration_seconds: f64,
    /// 合并 stdout/stderr 后的最后几行
    pub output_tail: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub tool_name: Option<String>,
}

impl RunResult {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// 监控已有 PID 直到退出的结果
#[derive(Debug, Clone, Serialize)]
pub struct WatchResult {
    pub pid: u32,
    pub duration_seconds: f64,
    /// 非子进程拿不到退出码，此时为 None
    pub exit_code: Option<i32>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// 开始监控时进程已不存在
    pub already_exited: bool,
}

impl WatchResult {
    /// 开始监控前进程就已退出
    pub fn already_exited(pid: u32, started_at: DateTime<Utc>) -> Self {
        Self {
            pid,
            duration_seconds: 0.0,
            exit_code: None,
            started_at,
            ended_at: Utc::now(),
            already_exited: true,
        }
    }

    pub fn succeeded(&self) -> Option<bool> {
        self.exit_code.map(|code| code == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_exited_invariant() {
        let result = WatchResult::already_exited(42, Utc::now());
        assert!(result.already_exited);
        assert_eq!(result.duration_seconds, 0.0);
        assert_eq!(result.exit_code, None);
        assert_eq!(result.succeeded(), None);
        assert!(result.ended_at >= result.started_at);
    }

    #[test]
    fn test_run_result_succeeded() {
        let now = Utc::now();
        let result = RunResult {
            command: vec!["true".into()],
            exit_code: 0,
            duration_seconds: 0.1,
            output_tail: vec![],
            started_at: now,
            ended_at: now,
            tool_name: None,
        };
        assert!(result.succeeded());
    }
}

//! 进程辅助 - PID 探测、进程名查询、工具名推断

use std::path::Path;
use sysinfo::{Pid, System};

/// 判断 PID 对应的进程是否存在
///
/// Unix 上用 `kill(pid, 0)` 探测：`EPERM` 说明进程存在但不属于当前用户。
#[cfg(unix)]
pub fn pid_exists(pid: u32) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid as NixPid;

    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };
    if raw <= 0 {
        return false;
    }
    match kill(NixPid::from_raw(raw), None) {
        Ok(()) => true,
        Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
pub fn pid_exists(pid: u32) -> bool {
    if pid == 0 {
        return false;
    }
    ProcessScanner::new().is_running(pid)
}

/// 进程扫描器（基于 sysinfo 的进程表快照）
pub struct ProcessScanner {
    system: System,
}

impl ProcessScanner {
    pub fn new() -> Self {
        let mut system = System::new_all();
        system.refresh_all();
        Self { system }
    }

    pub fn is_running(&self, pid: u32) -> bool {
        self.system.process(Pid::from_u32(pid)).is_some()
    }

    /// 查询进程名（尽力而为）
    pub fn process_name(&self, pid: u32) -> Option<String> {
        let process = self.system.process(Pid::from_u32(pid))?;
        let name = process.name().to_string_lossy().trim().to_string();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}

impl Default for ProcessScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// 从命令行推断工具名
///
/// 取 argv[0] 的文件名并去掉 `.exe`；`python -m <module>` 形式优先用模块名。
pub fn infer_tool_name_from_command(command: &[String]) -> Option<String> {
    let first = command.first()?;
    let mut executable = Path::new(first)
        .file_name()
        .map(|name| name.to_string_lossy().trim().to_string())
        .unwrap_or_default();
    if executable.is_empty() {
        return None;
    }

    if executable.to_lowercase().ends_with(".exe") {
        executable.truncate(executable.len() - 4);
    }

    if executable.to_lowercase().starts_with("python") {
        if let Some(index) = command.iter().position(|part| part == "-m") {
            if let Some(module) = command.get(index + 1) {
                let module = module.trim();
                if !module.is_empty() {
                    return Some(module.to_string());
                }
            }
        }
    }

    Some(executable)
}

/// 从 PID 推断工具名：进程名，查不到时用 `pid-<pid>`
pub fn infer_tool_name_from_pid(pid: u32) -> Option<String> {
    if pid == 0 {
        return None;
    }
    ProcessScanner::new()
        .process_name(pid)
        .or_else(|| Some(format!("pid-{}", pid)))
}

//! 日志跟踪 - 从头读取日志文件，等待某一行出现指定模式

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use regex::Regex;

/// 匹配方式
#[derive(Debug, Clone)]
pub enum LinePattern {
    /// 子串匹配
    Contains(String),
    Regex(Regex),
}

impl LinePattern {
    pub fn contains(pattern: impl Into<String>) -> Self {
        Self::Contains(pattern.into())
    }

    pub fn regex(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).with_context(|| format!("invalid regex: {}", pattern))?;
        Ok(Self::Regex(regex))
    }

    pub fn is_match(&self, line: &str) -> bool {
        match self {
            Self::Contains(needle) => line.contains(needle.as_str()),
            Self::Regex(regex) => regex.is_match(line),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Contains(needle) => needle,
            Self::Regex(regex) => regex.as_str(),
        }
    }
}

/// 匹配结果
#[derive(Debug, Clone)]
pub struct TailMatch {
    pub line: String,
    pub duration_seconds: f64,
}

/// 跟踪一个日志文件直到模式出现
#[derive(Debug, Clone)]
pub struct LogTailer {
    path: PathBuf,
    pattern: LinePattern,
    poll_interval: Duration,
}

impl LogTailer {
    pub fn new(path: impl Into<PathBuf>, pattern: LinePattern, poll_interval: Duration) -> Self {
        Self {
            path: path.into(),
            pattern,
            poll_interval,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pattern(&self) -> &LinePattern {
        &self.pattern
    }

    /// 阻塞直到出现匹配行；读到文件末尾时按轮询间隔等待追加内容
    pub fn wait_for_match(&self) -> Result<TailMatch> {
        let started = Instant::now();
        let file = File::open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        let mut reader = BufReader::new(file);
        let mut pending = Vec::new();

        loop {
            let read = reader
                .read_until(b'\n', &mut pending)
                .with_context(|| format!("failed to read {}", self.path.display()))?;

            if read > 0 {
                let line = String::from_utf8_lossy(&pending).into_owned();
                if self.pattern.is_match(&line) {
                    return Ok(TailMatch {
                        line: line.trim_end_matches(['\r', '\n']).to_string(),
                        duration_seconds: started.elapsed().as_secs_f64(),
                    });
                }
            }

            // 没读到完整一行时保留半行，等写入方补全
            if pending.ends_with(b"\n") {
                pending.clear();
            } else {
                thread::sleep(self.poll_interval);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_contains_and_regex() {
        assert!(LinePattern::contains("DONE").is_match("build DONE ok"));
        assert!(!LinePattern::contains("DONE").is_match("done"));
        let regex = LinePattern::regex(r"exit code \d+").unwrap();
        assert!(regex.is_match("worker: exit code 17"));
        assert_eq!(regex.as_str(), r"exit code \d+");
        assert!(LinePattern::regex("(").is_err());
    }

    #[test]
    fn test_finds_existing_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "starting").unwrap();
        writeln!(file, "all tests passed").unwrap();
        file.flush().unwrap();

        let tailer = LogTailer::new(
            file.path(),
            LinePattern::contains("passed"),
            Duration::from_millis(10),
        );
        let found = tailer.wait_for_match().unwrap();
        assert_eq!(found.line, "all tests passed");
    }

    #[test]
    fn test_waits_for_appended_line() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let writer = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(100));
            let mut handle = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
            write!(handle, "job fin").unwrap();
            handle.flush().unwrap();
            std::thread::sleep(Duration::from_millis(50));
            writeln!(handle, "ished").unwrap();
        });

        let tailer = LogTailer::new(
            file.path(),
            LinePattern::contains("finished"),
            Duration::from_millis(10),
        );
        let found = tailer.wait_for_match().unwrap();
        writer.join().unwrap();
        assert_eq!(found.line, "job finished");
        assert!(found.duration_seconds >= 0.1);
    }

    #[test]
    fn test_missing_file_errors() {
        let tailer = LogTailer::new(
            "/nonexistent/agent-notify.log",
            LinePattern::contains("x"),
            Duration::from_millis(10),
        );
        assert!(tailer.wait_for_match().is_err());
    }
}

//! 输出环形缓冲区 - 只保留最近 N 行

use std::collections::VecDeque;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OutputBufferError {
    #[error("max_lines must be positive")]
    ZeroCapacity,
}

/// 保存进程输出的最后 N 行
#[derive(Debug, Clone)]
pub struct OutputRingBuffer {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl OutputRingBuffer {
    pub fn new(max_lines: usize) -> Result<Self, OutputBufferError> {
        if max_lines == 0 {
            return Err(OutputBufferError::ZeroCapacity);
        }
        Ok(Self {
            lines: VecDeque::with_capacity(max_lines),
            max_lines,
        })
    }

    /// 追加一行（去掉行尾换行），满了就淘汰最旧的一行
    pub fn add_line(&mut self, line: &str) {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);
        if self.lines.len() == self.max_lines {
            self.lines.pop_front();
        }
        self.lines.push_back(line.to_string());
    }

    /// 按插入顺序返回当前内容（最旧的在前）
    pub fn tail(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(
            OutputRingBuffer::new(0).unwrap_err(),
            OutputBufferError::ZeroCapacity
        );
    }

    #[test]
    fn test_keeps_last_lines_in_order() {
        let mut ring = OutputRingBuffer::new(3).unwrap();
        for i in 1..=10 {
            ring.add_line(&format!("line {}\n", i));
            assert!(ring.len() <= 3);
        }
        assert_eq!(ring.tail(), vec!["line 8", "line 9", "line 10"]);
    }

    #[test]
    fn test_under_capacity_keeps_everything() {
        let mut ring = OutputRingBuffer::new(5).unwrap();
        ring.add_line("a");
        ring.add_line("b\r\n");
        assert_eq!(ring.tail(), vec!["a", "b"]);
        assert_eq!(ring.capacity(), 5);
    }

    #[test]
    fn test_only_one_trailing_newline_stripped() {
        let mut ring = OutputRingBuffer::new(1).unwrap();
        ring.add_line("text\n\n");
        assert_eq!(ring.tail(), vec!["text\n"]);
    }
}

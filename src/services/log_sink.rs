//! 日志汇 - 业务能力层
//!
//! 面向用户的有界日志，只保留最近 50 条

use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::fmt;
use tracing::{error, info};

/// 最多保留的日志条数
pub const LOG_CAPACITY: usize = 50;

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// 单条日志
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub severity: Severity,
}

impl LogEntry {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            timestamp: Local::now(),
            message: message.into(),
            severity,
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Info => "INFO",
            Severity::Success => "OK",
            Severity::Error => "ERROR",
        };
        write!(
            f,
            "[{}] {:<5} {}",
            self.timestamp.format("%H:%M:%S"),
            tag,
            self.message
        )
    }
}

/// 日志汇
///
/// 职责：
/// - 追加日志，超过上限时丢弃最旧的一条
/// - 同时转发到 tracing
#[derive(Debug)]
pub struct LogSink {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogSink {
    pub fn new() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }

    /// 自定义上限（至少 1 条）
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity) {
        let entry = LogEntry::new(message, severity);

        match severity {
            Severity::Error => error!("{}", entry.message),
            Severity::Info | Severity::Success => info!("{}", entry.message),
        }

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Info);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Error);
    }

    /// 按时间顺序（旧 → 新）返回所有日志
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest_first() {
        let mut sink = LogSink::new();
        for i in 0..(LOG_CAPACITY + 7) {
            sink.info(format!("entry {}", i));
        }

        let entries = sink.entries();
        assert_eq!(entries.len(), LOG_CAPACITY);
        assert_eq!(entries.first().map(|e| e.message.as_str()), Some("entry 7"));
        assert_eq!(
            entries.last().map(|e| e.message.clone()),
            Some(format!("entry {}", LOG_CAPACITY + 6))
        );
    }

    #[test]
    fn test_severity_kept() {
        let mut sink = LogSink::with_capacity(2);
        sink.success("ok");
        sink.error("bad");
        sink.info("note");

        let severities: Vec<Severity> = sink.entries().iter().map(|e| e.severity).collect();
        assert_eq!(severities, vec![Severity::Error, Severity::Info]);
    }

    #[test]
    fn test_display_contains_tag() {
        let entry = LogEntry::new("压缩包中没有图片", Severity::Error);
        let line = entry.to_string();
        assert!(line.contains("ERROR"));
        assert!(line.contains("压缩包中没有图片"));
    }
}

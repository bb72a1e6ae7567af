use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use tracing::info;

/// Human-readable status lines, newest first.
#[derive(Clone, Debug)]
pub struct StatusLog {
    lines: VecDeque<String>,
    limit: usize,
}

impl StatusLog {
    pub fn new(limit: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            limit,
        }
    }

    /// Formats `msg` as "[HH:MM:SS] msg" and prepends it.
    pub fn push(&mut self, msg: &str, at: DateTime<Utc>) -> &str {
        info!("{}", msg);
        if self.lines.len() >= self.limit {
            self.lines.pop_back();
        }
        self.lines.push_front(format_line(msg, at));
        &self.lines[0]
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&str> {
        self.lines.front().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

pub fn format_line(msg: &str, at: DateTime<Utc>) -> String {
    format!("[{}] {}", at.format("%H:%M:%S"), msg)
}

/// "42s ago" under a minute, otherwise whole minutes.
pub fn signal_age(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - at).num_seconds().max(0);
    if secs < 60 {
        format!("{}s ago", secs)
    } else {
        format!("{} min ago", secs / 60)
    }
}

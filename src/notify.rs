//! Operator-facing messages produced by session operations.

use std::collections::VecDeque;
use std::fmt;

use crate::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            Level::Info => write!(f, "{}", self.message),
            Level::Error => write!(f, "error: {}", self.message),
        }
    }
}

/// FIFO of pending notifications. Every error caught by the session ends
/// up here exactly once.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: VecDeque<Notification>,
}

impl NotificationQueue {
    pub fn info(&mut self, message: impl Into<String>) {
        self.pending.push_back(Notification {
            level: Level::Info,
            message: message.into(),
        });
    }

    pub fn error(&mut self, err: &ClientError) {
        self.pending.push_back(Notification {
            level: Level::Error,
            message: err.to_string(),
        });
    }

    pub fn last(&self) -> Option<&Notification> {
        self.pending.back()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes and returns everything queued so far, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.pending.drain(..).collect()
    }
}

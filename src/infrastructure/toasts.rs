//! Terminal toast tray: the notification side channel of the TUI.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{info, warn};

use crate::domain::notifier::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel { Success, Error }

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

/// Bounded queue of recent notices, shared between request tasks and the renderer.
#[derive(Clone)]
pub struct ToastTray {
    toasts: Arc<Mutex<VecDeque<Toast>>>,
    ttl: TimeDelta,
    capacity: usize,
}

impl Default for ToastTray {
    fn default() -> Self { Self::new(TimeDelta::seconds(4), 3) }
}

impl ToastTray {
    pub fn new(ttl: TimeDelta, capacity: usize) -> Self {
        Self { toasts: Arc::new(Mutex::new(VecDeque::new())), ttl, capacity: capacity.max(1) }
    }

    pub fn push(&self, level: ToastLevel, message: &str) {
        self.push_at(level, message, Utc::now());
    }

    pub fn push_at(&self, level: ToastLevel, message: &str, now: DateTime<Utc>) {
        let mut toasts = self.lock();
        if toasts.len() == self.capacity {
            toasts.pop_front();
        }
        toasts.push_back(Toast { level, message: message.to_string(), raised_at: now });
    }

    /// Drops expired toasts and returns the rest, oldest first.
    pub fn visible(&self, now: DateTime<Utc>) -> Vec<Toast> {
        let mut toasts = self.lock();
        toasts.retain(|t| now - t.raised_at < self.ttl);
        toasts.iter().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Toast>> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for ToastTray {
    fn success(&self, message: &str) {
        info!(notice = message, "toast");
        self.push(ToastLevel::Success, message);
    }

    fn error(&self, message: &str) {
        warn!(notice = message, "toast");
        self.push(ToastLevel::Error, message);
    }
}

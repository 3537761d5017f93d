use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level { Success, Info, Error }

/// A transient user-facing message about the outcome of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self { Self { level: Level::Success, message: message.into() } }
    pub fn info(message: impl Into<String>) -> Self { Self { level: Level::Info, message: message.into() } }
    pub fn error(message: impl Into<String>) -> Self { Self { level: Level::Error, message: message.into() } }
}

pub trait Notifier: Send + 'static {
    fn notify(&mut self, notice: Notice);
}

/// Forwards notices to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, notice: Notice) {
        match notice.level {
            Level::Error => tracing::warn!(message = %notice.message, "notice"),
            Level::Success | Level::Info => tracing::info!(message = %notice.message, "notice"),
        }
    }
}

/// Notices that expire after a fixed time-to-live, as shown by the terminal client.
#[derive(Debug)]
pub struct Toasts {
    ttl: Duration,
    live: VecDeque<(Instant, Notice)>,
}

impl Toasts {
    pub fn new(ttl: Duration) -> Self { Self { ttl, live: VecDeque::new() } }

    pub fn push_at(&mut self, notice: Notice, now: Instant) {
        self.expire(now);
        self.live.push_back((now, notice));
    }

    /// Drops every notice older than the time-to-live.
    pub fn expire(&mut self, now: Instant) {
        while let Some((at, _)) = self.live.front() {
            if now.saturating_duration_since(*at) < self.ttl { break; }
            self.live.pop_front();
        }
    }

    /// Newest notice that is still live at `now`.
    pub fn current_at(&self, now: Instant) -> Option<&Notice> {
        self.live
            .iter()
            .rev()
            .find(|(at, _)| now.saturating_duration_since(*at) < self.ttl)
            .map(|(_, n)| n)
    }

    pub fn current(&self) -> Option<&Notice> { self.current_at(Instant::now()) }

    pub fn is_empty(&self) -> bool { self.live.is_empty() }
}

impl Notifier for Toasts {
    fn notify(&mut self, notice: Notice) { self.push_at(notice, Instant::now()) }
}

//! Transient user-facing notifications
//!
//! A cloneable handle over a `watch` channel holding the notifications that
//! are currently visible. Each entry expires after a per-kind lifetime;
//! [`Notifications::sweep`] drops expired ones and
//! [`Notifications::spawn_sweeper`] runs that periodically.

use crate::error::PlaybackError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

impl NotificationKind {
    /// How long a notification of this kind stays visible
    pub fn default_duration(self) -> Duration {
        match self {
            Self::Success | Self::Info => Duration::from_millis(5000),
            Self::Error => Duration::from_millis(7000),
            Self::Warning => Duration::from_millis(6000),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.created_at + self.duration
    }
}

/// Shared notification center
#[derive(Debug, Clone)]
pub struct Notifications {
    tx: Arc<watch::Sender<Vec<Notification>>>,
    next_id: Arc<AtomicU64>,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifications {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            tx: Arc::new(tx),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Observe the visible notifications
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.tx.subscribe()
    }

    /// Snapshot of the visible notifications
    pub fn current(&self) -> Vec<Notification> {
        self.tx.borrow().clone()
    }

    /// Post a notification with the kind's default lifetime; returns its id
    pub fn push(&self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        self.push_for(kind, message, kind.default_duration())
    }

    /// Post a notification with an explicit lifetime
    pub fn push_for(
        &self,
        kind: NotificationKind,
        message: impl Into<String>,
        duration: Duration,
    ) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let notification = Notification {
            id,
            kind,
            message: message.into(),
            created_at: Instant::now(),
            duration,
        };
        self.tx.send_modify(|list| list.push(notification));
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(NotificationKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(NotificationKind::Error, message)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.push(NotificationKind::Info, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.push(NotificationKind::Warning, message)
    }

    /// Post the user-facing form of a playback error
    pub fn report(&self, error: &PlaybackError) -> u64 {
        let kind = match error {
            PlaybackError::PlaybackBlocked(_) => NotificationKind::Warning,
            PlaybackError::NoAudioSource { .. }
            | PlaybackError::LoadFailure(_)
            | PlaybackError::RequestFailure(_) => NotificationKind::Error,
        };
        self.push(kind, error.to_string())
    }

    pub fn dismiss(&self, id: u64) {
        self.tx.send_if_modified(|list| {
            let before = list.len();
            list.retain(|n| n.id != id);
            list.len() != before
        });
    }

    pub fn clear(&self) {
        self.tx.send_if_modified(|list| {
            let changed = !list.is_empty();
            list.clear();
            changed
        });
    }

    /// Drop notifications that have expired at `now`
    pub fn sweep(&self, now: Instant) {
        self.tx.send_if_modified(|list| {
            let before = list.len();
            list.retain(|n| !n.is_expired(now));
            list.len() != before
        });
    }

    /// Sweep expired notifications every `interval` until the task is aborted
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let notifications = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                notifications.sweep(Instant::now());
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_durations() {
        assert_eq!(
            NotificationKind::Success.default_duration(),
            Duration::from_millis(5000)
        );
        assert_eq!(
            NotificationKind::Error.default_duration(),
            Duration::from_millis(7000)
        );
        assert_eq!(
            NotificationKind::Info.default_duration(),
            Duration::from_millis(5000)
        );
        assert_eq!(
            NotificationKind::Warning.default_duration(),
            Duration::from_millis(6000)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_removes_expired_only() {
        let center = Notifications::new();
        center.success("saved");
        center.error("failed");

        tokio::time::advance(Duration::from_millis(5500)).await;
        center.sweep(Instant::now());

        let left = center.current();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].kind, NotificationKind::Error);

        tokio::time::advance(Duration::from_millis(2000)).await;
        center.sweep(Instant::now());
        assert!(center.current().is_empty());
    }

    #[tokio::test]
    async fn test_dismiss_and_clear() {
        let center = Notifications::new();
        let first = center.info("one");
        center.info("two");

        center.dismiss(first);
        let left = center.current();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].message, "two");

        center.clear();
        assert!(center.current().is_empty());
    }

    #[tokio::test]
    async fn test_report_maps_blocked_to_warning() {
        let center = Notifications::new();
        center.report(&PlaybackError::PlaybackBlocked("autoplay".to_string()));
        center.report(&PlaybackError::LoadFailure("404".to_string()));

        let kinds: Vec<_> = center.current().iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![NotificationKind::Warning, NotificationKind::Error]
        );
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let center = Notifications::new();
        let mut rx = center.subscribe();

        center.warning("careful");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);
    }
}

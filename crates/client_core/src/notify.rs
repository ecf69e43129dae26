//! Publish/subscribe for transient status messages, decoupling request
//! outcomes from their display.
//!
//! The bus is an injectable service object, not module-level state: share
//! one `Arc<NotificationBus>` across producers, and instantiate isolated
//! buses in tests. Delivery is synchronous fan-out with no replay; the bus
//! keeps no per-message state afterwards.

use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex, Weak,
    },
    time::Duration,
};

use chrono::{DateTime, Utc};
use tracing::warn;

/// A subscribing view keeps at most this many entries on screen.
pub const TRAY_CAPACITY: usize = 4;
/// Each entry is removed this long after its own arrival.
pub const DISPLAY_WINDOW: Duration = Duration::from_millis(3600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub severity: Severity,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

type Callback = Arc<dyn Fn(&Notification) + Send + Sync>;

pub struct NotificationBus {
    next_id: AtomicU64,
    next_token: AtomicU64,
    subscribers: Mutex<Vec<(u64, Callback)>>,
}

impl NotificationBus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicU64::new(0),
            next_token: AtomicU64::new(0),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    pub fn info(&self, text: impl Into<String>) -> u64 {
        self.emit(Severity::Info, text.into())
    }

    pub fn success(&self, text: impl Into<String>) -> u64 {
        self.emit(Severity::Success, text.into())
    }

    pub fn error(&self, text: impl Into<String>) -> u64 {
        self.emit(Severity::Error, text.into())
    }

    fn emit(&self, severity: Severity, text: String) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let notification = Notification {
            id,
            severity,
            text,
            created_at: Utc::now(),
        };

        // Snapshot outside the lock so a callback may subscribe or
        // unsubscribe during delivery without deadlocking the fan-out.
        let callbacks: Vec<Callback> = {
            let guard = self
                .subscribers
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            guard.iter().map(|(_, callback)| Arc::clone(callback)).collect()
        };

        for callback in callbacks {
            if catch_unwind(AssertUnwindSafe(|| callback(&notification))).is_err() {
                warn!(
                    notification_id = id,
                    "notification subscriber panicked during delivery"
                );
            }
        }

        id
    }

    pub fn subscribe(
        self: &Arc<Self>,
        callback: impl Fn(&Notification) + Send + Sync + 'static,
    ) -> Subscription {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((token, Arc::new(callback)));
        Subscription {
            bus: Arc::downgrade(self),
            token,
            active: AtomicBool::new(true),
        }
    }
}

/// Handle returned by [`NotificationBus::subscribe`]. Unsubscribing is
/// idempotent and cancels no display timers: those belong to the
/// subscriber's copy of state, not the bus.
pub struct Subscription {
    bus: Weak<NotificationBus>,
    token: u64,
    active: AtomicBool,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        if !self.active.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(bus) = self.bus.upgrade() {
            bus.subscribers
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .retain(|(token, _)| *token != self.token);
        }
    }
}

/// Subscriber-side bounded display list: the most recent [`TRAY_CAPACITY`]
/// notifications, each with its own independent expiry timer. A burst of
/// newer arrivals never extends or resets an older entry's timer.
pub struct NotificationTray {
    entries: Arc<Mutex<Vec<Notification>>>,
    subscription: Subscription,
}

impl NotificationTray {
    /// Must be called from within a tokio runtime; expiry tasks are spawned
    /// onto the current one.
    pub fn new(bus: &Arc<NotificationBus>) -> Self {
        let entries = Arc::new(Mutex::new(Vec::new()));
        let handle = tokio::runtime::Handle::current();

        let subscription = bus.subscribe({
            let entries = Arc::clone(&entries);
            move |notification: &Notification| {
                let id = notification.id;
                {
                    let mut guard = entries
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                    guard.push(notification.clone());
                    if guard.len() > TRAY_CAPACITY {
                        let excess = guard.len() - TRAY_CAPACITY;
                        guard.drain(..excess);
                    }
                }

                let entries = Arc::clone(&entries);
                handle.spawn(async move {
                    tokio::time::sleep(DISPLAY_WINDOW).await;
                    // No-op if the entry was already displaced by the cap.
                    entries
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .retain(|entry| entry.id != id);
                });
            }
        });

        Self {
            entries,
            subscription,
        }
    }

    pub fn visible(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Stops receiving new notifications; entries already on screen keep
    /// their timers.
    pub fn unsubscribe(&self) {
        self.subscription.unsubscribe();
    }
}

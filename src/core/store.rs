// Signal Store - Bounded newest-first buffer with subscriptions and toasts
// Subscriber callbacks run after the state lock is released

use crate::core::types::Signal;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::task::AbortHandle;
use tracing::debug;

/// Signals at or above this strength enter the transient toast set.
pub const TOAST_MIN_STRENGTH: f64 = 50.0;

type SignalCallback = Arc<dyn Fn(&[Signal]) + Send + Sync>;

// ============================================================================
// Internal State
// ============================================================================

struct ToastEntry {
    signal: Signal,
    inserted_ms: i64,
    timer: Option<AbortHandle>,
}

struct StoreState {
    signals: VecDeque<Signal>,
    toasts: Vec<ToastEntry>,
    stats: StoreStats,
}

struct StoreInner {
    capacity: usize,
    toast_capacity: usize,
    toast_lifetime_ms: u64,
    state: Mutex<StoreState>,
    subscribers: Mutex<Vec<(u64, SignalCallback)>>,
    next_sub_id: AtomicU64,
}

#[derive(Debug, Clone, Default)]
struct StoreStats {
    total_added: u64,
    dropped_by_capacity: u64,
    notifications: u64,
    toasts_shown: u64,
    toasts_expired: u64,
    toasts_dismissed: u64,
}

fn now_wall_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

// ============================================================================
// Signal Store
// ============================================================================

/// Shared, clonable handle to the signal buffer. Newest signals sit at the
/// front; overflow drops the oldest. High-strength signals additionally get
/// a short-lived toast with a cancellable expiry timer.
pub struct SignalStore {
    inner: Arc<StoreInner>,
}

impl Clone for SignalStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl SignalStore {
    pub fn new(capacity: usize, toast_capacity: usize, toast_lifetime_ms: u64) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                capacity,
                toast_capacity,
                toast_lifetime_ms,
                state: Mutex::new(StoreState {
                    signals: VecDeque::with_capacity(capacity.min(1024)),
                    toasts: Vec::new(),
                    stats: StoreStats::default(),
                }),
                subscribers: Mutex::new(Vec::new()),
                next_sub_id: AtomicU64::new(0),
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Insert a batch at the head atomically, enforce capacity, then notify
    /// every subscriber exactly once with the new full snapshot.
    pub fn add_batch(&self, batch: Vec<Signal>) {
        if batch.is_empty() {
            return;
        }

        let now = now_wall_ms();
        let snapshot = {
            let mut state = self.inner.state.lock();

            // Head insertion preserving the caller's order: batch[0] ends up
            // newest.
            for signal in batch.iter().rev() {
                state.signals.push_front(signal.clone());
            }
            state.stats.total_added += batch.len() as u64;

            while state.signals.len() > self.inner.capacity {
                state.signals.pop_back();
                state.stats.dropped_by_capacity += 1;
            }

            // Same convention as the buffer: batch[0] ends up the newest
            // toast.
            for signal in batch.iter().rev() {
                if signal.strength >= TOAST_MIN_STRENGTH {
                    let timer = spawn_toast_expiry(&self.inner, signal.id.clone());
                    state.toasts.insert(
                        0,
                        ToastEntry {
                            signal: signal.clone(),
                            inserted_ms: now,
                            timer,
                        },
                    );
                    state.stats.toasts_shown += 1;

                    while state.toasts.len() > self.inner.toast_capacity {
                        if let Some(dropped) = state.toasts.pop() {
                            if let Some(timer) = dropped.timer {
                                timer.abort();
                            }
                        }
                    }
                }
            }

            state.stats.notifications += 1;
            state.signals.iter().cloned().collect::<Vec<_>>()
        };

        debug!(batch = batch.len(), total = snapshot.len(), "Signal batch stored");
        self.notify(&snapshot);
    }

    /// Empty the signal buffer and notify subscribers. Live toasts keep
    /// their own timers.
    pub fn clear(&self) {
        {
            let mut state = self.inner.state.lock();
            state.signals.clear();
            state.stats.notifications += 1;
        }
        self.notify(&[]);
    }

    /// Register a callback. Dropping the returned handle unsubscribes.
    /// Callbacks fire in subscribe order.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&[Signal]) + Send + Sync + 'static,
    {
        let id = self.inner.next_sub_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .subscribers
            .lock()
            .push((id, Arc::new(callback)));

        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Current buffer contents, newest first.
    pub fn snapshot(&self) -> Vec<Signal> {
        self.inner.state.lock().signals.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.state.lock().signals.is_empty()
    }

    /// Live toasts, newest first. Entries without a running timer (no
    /// runtime was present at insert) are pruned by wall-clock age here.
    pub fn toasts(&self) -> Vec<Signal> {
        let now = now_wall_ms();
        let mut state = self.inner.state.lock();
        let lifetime = self.inner.toast_lifetime_ms as i64;

        let before = state.toasts.len();
        state
            .toasts
            .retain(|t| t.timer.is_some() || now - t.inserted_ms < lifetime);
        state.stats.toasts_expired += (before - state.toasts.len()) as u64;

        state.toasts.iter().map(|t| t.signal.clone()).collect()
    }

    /// Remove a toast immediately and cancel its expiry timer.
    pub fn dismiss_toast(&self, id: &str) -> bool {
        let mut state = self.inner.state.lock();
        if let Some(pos) = state.toasts.iter().position(|t| t.signal.id == id) {
            let entry = state.toasts.remove(pos);
            if let Some(timer) = entry.timer {
                timer.abort();
            }
            state.stats.toasts_dismissed += 1;
            true
        } else {
            false
        }
    }

    pub fn get_stats(&self) -> StoreStatsSnapshot {
        let state = self.inner.state.lock();
        StoreStatsSnapshot {
            len: state.signals.len(),
            toast_count: state.toasts.len(),
            subscriber_count: self.inner.subscribers.lock().len(),
            total_added: state.stats.total_added,
            dropped_by_capacity: state.stats.dropped_by_capacity,
            notifications: state.stats.notifications,
            toasts_shown: state.stats.toasts_shown,
            toasts_expired: state.stats.toasts_expired,
            toasts_dismissed: state.stats.toasts_dismissed,
        }
    }

    fn notify(&self, snapshot: &[Signal]) {
        let callbacks: Vec<SignalCallback> = self
            .inner
            .subscribers
            .lock()
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();

        for callback in callbacks {
            callback(snapshot);
        }
    }
}

impl Default for SignalStore {
    fn default() -> Self {
        Self::new(500, 5, 8_000)
    }
}

/// Schedule removal of a toast after the configured lifetime. Returns None
/// when no tokio runtime is available; the store then prunes lazily.
fn spawn_toast_expiry(inner: &Arc<StoreInner>, signal_id: String) -> Option<AbortHandle> {
    let handle = tokio::runtime::Handle::try_current().ok()?;
    let weak: Weak<StoreInner> = Arc::downgrade(inner);
    let lifetime = Duration::from_millis(inner.toast_lifetime_ms);

    let join = handle.spawn(async move {
        tokio::time::sleep(lifetime).await;
        if let Some(inner) = weak.upgrade() {
            let mut state = inner.state.lock();
            let before = state.toasts.len();
            state.toasts.retain(|t| t.signal.id != signal_id);
            if state.toasts.len() < before {
                state.stats.toasts_expired += 1;
            }
        }
    });

    Some(join.abort_handle())
}

// ============================================================================
// Subscription Handle
// ============================================================================

/// RAII subscription handle; dropping it removes the callback.
pub struct Subscription {
    id: u64,
    inner: Weak<StoreInner>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.subscribers.lock().retain(|(sid, _)| *sid != self.id);
        }
    }
}

/// Snapshot of store statistics.
#[derive(Debug, Clone)]
pub struct StoreStatsSnapshot {
    pub len: usize,
    pub toast_count: usize,
    pub subscriber_count: usize,
    pub total_added: u64,
    pub dropped_by_capacity: u64,
    pub notifications: u64,
    pub toasts_shown: u64,
    pub toasts_expired: u64,
    pub toasts_dismissed: u64,
}

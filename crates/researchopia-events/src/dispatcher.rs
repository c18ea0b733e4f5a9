//! The event dispatcher: a typed publish/subscribe bus for auth events.
//!
//! Listeners are plain closures registered per [`EventType`]. [`emit`]
//! calls them synchronously, in registration order, on the caller's
//! thread. There is no queue: two `emit` calls are delivered in the order
//! they were made.
//!
//! # Failure isolation
//!
//! A listener that panics is caught with [`std::panic::catch_unwind`],
//! logged with `tracing::error!`, and skipped. The remaining listeners
//! still run and `emit` returns normally.
//!
//! # Locking
//!
//! The registry sits behind a `Mutex`, but the lock is released before any
//! listener runs. Listeners may therefore subscribe, unsubscribe, or emit
//! from inside a callback. `emit` works from a snapshot of the registrations
//! taken when it starts, and re-checks each one just before calling it:
//! a listener removed by an earlier listener is skipped, while one added
//! during the emit first hears the next event.
//!
//! [`emit`]: EventDispatcher::emit

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError, Weak};

use serde_json::Value;

use crate::{AuthEvent, EventType};

/// A registered callback.
///
/// Listeners are reference-counted so the same instance can later be
/// passed to [`EventDispatcher::off`], which compares by pointer.
pub type Listener = Arc<dyn Fn(&AuthEvent) + Send + Sync>;

/// Wraps a closure as a [`Listener`].
pub fn listener<F>(f: F) -> Listener
where
    F: Fn(&AuthEvent) + Send + Sync + 'static,
{
    Arc::new(f)
}

struct Registration {
    id: u64,
    listener: Listener,
}

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    listeners: Mutex<HashMap<EventType, Vec<Registration>>>,
}

impl Registry {
    /// Locks the listener map, recovering from poisoning.
    ///
    /// No listener ever runs under this lock, so a poisoned mutex can only
    /// come from a panic inside our own bookkeeping, which leaves the map
    /// consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<EventType, Vec<Registration>>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_registered(&self, event_type: EventType, id: u64) -> bool {
        self.lock()
            .get(&event_type)
            .is_some_and(|regs| regs.iter().any(|reg| reg.id == id))
    }

    fn remove_where(&self, event_type: EventType, pred: impl Fn(&Registration) -> bool) -> bool {
        let mut map = self.lock();
        let Some(regs) = map.get_mut(&event_type) else {
            return false;
        };
        let Some(pos) = regs.iter().position(pred) else {
            return false;
        };
        regs.remove(pos);
        if regs.is_empty() {
            map.remove(&event_type);
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Handle returned by [`EventDispatcher::on`].
///
/// Calling [`unsubscribe`](Self::unsubscribe) removes exactly the
/// registration that produced this handle. It is safe to call more than
/// once, and safe to call after the dispatcher is gone.
///
/// Dropping the handle does **not** unsubscribe; the listener stays
/// registered until `unsubscribe`, `off`, or `clear`.
#[derive(Debug, Clone)]
pub struct Subscription {
    registry: Weak<Registry>,
    event_type: EventType,
    id: u64,
}

impl Subscription {
    /// Removes this listener registration. Later calls do nothing.
    pub fn unsubscribe(&self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        if registry.remove_where(self.event_type, |reg| reg.id == self.id) {
            tracing::trace!(event_type = %self.event_type, "listener unsubscribed");
        }
    }

    /// The event type this subscription listens to.
    pub fn event_type(&self) -> EventType {
        self.event_type
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// EventDispatcher
// ---------------------------------------------------------------------------

/// Typed publish/subscribe bus for [`EventType`]s.
///
/// Cloning a dispatcher yields another handle to the **same** registry.
/// Most applications use the process-wide instance from [`global`];
/// [`EventDispatcher::new`] exists for tests and for hosts that prefer to
/// inject their own.
///
/// # Example
///
/// ```rust
/// use researchopia_events::{EventDispatcher, EventType, listener};
/// use serde_json::json;
///
/// let events = EventDispatcher::new();
/// let sub = events.on(
///     EventType::SignedIn,
///     listener(|event| println!("welcome {:?}", event.data_field("userId"))),
/// );
///
/// events.emit(EventType::SignedIn, Some(json!({ "userId": "u1" })));
/// sub.unsubscribe();
/// assert_eq!(events.get_listener_count(EventType::SignedIn), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventDispatcher {
    registry: Arc<Registry>,
}

impl EventDispatcher {
    /// Creates a dispatcher with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for `event_type`.
    ///
    /// Listeners for the same type run in registration order. The same
    /// `Listener` may be registered more than once; each registration is
    /// independent.
    pub fn on(&self, event_type: EventType, listener: Listener) -> Subscription {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry
            .lock()
            .entry(event_type)
            .or_default()
            .push(Registration { id, listener });

        tracing::trace!(%event_type, id, "listener subscribed");
        Subscription {
            registry: Arc::downgrade(&self.registry),
            event_type,
            id,
        }
    }

    /// Removes the earliest registration of `listener` for `event_type`.
    ///
    /// Listeners are matched by pointer identity (the same `Arc`). Removing
    /// a listener that isn't registered does nothing.
    pub fn off(&self, event_type: EventType, listener: &Listener) {
        let target = Arc::as_ptr(listener).cast::<()>();
        let removed = self.registry.remove_where(event_type, |reg| {
            Arc::as_ptr(&reg.listener).cast::<()>() == target
        });
        if removed {
            tracing::trace!(%event_type, "listener removed");
        }
    }

    /// Delivers a new [`AuthEvent`] to every listener registered for
    /// `event_type` at the time of the call that is still registered when
    /// its turn comes.
    ///
    /// Never panics because of a listener: each one is isolated, and a
    /// failure is logged before moving on to the next.
    pub fn emit(&self, event_type: EventType, data: Option<Value>) {
        let snapshot: Vec<(u64, Listener)> = self
            .registry
            .lock()
            .get(&event_type)
            .map(|regs| {
                regs.iter()
                    .map(|reg| (reg.id, Arc::clone(&reg.listener)))
                    .collect()
            })
            .unwrap_or_default();

        let event = AuthEvent::new(event_type, data);
        tracing::trace!(%event_type, listeners = snapshot.len(), "emitting auth event");

        for (index, (id, listener)) in snapshot.iter().enumerate() {
            if !self.registry.is_registered(event_type, *id) {
                continue;
            }
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener(&event)));
            if let Err(payload) = outcome {
                tracing::error!(
                    %event_type,
                    listener = index,
                    panic = panic_message(payload.as_ref()),
                    "auth event listener panicked"
                );
            }
        }
    }

    /// Removes every listener for every event type.
    pub fn clear(&self) {
        self.registry.lock().clear();
        tracing::debug!("all auth event listeners cleared");
    }

    /// Number of listeners currently registered for `event_type`.
    pub fn get_listener_count(&self, event_type: EventType) -> usize {
        self.registry
            .lock()
            .get(&event_type)
            .map_or(0, Vec::len)
    }
}

/// Extracts a printable message from a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

// ---------------------------------------------------------------------------
// Process-wide instance
// ---------------------------------------------------------------------------

static GLOBAL: LazyLock<EventDispatcher> = LazyLock::new(EventDispatcher::new);

/// The process-wide dispatcher.
///
/// Lives for the whole program. Use [`EventDispatcher::clear`] to reset it
/// (between tests, or on full teardown).
pub fn global() -> &'static EventDispatcher {
    &GLOBAL
}

// =========================================================================
// Tests
// =========================================================================

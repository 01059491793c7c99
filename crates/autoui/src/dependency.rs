//! Injectable dependencies and change notification.
//!
//! A [`Dependency`] wraps a shared service object. Services that raise
//! notifications also expose [`ChangeNotifier`]s through [`Observable`].

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::metadata::{ChangeKind, ServiceType};

/// A change raised by an observable service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Notification kind.
    pub kind: ChangeKind,
    /// Sender type name.
    pub sender: &'static str,
    /// Member that changed, if known.
    pub member: Option<String>,
}

type Handler = Arc<dyn Fn(&Change) + Send + Sync>;

/// Identifier of one subscription on a notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct NotifierState {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler)>,
}

/// Multicast notification source.
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    state: Arc<Mutex<NotifierState>>,
}

impl ChangeNotifier {
    /// Creates a notifier with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handler.
    pub fn subscribe(&self, handler: impl Fn(&Change) + Send + Sync + 'static) -> SubscriptionId {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = SubscriptionId(state.next_id);
        state.handlers.push((id, Arc::new(handler)));
        id
    }

    /// Removes a handler. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        remove_handler(&self.state, id)
    }

    /// Calls every handler with `change`.
    ///
    /// Handlers may subscribe or unsubscribe while being notified; the set
    /// notified is the one present when the call started.
    pub fn notify(&self, change: &Change) {
        let handlers: Vec<Handler> = self
            .state
            .lock()
            .handlers
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect();
        for handler in handlers {
            handler(change);
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().handlers.len()
    }

    fn downgrade(&self) -> Weak<Mutex<NotifierState>> {
        Arc::downgrade(&self.state)
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

fn remove_handler(state: &Mutex<NotifierState>, id: SubscriptionId) -> bool {
    let mut state = state.lock();
    let before = state.handlers.len();
    state.handlers.retain(|(h, _)| *h != id);
    state.handlers.len() != before
}

/// Capability of raising change notifications.
pub trait Observable: Send + Sync {
    /// Raised when a property of the service changes.
    fn property_changes(&self) -> Option<&ChangeNotifier> {
        None
    }

    /// Raised when a collection owned by the service changes.
    fn collection_changes(&self) -> Option<&ChangeNotifier> {
        None
    }
}

/// Subscriptions created by one instantiation.
///
/// Dropping the handle unsubscribes every handler.
#[must_use = "dropping Subscriptions unsubscribes every handler"]
#[derive(Default)]
pub struct Subscriptions {
    entries: Vec<(Weak<Mutex<NotifierState>>, SubscriptionId)>,
}

impl Subscriptions {
    /// Empty handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks a subscription made on `notifier`.
    pub fn track(&mut self, notifier: &ChangeNotifier, id: SubscriptionId) {
        self.entries.push((notifier.downgrade(), id));
    }

    /// Number of tracked subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unsubscribes everything now.
    pub fn release(mut self) {
        self.unsubscribe_all();
    }

    fn unsubscribe_all(&mut self) {
        for (state, id) in self.entries.drain(..) {
            if let Some(state) = state.upgrade() {
                remove_handler(&state, id);
            }
        }
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.unsubscribe_all();
    }
}

impl fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriptions")
            .field("len", &self.entries.len())
            .finish()
    }
}

/// A service object offered for injection.
#[derive(Clone)]
pub struct Dependency {
    service: ServiceType,
    value: Arc<dyn Any + Send + Sync>,
    observable: Option<Arc<dyn Observable>>,
}

impl Dependency {
    /// Plain dependency.
    pub fn new<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            service: ServiceType::of::<T>(),
            value,
            observable: None,
        }
    }

    /// Dependency that can raise notifications.
    pub fn observable<T: Any + Observable>(value: Arc<T>) -> Self {
        let observable: Arc<dyn Observable> = Arc::clone(&value) as Arc<dyn Observable>;
        Self {
            service: ServiceType::of::<T>(),
            value,
            observable: Some(observable),
        }
    }

    /// Runtime type.
    #[must_use]
    pub fn service(&self) -> ServiceType {
        self.service
    }

    /// Returns true if the runtime type is exactly `service`.
    #[must_use]
    pub fn is(&self, service: ServiceType) -> bool {
        self.service.id == service.id
    }

    /// The service as `T`, if it is one.
    #[must_use]
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.value).downcast::<T>().ok()
    }

    /// Notifier for `kind`, if the service raises it.
    #[must_use]
    pub fn notifier(&self, kind: ChangeKind) -> Option<&ChangeNotifier> {
        let observable = self.observable.as_deref()?;
        match kind {
            ChangeKind::Property => observable.property_changes(),
            ChangeKind::Collection => observable.collection_changes(),
        }
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependency")
            .field("service", &self.service.name)
            .field("observable", &self.observable.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Inventory {
        changes: ChangeNotifier,
    }

    impl Observable for Inventory {
        fn collection_changes(&self) -> Option<&ChangeNotifier> {
            Some(&self.changes)
        }
    }

    fn change() -> Change {
        Change {
            kind: ChangeKind::Collection,
            sender: "Inventory",
            member: None,
        }
    }

    #[test]
    fn test_notify_reaches_subscribers() {
        let notifier = ChangeNotifier::new();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let id = notifier.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        notifier.notify(&change());
        assert!(notifier.unsubscribe(id));
        notifier.notify(&change());

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!notifier.unsubscribe(id));
    }

    #[test]
    fn test_dropping_subscriptions_unsubscribes() {
        let notifier = ChangeNotifier::new();
        let mut subs = Subscriptions::new();
        subs.track(&notifier, notifier.subscribe(|_| {}));
        subs.track(&notifier, notifier.subscribe(|_| {}));
        assert_eq!(notifier.subscriber_count(), 2);

        drop(subs);
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn test_dependency_downcast_and_notifier() {
        let inventory = Arc::new(Inventory::default());
        let dep = Dependency::observable(Arc::clone(&inventory));

        assert!(dep.is(ServiceType::of::<Inventory>()));
        assert!(dep.downcast::<Inventory>().is_some());
        assert!(dep.downcast::<String>().is_none());
        assert!(dep.notifier(ChangeKind::Collection).is_some());
        assert!(dep.notifier(ChangeKind::Property).is_none());

        let plain = Dependency::new(Arc::new(5_u32));
        assert!(plain.notifier(ChangeKind::Collection).is_none());
    }
}

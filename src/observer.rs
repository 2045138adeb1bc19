//! Route observers
//!
//! Collaborators that react to navigation (page metadata, ad slots, analytics)
//! subscribe here instead of watching the location themselves. The router
//! calls every observer synchronously after a transition has been resolved
//! and stored, in the order they subscribed.
//!
//! # Example
//!
//! ```
//! use gpui_eventlink::{observer_fn, ObserverRegistry, ViewKind};
//!
//! let mut observers = ObserverRegistry::new();
//! let id = observers.subscribe(observer_fn("ad-slots", |change| {
//!     if change.kind() == ViewKind::EventView {
//!         // refresh the slot
//!     }
//! }));
//! assert!(observers.unsubscribe(id));
//! ```

use crate::{debug_log, warn_log, RouteChange};
use std::fmt;
use std::sync::Arc;

/// Something that wants to hear about every route change.
pub trait RouteObserver: Send + Sync + 'static {
    /// Called once per transition, after the new view is current.
    ///
    /// Observers only read the change. Navigating from inside this call is
    /// not possible because the router is borrowed for the duration.
    fn on_route_change(&self, change: &RouteChange);

    /// Observer name for logs
    fn name(&self) -> &str {
        "RouteObserver"
    }
}

/// Wrap a closure as an observer.
pub fn observer_fn<F>(name: impl Into<String>, f: F) -> FnObserver<F>
where
    F: Fn(&RouteChange) + Send + Sync + 'static,
{
    FnObserver {
        name: name.into(),
        f,
    }
}

/// Observer created from a closure
pub struct FnObserver<F> {
    name: String,
    f: F,
}

impl<F> RouteObserver for FnObserver<F>
where
    F: Fn(&RouteChange) + Send + Sync + 'static,
{
    fn on_route_change(&self, change: &RouteChange) {
        (self.f)(change);
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Handle returned by [`ObserverRegistry::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Ordered set of observers.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<(SubscriptionId, Arc<dyn RouteObserver>)>,
    next_id: u64,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer at the end of the notification order.
    pub fn subscribe(&mut self, observer: impl RouteObserver) -> SubscriptionId {
        self.subscribe_shared(Arc::new(observer))
    }

    /// Add an observer that is also held elsewhere.
    pub fn subscribe_shared(&mut self, observer: Arc<dyn RouteObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        debug_log!("Observer '{}' subscribed as {:?}", observer.name(), id);
        self.observers.push((id, observer));
        id
    }

    /// Remove an observer. Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        let removed = self.observers.len() != before;
        if !removed {
            warn_log!("Unsubscribe for unknown observer {:?}", id);
        }
        removed
    }

    /// Deliver `change` to every observer, in subscription order.
    pub fn notify(&self, change: &RouteChange) {
        for (_, observer) in &self.observers {
            observer.on_route_change(change);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.observers.iter().map(|(id, o)| (id, o.name())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NavigationDirection, ViewState};
    use std::sync::Mutex;

    fn change(path: &str) -> RouteChange {
        RouteChange {
            from: "/".to_string(),
            path: path.to_string(),
            direction: NavigationDirection::Forward,
            view: ViewState::AddEvent,
        }
    }

    #[test]
    fn test_notify_in_subscription_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut observers = ObserverRegistry::new();

        for name in ["first", "second", "third"] {
            let calls = calls.clone();
            observers.subscribe(observer_fn(name, move |change: &RouteChange| {
                calls
                    .lock()
                    .unwrap()
                    .push(format!("{name}:{}", change.path));
            }));
        }

        observers.notify(&change("/add"));

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["first:/add", "second:/add", "third:/add"]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let calls = Arc::new(Mutex::new(0));
        let mut observers = ObserverRegistry::new();

        let counter = calls.clone();
        let id = observers.subscribe(observer_fn("counter", move |_: &RouteChange| {
            *counter.lock().unwrap() += 1;
        }));

        observers.notify(&change("/add"));
        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.notify(&change("/privacy"));

        assert_eq!(*calls.lock().unwrap(), 1);
        assert!(observers.is_empty());
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut observers = ObserverRegistry::new();
        let a = observers.subscribe(observer_fn("a", |_: &RouteChange| {}));
        observers.unsubscribe(a);
        let b = observers.subscribe(observer_fn("b", |_: &RouteChange| {}));
        assert_ne!(a, b);
    }

    #[test]
    fn test_observer_names() {
        struct Silent;
        impl RouteObserver for Silent {
            fn on_route_change(&self, _change: &RouteChange) {}
        }

        assert_eq!(Silent.name(), "RouteObserver");
        assert_eq!(observer_fn("seo", |_: &RouteChange| {}).name(), "seo");

        let mut observers = ObserverRegistry::new();
        observers.subscribe(Silent);
        assert_eq!(format!("{observers:?}"), "[(SubscriptionId(0), \"RouteObserver\")]");
    }
}

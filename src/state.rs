//! Router state management
//!
//! [`RouterState`] is the only writer of the current location. Every
//! navigation source (history traversal, programmatic navigation, link
//! activation) funnels into the same transition: move the history cursor,
//! resolve the new path, store the view, then notify observers.

use crate::codec::{CrushCodec, EventCodec};
use crate::config::RouterConfig;
use crate::error::{ConfigError, EncodeError};
use crate::event::EventDetails;
use crate::history::{History, HistoryStep};
use crate::links::{LinkClick, LinkDisposition, LinkInterceptor};
use crate::observer::{ObserverRegistry, RouteObserver, SubscriptionId};
use crate::route::{event_path, resolve_with, ViewState};
use crate::{debug_log, RouteChange};
use std::fmt;
use std::sync::Arc;

/// Router state
pub struct RouterState {
    history: History,
    view: ViewState,
    codec: Arc<dyn EventCodec>,
    observers: ObserverRegistry,
    links: LinkInterceptor,
    config: RouterConfig,
}

impl RouterState {
    /// Create a router at `initial_path`.
    ///
    /// The initial view is resolved right away. Observers are not notified
    /// for it; they read [`current_view`](Self::current_view) when they
    /// subscribe if they need it.
    pub fn new(initial_path: impl Into<String>, config: RouterConfig) -> Result<Self, ConfigError> {
        let links = LinkInterceptor::new(config.origin_url()?);
        let codec: Arc<dyn EventCodec> =
            Arc::new(CrushCodec::with_max_substring_len(config.max_substring_len));
        let history = History::with_limit(initial_path, config.history_limit);
        let view = resolve_with(codec.as_ref(), history.current_path());

        debug_log!(
            "Router starting at '{}' ({})",
            history.current_path(),
            view.kind()
        );

        Ok(Self {
            history,
            view,
            codec,
            observers: ObserverRegistry::new(),
            links,
            config,
        })
    }

    /// Swap the codec and resolve the current path again.
    pub fn with_codec(mut self, codec: impl EventCodec) -> Self {
        self.codec = Arc::new(codec);
        self.view = resolve_with(self.codec.as_ref(), self.history.current_path());
        self
    }

    // ------------------------------------------------------------------------
    // Reading
    // ------------------------------------------------------------------------

    pub fn current_path(&self) -> &str {
        self.history.current_path()
    }

    pub fn current_view(&self) -> &ViewState {
        &self.view
    }

    pub fn can_go_back(&self) -> bool {
        self.history.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.history.can_go_forward()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn codec(&self) -> &dyn EventCodec {
        self.codec.as_ref()
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn links(&self) -> &LinkInterceptor {
        &self.links
    }

    /// Root-relative path that opens `event`, using this router's codec.
    pub fn event_path(&self, event: &EventDetails) -> Result<String, EncodeError> {
        event_path(self.codec.as_ref(), event)
    }

    // ------------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------------

    pub fn subscribe(&mut self, observer: impl RouteObserver) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    pub fn subscribe_shared(&mut self, observer: Arc<dyn RouteObserver>) -> SubscriptionId {
        self.observers.subscribe_shared(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Navigate to a new path
    pub fn push(&mut self, path: impl Into<String>) -> RouteChange {
        let step = self.history.push(path);
        self.transition(step)
    }

    /// Replace current path
    pub fn replace(&mut self, path: impl Into<String>) -> RouteChange {
        let step = self.history.replace(path);
        self.transition(step)
    }

    /// Go back in history
    pub fn back(&mut self) -> Option<RouteChange> {
        self.go(-1)
    }

    /// Go forward in history
    pub fn forward(&mut self) -> Option<RouteChange> {
        self.go(1)
    }

    /// Traverse history by `delta` entries. Out-of-range moves do nothing.
    pub fn go(&mut self, delta: isize) -> Option<RouteChange> {
        let step = self.history.go(delta)?;
        Some(self.transition(step))
    }

    /// Encode `event` and navigate to its link.
    pub fn push_event(&mut self, event: &EventDetails) -> Result<RouteChange, EncodeError> {
        let path = self.event_path(event)?;
        Ok(self.push(path))
    }

    /// Handle a link activation.
    ///
    /// Intercepted links are pushed. The disposition is returned so the
    /// caller can pass external links on to the host.
    pub fn follow_link(&mut self, click: &LinkClick) -> LinkDisposition {
        let disposition = self.links.classify(click);
        if let LinkDisposition::Navigate(path) = &disposition {
            self.push(path.clone());
        }
        disposition
    }

    fn transition(&mut self, step: HistoryStep) -> RouteChange {
        self.view = resolve_with(self.codec.as_ref(), &step.to);

        debug_log!(
            "Route change '{}' -> '{}' ({:?}): {}",
            step.from,
            step.to,
            step.direction,
            self.view.kind()
        );

        let change = RouteChange {
            from: step.from,
            path: step.to,
            direction: step.direction,
            view: self.view.clone(),
        };
        self.observers.notify(&change);
        change
    }
}

impl fmt::Debug for RouterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterState")
            .field("history", &self.history)
            .field("view", &self.view)
            .field("codec", &self.codec.name())
            .field("observers", &self.observers)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode, Token};
    use crate::error::DecodeError;
    use crate::observer::observer_fn;
    use crate::route::ViewKind;
    use crate::NavigationDirection;
    use std::sync::Mutex;

    fn router(initial: &str) -> RouterState {
        RouterState::new(initial, RouterConfig::default()).unwrap()
    }

    fn launch() -> EventDetails {
        EventDetails::new("Launch", 1_735_689_600_000, "UTC")
    }

    fn record(state: &mut RouterState) -> Arc<Mutex<Vec<ViewState>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        state.subscribe(observer_fn("recorder", move |change: &RouteChange| {
            sink.lock().unwrap().push(change.view.clone());
        }));
        seen
    }

    #[test]
    fn test_initial_view_is_resolved() {
        assert_eq!(router("/").current_view(), &ViewState::Home);
        assert_eq!(router("/privacy").current_view(), &ViewState::Privacy);

        let path = encode(&launch()).unwrap().to_path();
        assert_eq!(
            router(&path).current_view(),
            &ViewState::EventView(launch())
        );
    }

    #[test]
    fn test_initial_garbage_is_home() {
        let state = router("/not-a-valid-token-@@@");
        assert_eq!(state.current_view(), &ViewState::Home);
        assert_eq!(state.current_path(), "/not-a-valid-token-@@@");
    }

    #[test]
    fn test_navigation_ordering() {
        let mut state = router("/");
        let seen = record(&mut state);
        let token = encode(&launch()).unwrap();

        state.push("/add");
        state.push(token.to_path());
        state.push("/");

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                ViewState::AddEvent,
                ViewState::EventView(launch()),
                ViewState::Home,
            ]
        );
    }

    #[test]
    fn test_every_observer_is_notified_once_in_order() {
        let mut state = router("/");
        let calls = Arc::new(Mutex::new(Vec::new()));

        for name in ["seo", "ads"] {
            let calls = calls.clone();
            state.subscribe(observer_fn(name, move |change: &RouteChange| {
                calls
                    .lock()
                    .unwrap()
                    .push(format!("{name}:{}", change.kind()));
            }));
        }

        state.push("/privacy");

        assert_eq!(*calls.lock().unwrap(), vec!["seo:privacy", "ads:privacy"]);
    }

    #[test]
    fn test_history_traversal_notifies() {
        let mut state = router("/");
        state.push("/add");
        state.push("/privacy");
        let seen = record(&mut state);

        let change = state.back().unwrap();
        assert_eq!(change.direction, NavigationDirection::Back);
        assert_eq!(change.from, "/privacy");
        assert_eq!(change.path, "/add");

        state.go(-1);
        state.go(2);
        assert!(state.forward().is_none());
        assert!(state.go(-5).is_none());

        assert_eq!(
            *seen.lock().unwrap(),
            vec![ViewState::AddEvent, ViewState::Home, ViewState::Privacy]
        );
    }

    #[test]
    fn test_replace_notifies_without_growing_history() {
        let mut state = router("/");
        let seen = record(&mut state);

        let change = state.replace("/add");
        assert_eq!(change.direction, NavigationDirection::Replace);
        assert_eq!(state.history().len(), 1);
        assert!(!state.can_go_back());
        assert_eq!(*seen.lock().unwrap(), vec![ViewState::AddEvent]);
    }

    #[test]
    fn test_push_event() {
        let mut state = router("/add");
        let change = state.push_event(&launch()).unwrap();

        assert_eq!(change.kind(), ViewKind::EventView);
        assert_eq!(change.event(), Some(&launch()));
        assert_eq!(state.current_path(), change.path);

        assert_eq!(
            state.push_event(&EventDetails::new("", 0, "UTC")),
            Err(EncodeError::EmptyName)
        );
        assert_eq!(state.current_view().event(), Some(&launch()));
    }

    #[test]
    fn test_follow_link() {
        let mut state = router("/");
        let seen = record(&mut state);

        assert_eq!(
            state.follow_link(&LinkClick::new("/privacy")),
            LinkDisposition::Navigate("/privacy".to_string())
        );
        assert!(matches!(
            state.follow_link(&LinkClick::new("https://example.com/")),
            LinkDisposition::External(_)
        ));

        assert_eq!(state.current_path(), "/privacy");
        assert_eq!(*seen.lock().unwrap(), vec![ViewState::Privacy]);
    }

    #[test]
    fn test_unsubscribed_observer_is_silent() {
        let mut state = router("/");
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();
        let id = state.subscribe(observer_fn("counter", move |_: &RouteChange| {
            *counter.lock().unwrap() += 1;
        }));

        state.push("/add");
        assert!(state.unsubscribe(id));
        state.push("/privacy");

        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_custom_codec() {
        struct Upper;

        impl EventCodec for Upper {
            fn encode(&self, event: &EventDetails) -> Result<Token, EncodeError> {
                encode(event)
            }

            fn decode(&self, token: &str) -> Result<EventDetails, DecodeError> {
                Ok(EventDetails::new(token.to_uppercase(), 0, "UTC"))
            }

            fn name(&self) -> &str {
                "upper"
            }
        }

        let mut state = router("/launch").with_codec(Upper);
        assert_eq!(state.current_view().event().map(|e| e.name()), Some("LAUNCH"));

        state.push("/ADD");
        assert_eq!(state.current_view(), &ViewState::AddEvent);
        assert!(format!("{state:?}").contains("upper"));
    }

    #[test]
    fn test_bad_origin_is_rejected() {
        let config = RouterConfig::default().origin("nowhere");
        assert!(matches!(
            RouterState::new("/", config),
            Err(ConfigError::Origin { .. })
        ));
    }

    #[test]
    fn test_history_limit_from_config() {
        let mut state =
            RouterState::new("/", RouterConfig::default().history_limit(2)).unwrap();
        state.push("/add");
        state.push("/privacy");
        assert_eq!(state.history().len(), 2);
        assert_eq!(state.back().map(|c| c.path), Some("/add".to_string()));
        assert!(state.back().is_none());
    }
}

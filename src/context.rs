//! Router context integration for GPUI
//!
//! The router lives in a GPUI global. Views read it through [`Navigator`] and
//! change it only through the navigation calls below, so there is exactly one
//! writer of the current location.

use crate::config::RouterConfig;
use crate::error::{ConfigError, EncodeError};
use crate::event::EventDetails;
use crate::links::{LinkClick, LinkDisposition};
use crate::observer::{RouteObserver, SubscriptionId};
use crate::route::ViewState;
use crate::{error_log, info_log, RouteChange, RouterState};
use gpui::{App, BorrowAppContext, Global};

// ============================================================================
// GlobalRouter
// ============================================================================

/// Global router state accessible from any component
#[derive(Debug)]
pub struct GlobalRouter {
    state: RouterState,
}

impl GlobalRouter {
    pub fn new(state: RouterState) -> Self {
        Self { state }
    }

    pub fn push(&mut self, path: String) -> RouteChange {
        self.state.push(path)
    }

    pub fn replace(&mut self, path: String) -> RouteChange {
        self.state.replace(path)
    }

    pub fn back(&mut self) -> Option<RouteChange> {
        self.state.back()
    }

    pub fn forward(&mut self) -> Option<RouteChange> {
        self.state.forward()
    }

    pub fn go(&mut self, delta: isize) -> Option<RouteChange> {
        self.state.go(delta)
    }

    pub fn push_event(&mut self, event: &EventDetails) -> Result<RouteChange, EncodeError> {
        self.state.push_event(event)
    }

    pub fn follow_link(&mut self, click: &LinkClick) -> LinkDisposition {
        self.state.follow_link(click)
    }

    pub fn subscribe(&mut self, observer: impl RouteObserver) -> SubscriptionId {
        self.state.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    pub fn current_path(&self) -> &str {
        self.state.current_path()
    }

    pub fn current_view(&self) -> &ViewState {
        self.state.current_view()
    }

    pub fn can_go_back(&self) -> bool {
        self.state.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.state.can_go_forward()
    }

    pub fn state_mut(&mut self) -> &mut RouterState {
        &mut self.state
    }

    pub fn state(&self) -> &RouterState {
        &self.state
    }
}

impl Global for GlobalRouter {}

/// Trait for accessing the global router from context
pub trait UseRouter {
    /// Get reference to global router
    fn router(&self) -> &GlobalRouter;

    /// Update global router
    fn update_router<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut GlobalRouter, &mut App) -> R;
}

impl UseRouter for App {
    fn router(&self) -> &GlobalRouter {
        self.global::<GlobalRouter>()
    }

    fn update_router<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut GlobalRouter, &mut App) -> R,
    {
        self.update_global(f)
    }
}

/// Install the router with default configuration
///
/// `initial_path` is the location the application was opened at. It is
/// resolved before this returns.
///
/// # Example
///
/// ```ignore
/// use gpui_eventlink::{init_router, observer_fn};
///
/// Application::new().run(|cx| {
///     init_router(cx, "/", |router| {
///         router.subscribe(observer_fn("ads", |change| refresh_ads(change.kind())));
///     });
/// });
/// ```
pub fn init_router<F>(cx: &mut App, initial_path: &str, configure: F)
where
    F: FnOnce(&mut GlobalRouter),
{
    if let Err(error) = try_init_router(cx, initial_path, RouterConfig::default(), configure) {
        error_log!("Router was not installed: {}", error);
    }
}

/// Install the router with an explicit configuration
pub fn try_init_router<F>(
    cx: &mut App,
    initial_path: &str,
    config: RouterConfig,
    configure: F,
) -> Result<(), ConfigError>
where
    F: FnOnce(&mut GlobalRouter),
{
    let mut router = GlobalRouter::new(RouterState::new(initial_path, config)?);
    configure(&mut router);
    info_log!(
        "Router installed at '{}' with {} observer(s)",
        router.current_path(),
        router.state().observer_count()
    );
    cx.set_global(router);
    Ok(())
}

/// Navigate to a path using global router
pub fn navigate(cx: &mut App, path: impl Into<String>) {
    cx.update_router(|router, _cx| {
        router.push(path.into());
    });
}

/// Get current path from global router
pub fn current_path(cx: &App) -> String {
    cx.router().current_path().to_string()
}

// ============================================================================
// Navigator
// ============================================================================

/// Handle for the `Navigator::of(cx)` style
pub struct NavigatorHandle<'a, C: BorrowAppContext> {
    cx: &'a mut C,
}

impl<C: BorrowAppContext> NavigatorHandle<'_, C> {
    pub fn push(self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.cx.update_global::<GlobalRouter, _>(|router, _| {
            router.push(path);
        });
        self
    }

    pub fn replace(self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.cx.update_global::<GlobalRouter, _>(|router, _| {
            router.replace(path);
        });
        self
    }

    pub fn pop(self) -> Self {
        self.cx.update_global::<GlobalRouter, _>(|router, _| {
            router.back();
        });
        self
    }

    pub fn forward(self) -> Self {
        self.cx.update_global::<GlobalRouter, _>(|router, _| {
            router.forward();
        });
        self
    }

    pub fn go(self, delta: isize) -> Self {
        self.cx.update_global::<GlobalRouter, _>(|router, _| {
            router.go(delta);
        });
        self
    }
}

/// Navigation API
///
/// Works with any context that has access to App (`Context<V>`, `App`, etc.)
///
/// ```ignore
/// use gpui_eventlink::Navigator;
///
/// Navigator::push(cx, "/add");
/// Navigator::pop(cx);
/// Navigator::of(cx).push("/privacy").pop();
/// ```
pub struct Navigator;

impl Navigator {
    pub fn of<C: BorrowAppContext>(cx: &mut C) -> NavigatorHandle<'_, C> {
        NavigatorHandle { cx }
    }

    /// Navigate to a new path
    pub fn push(cx: &mut impl BorrowAppContext, path: impl Into<String>) {
        let path = path.into();
        cx.update_global::<GlobalRouter, _>(|router, _| {
            router.push(path);
        });
    }

    /// Replace current path without adding to history
    pub fn replace(cx: &mut impl BorrowAppContext, path: impl Into<String>) {
        let path = path.into();
        cx.update_global::<GlobalRouter, _>(|router, _| {
            router.replace(path);
        });
    }

    /// Go back to the previous entry
    pub fn pop(cx: &mut impl BorrowAppContext) {
        cx.update_global::<GlobalRouter, _>(|router, _| {
            router.back();
        });
    }

    /// Alias for [`pop`](Self::pop)
    pub fn back(cx: &mut impl BorrowAppContext) {
        Self::pop(cx);
    }

    pub fn forward(cx: &mut impl BorrowAppContext) {
        cx.update_global::<GlobalRouter, _>(|router, _| {
            router.forward();
        });
    }

    /// Move through history by `delta` entries
    pub fn go(cx: &mut impl BorrowAppContext, delta: isize) {
        cx.update_global::<GlobalRouter, _>(|router, _| {
            router.go(delta);
        });
    }

    /// Encode `event` and open its page (the "create event" action)
    pub fn push_event(
        cx: &mut impl BorrowAppContext,
        event: &EventDetails,
    ) -> Result<(), EncodeError> {
        cx.update_global::<GlobalRouter, _>(|router, _| router.push_event(event).map(|_| ()))
    }

    /// Hand a link activation to the router
    ///
    /// In-app links are navigated. The disposition is returned so the caller
    /// can open external links.
    pub fn follow_link(cx: &mut impl BorrowAppContext, click: &LinkClick) -> LinkDisposition {
        cx.update_global::<GlobalRouter, _>(|router, _| router.follow_link(click))
    }

    pub fn subscribe(
        cx: &mut impl BorrowAppContext,
        observer: impl RouteObserver,
    ) -> SubscriptionId {
        cx.update_global::<GlobalRouter, _>(|router, _| router.subscribe(observer))
    }

    pub fn unsubscribe(cx: &mut impl BorrowAppContext, id: SubscriptionId) -> bool {
        cx.update_global::<GlobalRouter, _>(|router, _| router.unsubscribe(id))
    }

    pub fn current_path(cx: &App) -> String {
        cx.global::<GlobalRouter>().current_path().to_string()
    }

    pub fn current_view(cx: &App) -> ViewState {
        cx.global::<GlobalRouter>().current_view().clone()
    }

    pub fn can_pop(cx: &App) -> bool {
        cx.global::<GlobalRouter>().can_go_back()
    }

    pub fn can_go_back(cx: &App) -> bool {
        Self::can_pop(cx)
    }

    pub fn can_go_forward(cx: &App) -> bool {
        cx.global::<GlobalRouter>().can_go_forward()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;
    use crate::observer::observer_fn;
    use crate::route::ViewKind;
    use gpui::TestAppContext;
    use std::sync::{Arc, Mutex};

    fn launch() -> EventDetails {
        EventDetails::new("Launch", 1_735_689_600_000, "UTC")
    }

    #[gpui::test]
    fn test_nav_push(cx: &mut TestAppContext) {
        cx.update(|cx| init_router(cx, "/", |_| {}));

        assert_eq!(cx.read(Navigator::current_path), "/");
        assert_eq!(cx.read(Navigator::current_view), ViewState::Home);

        cx.update(|cx| Navigator::push(cx, "/add"));

        assert_eq!(cx.read(Navigator::current_path), "/add");
        assert_eq!(cx.read(Navigator::current_view), ViewState::AddEvent);
    }

    #[gpui::test]
    fn test_nav_back_forward(cx: &mut TestAppContext) {
        cx.update(|cx| {
            init_router(cx, "/", |_| {});
            Navigator::push(cx, "/add");
            Navigator::push(cx, "/privacy");
        });

        assert!(cx.read(Navigator::can_pop));

        cx.update(|cx| Navigator::pop(cx));
        assert_eq!(cx.read(Navigator::current_path), "/add");
        assert!(cx.read(Navigator::can_go_forward));

        cx.update(|cx| Navigator::forward(cx));
        assert_eq!(cx.read(Navigator::current_path), "/privacy");
        assert!(!cx.read(Navigator::can_go_forward));

        cx.update(|cx| Navigator::go(cx, -2));
        assert_eq!(cx.read(Navigator::current_path), "/");
        assert!(!cx.read(Navigator::can_go_back));
    }

    #[gpui::test]
    fn test_nav_replace(cx: &mut TestAppContext) {
        cx.update(|cx| {
            init_router(cx, "/", |_| {});
            Navigator::push(cx, "/add");
            Navigator::replace(cx, "/privacy");
        });

        assert_eq!(cx.read(Navigator::current_path), "/privacy");
        cx.update(|cx| Navigator::pop(cx));
        assert_eq!(cx.read(Navigator::current_path), "/");
    }

    #[gpui::test]
    fn test_initial_event_link(cx: &mut TestAppContext) {
        let path = encode(&launch()).unwrap().to_path();
        cx.update(|cx| init_router(cx, &path, |_| {}));

        assert_eq!(
            cx.read(Navigator::current_view),
            ViewState::EventView(launch())
        );
        assert!(!cx.read(Navigator::can_pop));
    }

    #[gpui::test]
    fn test_push_event(cx: &mut TestAppContext) {
        cx.update(|cx| init_router(cx, "/add", |_| {}));

        cx.update(|cx| Navigator::push_event(cx, &launch())).unwrap();
        assert_eq!(
            cx.read(Navigator::current_view).event(),
            Some(&launch())
        );

        let rejected = cx.update(|cx| Navigator::push_event(cx, &EventDetails::new("", 0, "UTC")));
        assert_eq!(rejected, Err(EncodeError::EmptyName));
    }

    #[gpui::test]
    fn test_configure_subscribes_observers(cx: &mut TestAppContext) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        cx.update(|cx| {
            init_router(cx, "/", move |router| {
                router.subscribe(observer_fn("kinds", move |change: &RouteChange| {
                    sink.lock().unwrap().push(change.kind());
                }));
            });
            Navigator::push(cx, "/add");
            Navigator::of(cx).push("/privacy").pop();
        });

        assert_eq!(
            *seen.lock().unwrap(),
            vec![ViewKind::AddEvent, ViewKind::Privacy, ViewKind::AddEvent]
        );
    }

    #[gpui::test]
    fn test_subscribe_later(cx: &mut TestAppContext) {
        let count = Arc::new(Mutex::new(0));
        let counter = count.clone();

        let id = cx.update(|cx| {
            init_router(cx, "/", |_| {});
            Navigator::subscribe(
                cx,
                observer_fn("count", move |_: &RouteChange| *counter.lock().unwrap() += 1),
            )
        });

        cx.update(|cx| {
            Navigator::push(cx, "/add");
            assert!(Navigator::unsubscribe(cx, id));
            Navigator::push(cx, "/privacy");
        });

        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[gpui::test]
    fn test_follow_link(cx: &mut TestAppContext) {
        cx.update(|cx| init_router(cx, "/", |_| {}));

        let disposition = cx.update(|cx| Navigator::follow_link(cx, &LinkClick::new("/privacy")));
        assert_eq!(disposition, LinkDisposition::Navigate("/privacy".to_string()));
        assert_eq!(cx.read(Navigator::current_path), "/privacy");

        let disposition = cx.update(|cx| {
            Navigator::follow_link(cx, &LinkClick::new("https://example.com/add"))
        });
        assert!(matches!(disposition, LinkDisposition::External(_)));
        assert_eq!(cx.read(Navigator::current_path), "/privacy");
    }

    #[gpui::test]
    fn test_try_init_rejects_bad_origin(cx: &mut TestAppContext) {
        let result = cx.update(|cx| {
            try_init_router(cx, "/", RouterConfig::default().origin("::"), |_| {})
        });
        assert!(result.is_err());
        assert!(cx.read(|cx| cx.try_global::<GlobalRouter>().is_none()));
    }

    #[gpui::test]
    fn test_free_functions(cx: &mut TestAppContext) {
        cx.update(|cx| {
            init_router(cx, "/", |_| {});
            navigate(cx, "/add");
        });
        assert_eq!(cx.read(current_path), "/add");
    }
}

//! Route table and path resolution
//!
//! The application knows three static routes. Every other path is treated as
//! an encoded event and handed to the codec; a path that fails to decode
//! resolves to the home view.

use crate::codec::{CrushCodec, EventCodec, Token};
use crate::error::EncodeError;
use crate::event::EventDetails;
use crate::{debug_log, trace_log};
use std::fmt;

// ============================================================================
// Views
// ============================================================================

/// The kind of view a path resolves to, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Landing page
    Home,
    /// Event creation form
    AddEvent,
    /// Privacy policy
    Privacy,
    /// A decoded shared event
    EventView,
}

impl ViewKind {
    /// Canonical path of a static view. `EventView` has none.
    pub fn static_path(self) -> Option<&'static str> {
        STATIC_ROUTES
            .iter()
            .find(|route| route.kind == self)
            .map(StaticRoute::path)
    }

    pub fn is_static(self) -> bool {
        self != ViewKind::EventView
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewKind::Home => "home",
            ViewKind::AddEvent => "add-event",
            ViewKind::Privacy => "privacy",
            ViewKind::EventView => "event",
        };
        f.write_str(name)
    }
}

/// The result of resolving a path.
///
/// Only `EventView` carries an event. A new value is produced on every path
/// change; nothing is cached between navigations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Home,
    AddEvent,
    Privacy,
    EventView(EventDetails),
}

impl ViewState {
    pub fn kind(&self) -> ViewKind {
        match self {
            ViewState::Home => ViewKind::Home,
            ViewState::AddEvent => ViewKind::AddEvent,
            ViewState::Privacy => ViewKind::Privacy,
            ViewState::EventView(_) => ViewKind::EventView,
        }
    }

    pub fn event(&self) -> Option<&EventDetails> {
        match self {
            ViewState::EventView(event) => Some(event),
            _ => None,
        }
    }

    /// The payload-free state for a static kind.
    ///
    /// Returns `None` for `EventView`, which needs an event.
    pub fn from_static(kind: ViewKind) -> Option<Self> {
        match kind {
            ViewKind::Home => Some(ViewState::Home),
            ViewKind::AddEvent => Some(ViewState::AddEvent),
            ViewKind::Privacy => Some(ViewState::Privacy),
            ViewKind::EventView => None,
        }
    }
}

// ============================================================================
// Static routes
// ============================================================================

/// A path that maps to a view without decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticRoute {
    /// Route segment without the leading slash (`""` is the root)
    pub segment: &'static str,
    /// View the segment resolves to
    pub kind: ViewKind,
    path: &'static str,
}

impl StaticRoute {
    const fn new(segment: &'static str, path: &'static str, kind: ViewKind) -> Self {
        Self {
            segment,
            kind,
            path,
        }
    }

    /// Canonical root-relative path (`/`, `/add`, `/privacy`).
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Compare against a normalized path, ignoring ASCII case.
    pub fn matches(&self, normalized: &str) -> bool {
        self.segment.eq_ignore_ascii_case(normalized)
    }
}

/// Reserved paths, checked before any decode attempt.
pub const STATIC_ROUTES: &[StaticRoute] = &[
    StaticRoute::new("", "/", ViewKind::Home),
    StaticRoute::new("add", "/add", ViewKind::AddEvent),
    StaticRoute::new("privacy", "/privacy", ViewKind::Privacy),
];

/// Strip a single leading slash.
///
/// ```
/// use gpui_eventlink::normalize_path;
///
/// assert_eq!(normalize_path("/add"), "add");
/// assert_eq!(normalize_path("add"), "add");
/// assert_eq!(normalize_path("//add"), "/add");
/// ```
pub fn normalize_path(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Find the static route for `path`, if any.
pub fn match_static(path: &str) -> Option<&'static StaticRoute> {
    let normalized = normalize_path(path);
    STATIC_ROUTES.iter().find(|route| route.matches(normalized))
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve a path with the default codec.
///
/// ```
/// use gpui_eventlink::{resolve, ViewKind};
///
/// assert_eq!(resolve("/add").kind(), ViewKind::AddEvent);
/// assert_eq!(resolve("not-a-valid-token-@@@").kind(), ViewKind::Home);
/// ```
pub fn resolve(path: &str) -> ViewState {
    resolve_with(&CrushCodec::default(), path)
}

/// Resolve a path: static routes first, then the codec, then home.
///
/// Never fails. A decode error is logged and swallowed.
pub fn resolve_with(codec: &dyn EventCodec, path: &str) -> ViewState {
    if let Some(route) = match_static(path) {
        trace_log!("Path '{}' matched static route '{}'", path, route.path());
        if let Some(state) = ViewState::from_static(route.kind) {
            return state;
        }
    }

    match codec.decode(normalize_path(path)) {
        Ok(event) => ViewState::EventView(event),
        Err(error) => {
            debug_log!(
                "Path '{}' is not a valid event token ({}), falling back to home",
                path,
                error
            );
            ViewState::Home
        }
    }
}

/// Root-relative path for an event, encoded with `codec`.
pub fn event_path(codec: &dyn EventCodec, event: &EventDetails) -> Result<String, EncodeError> {
    codec.encode(event).map(|token: Token| token.to_path())
}

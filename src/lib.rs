//! # GPUI Eventlink
//!
//! Shareable event links for GPUI applications:
//!
//! - **Event codec** - Packs an event (name, instant, origin timezone) into a
//!   compact, URL-safe path segment and back
//! - **Path resolution** - Maps `/`, `/add` and `/privacy` to their views and
//!   every other path to a decoded event, falling back to home
//! - **Router** - Single-writer navigation state with browser-style history
//! - **Observers** - Collaborators subscribe to route changes instead of
//!   watching the location
//! - **Link interception** - One delegate decides which link clicks stay in
//!   the app
//!
//! # Quick Start
//!
//! ```ignore
//! use gpui::*;
//! use gpui_eventlink::*;
//!
//! fn main() {
//!     Application::new().run(|cx| {
//!         init_router(cx, "/", |router| {
//!             router.subscribe(SeoObserver::new("https://when-is-it.at", |meta| {
//!                 println!("{}", meta.title);
//!             }));
//!         });
//!
//!         cx.open_window(WindowOptions::default(), |_, cx| {
//!             cx.new(|cx| AppView {
//!                 outlet: cx.new(|_| RouterOutlet::new(ViewBuilders::new())),
//!             })
//!         })
//!     });
//! }
//!
//! struct AppView {
//!     outlet: Entity<RouterOutlet>,
//! }
//!
//! impl Render for AppView {
//!     fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
//!         div()
//!             .child(router_link(cx, "/add", "Create event"))
//!             .child(self.outlet.clone())
//!     }
//! }
//! ```
//!
//! # Sharing an event
//!
//! ```
//! use gpui_eventlink::{decode, encode, resolve, EventDetails, ViewState};
//!
//! let event = EventDetails::new("Launch", 1_735_689_600_000, "UTC");
//! let token = encode(&event).unwrap();
//!
//! assert_eq!(decode(token.as_str()).unwrap(), event);
//! assert_eq!(resolve(&token.to_path()), ViewState::EventView(event));
//! ```
//!
//! # Feature Flags
//!
//! - `log` (default) - Uses the standard `log` crate for logging
//! - `tracing` - Uses the `tracing` crate for structured logging (mutually exclusive with `log`)

#![doc(html_root_url = "https://docs.rs/gpui-eventlink/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
// Lints are configured in Cargo.toml [lints] section

// Logging abstraction
pub mod logging;

// Event and its wire format
pub mod codec;
pub mod event;

// Error handling
pub mod error;

// Core routing modules
pub mod config;
pub mod history;
pub mod links;
pub mod observer;
pub mod route;
pub mod state;

// Collaborators
pub mod seo;
pub mod time;

pub mod widgets;

// Context module (router context integration)
mod context;

// Re-export main types for convenient access
pub use codec::{decode, encode, is_path_safe, CrushCodec, EventCodec, Token};
pub use config::RouterConfig;
pub use context::{
    current_path, init_router, navigate, try_init_router, GlobalRouter, Navigator,
    NavigatorHandle, UseRouter,
};
pub use error::{ConfigError, DecodeError, EncodeError};
pub use event::EventDetails;
pub use history::{History, HistoryEntry, HistoryStep};
pub use links::{LinkClick, LinkDisposition, LinkInterceptor};
pub use observer::{observer_fn, FnObserver, ObserverRegistry, RouteObserver, SubscriptionId};
pub use route::{
    event_path, match_static, normalize_path, resolve, resolve_with, StaticRoute, ViewKind,
    ViewState, STATIC_ROUTES,
};
pub use seo::{OgType, PageMeta, SeoObserver};
pub use state::RouterState;
pub use widgets::{
    render_current_view, router_link, RouterLink, RouterOutlet, ViewBuilder, ViewBuilders,
};

/// Navigation direction indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDirection {
    /// A new entry was pushed, or history moved forward
    Forward,
    /// History moved back
    Back,
    /// The current entry was replaced
    Replace,
}

/// Delivered to observers after every route transition.
///
/// Carries the resolved view, so observers never decode the path again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChange {
    /// Path before the transition
    pub from: String,
    /// Path the router now shows
    pub path: String,
    /// How the transition happened
    pub direction: NavigationDirection,
    /// The view `path` resolved to
    pub view: ViewState,
}

impl RouteChange {
    pub fn kind(&self) -> ViewKind {
        self.view.kind()
    }

    /// The event being shown, for event views.
    pub fn event(&self) -> Option<&EventDetails> {
        self.view.event()
    }
}

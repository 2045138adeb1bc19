//! Widgets: the view outlet and in-app links
//!
//! [`RouterOutlet`] renders whatever view the router currently shows, using
//! one builder per [`ViewKind`]. [`RouterLink`] reports clicks to the router
//! instead of navigating itself; the router decides if a click stays in the
//! app.

use crate::context::{GlobalRouter, Navigator};
use crate::event::EventDetails;
use crate::links::{LinkClick, LinkDisposition};
use crate::route::{match_static, normalize_path, ViewKind, ViewState};
use crate::{debug_log, error_log, trace_log};
use gpui::{
    div, rgb, AnyElement, App, Context, Div, InteractiveElement, IntoElement, MouseButton,
    MouseDownEvent, ParentElement, Render, SharedString, Styled, Window,
};
use std::collections::HashMap;
use std::sync::Arc;

// ============================================================================
// View builders
// ============================================================================

/// Builds the element for one kind of view. Event views receive the event.
pub type ViewBuilder = Arc<dyn Fn(&mut App, Option<&EventDetails>) -> AnyElement>;

/// One builder per view kind. Kinds without a builder get a plain
/// placeholder.
#[derive(Clone, Default)]
pub struct ViewBuilders {
    builders: HashMap<ViewKind, ViewBuilder>,
}

impl ViewBuilders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the builder for `kind`.
    pub fn on(
        mut self,
        kind: ViewKind,
        builder: impl Fn(&mut App, Option<&EventDetails>) -> AnyElement + 'static,
    ) -> Self {
        self.builders.insert(kind, Arc::new(builder));
        self
    }

    pub fn has(&self, kind: ViewKind) -> bool {
        self.builders.contains_key(&kind)
    }

    /// Build the element for `view`.
    pub fn build(&self, cx: &mut App, view: &ViewState) -> AnyElement {
        match self.builders.get(&view.kind()) {
            Some(builder) => builder(cx, view.event()),
            None => {
                trace_log!("No builder for '{}', using placeholder", view.kind());
                placeholder(view)
            }
        }
    }
}

fn placeholder(view: &ViewState) -> AnyElement {
    let label: SharedString = match view {
        ViewState::Home => "When is it at?".into(),
        ViewState::AddEvent => "Create Event".into(),
        ViewState::Privacy => "Privacy Policy".into(),
        ViewState::EventView(event) => event.name().to_string().into(),
    };
    div().child(label).into_any_element()
}

// ============================================================================
// RouterOutlet
// ============================================================================

/// Renders the router's current view.
///
/// ```ignore
/// use gpui_eventlink::{RouterOutlet, ViewBuilders, ViewKind};
///
/// let outlet = cx.new(|_| {
///     RouterOutlet::new(
///         ViewBuilders::new()
///             .on(ViewKind::Home, |_, _| home_page())
///             .on(ViewKind::EventView, |_, event| event_page(event)),
///     )
/// });
/// ```
#[derive(Clone, Default)]
pub struct RouterOutlet {
    builders: ViewBuilders,
}

impl RouterOutlet {
    pub fn new(builders: ViewBuilders) -> Self {
        Self { builders }
    }

    pub fn builders(&self) -> &ViewBuilders {
        &self.builders
    }
}

impl Render for RouterOutlet {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<'_, Self>) -> impl IntoElement {
        div().size_full().child(render_current_view(cx, &self.builders))
    }
}

/// Build the current view with `builders`, for layouts that are not views
/// themselves.
pub fn render_current_view(cx: &mut App, builders: &ViewBuilders) -> AnyElement {
    let Some(router) = cx.try_global::<GlobalRouter>() else {
        error_log!("No global router found - call init_router() first");
        return div()
            .child("RouterOutlet: No global router found. Call init_router() first.")
            .into_any_element();
    };

    let view = router.current_view().clone();
    trace_log!("Rendering '{}' for '{}'", view.kind(), router.current_path());
    builders.build(cx, &view)
}

// ============================================================================
// RouterLink
// ============================================================================

/// A link that reports activations to the router.
pub struct RouterLink {
    href: SharedString,
    target: Option<String>,
    download: bool,
    /// Styling applied when the link points at the current location
    active_style: Option<Box<dyn Fn(Div) -> Div>>,
    children: Vec<AnyElement>,
}

impl RouterLink {
    pub fn new(href: impl Into<SharedString>) -> Self {
        Self {
            href: href.into(),
            target: None,
            download: false,
            active_style: None,
            children: Vec::new(),
        }
    }

    pub fn child(mut self, child: impl IntoElement) -> Self {
        self.children.push(child.into_any_element());
        self
    }

    /// Browsing-context name, e.g. `_blank`. Anything but `_self` leaves the
    /// click to the host.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Mark the link as a download. Downloads are never handled in-app.
    pub fn download(mut self) -> Self {
        self.download = true;
        self
    }

    pub fn active_style(mut self, style: impl Fn(Div) -> Div + 'static) -> Self {
        self.active_style = Some(Box::new(style));
        self
    }

    /// The click this link reports for a plain primary-button press.
    pub fn click(&self) -> LinkClick {
        let mut click = LinkClick::new(self.href.to_string()).download(self.download);
        if let Some(target) = &self.target {
            click = click.target(target.clone());
        }
        click
    }

    /// Build the link element with the given context
    pub fn build<V: 'static>(self, cx: &mut Context<'_, V>) -> Div {
        let is_active = is_active_href(&Navigator::current_path(cx), &self.href);
        let primary = self.click();
        let middle = primary.clone();

        let mut link = div()
            .cursor_pointer()
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(move |_view, event: &MouseDownEvent, _window, cx| {
                    activate(cx, primary.clone().modifiers(event.modifiers));
                }),
            )
            .on_mouse_down(
                MouseButton::Middle,
                cx.listener(move |_view, event: &MouseDownEvent, _window, cx| {
                    activate(
                        cx,
                        middle
                            .clone()
                            .button(MouseButton::Middle)
                            .modifiers(event.modifiers),
                    );
                }),
            );

        if is_active {
            if let Some(style) = self.active_style {
                link = style(link);
            }
        }

        for child in self.children {
            link = link.child(child);
        }

        link
    }
}

/// Report a click and carry out the host side of the decision.
fn activate(cx: &mut App, click: LinkClick) {
    match Navigator::follow_link(cx, &click) {
        LinkDisposition::Navigate(_) => cx.refresh_windows(),
        LinkDisposition::External(url) => {
            debug_log!("Opening external link {}", url);
            cx.open_url(url.as_str());
        }
        LinkDisposition::Ignore => {}
    }
}

/// Whether `href` points at `current_path`. Static routes compare the way
/// they resolve, ignoring case and a leading slash.
fn is_active_href(current_path: &str, href: &str) -> bool {
    match (match_static(current_path), match_static(href)) {
        (Some(current), Some(target)) => current.kind == target.kind,
        (None, None) => normalize_path(current_path) == normalize_path(href),
        _ => false,
    }
}

/// Helper function to create a simple text link
pub fn router_link<V: 'static>(
    cx: &mut Context<'_, V>,
    href: impl Into<SharedString>,
    label: impl Into<SharedString>,
) -> Div {
    let href: SharedString = href.into();
    let label: SharedString = label.into();
    let is_active = is_active_href(&Navigator::current_path(cx), &href);

    RouterLink::new(href)
        .child(
            div()
                .text_color(if is_active {
                    rgb(0x2196f3)
                } else {
                    rgb(0x333333)
                })
                .hover(|this| this.text_color(rgb(0x2196f3)))
                .child(label),
        )
        .build(cx)
}

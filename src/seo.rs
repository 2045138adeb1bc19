//! Page metadata for the current view
//!
//! [`SeoObserver`] turns each route change into a [`PageMeta`] and passes it
//! to the host, which writes it wherever page metadata lives (window title,
//! document head, share previews).

use crate::config::RouterConfig;
use crate::event::EventDetails;
use crate::observer::RouteObserver;
use crate::route::{normalize_path, ViewKind, ViewState};
use crate::time::{format_scheduled, zone_label};
use crate::RouteChange;
use serde::Serialize;
use serde_json::{json, Value};

pub const SITE_NAME: &str = "When is it at?";

const HOME_TITLE: &str = "When is it at? - Global Event Time Converter";
const HOME_DESCRIPTION: &str = "Convert global events to your local timezone instantly. Create and share events with precise timezone information.";
const ADD_TITLE: &str = "Create Event - When is it at?";
const ADD_DESCRIPTION: &str = "Create and share your own events with precise timezone information. Perfect for meetings, celebrations, and international events.";
const PRIVACY_TITLE: &str = "Privacy Policy - When is it at?";
const PRIVACY_DESCRIPTION: &str =
    "How When is it at? handles your data and your advertising consent.";

/// Open Graph object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OgType {
    Website,
    Article,
}

impl OgType {
    pub fn as_str(self) -> &'static str {
        match self {
            OgType::Website => "website",
            OgType::Article => "article",
        }
    }
}

/// Metadata describing one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    /// Absolute URL of the page
    pub canonical_url: String,
    pub og_type: OgType,
    pub site_name: &'static str,
    /// schema.org `Event` data, for event pages only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_data: Option<Value>,
}

impl PageMeta {
    /// Metadata for the view a route change landed on.
    pub fn for_change(change: &RouteChange, origin: &str) -> Self {
        Self::for_view(&change.view, &change.path, origin)
    }

    /// Metadata for `view` reached through `path`.
    ///
    /// Static views use their canonical path whatever spelling was
    /// navigated to.
    pub fn for_view(view: &ViewState, path: &str, origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        let (title, description) = match view {
            ViewState::Home => (HOME_TITLE.to_string(), HOME_DESCRIPTION.to_string()),
            ViewState::AddEvent => (ADD_TITLE.to_string(), ADD_DESCRIPTION.to_string()),
            ViewState::Privacy => (PRIVACY_TITLE.to_string(), PRIVACY_DESCRIPTION.to_string()),
            ViewState::EventView(event) => {
                (format!("{} - {SITE_NAME}", event.name()), event_description(event))
            }
        };

        let path = view
            .kind()
            .static_path()
            .map_or_else(|| format!("/{}", normalize_path(path)), str::to_string);
        let canonical_url = format!("{origin}{path}");

        let structured_data = view
            .event()
            .map(|event| event_structured_data(event, &canonical_url, origin));

        Self {
            title,
            description,
            canonical_url,
            og_type: if view.kind() == ViewKind::EventView {
                OgType::Article
            } else {
                OgType::Website
            },
            site_name: SITE_NAME,
            structured_data,
        }
    }
}

fn scheduled_for(event: &EventDetails) -> Option<String> {
    event
        .datetime()
        .map(|when| format_scheduled(when, event.origin_timezone()))
}

fn event_description(event: &EventDetails) -> String {
    let zone = zone_label(event.origin_timezone());
    match scheduled_for(event) {
        Some(when) => format!(
            "Find out when \"{}\" happens in your timezone. Event scheduled for {when} ({zone}). Convert to your local time instantly.",
            event.name()
        ),
        None => format!(
            "Find out when \"{}\" happens in your timezone ({zone}). Convert to your local time instantly.",
            event.name()
        ),
    }
}

fn event_structured_data(event: &EventDetails, url: &str, origin: &str) -> Value {
    let start = event.datetime().map(|when| when.to_rfc3339());
    let zone = zone_label(event.origin_timezone());

    json!({
        "@context": "https://schema.org",
        "@type": "Event",
        "name": event.name(),
        "startDate": start,
        "endDate": start,
        "url": url,
        "eventAttendanceMode": "https://schema.org/OnlineEventAttendanceMode",
        "isAccessibleForFree": true,
        "location": {
            "@type": "Place",
            "name": zone,
        },
        "organizer": {
            "@type": "Organization",
            "name": SITE_NAME,
            "url": origin,
        },
    })
}

/// Publishes [`PageMeta`] for every route change.
pub struct SeoObserver {
    origin: String,
    sink: Box<dyn Fn(&PageMeta) + Send + Sync>,
}

impl SeoObserver {
    pub fn new(origin: impl Into<String>, sink: impl Fn(&PageMeta) + Send + Sync + 'static) -> Self {
        Self {
            origin: origin.into(),
            sink: Box::new(sink),
        }
    }

    /// Use the origin from the router configuration.
    pub fn from_config(
        config: &RouterConfig,
        sink: impl Fn(&PageMeta) + Send + Sync + 'static,
    ) -> Self {
        Self::new(config.origin_prefix(), sink)
    }
}

impl RouteObserver for SeoObserver {
    fn on_route_change(&self, change: &RouteChange) {
        (self.sink)(&PageMeta::for_change(change, &self.origin));
    }

    fn name(&self) -> &str {
        "seo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NavigationDirection;
    use std::sync::{Arc, Mutex};

    const ORIGIN: &str = "https://when-is-it.at";

    fn launch() -> EventDetails {
        EventDetails::new("Launch", 1_735_689_600_000, "America/New_York")
    }

    #[test]
    fn test_static_pages() {
        let home = PageMeta::for_view(&ViewState::Home, "/", ORIGIN);
        assert_eq!(home.title, HOME_TITLE);
        assert_eq!(home.canonical_url, "https://when-is-it.at/");
        assert_eq!(home.og_type, OgType::Website);
        assert!(home.structured_data.is_none());

        let add = PageMeta::for_view(&ViewState::AddEvent, "ADD", ORIGIN);
        assert_eq!(add.title, "Create Event - When is it at?");
        assert_eq!(add.canonical_url, "https://when-is-it.at/add");

        let privacy = PageMeta::for_view(&ViewState::Privacy, "/privacy", "https://when-is-it.at/");
        assert_eq!(privacy.title, "Privacy Policy - When is it at?");
        assert_eq!(privacy.canonical_url, "https://when-is-it.at/privacy");
    }

    #[test]
    fn test_event_page() {
        let meta = PageMeta::for_view(&ViewState::EventView(launch()), "/abc_", ORIGIN);

        assert_eq!(meta.title, "Launch - When is it at?");
        assert_eq!(
            meta.description,
            "Find out when \"Launch\" happens in your timezone. Event scheduled for \
             Tuesday, December 31, 2024 at 07:00 PM EST (America/New York). \
             Convert to your local time instantly."
        );
        assert_eq!(meta.canonical_url, "https://when-is-it.at/abc_");
        assert_eq!(meta.og_type, OgType::Article);

        let data = meta.structured_data.unwrap();
        assert_eq!(data["@type"], "Event");
        assert_eq!(data["name"], "Launch");
        assert_eq!(data["startDate"], "2025-01-01T00:00:00+00:00");
        assert_eq!(data["location"]["name"], "America/New York");
    }

    #[test]
    fn test_event_out_of_range_still_described() {
        let event = EventDetails::new("Far", i64::MAX, "UTC");
        let meta = PageMeta::for_view(&ViewState::EventView(event), "x_", ORIGIN);
        assert!(meta.description.starts_with("Find out when \"Far\""));
        assert_eq!(meta.canonical_url, "https://when-is-it.at/x_");
        assert!(meta.structured_data.unwrap()["startDate"].is_null());
    }

    #[test]
    fn test_serialized_og_type() {
        let meta = PageMeta::for_view(&ViewState::Home, "/", ORIGIN);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["og_type"], "website");
        assert!(json.get("structured_data").is_none());
    }

    #[test]
    fn test_observer_publishes_meta() {
        let published = Arc::new(Mutex::new(Vec::new()));
        let sink = published.clone();
        let observer = SeoObserver::from_config(&RouterConfig::default(), move |meta| {
            sink.lock().unwrap().push(meta.title.clone());
        });

        observer.on_route_change(&RouteChange {
            from: "/".to_string(),
            path: "/add".to_string(),
            direction: NavigationDirection::Forward,
            view: ViewState::AddEvent,
        });

        assert_eq!(observer.name(), "seo");
        assert_eq!(*published.lock().unwrap(), vec![ADD_TITLE]);
    }
}

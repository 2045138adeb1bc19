//! Link activation
//!
//! Link widgets do not navigate on their own. They describe the activation as
//! a [`LinkClick`] and hand it to the router, where a single
//! [`LinkInterceptor`] decides whether the click stays in the app.

use crate::{trace_log, warn_log};
use gpui::{Modifiers, MouseButton};
use url::Url;

/// A link activation as reported by a widget.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkClick {
    /// Link target as written (`/add`, `https://...`, `mailto:...`)
    pub href: String,
    pub button: MouseButton,
    pub modifiers: Modifiers,
    /// Browsing-context name; only `_self` keeps the link in place
    pub target: Option<String>,
    /// The link asks to be saved rather than followed
    pub download: bool,
}

impl LinkClick {
    /// A plain primary-button click on `href`.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            button: MouseButton::Left,
            modifiers: Modifiers::default(),
            target: None,
            download: false,
        }
    }

    pub fn button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn download(mut self, download: bool) -> Self {
        self.download = download;
        self
    }

    fn is_plain(&self) -> bool {
        self.button == MouseButton::Left
            && !self.modifiers.modified()
            && !self.download
            && self.target.as_deref().map_or(true, |t| t.eq_ignore_ascii_case("_self"))
    }
}

/// What to do with a link activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkDisposition {
    /// Handle in-app: navigate to this root-relative path.
    Navigate(String),
    /// Leave to the host: open this absolute URL the platform way.
    External(Url),
    /// Do nothing (context-menu clicks, fragments, script links).
    Ignore,
}

/// Decides which link activations the router takes over.
#[derive(Debug, Clone)]
pub struct LinkInterceptor {
    origin: Url,
}

impl LinkInterceptor {
    pub fn new(origin: Url) -> Self {
        Self { origin }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Classify a click.
    ///
    /// A plain primary click on a root-relative or same-origin href becomes
    /// [`LinkDisposition::Navigate`]. Clicks with modifier keys, a foreign
    /// target, a download flag or the middle button are handed to the host,
    /// as is every link to another origin.
    ///
    /// ```
    /// use gpui_eventlink::{LinkClick, LinkDisposition, LinkInterceptor};
    /// use url::Url;
    ///
    /// let links = LinkInterceptor::new(Url::parse("https://when-is-it.at").unwrap());
    /// assert_eq!(
    ///     links.classify(&LinkClick::new("/privacy")),
    ///     LinkDisposition::Navigate("/privacy".to_string())
    /// );
    /// ```
    pub fn classify(&self, click: &LinkClick) -> LinkDisposition {
        let href = click.href.trim();
        if href.is_empty() || href.starts_with('#') {
            return LinkDisposition::Ignore;
        }
        if !matches!(click.button, MouseButton::Left | MouseButton::Middle) {
            return LinkDisposition::Ignore;
        }

        let url = match self.origin.join(href) {
            Ok(url) => url,
            Err(error) => {
                warn_log!("Ignoring link with unusable href '{}': {}", href, error);
                return LinkDisposition::Ignore;
            }
        };

        if url.scheme() == "javascript" {
            return LinkDisposition::Ignore;
        }

        if click.is_plain() && url.origin() == self.origin.origin() {
            trace_log!("Intercepted link '{}' -> {}", href, url.path());
            return LinkDisposition::Navigate(url.path().to_string());
        }

        LinkDisposition::External(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> LinkInterceptor {
        LinkInterceptor::new(Url::parse("https://when-is-it.at").unwrap())
    }

    fn navigate(path: &str) -> LinkDisposition {
        LinkDisposition::Navigate(path.to_string())
    }

    #[test]
    fn test_root_relative_links_are_intercepted() {
        let links = links();
        assert_eq!(links.classify(&LinkClick::new("/")), navigate("/"));
        assert_eq!(links.classify(&LinkClick::new("/add")), navigate("/add"));
        assert_eq!(
            links.classify(&LinkClick::new("/('n!'x')_")),
            navigate("/('n!'x')_")
        );
    }

    #[test]
    fn test_same_origin_absolute_links_are_intercepted() {
        let links = links();
        assert_eq!(
            links.classify(&LinkClick::new("https://when-is-it.at/privacy")),
            navigate("/privacy")
        );
        assert_eq!(
            links.classify(&LinkClick::new("https://when-is-it.at/add?ref=x#top")),
            navigate("/add")
        );
    }

    #[test]
    fn test_foreign_links_go_to_host() {
        let links = links();
        for href in [
            "https://example.com/add",
            "//example.com/add",
            "http://when-is-it.at/add",
            "mailto:hello@when-is-it.at",
        ] {
            assert!(
                matches!(links.classify(&LinkClick::new(href)), LinkDisposition::External(_)),
                "href {href}"
            );
        }
    }

    #[test]
    fn test_modified_clicks_go_to_host() {
        let links = links();
        let cases = [
            LinkClick::new("/add").modifiers(Modifiers {
                control: true,
                ..Default::default()
            }),
            LinkClick::new("/add").modifiers(Modifiers {
                shift: true,
                ..Default::default()
            }),
            LinkClick::new("/add").button(MouseButton::Middle),
            LinkClick::new("/add").target("_blank"),
            LinkClick::new("/add").download(true),
        ];

        for click in cases {
            match links.classify(&click) {
                LinkDisposition::External(url) => {
                    assert_eq!(url.as_str(), "https://when-is-it.at/add");
                }
                other => panic!("{click:?} classified as {other:?}"),
            }
        }
    }

    #[test]
    fn test_self_target_stays_in_app() {
        assert_eq!(
            links().classify(&LinkClick::new("/add").target("_self")),
            navigate("/add")
        );
    }

    #[test]
    fn test_ignored_links() {
        let links = links();
        assert_eq!(links.classify(&LinkClick::new("")), LinkDisposition::Ignore);
        assert_eq!(links.classify(&LinkClick::new("#faq")), LinkDisposition::Ignore);
        assert_eq!(
            links.classify(&LinkClick::new("javascript:void(0)")),
            LinkDisposition::Ignore
        );
        assert_eq!(
            links.classify(&LinkClick::new("/add").button(MouseButton::Right)),
            LinkDisposition::Ignore
        );
    }
}

//! Parsing of console locations into routes.
//!
//! A location is the fragment part of a console URL without the `#`:
//!
//! | Location              | Route                                   |
//! |-----------------------|-----------------------------------------|
//! | `""`, `dashboard`     | [`Route::Dashboard`]                    |
//! | `resources`, …        | [`Route::Static`]                       |
//! | `domain`              | new-object page for a domain            |
//! | `domain/justine.lol`  | object page for `justine.lol`           |

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::objects::ObjectKind;

/// Informational pages that need neither login nor an EPP object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaticPage {
    Resources,
    ContactUs,
    WhoisSettings,
    SecuritySettings,
    ContactSettings,
}

impl StaticPage {
    pub const ALL: [StaticPage; 5] = [
        StaticPage::Resources,
        StaticPage::ContactUs,
        StaticPage::WhoisSettings,
        StaticPage::SecuritySettings,
        StaticPage::ContactSettings,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            StaticPage::Resources => "resources",
            StaticPage::ContactUs => "contact-us",
            StaticPage::WhoisSettings => "whois-settings",
            StaticPage::SecuritySettings => "security-settings",
            StaticPage::ContactSettings => "contact-settings",
        }
    }
}

impl fmt::Display for StaticPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Where a location leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Static(StaticPage),
    /// `key` is `None` for a page that creates a new object.
    Object { kind: ObjectKind, key: Option<String> },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown location \"{0}\"")]
pub struct UnknownLocation(pub String);

impl FromStr for Route {
    type Err = UnknownLocation;

    fn from_str(location: &str) -> Result<Self, Self::Err> {
        let trimmed = location.trim();
        let path = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if path.is_empty() || path == "dashboard" {
            return Ok(Route::Dashboard);
        }
        if let Some(page) = StaticPage::ALL.into_iter().find(|p| p.slug() == path) {
            return Ok(Route::Static(page));
        }

        let (kind, key) = match path.split_once('/') {
            Some((kind, key)) => (kind, Some(key)),
            None => (path, None),
        };
        let kind = kind
            .parse::<ObjectKind>()
            .map_err(|_| UnknownLocation(location.to_string()))?;
        match key {
            None => Ok(Route::Object { kind, key: None }),
            Some(key) if key.is_empty() || key.contains('/') => {
                Err(UnknownLocation(location.to_string()))
            }
            Some(key) => Ok(Route::Object {
                kind,
                key: Some(key.to_string()),
            }),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn route(location: &str) -> Route {
        location.parse().unwrap()
    }

    #[test]
    fn test_empty_and_dashboard_resolve_to_dashboard() {
        assert_eq!(route(""), Route::Dashboard);
        assert_eq!(route("dashboard"), Route::Dashboard);
        assert_eq!(route("#"), Route::Dashboard);
    }

    #[test]
    fn test_static_pages_resolve_by_slug() {
        assert_eq!(route("resources"), Route::Static(StaticPage::Resources));
        assert_eq!(route("#contact-us"), Route::Static(StaticPage::ContactUs));
        assert_eq!(
            route("security-settings"),
            Route::Static(StaticPage::SecuritySettings)
        );
    }

    #[test]
    fn test_object_with_key() {
        assert_eq!(
            route("domain/justine.lol"),
            Route::Object {
                kind: ObjectKind::Domain,
                key: Some("justine.lol".to_string())
            }
        );
        assert_eq!(
            route("#contact/pabloistrad"),
            Route::Object {
                kind: ObjectKind::Contact,
                key: Some("pabloistrad".to_string())
            }
        );
    }

    #[test]
    fn test_bare_kind_is_new_object_page() {
        assert_eq!(
            route("host"),
            Route::Object {
                kind: ObjectKind::Host,
                key: None
            }
        );
    }

    #[test]
    fn test_unknown_locations_are_rejected() {
        for location in ["registrar", "domain/", "domain/a/b", "widgets/x"] {
            assert_eq!(
                location.parse::<Route>(),
                Err(UnknownLocation(location.to_string())),
                "{location}"
            );
        }
    }
}

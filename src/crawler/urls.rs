//! Course URL templates
//!
//! The site addresses every resource by a predictable path:
//! `<base>/<level>/unit-<N>[/session-<S>[/activity-<A>]]` plus a per-unit
//! `downloads` page, so URLs are built rather than discovered wherever
//! possible.

use url::Url;

/// Builds course resource URLs from the configured base
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base: Url,
    /// Base without a trailing slash, for string templating (Url would
    /// re-add a trailing slash to a host-only base)
    root: String,
}

impl UrlBuilder {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let root = base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&root)?;
        Ok(Self { base, root })
    }

    /// Base URL for resolving relative links found in pages
    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn level(&self, slug: &str) -> String {
        format!("{}/{}", self.root, slug)
    }

    pub fn unit(&self, slug: &str, unit: u32) -> String {
        format!("{}/unit-{}", self.level(slug), unit)
    }

    pub fn session(&self, slug: &str, unit: u32, session: u32) -> String {
        format!("{}/session-{}", self.unit(slug, unit), session)
    }

    pub fn activity(&self, slug: &str, unit: u32, session: u32, activity: u32) -> String {
        format!("{}/activity-{}", self.session(slug, unit, session), activity)
    }

    pub fn downloads(&self, slug: &str, unit: u32) -> String {
        format!("{}/downloads", self.unit(slug, unit))
    }
}

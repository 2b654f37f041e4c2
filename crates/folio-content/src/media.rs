//! Render-ready image values.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::MediaRef;

/// An image with every attribute resolved.
///
/// An empty `url` means "no image"; renderers check [`ImageView::is_present`]
/// instead of probing for `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageView {
    /// Asset URL, or empty when the item has no image.
    pub url: String,
    /// Alternative text, never empty when `url` is set.
    pub alt: String,
    /// Serve directly instead of through the image optimizer.
    pub unoptimized: bool,
}

impl ImageView {
    /// Whether there is an image to render.
    pub fn is_present(&self) -> bool {
        !self.url.is_empty()
    }
}

/// Decides how media references become [`ImageView`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaPolicy {
    unoptimized_hosts: Vec<String>,
}

impl MediaPolicy {
    /// Policy that optimizes every host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve media from `host` unoptimized (e.g. a local development CMS).
    pub fn with_unoptimized_host(mut self, host: impl AsRef<str>) -> Self {
        let host = host.as_ref().trim().to_ascii_lowercase();
        if !host.is_empty() && !self.unoptimized_hosts.contains(&host) {
            self.unoptimized_hosts.push(host);
        }
        self
    }

    /// Resolve a media reference. `fallback_alt` candidates are tried in
    /// order when the reference carries no alt text.
    pub fn view(&self, media: Option<&MediaRef>, fallback_alt: &[&str]) -> ImageView {
        let Some(media) = media else {
            return ImageView::default();
        };
        let alt = media
            .alt
            .as_deref()
            .into_iter()
            .chain(fallback_alt.iter().copied())
            .map(str::trim)
            .find(|candidate| !candidate.is_empty())
            .unwrap_or_default()
            .to_string();

        ImageView {
            url: media.url.clone(),
            alt,
            unoptimized: self.is_unoptimized(&media.url),
        }
    }

    fn is_unoptimized(&self, url: &str) -> bool {
        if self.unoptimized_hosts.is_empty() {
            return false;
        }
        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
            .is_some_and(|host| self.unoptimized_hosts.contains(&host))
    }
}

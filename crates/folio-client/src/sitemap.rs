//! Sitemap generation.
//!
//! Static routes are listed here; dynamic routes come from the service,
//! post and additional-service listings. Rendering uses `sitemap-rs`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sitemap_rs::url::{ChangeFrequency, Url};
use sitemap_rs::url_set::UrlSet;

use folio_content::{ContentItem, EntityKind};
use folio_core::{Error, Result};

/// How often a route is expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl From<Frequency> for ChangeFrequency {
    fn from(freq: Frequency) -> Self {
        match freq {
            Frequency::Daily => ChangeFrequency::Daily,
            Frequency::Weekly => ChangeFrequency::Weekly,
            Frequency::Monthly => ChangeFrequency::Monthly,
            Frequency::Yearly => ChangeFrequency::Yearly,
        }
    }
}

/// One sitemap route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapEntry {
    /// Site-relative path; empty for the home page.
    pub path: String,
    /// Expected change frequency.
    pub frequency: Frequency,
    /// Relative priority in `0.0..=1.0`.
    pub priority: f32,
    /// Last modification; `None` uses the generation time.
    pub last_modified: Option<DateTime<Utc>>,
}

impl SitemapEntry {
    fn fixed(path: &str, frequency: Frequency, priority: f32) -> Self {
        Self {
            path: path.to_string(),
            frequency,
            priority,
            last_modified: None,
        }
    }
}

/// Routes that exist regardless of CMS content.
pub fn static_entries() -> Vec<SitemapEntry> {
    vec![
        SitemapEntry::fixed("", Frequency::Daily, 1.0),
        SitemapEntry::fixed("/contact-us", Frequency::Monthly, 0.8),
        SitemapEntry::fixed("/services", Frequency::Weekly, 0.9),
        SitemapEntry::fixed("/gallery", Frequency::Weekly, 0.8),
        SitemapEntry::fixed("/posts", Frequency::Daily, 0.8),
        SitemapEntry::fixed("/privacy-policy", Frequency::Yearly, 0.3),
        SitemapEntry::fixed("/refund-policy", Frequency::Yearly, 0.3),
        SitemapEntry::fixed("/terms-conditions", Frequency::Yearly, 0.3),
    ]
}

/// Weekly entries for the detail routes of `items`.
///
/// Kinds without a detail route contribute nothing.
pub fn content_entries<F>(
    items: &[ContentItem<F>],
    kind: EntityKind,
    priority: f32,
) -> Vec<SitemapEntry> {
    items
        .iter()
        .filter_map(|item| {
            Some(SitemapEntry {
                path: kind.path_for(&item.slug)?,
                frequency: Frequency::Weekly,
                priority,
                last_modified: item.modified_at(),
            })
        })
        .collect()
}

/// Render `entries` under `site_url` as sitemap XML.
///
/// # Errors
///
/// Returns [`Error::Config`] for a blank site URL and
/// [`Error::Serialization`] when an entry is rejected by the sitemap
/// writer (e.g. a priority outside `0.0..=1.0`).
pub fn render(
    site_url: &str,
    entries: &[SitemapEntry],
    generated_at: DateTime<Utc>,
) -> Result<String> {
    let base = site_url.trim().trim_end_matches('/');
    if base.is_empty() {
        return Err(Error::config("site URL is not configured"));
    }

    let mut urls = Vec::with_capacity(entries.len());
    for entry in entries {
        let mut builder = Url::builder(format!("{base}{}", entry.path));
        builder
            .last_modified(entry.last_modified.unwrap_or(generated_at).fixed_offset())
            .change_frequency(entry.frequency.into())
            .priority(entry.priority);
        let url = builder
            .build()
            .map_err(|e| Error::Serialization(format!("sitemap entry {}: {e:?}", entry.path)))?;
        urls.push(url);
    }

    let url_set =
        UrlSet::new(urls).map_err(|e| Error::Serialization(format!("sitemap: {e:?}")))?;
    let mut xml = Vec::<u8>::new();
    url_set
        .write(&mut xml)
        .map_err(|e| Error::Serialization(format!("sitemap: {e:?}")))?;
    String::from_utf8(xml).map_err(|e| Error::Serialization(format!("sitemap: {e}")))
}

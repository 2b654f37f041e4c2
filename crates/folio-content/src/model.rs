//! Raw CMS content types.
//!
//! These mirror the REST payloads closely enough to decode them, but every
//! optional attribute is an explicit `Option` or an empty collection so that
//! nothing downstream has to check for presence at render time.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::de;

/// Field bags that [`ContentItem`] can carry.
///
/// Blanket-implemented for every decodable type with a default, so each
/// site-chrome singleton can declare its own typed bag.
pub trait FieldSet: DeserializeOwned + Default + Send + 'static {}

impl<T> FieldSet for T where T: DeserializeOwned + Default + Send + 'static {}

// ============================================================================
// Rendered text
// ============================================================================

/// A `{ "rendered": "..." }` text wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRendered")]
pub struct Rendered {
    /// Rendered HTML.
    pub rendered: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRendered {
    Object {
        #[serde(default, deserialize_with = "de::string")]
        rendered: String,
    },
    Text(String),
}

impl From<RawRendered> for Rendered {
    fn from(raw: RawRendered) -> Self {
        match raw {
            RawRendered::Object { rendered } | RawRendered::Text(rendered) => Self { rendered },
        }
    }
}

impl Rendered {
    /// Wrap plain text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            rendered: text.into(),
        }
    }

    /// Rendered text, or `None` when blank.
    pub fn non_blank(&self) -> Option<&str> {
        let trimmed = self.rendered.trim();
        (!trimmed.is_empty()).then_some(self.rendered.as_str())
    }
}

// ============================================================================
// Media and links
// ============================================================================

/// Reference to a media asset on the CMS media host or its CDN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMedia")]
pub struct MediaRef {
    /// Absolute asset URL.
    pub url: String,
    /// Alternative text, when the author supplied one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMedia {
    Object {
        #[serde(alias = "source_url", default, deserialize_with = "de::string")]
        url: String,
        #[serde(alias = "alt_text", default, deserialize_with = "de::text")]
        alt: Option<String>,
    },
    Url(String),
}

impl TryFrom<RawMedia> for MediaRef {
    type Error = &'static str;

    fn try_from(raw: RawMedia) -> Result<Self, Self::Error> {
        let (url, alt) = match raw {
            RawMedia::Object { url, alt } => (url, alt),
            RawMedia::Url(url) => (url, None),
        };
        if url.trim().is_empty() {
            return Err("media reference without a URL");
        }
        Ok(Self { url, alt })
    }
}

impl MediaRef {
    /// Create a media reference.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt: None,
        }
    }

    /// Attach alternative text.
    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }
}

/// A link field: `{ url, title?, target? }` or a bare URL string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLink")]
pub struct LinkRef {
    /// Target URL as authored in the CMS.
    pub url: String,
    /// Link title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Browsing context (`_blank`, `_self`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLink {
    Object {
        #[serde(default, deserialize_with = "de::string")]
        url: String,
        #[serde(default, deserialize_with = "de::text")]
        title: Option<String>,
        #[serde(default, deserialize_with = "de::text")]
        target: Option<String>,
    },
    Url(String),
}

impl TryFrom<RawLink> for LinkRef {
    type Error = &'static str;

    fn try_from(raw: RawLink) -> Result<Self, Self::Error> {
        let link = match raw {
            RawLink::Object { url, title, target } => Self { url, title, target },
            RawLink::Url(url) => Self {
                url,
                title: None,
                target: None,
            },
        };
        if link.url.trim().is_empty() {
            return Err("link without a URL");
        }
        Ok(link)
    }
}

impl LinkRef {
    /// Create a link to `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            target: None,
        }
    }
}

/// A CMS-authored navigation entry, before route mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuLink {
    /// Visible label.
    pub label: String,
    /// Absolute CMS-side URL; `None` when the author left it empty.
    pub target_url: Option<String>,
    /// Browsing context.
    pub target: Option<String>,
}

impl MenuLink {
    /// Build from a label and an optional link field.
    pub fn from_link(label: impl Into<String>, link: Option<&LinkRef>) -> Self {
        Self {
            label: label.into(),
            target_url: link.map(|l| l.url.clone()),
            target: link.and_then(|l| l.target.clone()),
        }
    }
}

// ============================================================================
// Albums
// ============================================================================

/// A named photo album nested inside a service. The CMS assigns it no slug.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    /// Album name as authored.
    #[serde(rename = "album_name", default, deserialize_with = "de::string")]
    pub name: String,
    /// Cover image.
    #[serde(
        rename = "album_cover",
        default,
        deserialize_with = "de::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub cover: Option<MediaRef>,
    /// Album images in authored order.
    #[serde(rename = "service_gallery", default, deserialize_with = "de::sequence")]
    pub gallery: Vec<MediaRef>,
}

// ============================================================================
// Custom fields
// ============================================================================

/// Custom fields attached to services, additional services and testimonials.
///
/// No field is guaranteed to be present. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldBag {
    // Services
    /// Explicit display name.
    #[serde(default, deserialize_with = "de::text", skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    /// Service price label.
    #[serde(default, deserialize_with = "de::text", skip_serializing_if = "Option::is_none")]
    pub service_price: Option<String>,
    /// Extra charges note.
    #[serde(default, deserialize_with = "de::text", skip_serializing_if = "Option::is_none")]
    pub additional_charges: Option<String>,
    /// Service description (HTML).
    #[serde(default, deserialize_with = "de::text", skip_serializing_if = "Option::is_none")]
    pub service_description: Option<String>,
    /// Primary image.
    #[serde(default, deserialize_with = "de::optional", skip_serializing_if = "Option::is_none")]
    pub service_image: Option<MediaRef>,
    /// Flat gallery, used when the service has no albums.
    #[serde(default, deserialize_with = "de::sequence", skip_serializing_if = "Vec::is_empty")]
    pub service_gallery: Vec<MediaRef>,
    /// Nested albums.
    #[serde(default, deserialize_with = "de::sequence", skip_serializing_if = "Vec::is_empty")]
    pub albums: Vec<Album>,
    /// Call-to-action label.
    #[serde(default, deserialize_with = "de::text", skip_serializing_if = "Option::is_none")]
    pub service_button_text: Option<String>,
    /// Call-to-action target.
    #[serde(default, deserialize_with = "de::optional", skip_serializing_if = "Option::is_none")]
    pub service_button_link: Option<LinkRef>,

    // Additional services
    /// Current price label.
    #[serde(default, deserialize_with = "de::text", skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// Older price field still populated on some entries.
    #[serde(default, deserialize_with = "de::text", skip_serializing_if = "Option::is_none")]
    pub additional_service_price: Option<String>,
    /// Description (HTML).
    #[serde(default, deserialize_with = "de::text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Gallery.
    #[serde(default, deserialize_with = "de::sequence", skip_serializing_if = "Vec::is_empty")]
    pub gallery: Vec<MediaRef>,
    /// Partner company logo.
    #[serde(default, deserialize_with = "de::optional", skip_serializing_if = "Option::is_none")]
    pub company_logo: Option<MediaRef>,
    /// Partner company name.
    #[serde(default, deserialize_with = "de::text", skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Call-to-action label.
    #[serde(default, deserialize_with = "de::text", skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
    /// Call-to-action target.
    #[serde(default, deserialize_with = "de::optional", skip_serializing_if = "Option::is_none")]
    pub button_link: Option<LinkRef>,

    // Testimonials
    /// Client name.
    #[serde(default, deserialize_with = "de::text", skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    /// Client role or company.
    #[serde(default, deserialize_with = "de::text", skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    /// Client portrait.
    #[serde(default, deserialize_with = "de::optional", skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<MediaRef>,
    /// Pull-quote heading.
    #[serde(default, deserialize_with = "de::text", skip_serializing_if = "Option::is_none")]
    pub testimonial_heading: Option<String>,
    /// Testimonial body.
    #[serde(default, deserialize_with = "de::text", skip_serializing_if = "Option::is_none")]
    pub testimonial: Option<String>,
}

// ============================================================================
// Embedded references
// ============================================================================

/// Post author from the `_embedded` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name.
    #[serde(default, deserialize_with = "de::string")]
    pub name: String,
}

/// Linked resources returned when a listing is requested with `_embed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedRefs {
    /// Featured media; the first entry is the featured image.
    #[serde(rename = "wp:featuredmedia", default, deserialize_with = "de::sequence")]
    pub featured_media: Vec<MediaRef>,
    /// Authors; the first entry is the post author.
    #[serde(default, deserialize_with = "de::sequence")]
    pub author: Vec<Author>,
}

// ============================================================================
// ContentItem
// ============================================================================

/// One CMS entity snapshot (post, service, testimonial, ...).
///
/// `F` is the custom-field bag. Read-only: the CMS owns every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "F: FieldSet"))]
pub struct ContentItem<F = CustomFieldBag> {
    /// Identifier, unique within the collection.
    pub id: u64,
    /// Backend slug, unique within the collection.
    pub slug: String,
    /// Title.
    #[serde(default)]
    pub title: Rendered,
    /// Excerpt (HTML).
    #[serde(default, deserialize_with = "de::optional")]
    pub excerpt: Option<Rendered>,
    /// Body (HTML).
    #[serde(default, deserialize_with = "de::optional")]
    pub content: Option<Rendered>,
    /// Publication timestamp as sent by the CMS.
    #[serde(default, deserialize_with = "de::string")]
    pub date: String,
    /// Last modification timestamp as sent by the CMS.
    #[serde(default, deserialize_with = "de::string")]
    pub modified: String,
    /// Custom fields.
    #[serde(rename = "acf", default, deserialize_with = "de::bag")]
    pub custom_fields: F,
    /// Embedded linked resources.
    #[serde(rename = "_embedded", default, deserialize_with = "de::optional")]
    pub embedded: Option<EmbeddedRefs>,
}

impl<F: Default> ContentItem<F> {
    /// Create an item with only the required attributes set.
    pub fn new(id: u64, slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            slug: slug.into(),
            title: Rendered::new(title),
            excerpt: None,
            content: None,
            date: String::new(),
            modified: String::new(),
            custom_fields: F::default(),
            embedded: None,
        }
    }
}

impl<F> ContentItem<F> {
    /// Last modification time, if the CMS sent a parseable timestamp.
    ///
    /// Accepts RFC 3339 and the offset-less `YYYY-MM-DDTHH:MM:SS` form the
    /// CMS uses; the latter is read as UTC.
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.modified)
    }

    /// First embedded featured image.
    pub fn featured_media(&self) -> Option<&MediaRef> {
        self.embedded.as_ref()?.featured_media.first()
    }

    /// First embedded author name.
    pub fn author_name(&self) -> Option<&str> {
        self.embedded
            .as_ref()?
            .author
            .first()
            .map(|a| a.name.as_str())
            .filter(|n| !n.trim().is_empty())
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service_json() -> serde_json::Value {
        json!({
            "id": 12,
            "slug": "weddings",
            "title": { "rendered": "Weddings" },
            "date": "2024-03-01T09:00:00",
            "modified": "2024-05-02T10:30:00",
            "acf": {
                "service_name": "Wedding Photography",
                "service_price": 1500,
                "service_image": { "url": "https://cms.example.com/img/w.jpg", "alt": "" },
                "service_gallery": [
                    { "url": "https://cdn.example.com/a.jpg", "alt": "A" },
                    { "alt": "no url" },
                    42
                ],
                "albums": [
                    {
                        "album_name": "Summer Wedding!",
                        "album_cover": false,
                        "service_gallery": [{ "url": "https://cdn.example.com/s1.jpg" }]
                    }
                ],
                "service_button_link": { "url": "https://cms.example.com/contact/", "title": "", "target": "" },
                "unknown_field": "ignored"
            }
        })
    }

    #[test]
    fn test_decode_service() {
        let item: ContentItem = serde_json::from_value(service_json()).unwrap();
        assert_eq!(item.id, 12);
        assert_eq!(item.slug, "weddings");
        assert_eq!(item.title.rendered, "Weddings");

        let acf = &item.custom_fields;
        assert_eq!(acf.service_name.as_deref(), Some("Wedding Photography"));
        assert_eq!(acf.service_price.as_deref(), Some("1500"));
        let image = acf.service_image.as_ref().unwrap();
        assert_eq!(image.url, "https://cms.example.com/img/w.jpg");
        assert!(image.alt.is_none());
        assert_eq!(acf.service_gallery.len(), 1);
        assert_eq!(acf.albums.len(), 1);
        assert_eq!(acf.albums[0].name, "Summer Wedding!");
        assert!(acf.albums[0].cover.is_none());
        assert_eq!(acf.albums[0].gallery.len(), 1);
        let link = acf.service_button_link.as_ref().unwrap();
        assert_eq!(link.url, "https://cms.example.com/contact/");
        assert!(link.target.is_none());
    }

    #[test]
    fn test_decode_empty_bag_as_array() {
        let item: ContentItem = serde_json::from_value(json!({
            "id": 1,
            "slug": "plain",
            "title": { "rendered": "Plain" },
            "acf": []
        }))
        .unwrap();
        assert_eq!(item.custom_fields, CustomFieldBag::default());
    }

    #[test]
    fn test_decode_missing_bag() {
        let item: ContentItem =
            serde_json::from_value(json!({ "id": 2, "slug": "bare", "title": "Bare" })).unwrap();
        assert_eq!(item.title.rendered, "Bare");
        assert_eq!(item.custom_fields, CustomFieldBag::default());
        assert!(item.excerpt.is_none());
        assert!(item.embedded.is_none());
    }

    #[test]
    fn test_decode_media_forms() {
        let by_url: MediaRef = serde_json::from_value(json!("https://x/y.jpg")).unwrap();
        assert_eq!(by_url.url, "https://x/y.jpg");

        let featured: MediaRef = serde_json::from_value(json!({
            "source_url": "https://cms.example.com/f.jpg",
            "alt_text": "Featured"
        }))
        .unwrap();
        assert_eq!(featured.alt.as_deref(), Some("Featured"));

        assert!(serde_json::from_value::<MediaRef>(json!({ "url": "" })).is_err());
    }

    #[test]
    fn test_decode_embedded() {
        let item: ContentItem = serde_json::from_value(json!({
            "id": 3,
            "slug": "hello",
            "title": { "rendered": "Hello" },
            "_embedded": {
                "wp:featuredmedia": [{ "source_url": "https://cms.example.com/h.jpg" }],
                "author": [{ "name": "Nadee" }]
            }
        }))
        .unwrap();
        assert_eq!(
            item.featured_media().map(|m| m.url.as_str()),
            Some("https://cms.example.com/h.jpg")
        );
        assert_eq!(item.author_name(), Some("Nadee"));
    }

    #[test]
    fn test_modified_at_parses_both_forms() {
        let mut item: ContentItem = ContentItem::new(1, "a", "A");
        item.modified = "2024-05-02T10:30:00".into();
        assert_eq!(
            item.modified_at().unwrap().to_rfc3339(),
            "2024-05-02T10:30:00+00:00"
        );

        item.modified = "2024-05-02T10:30:00+05:30".into();
        assert_eq!(
            item.modified_at().unwrap().to_rfc3339(),
            "2024-05-02T05:00:00+00:00"
        );

        item.modified = "yesterday".into();
        assert!(item.modified_at().is_none());
    }

    #[test]
    fn test_menu_link_from_link() {
        let link = LinkRef {
            url: "https://cms.example.com/about/".into(),
            title: None,
            target: Some("_blank".into()),
        };
        let menu = MenuLink::from_link("About", Some(&link));
        assert_eq!(menu.target_url.as_deref(), Some("https://cms.example.com/about/"));
        assert_eq!(menu.target.as_deref(), Some("_blank"));

        let empty = MenuLink::from_link("Nowhere", None);
        assert!(empty.target_url.is_none());
    }
}

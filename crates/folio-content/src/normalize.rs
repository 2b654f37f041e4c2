//! Field normalization.
//!
//! [`Normalizer::normalize`] turns a raw [`ContentItem`] into a
//! [`NormalizedView`] by walking an ordered fallback chain for every display
//! attribute. Every field of the view is total: when no source in the chain
//! is present the field takes its documented default, so the rendering
//! layer never checks for presence.
//!
//! | Kind                | name                       | price                                      | button text           |
//! |---------------------|----------------------------|--------------------------------------------|-----------------------|
//! | service             | `service_name`, title      | `service_price`, `""`                      | `service_button_text`, `BOOK YOUR SESSION` |
//! | additional-service  | `service_name`, title      | `price`, `additional_service_price`, `""`  | `button_text`, `Contact Us` |
//! | testimonial         | `client_name`, title       | `""`                                       | `Read More`           |
//! | post / page         | title                      | `""`                                       | `Read More`           |

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use folio_core::{ConfigProvider, Error};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::media::{ImageView, MediaPolicy};
use crate::model::{Album, ContentItem, CustomFieldBag, LinkRef, MediaRef};
use crate::routes::{DEFAULT_TARGET, PLACEHOLDER_HREF, RouteMapper};
use crate::slug::album_slug;

/// Maximum length, in characters, of a post summary.
pub const SUMMARY_MAX_CHARS: usize = 160;

/// Display name for an album whose name is blank.
pub const DEFAULT_ALBUM_NAME: &str = "Album";

/// Alt text for an album cover when the album has no name either.
pub const ALBUM_COVER_ALT: &str = "Album Cover";

/// Alt text for a partner logo when the company has no name either.
pub const COMPANY_LOGO_ALT: &str = "Company Logo";

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"<[^>]*>").expect("valid tag regex")
});

// ============================================================================
// EntityKind
// ============================================================================

/// A backend content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    /// Photography service; has albums.
    Service,
    /// Add-on service offered with a partner company.
    AdditionalService,
    /// Client testimonial.
    Testimonial,
    /// Blog post.
    Post,
    /// Static page.
    Page,
}

impl EntityKind {
    /// Every kind, in listing order.
    pub const ALL: [EntityKind; 5] = [
        Self::Service,
        Self::AdditionalService,
        Self::Testimonial,
        Self::Post,
        Self::Page,
    ];

    /// Key used for endpoint overrides and in the default endpoint path.
    pub fn endpoint_key(self) -> &'static str {
        match self {
            Self::Service => "services",
            Self::AdditionalService => "additional-services",
            Self::Testimonial => "testimonials",
            Self::Post => "posts",
            Self::Page => "pages",
        }
    }

    /// REST endpoint relative to the API base URL.
    pub fn default_endpoint(self) -> String {
        format!("wp/v2/{}", self.endpoint_key())
    }

    /// Site route of an entity with `slug`; `None` for kinds without a
    /// detail page.
    pub fn path_for(self, slug: &str) -> Option<String> {
        match self {
            Self::Service => Some(format!("/services/{slug}")),
            Self::AdditionalService => Some(format!("/additional-services/{slug}")),
            Self::Post => Some(format!("/posts/{slug}")),
            Self::Page => Some(format!("/{slug}")),
            Self::Testimonial => None,
        }
    }

    /// Call-to-action label used when the CMS supplies none.
    pub fn default_button_text(self) -> &'static str {
        match self {
            Self::Service => "BOOK YOUR SESSION",
            Self::AdditionalService => "Contact Us",
            Self::Testimonial | Self::Post | Self::Page => "Read More",
        }
    }

    /// Whether listings of this kind should request embedded resources.
    pub fn embeds(self) -> bool {
        matches!(self, Self::Post)
    }

    /// Singular kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::AdditionalService => "additional-service",
            Self::Testimonial => "testimonial",
            Self::Post => "post",
            Self::Page => "page",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| wanted == kind.as_str() || wanted == kind.endpoint_key())
            .ok_or_else(|| {
                Error::config(format!(
                    "unknown entity kind '{s}' (expected one of: service, additional-service, testimonial, post, page)"
                ))
            })
    }
}

// ============================================================================
// Views
// ============================================================================

/// A call-to-action with resolved label and target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonView {
    /// Label.
    pub text: String,
    /// Site path, external URL, or `#`.
    pub href: String,
    /// Browsing context.
    pub target: String,
}

/// An album with its derived slug and route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumView {
    /// Album name as authored.
    pub name: String,
    /// Derived slug; `album-{index}` when the name has no slug-able text.
    pub slug: String,
    /// `/services/{service}/{slug}`.
    pub path: String,
    /// Cover image.
    pub cover: ImageView,
    /// Album images.
    pub gallery: Vec<ImageView>,
}

/// Flat, render-ready view of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedView {
    /// Source kind.
    pub kind: EntityKind,
    /// Backend id.
    pub id: u64,
    /// Backend slug.
    pub slug: String,
    /// Detail route, or `#` for kinds without one.
    pub path: String,
    /// Display name.
    pub name: String,
    /// Price label.
    pub price: String,
    /// Extra charges note.
    pub extra_charges: String,
    /// Body or description HTML.
    pub description: String,
    /// Plain-text summary.
    pub summary: String,
    /// Secondary line: testimonial designation, post author, partner company.
    pub subtitle: String,
    /// Pull-quote heading.
    pub heading: String,
    /// Primary image.
    pub image: ImageView,
    /// Partner logo.
    pub logo: ImageView,
    /// Call-to-action.
    pub button: ButtonView,
    /// Flat gallery.
    pub gallery: Vec<ImageView>,
    /// Albums.
    pub albums: Vec<AlbumView>,
    /// Publication timestamp as sent by the CMS.
    pub published: String,
    /// Last modification timestamp as sent by the CMS.
    pub modified: String,
}

// ============================================================================
// Normalizer
// ============================================================================

/// Applies fallback chains, route mapping and media policy.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    routes: RouteMapper,
    media: MediaPolicy,
}

impl Normalizer {
    /// Create a normalizer.
    pub fn new(routes: RouteMapper, media: MediaPolicy) -> Self {
        Self { routes, media }
    }

    /// Build from configuration.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        let media = config
            .media_hosts_unoptimized()
            .into_iter()
            .fold(MediaPolicy::new(), MediaPolicy::with_unoptimized_host);
        Self::new(RouteMapper::from_config(config), media)
    }

    /// The route mapper.
    pub fn routes(&self) -> &RouteMapper {
        &self.routes
    }

    /// The media policy.
    pub fn media(&self) -> &MediaPolicy {
        &self.media
    }

    /// Normalize `item` as an entity of `kind`.
    pub fn normalize(&self, item: &ContentItem, kind: EntityKind) -> NormalizedView {
        let acf = &item.custom_fields;
        let title = item.title.rendered.trim();
        let content = item.content.as_ref().and_then(|c| c.non_blank()).map(str::to_string);
        let path = kind
            .path_for(&item.slug)
            .unwrap_or_else(|| PLACEHOLDER_HREF.to_string());

        let mut view = NormalizedView {
            kind,
            id: item.id,
            slug: item.slug.clone(),
            path,
            name: title.to_string(),
            price: String::new(),
            extra_charges: String::new(),
            description: String::new(),
            summary: String::new(),
            subtitle: String::new(),
            heading: String::new(),
            image: ImageView::default(),
            logo: ImageView::default(),
            button: self.button(None, None, kind),
            gallery: Vec::new(),
            albums: Vec::new(),
            published: item.date.clone(),
            modified: item.modified.clone(),
        };

        match kind {
            EntityKind::Service => {
                view.name = first_present([acf.service_name.as_deref(), Some(title)]);
                view.price = first_present([acf.service_price.as_deref()]);
                view.extra_charges = first_present([acf.additional_charges.as_deref()]);
                view.description = first_present([acf.service_description.as_deref()]);
                view.image = self.media.view(acf.service_image.as_ref(), &[view.name.as_str()]);
                view.gallery = self.gallery(&acf.service_gallery, &view.name);
                view.albums = self.albums(acf, &view.path);
                view.button = self.button(
                    acf.service_button_text.as_deref(),
                    acf.service_button_link.as_ref(),
                    kind,
                );
            }
            EntityKind::AdditionalService => {
                view.name = first_present([acf.service_name.as_deref(), Some(title)]);
                view.price = first_present([
                    acf.price.as_deref(),
                    acf.additional_service_price.as_deref(),
                ]);
                view.description = first_present([acf.description.as_deref()]);
                view.image = self.media.view(acf.service_image.as_ref(), &[view.name.as_str()]);
                view.gallery = self.gallery(&acf.gallery, &view.name);
                view.subtitle = first_present([acf.company_name.as_deref()]);
                view.logo = self
                    .media
                    .view(acf.company_logo.as_ref(), &[view.subtitle.as_str(), COMPANY_LOGO_ALT]);
                view.button =
                    self.button(acf.button_text.as_deref(), acf.button_link.as_ref(), kind);
            }
            EntityKind::Testimonial => {
                view.name = first_present([acf.client_name.as_deref(), Some(title)]);
                view.subtitle = first_present([acf.designation.as_deref()]);
                view.heading = first_present([acf.testimonial_heading.as_deref()]);
                view.description = first_present([acf.testimonial.as_deref()]);
                view.image = self.media.view(acf.profile_picture.as_ref(), &[view.name.as_str()]);
            }
            EntityKind::Post => {
                view.description = content.unwrap_or_default();
                view.summary = item
                    .excerpt
                    .as_ref()
                    .map(|e| summarize(&e.rendered))
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| summarize(title));
                view.subtitle = first_present([item.author_name()]);
                view.image = self.media.view(item.featured_media(), &[title]);
                view.button = self.detail_button(kind, &view.path);
            }
            EntityKind::Page => {
                view.description = content.unwrap_or_default();
                view.summary = item
                    .excerpt
                    .as_ref()
                    .map(|e| summarize(&e.rendered))
                    .unwrap_or_default();
                view.image = self.media.view(item.featured_media(), &[title]);
                view.button = self.detail_button(kind, &view.path);
            }
        }

        view
    }

    /// Album views for a service, in authored order.
    pub fn albums(&self, fields: &CustomFieldBag, service_path: &str) -> Vec<AlbumView> {
        fields
            .albums
            .iter()
            .enumerate()
            .map(|(index, album)| self.album_view(album, index, service_path))
            .collect()
    }

    /// View of the album at `index` under `service_path`.
    pub fn album_view(&self, album: &Album, index: usize, service_path: &str) -> AlbumView {
        let slug = album_slug(&album.name, index);
        AlbumView {
            name: first_present([Some(album.name.as_str()), Some(DEFAULT_ALBUM_NAME)]),
            path: format!("{}/{slug}", service_path.trim_end_matches('/')),
            slug,
            cover: self
                .media
                .view(album.cover.as_ref(), &[album.name.as_str(), ALBUM_COVER_ALT]),
            gallery: self.gallery(&album.gallery, &album.name),
        }
    }

    /// Resolve a button from an optional label and link.
    pub fn button(
        &self,
        text: Option<&str>,
        link: Option<&LinkRef>,
        kind: EntityKind,
    ) -> ButtonView {
        ButtonView {
            text: first_present([text, Some(kind.default_button_text())]),
            href: self.routes.map_external_url(link.map(|l| l.url.as_str())),
            target: link
                .and_then(|l| l.target.as_deref())
                .unwrap_or(DEFAULT_TARGET)
                .to_string(),
        }
    }

    fn detail_button(&self, kind: EntityKind, path: &str) -> ButtonView {
        ButtonView {
            text: kind.default_button_text().to_string(),
            href: self.routes.map_external_url(Some(path)),
            target: DEFAULT_TARGET.to_string(),
        }
    }

    fn gallery(&self, media: &[MediaRef], name: &str) -> Vec<ImageView> {
        media
            .iter()
            .map(|m| self.media.view(Some(m), &[name]))
            .collect()
    }
}

/// Normalize with a default [`Normalizer`] (no CMS hosts, no rewrites).
pub fn normalize(item: &ContentItem, kind: EntityKind) -> NormalizedView {
    Normalizer::default().normalize(item, kind)
}

// ============================================================================
// Helpers
// ============================================================================

/// First candidate that is present and not blank, else `""`.
pub(crate) fn first_present<'a, I>(candidates: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Strip markup, decode common entities, collapse whitespace and cap the
/// result at [`SUMMARY_MAX_CHARS`].
pub fn summarize(html: &str) -> String {
    let text = decode_entities(&TAG_RE.replace_all(html, ""));
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(SUMMARY_MAX_CHARS).collect()
}

fn decode_entities(text: &str) -> String {
    const ENTITIES: [(&str, &str); 11] = [
        ("&nbsp;", " "),
        ("&#8217;", "\u{2019}"),
        ("&#8216;", "\u{2018}"),
        ("&#8220;", "\u{201C}"),
        ("&#8221;", "\u{201D}"),
        ("&#8211;", "\u{2013}"),
        ("&hellip;", "\u{2026}"),
        ("&#039;", "'"),
        ("&quot;", "\""),
        ("&lt;", "<"),
        ("&gt;", ">"),
    ];
    let decoded = ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, ch)| acc.replace(entity, ch));
    decoded.replace("&amp;", "&")
}

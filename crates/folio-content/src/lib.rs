//! CMS content model and normalization.
//!
//! This crate turns raw CMS REST payloads into render-ready values. It never
//! performs I/O; `folio-client` feeds it decoded items.
//!
//! # Features
//!
//! - Lenient decoding of optional custom fields ([`model`])
//! - Slug derivation for nested content the CMS does not slug ([`slug`])
//! - CMS URL to site route mapping ([`routes`])
//! - Fallback chains producing total views ([`normalize`], [`site`])

#![doc = include_str!("../README.md")]

mod de;
pub mod media;
pub mod model;
pub mod normalize;
pub mod routes;
pub mod site;
pub mod slug;

pub use media::{ImageView, MediaPolicy};
pub use model::{
    Album, Author, ContentItem, CustomFieldBag, EmbeddedRefs, FieldSet, LinkRef, MediaRef,
    MenuLink, Rendered,
};
pub use normalize::{AlbumView, ButtonView, EntityKind, NormalizedView, Normalizer, normalize};
pub use routes::{DEFAULT_TARGET, NavLink, PLACEHOLDER_HREF, RouteMapper};
pub use site::{
    ChromeFields, ContactEntry, ContactKind, HeroFields, HeroView, SameDayFields, SameDayView,
    SiteChrome, SocialLink, SocialNetwork,
};
pub use slug::{album_slug, derive_slug, find_by_segment, matching_positions, segment_matches};

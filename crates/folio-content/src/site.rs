//! Site chrome: hero, same-day section, header and footer.
//!
//! Each is a singleton collection in the CMS whose first item wins. A
//! missing item, or a missing field, falls back to the marketing defaults
//! below so the home page and layout always render.

use serde::{Deserialize, Serialize};

use crate::de;
use crate::media::ImageView;
use crate::model::{ContentItem, LinkRef, MediaRef, MenuLink};
use crate::normalize::{ButtonView, Normalizer, first_present};
use crate::routes::{DEFAULT_TARGET, NavLink, PLACEHOLDER_HREF};

/// Hero defaults.
pub mod hero_defaults {
    /// Line above the headline.
    pub const PRE_HEADLINE: &str = "Capturing Life's Precious Moments with Artistic Excellence";
    /// Headline.
    pub const HEADLINE: &str = "Your Story, Our Lens";
    /// Body paragraph.
    pub const BODY_TEXT: &str = "From stunning portraits to timeless family memories, corporate headshots to vibrant fashion shoots\u{2014}every image tells your unique story. Discover professional photography services in Colombo, designed to beautifully preserve your most cherished moments.";
    /// Call-to-action label.
    pub const CTA_TEXT: &str = "BOOK YOUR SESSION";
    /// Call-to-action target.
    pub const CTA_LINK: &str = "#contact";
    /// Background image alt text.
    pub const IMAGE_ALT: &str = "Hero background";
}

/// Same-day service section defaults.
pub mod same_day_defaults {
    /// Section name.
    pub const NAME: &str = "Same Day Service";
    /// Description.
    pub const DESCRIPTION: &str = "Our standard editing process takes 3-4 working days. However, if you require same-day service, it can be arranged after making full payment and selecting your portraits.";
    /// Subheading.
    pub const SUBHEADING: &str = "Memories that can time travel";
    /// Heading.
    pub const HEADING: &str = "Your creativity has no boundaries, with us";
    /// Button label.
    pub const BUTTON_TEXT: &str = "Book Your Session";
}

/// Alt text for the site logo.
pub const LOGO_ALT: &str = "Site logo";

// ============================================================================
// Raw field bags
// ============================================================================

/// Custom fields of the hero singleton.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct HeroFields {
    #[serde(default, deserialize_with = "de::text")]
    pub pre_headline: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub headline: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub body_text: Option<String>,
    #[serde(default, deserialize_with = "de::optional")]
    pub hero_image: Option<MediaRef>,
    #[serde(default, deserialize_with = "de::text")]
    pub cta_text: Option<String>,
    #[serde(default, deserialize_with = "de::optional")]
    pub cta_link: Option<LinkRef>,
}

/// Custom fields of the same-day service singleton.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct SameDayFields {
    #[serde(default, deserialize_with = "de::text")]
    pub service_name: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub service_description: Option<String>,
    #[serde(default, deserialize_with = "de::optional")]
    pub service_image: Option<MediaRef>,
    #[serde(default, deserialize_with = "de::text")]
    pub service_subheading: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub service_heading: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub service_button_text: Option<String>,
    #[serde(default, deserialize_with = "de::optional")]
    pub service_button_link: Option<LinkRef>,
}

/// Custom fields shared by the header and footer singletons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromeFields {
    /// Site logo.
    #[serde(default, deserialize_with = "de::optional")]
    pub logo: Option<MediaRef>,
    /// Main navigation.
    #[serde(default, deserialize_with = "de::sequence")]
    pub menu: Vec<MenuEntry>,
    /// Secondary links (policies, terms).
    #[serde(default, deserialize_with = "de::sequence")]
    pub important_links: Vec<ImportantLink>,
    /// Social profiles.
    #[serde(default, deserialize_with = "de::sequence")]
    pub social_media: Vec<SocialEntry>,
    /// Contact details, one group per channel.
    #[serde(default, deserialize_with = "de::sequence")]
    pub icon_groups: Vec<IconGroup>,
}

/// Main navigation entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct MenuEntry {
    #[serde(default, deserialize_with = "de::string")]
    pub menu_item_name: String,
    #[serde(default, deserialize_with = "de::optional")]
    pub menu_item_link: Option<LinkRef>,
}

/// Secondary link entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct ImportantLink {
    #[serde(default, deserialize_with = "de::string")]
    pub important_link_text: String,
    #[serde(default, deserialize_with = "de::optional")]
    pub important_links: Option<LinkRef>,
}

/// Social profile entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct SocialEntry {
    #[serde(default, deserialize_with = "de::string")]
    pub social_media_name: String,
    #[serde(default, deserialize_with = "de::optional")]
    pub social_media_links_items: Option<LinkRef>,
}

/// Contact group entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct IconGroup {
    #[serde(default, deserialize_with = "de::string")]
    pub list_name: String,
    #[serde(default, deserialize_with = "de::string")]
    pub list_content: String,
}

// ============================================================================
// Views
// ============================================================================

/// Hero section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct HeroView {
    pub pre_headline: String,
    pub headline: String,
    pub body_text: String,
    pub image: ImageView,
    pub cta: ButtonView,
}

/// Same-day service section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct SameDayView {
    pub name: String,
    pub description: String,
    pub image: ImageView,
    pub subheading: String,
    pub heading: String,
    pub button: ButtonView,
}

/// Known social networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum SocialNetwork {
    Facebook,
    Linkedin,
    Instagram,
    Pinterest,
}

impl SocialNetwork {
    /// Classify by a free-text profile name.
    pub fn classify(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        [
            ("facebook", Self::Facebook),
            ("linkedin", Self::Linkedin),
            ("instagram", Self::Instagram),
            ("pinterest", Self::Pinterest),
        ]
        .into_iter()
        .find_map(|(needle, network)| name.contains(needle).then_some(network))
    }
}

/// A social profile link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    /// Recognized network; `None` renders the label as text.
    pub network: Option<SocialNetwork>,
    /// Profile name as authored.
    pub label: String,
    /// Profile URL or `#`.
    pub href: String,
    /// Browsing context.
    pub target: String,
}

/// Contact channel, classified from the group name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum ContactKind {
    Phone,
    Whatsapp,
    Email,
    Address,
    Hours,
    Other,
}

impl ContactKind {
    /// Classify by group name. Phone is checked before WhatsApp so a group
    /// named "Phone / WhatsApp" dials.
    pub fn classify(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("phone") {
            Self::Phone
        } else if name.contains("whatsapp") {
            Self::Whatsapp
        } else if name.contains("email") {
            Self::Email
        } else if name.contains("address") {
            Self::Address
        } else if name.contains("hour") {
            Self::Hours
        } else {
            Self::Other
        }
    }

    /// Link for `content`; `None` for plain-text channels.
    pub fn href(self, content: &str) -> Option<String> {
        match self {
            Self::Phone => Some(format!(
                "tel:{}",
                content.chars().filter(|c| !c.is_whitespace()).collect::<String>()
            )),
            Self::Whatsapp => Some(format!(
                "https://wa.me/{}",
                content.chars().filter(char::is_ascii_digit).collect::<String>()
            )),
            Self::Email => Some(format!("mailto:{}", content.trim())),
            Self::Address | Self::Hours | Self::Other => None,
        }
    }
}

/// One contact channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEntry {
    /// Classified channel.
    pub kind: ContactKind,
    /// Group name as authored.
    pub label: String,
    /// Display text.
    pub text: String,
    /// Link, for channels that have one.
    pub href: Option<String>,
}

/// Normalized header or footer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct SiteChrome {
    pub logo: ImageView,
    pub menu: Vec<NavLink>,
    pub important_links: Vec<NavLink>,
    pub social: Vec<SocialLink>,
    pub contacts: Vec<ContactEntry>,
}

impl SiteChrome {
    /// True when the CMS supplied nothing; renderers show a minimal fallback.
    pub fn is_empty(&self) -> bool {
        !self.logo.is_present()
            && self.menu.is_empty()
            && self.important_links.is_empty()
            && self.social.is_empty()
            && self.contacts.is_empty()
    }
}

// ============================================================================
// Normalization
// ============================================================================

impl Normalizer {
    /// Hero section from the first hero item, if any.
    pub fn hero(&self, item: Option<&ContentItem<HeroFields>>) -> HeroView {
        let fields = item.map(|i| &i.custom_fields);
        let field = |f: fn(&HeroFields) -> Option<&str>| fields.and_then(f);

        HeroView {
            pre_headline: first_present([
                field(|h| h.pre_headline.as_deref()),
                Some(hero_defaults::PRE_HEADLINE),
            ]),
            headline: first_present([
                field(|h| h.headline.as_deref()),
                Some(hero_defaults::HEADLINE),
            ]),
            body_text: first_present([
                field(|h| h.body_text.as_deref()),
                Some(hero_defaults::BODY_TEXT),
            ]),
            image: self.media().view(
                fields.and_then(|h| h.hero_image.as_ref()),
                &[hero_defaults::IMAGE_ALT],
            ),
            cta: ButtonView {
                text: first_present([
                    field(|h| h.cta_text.as_deref()),
                    Some(hero_defaults::CTA_TEXT),
                ]),
                href: self.routes().map_external_url(Some(
                    fields
                        .and_then(|h| h.cta_link.as_ref())
                        .map_or(hero_defaults::CTA_LINK, |l| l.url.as_str()),
                )),
                target: link_target(fields.and_then(|h| h.cta_link.as_ref())),
            },
        }
    }

    /// Same-day section from the first same-day item, if any.
    pub fn same_day(&self, item: Option<&ContentItem<SameDayFields>>) -> SameDayView {
        let fields = item.map(|i| &i.custom_fields);
        let field = |f: fn(&SameDayFields) -> Option<&str>| fields.and_then(f);

        let name = first_present([
            field(|s| s.service_name.as_deref()),
            Some(same_day_defaults::NAME),
        ]);
        let link = fields.and_then(|s| s.service_button_link.as_ref());

        SameDayView {
            description: first_present([
                field(|s| s.service_description.as_deref()),
                Some(same_day_defaults::DESCRIPTION),
            ]),
            image: self
                .media()
                .view(fields.and_then(|s| s.service_image.as_ref()), &[name.as_str()]),
            subheading: first_present([
                field(|s| s.service_subheading.as_deref()),
                Some(same_day_defaults::SUBHEADING),
            ]),
            heading: first_present([
                field(|s| s.service_heading.as_deref()),
                Some(same_day_defaults::HEADING),
            ]),
            button: ButtonView {
                text: first_present([
                    field(|s| s.service_button_text.as_deref()),
                    Some(same_day_defaults::BUTTON_TEXT),
                ]),
                href: self.routes().map_external_url(link.map(|l| l.url.as_str())),
                target: link_target(link),
            },
            name,
        }
    }

    /// Header or footer from the first chrome item; empty when absent.
    pub fn chrome(&self, item: Option<&ContentItem<ChromeFields>>) -> SiteChrome {
        let Some(fields) = item.map(|i| &i.custom_fields) else {
            return SiteChrome::default();
        };
        let routes = self.routes();

        SiteChrome {
            logo: self.media().view(fields.logo.as_ref(), &[LOGO_ALT]),
            menu: fields
                .menu
                .iter()
                .map(|m| routes.resolve(&MenuLink::from_link(&m.menu_item_name, m.menu_item_link.as_ref())))
                .collect(),
            important_links: fields
                .important_links
                .iter()
                .map(|l| {
                    routes.resolve(&MenuLink::from_link(
                        &l.important_link_text,
                        l.important_links.as_ref(),
                    ))
                })
                .collect(),
            social: fields
                .social_media
                .iter()
                .map(|s| SocialLink {
                    network: SocialNetwork::classify(&s.social_media_name),
                    label: s.social_media_name.clone(),
                    href: s
                        .social_media_links_items
                        .as_ref()
                        .map_or_else(|| PLACEHOLDER_HREF.to_string(), |l| l.url.clone()),
                    target: link_target(s.social_media_links_items.as_ref()),
                })
                .collect(),
            contacts: fields
                .icon_groups
                .iter()
                .filter(|g| !g.list_content.trim().is_empty())
                .map(|g| {
                    let kind = ContactKind::classify(&g.list_name);
                    ContactEntry {
                        kind,
                        label: g.list_name.clone(),
                        text: g.list_content.clone(),
                        href: kind.href(&g.list_content),
                    }
                })
                .collect(),
        }
    }
}

fn link_target(link: Option<&LinkRef>) -> String {
    link.and_then(|l| l.target.as_deref())
        .unwrap_or(DEFAULT_TARGET)
        .to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::routes::RouteMapper;
    use crate::media::MediaPolicy;
    use serde_json::json;

    fn normalizer() -> Normalizer {
        Normalizer::new(
            RouteMapper::new()
                .with_cms_host("cms.example.com")
                .with_rewrite("/blog", "/posts"),
            MediaPolicy::new(),
        )
    }

    fn chrome_item(acf: serde_json::Value) -> ContentItem<ChromeFields> {
        serde_json::from_value(json!({ "id": 1, "slug": "footer", "acf": acf })).unwrap()
    }

    // ------------------------------------------------------------------------
    // Hero and same-day
    // ------------------------------------------------------------------------

    #[test]
    fn test_hero_defaults_without_item() {
        let hero = normalizer().hero(None);
        assert_eq!(hero.headline, hero_defaults::HEADLINE);
        assert_eq!(hero.pre_headline, hero_defaults::PRE_HEADLINE);
        assert_eq!(hero.cta.text, hero_defaults::CTA_TEXT);
        assert_eq!(hero.cta.href, "#contact");
        assert!(!hero.image.is_present());
    }

    #[test]
    fn test_hero_from_fields() {
        let item: ContentItem<HeroFields> = serde_json::from_value(json!({
            "id": 1,
            "slug": "hero",
            "acf": {
                "headline": "Hello",
                "body_text": false,
                "hero_image": { "url": "https://cdn.example.com/hero.jpg" },
                "cta_link": { "url": "https://cms.example.com/blog/", "target": "_blank" }
            }
        }))
        .unwrap();
        let hero = normalizer().hero(Some(&item));
        assert_eq!(hero.headline, "Hello");
        assert_eq!(hero.body_text, hero_defaults::BODY_TEXT);
        assert_eq!(hero.image.alt, hero_defaults::IMAGE_ALT);
        assert_eq!(hero.cta.href, "/posts");
        assert_eq!(hero.cta.target, "_blank");
    }

    #[test]
    fn test_same_day_defaults() {
        let view = normalizer().same_day(None);
        assert_eq!(view.name, same_day_defaults::NAME);
        assert_eq!(view.description, same_day_defaults::DESCRIPTION);
        assert_eq!(view.button.text, same_day_defaults::BUTTON_TEXT);
        assert_eq!(view.button.href, PLACEHOLDER_HREF);
    }

    #[test]
    fn test_same_day_image_alt_uses_name() {
        let item: ContentItem<SameDayFields> = serde_json::from_value(json!({
            "id": 2,
            "slug": "same-day",
            "acf": {
                "service_name": "Express Edits",
                "service_image": { "url": "https://cdn.example.com/sd.jpg", "alt": "" }
            }
        }))
        .unwrap();
        let view = normalizer().same_day(Some(&item));
        assert_eq!(view.name, "Express Edits");
        assert_eq!(view.image.alt, "Express Edits");
    }

    // ------------------------------------------------------------------------
    // Header / footer
    // ------------------------------------------------------------------------

    #[test]
    fn test_chrome_absent_is_empty() {
        assert!(normalizer().chrome(None).is_empty());
        assert!(normalizer().chrome(Some(&chrome_item(json!([])))).is_empty());
    }

    #[test]
    fn test_chrome_menu_and_links() {
        let chrome = normalizer().chrome(Some(&chrome_item(json!({
            "logo": { "url": "https://cdn.example.com/logo.png" },
            "menu": [
                { "menu_item_name": "Home", "menu_item_link": false },
                { "menu_item_name": "Blog", "menu_item_link": { "url": "https://cms.example.com/blog/" } }
            ],
            "important_links": [
                { "important_link_text": "Privacy", "important_links": { "url": "https://cms.example.com/privacy-policy/", "target": "_blank" } }
            ]
        }))));
        assert_eq!(chrome.logo.alt, LOGO_ALT);
        assert_eq!(chrome.menu[0].href, PLACEHOLDER_HREF);
        assert_eq!(chrome.menu[1].href, "/posts");
        assert_eq!(chrome.menu[1].target, DEFAULT_TARGET);
        assert_eq!(chrome.important_links[0].href, "/privacy-policy");
        assert_eq!(chrome.important_links[0].target, "_blank");
    }

    #[test]
    fn test_chrome_social_classification() {
        let chrome = normalizer().chrome(Some(&chrome_item(json!({
            "social_media": [
                { "social_media_name": "Facebook Page", "social_media_links_items": { "url": "https://facebook.com/studio" } },
                { "social_media_name": "TikTok" }
            ]
        }))));
        assert_eq!(chrome.social[0].network, Some(SocialNetwork::Facebook));
        assert_eq!(chrome.social[0].href, "https://facebook.com/studio");
        assert_eq!(chrome.social[1].network, None);
        assert_eq!(chrome.social[1].href, PLACEHOLDER_HREF);
    }

    #[test]
    fn test_chrome_contacts() {
        let chrome = normalizer().chrome(Some(&chrome_item(json!({
            "icon_groups": [
                { "list_name": "Address", "list_content": "12 Galle Road\nColombo" },
                { "list_name": "Phone", "list_content": "+94 77 123 4567" },
                { "list_name": "Whatsapp", "list_content": "+94 (77) 123-4567" },
                { "list_name": "Email", "list_content": "hello@example.com" },
                { "list_name": "Open Hours", "list_content": "9am - 6pm" },
                { "list_name": "Fax", "list_content": "" }
            ]
        }))));
        let contacts = &chrome.contacts;
        assert_eq!(contacts.len(), 5);
        assert_eq!(contacts[0].kind, ContactKind::Address);
        assert!(contacts[0].href.is_none());
        assert_eq!(contacts[1].href.as_deref(), Some("tel:+94771234567"));
        assert_eq!(contacts[2].href.as_deref(), Some("https://wa.me/94771234567"));
        assert_eq!(contacts[3].href.as_deref(), Some("mailto:hello@example.com"));
        assert_eq!(contacts[4].kind, ContactKind::Hours);
    }

    #[test]
    fn test_contact_phone_before_whatsapp() {
        assert_eq!(ContactKind::classify("Phone / WhatsApp"), ContactKind::Phone);
        assert_eq!(ContactKind::classify("WHATSAPP"), ContactKind::Whatsapp);
    }
}

//! CMS URL to site route mapping.
//!
//! Navigation is authored in the CMS as absolute URLs on the CMS's own
//! public site. [`RouteMapper`] strips that origin and applies a static
//! rewrite table so content-managed links land on this site's routes.

use folio_core::ConfigProvider;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::MenuLink;

/// Placeholder href used when a link target is absent.
pub const PLACEHOLDER_HREF: &str = "#";

/// Default browsing context for navigation links.
pub const DEFAULT_TARGET: &str = "_self";

/// Maps CMS-authored URLs onto site-relative routes.
///
/// # Example
///
/// ```
/// use folio_content::RouteMapper;
///
/// let routes = RouteMapper::new()
///     .with_cms_host("https://cms.example.com")
///     .with_rewrite("/service", "/services");
///
/// assert_eq!(routes.map_external_url(Some("https://cms.example.com/service/weddings/")), "/services/weddings");
/// assert_eq!(routes.map_external_url(Some("https://other.com/x")), "https://other.com/x");
/// assert_eq!(routes.map_external_url(None), "#");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMapper {
    cms_hosts: Vec<String>,
    rewrites: Vec<(String, String)>,
}

impl RouteMapper {
    /// Create a mapper that recognizes no CMS host and rewrites nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapper from configuration.
    ///
    /// The API base URL's host is always treated as a CMS host; a missing
    /// API URL only means fewer hosts are recognized.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        let mut mapper = Self::new();
        if let Ok(api) = config.api_base_url() {
            mapper = mapper.with_cms_host(&api);
        }
        for host in config.cms_hosts() {
            mapper = mapper.with_cms_host(&host);
        }
        for (from, to) in config.route_rewrites() {
            mapper = mapper.with_rewrite(from, to);
        }
        mapper
    }

    /// Recognize `host` (a bare host or a full URL) as the CMS's own site.
    pub fn with_cms_host(mut self, host: &str) -> Self {
        if let Some(host) = normalize_host(host)
            && !self.cms_hosts.contains(&host)
        {
            self.cms_hosts.push(host);
        }
        self
    }

    /// Append a path rewrite. Rewrites match whole leading path segments
    /// and are tried in insertion order.
    pub fn with_rewrite(mut self, cms_path: impl AsRef<str>, site_path: impl AsRef<str>) -> Self {
        let from = normalize_route(cms_path.as_ref());
        let to = normalize_route(site_path.as_ref());
        if from != "/" {
            self.rewrites.push((from, to));
        }
        self
    }

    /// Hosts currently recognized as the CMS.
    pub fn cms_hosts(&self) -> &[String] {
        &self.cms_hosts
    }

    /// Whether `host` is one of the CMS hosts.
    pub fn is_cms_host(&self, host: &str) -> bool {
        normalize_host(host).is_some_and(|h| self.cms_hosts.contains(&h))
    }

    /// Translate a CMS-authored URL into a site href.
    ///
    /// - absent or blank input yields [`PLACEHOLDER_HREF`]
    /// - root-relative paths, fragments and non-HTTP schemes pass through
    /// - third-party origins pass through
    /// - CMS URLs become root-relative paths with rewrites applied
    pub fn map_external_url(&self, url: Option<&str>) -> String {
        let Some(raw) = url else {
            return PLACEHOLDER_HREF.to_string();
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return PLACEHOLDER_HREF.to_string();
        }

        let parsed = if let Some(rest) = trimmed.strip_prefix("//") {
            Url::parse(&format!("https://{rest}"))
        } else if trimmed.starts_with(['/', '#', '?']) {
            return trimmed.to_string();
        } else {
            Url::parse(trimmed)
        };

        let Ok(parsed) = parsed else {
            return trimmed.to_string();
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            return trimmed.to_string();
        }
        match parsed.host_str() {
            Some(host) if self.is_cms_host(host) => self.site_path(&parsed),
            _ => trimmed.to_string(),
        }
    }

    /// Apply the rewrite table to a root-relative path.
    pub fn map_path(&self, path: &str) -> String {
        let path = normalize_route(path);
        for (from, to) in &self.rewrites {
            if let Some(rest) = path.strip_prefix(from.as_str())
                && (rest.is_empty() || rest.starts_with('/'))
            {
                let joined = if to == "/" && !rest.is_empty() {
                    rest.to_string()
                } else {
                    format!("{to}{rest}")
                };
                return joined;
            }
        }
        path
    }

    /// Resolve a CMS menu entry into a navigation link.
    pub fn resolve(&self, link: &MenuLink) -> NavLink {
        let href = self.map_external_url(link.target_url.as_deref());
        let external = is_absolute(&href);
        NavLink {
            label: link.label.clone(),
            href,
            target: link
                .target
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(DEFAULT_TARGET)
                .to_string(),
            external,
        }
    }

    fn site_path(&self, url: &Url) -> String {
        let mut href = self.map_path(url.path());
        if let Some(query) = url.query() {
            href.push('?');
            href.push_str(query);
        }
        if let Some(fragment) = url.fragment() {
            href.push('#');
            href.push_str(fragment);
        }
        href
    }
}

/// A navigation entry ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    /// Visible label.
    pub label: String,
    /// Site-relative path, third-party URL, or [`PLACEHOLDER_HREF`].
    pub href: String,
    /// Browsing context, `_self` unless the CMS said otherwise.
    pub target: String,
    /// Whether the href leaves this site.
    pub external: bool,
}

impl NavLink {
    /// Whether this link points at `current_path`.
    ///
    /// The placeholder counts as the home page.
    pub fn is_active(&self, current_path: &str) -> bool {
        self.href == current_path || (self.href == PLACEHOLDER_HREF && current_path == "/")
    }
}

fn is_absolute(href: &str) -> bool {
    href.starts_with("//") || Url::parse(href).is_ok_and(|u| u.has_host())
}

/// Lower-case host without `www.` or port, from a host or a URL.
fn normalize_host(input: &str) -> Option<String> {
    let input = input.trim();
    let host = if input.contains("://") {
        Url::parse(input).ok()?.host_str()?.to_string()
    } else {
        input
            .split(['/', ':'])
            .next()
            .unwrap_or_default()
            .to_string()
    };
    let host = host.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    (!host.is_empty()).then(|| host.to_string())
}

/// Leading slash, no trailing slash (except the root itself).
fn normalize_route(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    format!("/{trimmed}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use folio_core::{Error, Result};

    fn mapper() -> RouteMapper {
        RouteMapper::new()
            .with_cms_host("https://cms.example.com/wp-json")
            .with_rewrite("services", "services")
            .with_rewrite("/service/", "/services")
            .with_rewrite("/blog", "/posts")
    }

    // ------------------------------------------------------------------------
    // map_external_url
    // ------------------------------------------------------------------------

    #[test]
    fn test_cms_url_becomes_path() {
        let routes = mapper();
        assert_eq!(
            routes.map_external_url(Some("https://cms.example.com/services")),
            "/services"
        );
    }

    #[test]
    fn test_third_party_unchanged() {
        assert_eq!(
            mapper().map_external_url(Some("https://other.com/x")),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_absent_is_placeholder() {
        let routes = mapper();
        assert_eq!(routes.map_external_url(None), PLACEHOLDER_HREF);
        assert_eq!(routes.map_external_url(Some("   ")), PLACEHOLDER_HREF);
    }

    #[test]
    fn test_root_relative_unchanged() {
        let routes = mapper();
        assert_eq!(routes.map_external_url(Some("/blog/hello")), "/blog/hello");
        assert_eq!(routes.map_external_url(Some("#contact")), "#contact");
        assert_eq!(routes.map_external_url(Some("?page=2")), "?page=2");
    }

    #[test]
    fn test_rewrite_segment_prefix() {
        let routes = mapper();
        assert_eq!(
            routes.map_external_url(Some("https://cms.example.com/service/weddings/")),
            "/services/weddings"
        );
        assert_eq!(
            routes.map_external_url(Some("https://cms.example.com/blog/hello-world")),
            "/posts/hello-world"
        );
        // "/blogging" shares a prefix but not a segment.
        assert_eq!(
            routes.map_external_url(Some("https://cms.example.com/blogging")),
            "/blogging"
        );
    }

    #[test]
    fn test_first_rewrite_wins() {
        let routes = RouteMapper::new()
            .with_cms_host("cms.example.com")
            .with_rewrite("/a", "/first")
            .with_rewrite("/a", "/second");
        assert_eq!(
            routes.map_external_url(Some("https://cms.example.com/a/b")),
            "/first/b"
        );
    }

    #[test]
    fn test_rewrite_to_root() {
        let routes = RouteMapper::new()
            .with_cms_host("cms.example.com")
            .with_rewrite("/home", "/");
        assert_eq!(routes.map_external_url(Some("https://cms.example.com/home/")), "/");
        assert_eq!(
            routes.map_external_url(Some("https://cms.example.com/home/about")),
            "/about"
        );
    }

    #[test]
    fn test_cms_root_and_query() {
        let routes = mapper();
        assert_eq!(routes.map_external_url(Some("https://cms.example.com")), "/");
        assert_eq!(routes.map_external_url(Some("https://cms.example.com/")), "/");
        assert_eq!(
            routes.map_external_url(Some("https://www.cms.example.com/contact-us/?ref=nav#form")),
            "/contact-us?ref=nav#form"
        );
    }

    #[test]
    fn test_host_matching_ignores_port_case_and_scheme() {
        let routes = mapper();
        assert_eq!(
            routes.map_external_url(Some("http://CMS.example.com:8080/about")),
            "/about"
        );
        assert_eq!(
            routes.map_external_url(Some("//cms.example.com/about")),
            "/about"
        );
    }

    #[test]
    fn test_non_http_schemes_unchanged() {
        let routes = mapper();
        assert_eq!(
            routes.map_external_url(Some("mailto:hello@example.com")),
            "mailto:hello@example.com"
        );
        assert_eq!(routes.map_external_url(Some("tel:+94771234567")), "tel:+94771234567");
    }

    #[test]
    fn test_unparseable_relative_unchanged() {
        assert_eq!(mapper().map_external_url(Some("about-us")), "about-us");
    }

    #[test]
    fn test_never_empty_for_non_empty_input() {
        let routes = mapper();
        for input in ["x", "https://cms.example.com", "/", "#", "https://other.com"] {
            assert!(!routes.map_external_url(Some(input)).is_empty(), "{input}");
        }
    }

    // ------------------------------------------------------------------------
    // resolve
    // ------------------------------------------------------------------------

    #[test]
    fn test_resolve_menu_link() {
        let routes = mapper();
        let nav = routes.resolve(&MenuLink {
            label: "Blog".into(),
            target_url: Some("https://cms.example.com/blog/".into()),
            target: None,
        });
        assert_eq!(nav.href, "/posts");
        assert_eq!(nav.target, DEFAULT_TARGET);
        assert!(!nav.external);
        assert!(nav.is_active("/posts"));

        let external = routes.resolve(&MenuLink {
            label: "Insta".into(),
            target_url: Some("https://instagram.com/studio".into()),
            target: Some("_blank".into()),
        });
        assert!(external.external);
        assert_eq!(external.target, "_blank");
    }

    #[test]
    fn test_placeholder_is_active_on_home() {
        let nav = mapper().resolve(&MenuLink {
            label: "Home".into(),
            target_url: None,
            target: Some(String::new()),
        });
        assert_eq!(nav.href, PLACEHOLDER_HREF);
        assert_eq!(nav.target, DEFAULT_TARGET);
        assert!(nav.is_active("/"));
        assert!(!nav.is_active("/posts"));
    }

    // ------------------------------------------------------------------------
    // from_config
    // ------------------------------------------------------------------------

    #[derive(Clone)]
    struct Config {
        api: Option<String>,
    }

    impl ConfigProvider for Config {
        fn project_name(&self) -> &str {
            "routes-test"
        }

        fn api_base_url(&self) -> Result<String> {
            self.api.clone().ok_or_else(|| Error::config("missing"))
        }

        fn site_url(&self) -> Result<String> {
            Ok("https://site.example.com".into())
        }

        fn cms_hosts(&self) -> Vec<String> {
            vec!["www.studio-cms.example.org".into()]
        }

        fn route_rewrites(&self) -> Vec<(String, String)> {
            vec![("/our-services".into(), "/services".into())]
        }
    }

    #[test]
    fn test_from_config() {
        let routes = RouteMapper::from_config(&Config {
            api: Some("https://api.example.com/wp-json".into()),
        });
        assert_eq!(routes.cms_hosts(), ["api.example.com", "studio-cms.example.org"]);
        assert_eq!(
            routes.map_external_url(Some("https://studio-cms.example.org/our-services/x")),
            "/services/x"
        );
    }

    #[test]
    fn test_from_config_without_api() {
        let routes = RouteMapper::from_config(&Config { api: None });
        assert_eq!(routes.cms_hosts(), ["studio-cms.example.org"]);
    }
}

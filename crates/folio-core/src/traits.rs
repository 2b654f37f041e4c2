//! Core traits for Folio extension points.
//!
//! [`ConfigProvider`] is the explicit configuration value handed to the
//! content client at construction time, so nothing in the fetch layer reads
//! process-global state. [`FetchObserver`] receives the fetch layer's
//! diagnostic events instead of the layer writing to a fixed sink.

use std::time::Duration;

use crate::{Error, Result};

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default page size for listing calls.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Trait for site configuration.
///
/// Every Folio front end implements this trait to describe where the CMS
/// lives and how its URLs relate to the site's own routes.
///
/// # Bounds
///
/// - `Send + Sync`: Configuration must be shareable across threads
/// - `Clone`: Configuration can be duplicated for passing to subsystems
/// - `'static`: Configuration lifetime is not borrowed
///
/// # Example
///
/// ```
/// use folio_core::traits::ConfigProvider;
/// use folio_core::{Error, Result};
///
/// #[derive(Clone)]
/// struct StudioConfig {
///     api: Option<String>,
/// }
///
/// impl ConfigProvider for StudioConfig {
///     fn project_name(&self) -> &str {
///         "studio"
///     }
///
///     fn api_base_url(&self) -> Result<String> {
///         self.api.clone().ok_or_else(|| Error::config("api base URL not set"))
///     }
///
///     fn site_url(&self) -> Result<String> {
///         Ok("https://studio.example.com".into())
///     }
/// }
///
/// let config = StudioConfig { api: None };
/// assert!(config.api_base_url().is_err());
/// assert_eq!(config.page_size(), 100);
/// ```
pub trait ConfigProvider: Send + Sync + Clone + 'static {
    /// The project name, used for env var prefixes and default paths.
    fn project_name(&self) -> &str;

    /// Base URL of the CMS REST API (e.g. `https://cms.example.com/wp-json`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the URL is not configured. Callers
    /// degrade listings to empty results rather than aborting.
    fn api_base_url(&self) -> Result<String>;

    /// Public base URL of the site itself, used for sitemap generation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the URL is not configured.
    fn site_url(&self) -> Result<String>;

    /// Upper bound on a single backend request.
    fn request_timeout(&self) -> Duration {
        DEFAULT_REQUEST_TIMEOUT
    }

    /// Items requested per page when the caller does not say.
    fn page_size(&self) -> u32 {
        DEFAULT_PAGE_SIZE
    }

    /// Hosts that serve the CMS's own public pages.
    ///
    /// Absolute links to these hosts are rewritten to site-relative paths.
    /// The host of [`api_base_url`](Self::api_base_url) is always included
    /// by the route mapper, so this only needs to list additional hosts.
    fn cms_hosts(&self) -> Vec<String> {
        Vec::new()
    }

    /// Ordered `(cms_path, site_path)` rewrites, applied first match wins.
    fn route_rewrites(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Media hosts the image optimizer cannot reach (local development CMS).
    fn media_hosts_unoptimized(&self) -> Vec<String> {
        Vec::new()
    }

    /// Override for a named endpoint (`"services"`, `"footer"`, ...).
    ///
    /// `None` keeps the built-in default path.
    fn endpoint_override(&self, _key: &str) -> Option<String> {
        None
    }

    /// Endpoint for contact form submissions, relative to the API base URL.
    fn form_endpoint(&self) -> Option<String> {
        None
    }
}

/// Observability hooks for the fetch layer.
///
/// All methods default to no-ops. Implementations must be cheap: they run
/// inline on the request path.
pub trait FetchObserver: Send + Sync {
    /// A backend request is about to be issued.
    fn request_started(&self, _endpoint: &str, _page: u32) {}

    /// A listing call failed and was degraded to an empty sequence.
    fn listing_degraded(&self, _endpoint: &str, _error: &Error) {}

    /// A single-item lookup produced no match.
    fn lookup_missed(&self, _endpoint: &str, _slug: &str, _reason: &str) {}

    /// A form submission was refused by the backend or by validation.
    fn form_rejected(&self, _error: &Error) {}
}

/// Observer that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl FetchObserver for NoopObserver {}

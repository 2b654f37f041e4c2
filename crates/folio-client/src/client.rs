//! Content client: listings, lookups and page fan-out.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use folio_content::site::{ChromeFields, HeroFields, SameDayFields};
use folio_content::{
    AlbumView, ContentItem, EntityKind, FieldSet, HeroView, NormalizedView, Normalizer,
    SameDayView, SiteChrome, album_slug, find_by_segment,
};
use folio_core::traits::DEFAULT_PAGE_SIZE;
use folio_core::{ConfigProvider, Error, FetchObserver, NotFound, Result};

use crate::form::ContactForm;
use crate::observe::TracingObserver;
use crate::sitemap::{self, SitemapEntry};
use crate::source::{ContentSource, HttpSource, PageRequest, SubmissionResponse};

/// Largest page the backend serves.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Endpoint keys for the site-chrome singletons and the form.
pub mod endpoint_keys {
    /// Header singleton.
    pub const HEADER: &str = "header";
    /// Footer singleton.
    pub const FOOTER: &str = "footer";
    /// Hero singleton.
    pub const HERO: &str = "hero";
    /// Same-day service singleton.
    pub const SAME_DAY: &str = "same-day-service";
    /// Contact form submission.
    pub const FORM: &str = "form";
}

/// Default endpoint for contact form submissions.
pub const DEFAULT_FORM_ENDPOINT: &str = "contact/v1/submit";

// ============================================================================
// Options and results
// ============================================================================

/// Options for a listing call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// First page to request (1-based). Defaults to 1.
    pub page: Option<u32>,
    /// Items per request. Defaults to the configured page size; clamped to
    /// `1..=100`.
    pub per_page: Option<u32>,
    /// Keep requesting pages until a short page.
    pub fetch_all: bool,
    /// Request embedded resources. Defaults per entity kind.
    pub embed: Option<bool>,
}

impl ListOptions {
    /// Single page with default size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every page.
    pub fn all() -> Self {
        Self {
            fetch_all: true,
            ..Self::default()
        }
    }

    /// Start at `page`.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Request `per_page` items at a time.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Override embedding.
    pub fn with_embed(mut self, embed: bool) -> Self {
        self.embed = Some(embed);
        self
    }
}

/// A service together with one of its albums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumPage {
    /// The parent service.
    pub service: NormalizedView,
    /// The addressed album.
    pub album: AlbumView,
}

/// Everything the home page renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomePage {
    /// Hero section.
    pub hero: HeroView,
    /// Services grid.
    pub services: Vec<NormalizedView>,
    /// Same-day service section.
    pub same_day: SameDayView,
    /// Additional services.
    pub additional_services: Vec<NormalizedView>,
    /// Testimonials.
    pub testimonials: Vec<NormalizedView>,
}

/// Header and footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Header chrome.
    pub header: SiteChrome,
    /// Footer chrome.
    pub footer: SiteChrome,
}

// ============================================================================
// ContentClient
// ============================================================================

/// Typed access to CMS content.
///
/// Listings never fail: transport, decode and configuration errors are
/// reported to the [`FetchObserver`] and yield an empty sequence. Lookups
/// return [`NotFound`] for every kind of miss. Each call is independent;
/// the client holds no mutable state, so futures may be dropped at any
/// await point.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use folio_client::{ContentClient, ListOptions, MockSource};
/// use folio_content::EntityKind;
///
/// # async fn demo() {
/// let client = ContentClient::new(Arc::new(MockSource::new()));
/// let services = client.views(EntityKind::Service, &ListOptions::all()).await;
/// assert!(services.is_empty());
/// # }
/// ```
#[derive(Clone)]
pub struct ContentClient {
    source: Arc<dyn ContentSource>,
    observer: Arc<dyn FetchObserver>,
    normalizer: Normalizer,
    endpoints: HashMap<String, String>,
    page_size: u32,
}

impl ContentClient {
    /// Creates a client over `source` with default endpoints and a tracing
    /// observer.
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            source,
            observer: Arc::new(TracingObserver),
            normalizer: Normalizer::default(),
            endpoints: HashMap::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Creates an HTTP-backed client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] only if the HTTP client cannot be built.
    /// A missing API base URL yields a client whose listings are empty.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let source = HttpSource::from_config(config)?;
        let mut client = Self::new(Arc::new(source))
            .with_normalizer(Normalizer::from_config(config))
            .with_page_size(config.page_size());

        let keys = EntityKind::ALL
            .iter()
            .map(|kind| kind.endpoint_key())
            .chain([
                endpoint_keys::HEADER,
                endpoint_keys::FOOTER,
                endpoint_keys::HERO,
                endpoint_keys::SAME_DAY,
            ]);
        for key in keys {
            if let Some(path) = config.endpoint_override(key) {
                client = client.with_endpoint(key, path);
            }
        }
        if let Some(path) = config.form_endpoint() {
            client = client.with_endpoint(endpoint_keys::FORM, path);
        }
        Ok(client)
    }

    /// Sets the observer.
    pub fn with_observer(mut self, observer: Arc<dyn FetchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Sets the normalizer.
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Overrides the endpoint for `key` (an entity endpoint key or one of
    /// [`endpoint_keys`]).
    pub fn with_endpoint(mut self, key: impl Into<String>, path: impl Into<String>) -> Self {
        self.endpoints.insert(key.into(), path.into());
        self
    }

    /// Sets the default page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// The normalizer in use.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Endpoint path for `key`.
    pub fn endpoint(&self, key: &str) -> String {
        if let Some(path) = self.endpoints.get(key) {
            return path.clone();
        }
        match key {
            endpoint_keys::FORM => DEFAULT_FORM_ENDPOINT.to_string(),
            other => format!("wp/v2/{other}"),
        }
    }

    /// Endpoint path for an entity kind.
    pub fn endpoint_for(&self, kind: EntityKind) -> String {
        self.endpoint(kind.endpoint_key())
    }

    // ------------------------------------------------------------------------
    // Generic fetches
    // ------------------------------------------------------------------------

    /// Fetch a listing from `endpoint`.
    ///
    /// With `fetch_all` set, pages are requested one after another until a
    /// page comes back with fewer than `per_page` items (or the backend's
    /// reported page count is reached). Any failure yields an empty vector.
    pub async fn fetch_list<F: FieldSet>(
        &self,
        endpoint: &str,
        options: &ListOptions,
    ) -> Vec<ContentItem<F>> {
        match self.try_fetch_list(endpoint, options).await {
            Ok(items) => items,
            Err(e) => {
                self.observer.listing_degraded(endpoint, &e);
                Vec::new()
            }
        }
    }

    async fn try_fetch_list<F: FieldSet>(
        &self,
        endpoint: &str,
        options: &ListOptions,
    ) -> Result<Vec<ContentItem<F>>> {
        let per_page = options
            .per_page
            .unwrap_or(self.page_size)
            .clamp(1, MAX_PAGE_SIZE);
        let mut page = options.page.unwrap_or(1).max(1);
        let mut items = Vec::new();

        loop {
            let request =
                PageRequest::new(endpoint, page, per_page).with_embed(options.embed.unwrap_or(false));
            self.observer.request_started(endpoint, page);
            let response = self.source.fetch_page(&request).await?;

            let received = response.items.len();
            for raw in response.items {
                items.push(decode_item(endpoint, raw)?);
            }

            if !options.fetch_all || received < per_page as usize {
                break;
            }
            if response.total_pages.is_some_and(|total| page >= total) {
                break;
            }
            page += 1;
        }

        tracing::debug!(endpoint, count = items.len(), pages = page, "listing fetched");
        Ok(items)
    }

    /// Fetch the entity with `slug` from `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] when nothing matches or the request fails.
    pub async fn fetch_one<F: FieldSet>(
        &self,
        endpoint: &str,
        slug: &str,
        embed: bool,
    ) -> std::result::Result<ContentItem<F>, NotFound> {
        match self.try_fetch_one(endpoint, slug, embed).await {
            Ok(Some(item)) => Ok(item),
            Ok(None) => {
                self.observer.lookup_missed(endpoint, slug, "no match");
                Err(NotFound::new(endpoint, slug))
            }
            Err(e) => {
                self.observer.lookup_missed(endpoint, slug, &e.to_string());
                Err(NotFound::new(endpoint, slug))
            }
        }
    }

    async fn try_fetch_one<F: FieldSet>(
        &self,
        endpoint: &str,
        slug: &str,
        embed: bool,
    ) -> Result<Option<ContentItem<F>>> {
        if slug.trim().is_empty() {
            return Ok(None);
        }
        let request = PageRequest::new(endpoint, 1, 1)
            .with_slug(slug)
            .with_embed(embed);
        self.observer.request_started(endpoint, 1);
        let response = self.source.fetch_page(&request).await?;
        response
            .items
            .into_iter()
            .next()
            .map(|raw| decode_item(endpoint, raw))
            .transpose()
    }

    // ------------------------------------------------------------------------
    // Typed fetches
    // ------------------------------------------------------------------------

    /// Raw items of `kind`.
    pub async fn list(&self, kind: EntityKind, options: &ListOptions) -> Vec<ContentItem> {
        let options = ListOptions {
            embed: Some(options.embed.unwrap_or(kind.embeds())),
            ..options.clone()
        };
        self.fetch_list(&self.endpoint_for(kind), &options).await
    }

    /// Normalized items of `kind`.
    pub async fn views(&self, kind: EntityKind, options: &ListOptions) -> Vec<NormalizedView> {
        self.list(kind, options)
            .await
            .iter()
            .map(|item| self.normalizer.normalize(item, kind))
            .collect()
    }

    /// Raw item of `kind` with `slug`.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] when the entity is absent or the lookup fails.
    pub async fn get(
        &self,
        kind: EntityKind,
        slug: &str,
    ) -> std::result::Result<ContentItem, NotFound> {
        self.fetch_one(&self.endpoint_for(kind), slug, kind.embeds())
            .await
    }

    /// Normalized item of `kind` with `slug`.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] when the entity is absent or the lookup fails.
    pub async fn view(
        &self,
        kind: EntityKind,
        slug: &str,
    ) -> std::result::Result<NormalizedView, NotFound> {
        let item = self.get(kind, slug).await?;
        Ok(self.normalizer.normalize(&item, kind))
    }

    /// The album addressed by `segment` inside the service `service_slug`.
    ///
    /// `segment` may be the derived album slug, its percent-encoded form,
    /// or the percent-encoded album name. When two albums derive the same
    /// slug the first one listed wins.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] when the service is missing or no album matches.
    pub async fn album(
        &self,
        service_slug: &str,
        segment: &str,
    ) -> std::result::Result<AlbumPage, NotFound> {
        let item = self.get(EntityKind::Service, service_slug).await?;
        let service = self.normalizer.normalize(&item, EntityKind::Service);

        let found = find_by_segment(&item.custom_fields.albums, segment, |index, album| {
            album_slug(&album.name, index)
        });
        let Some((index, _)) = found else {
            let endpoint = format!("{}/{service_slug}/albums", self.endpoint_for(EntityKind::Service));
            self.observer.lookup_missed(&endpoint, segment, "no album matches");
            return Err(NotFound::new(endpoint, segment));
        };

        let album = service.albums[index].clone();
        Ok(AlbumPage { service, album })
    }

    // ------------------------------------------------------------------------
    // Site chrome and pages
    // ------------------------------------------------------------------------

    async fn singleton<F: FieldSet>(&self, key: &str) -> Option<ContentItem<F>> {
        let options = ListOptions::new().with_per_page(1);
        self.fetch_list(&self.endpoint(key), &options)
            .await
            .into_iter()
            .next()
    }

    /// Hero section; defaults when the CMS has none.
    pub async fn hero(&self) -> HeroView {
        let item = self.singleton::<HeroFields>(endpoint_keys::HERO).await;
        self.normalizer.hero(item.as_ref())
    }

    /// Same-day service section; defaults when the CMS has none.
    pub async fn same_day(&self) -> SameDayView {
        let item = self.singleton::<SameDayFields>(endpoint_keys::SAME_DAY).await;
        self.normalizer.same_day(item.as_ref())
    }

    /// Header chrome; empty when the CMS has none.
    pub async fn header(&self) -> SiteChrome {
        let item = self.singleton::<ChromeFields>(endpoint_keys::HEADER).await;
        self.normalizer.chrome(item.as_ref())
    }

    /// Footer chrome; empty when the CMS has none.
    pub async fn footer(&self) -> SiteChrome {
        let item = self.singleton::<ChromeFields>(endpoint_keys::FOOTER).await;
        self.normalizer.chrome(item.as_ref())
    }

    /// Home page content, fetched concurrently.
    pub async fn home_page(&self) -> HomePage {
        let all = ListOptions::all();
        let (hero, services, same_day, additional_services, testimonials) = tokio::join!(
            self.hero(),
            self.views(EntityKind::Service, &all),
            self.same_day(),
            self.views(EntityKind::AdditionalService, &all),
            self.views(EntityKind::Testimonial, &all),
        );
        HomePage {
            hero,
            services,
            same_day,
            additional_services,
            testimonials,
        }
    }

    /// Header and footer, fetched concurrently.
    pub async fn layout(&self) -> Layout {
        let (header, footer) = tokio::join!(self.header(), self.footer());
        Layout { header, footer }
    }

    /// Sitemap entries: static routes, then services, posts and
    /// additional services. A failed listing contributes nothing.
    pub async fn sitemap_entries(&self) -> Vec<SitemapEntry> {
        let all = ListOptions::all();
        let post_options = ListOptions::new().with_per_page(MAX_PAGE_SIZE).with_embed(false);
        let (services, posts, additional) = tokio::join!(
            self.list(EntityKind::Service, &all),
            self.list(EntityKind::Post, &post_options),
            self.list(EntityKind::AdditionalService, &all),
        );

        let mut entries = sitemap::static_entries();
        entries.extend(sitemap::content_entries(&services, EntityKind::Service, 0.8));
        entries.extend(sitemap::content_entries(&posts, EntityKind::Post, 0.7));
        entries.extend(sitemap::content_entries(
            &additional,
            EntityKind::AdditionalService,
            0.7,
        ));
        entries
    }

    /// Sitemap XML for the site at `site_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a blank site URL and
    /// [`Error::Serialization`] if rendering fails.
    pub async fn sitemap(&self, site_url: &str) -> Result<String> {
        let entries = self.sitemap_entries().await;
        sitemap::render(site_url, &entries, Utc::now())
    }

    // ------------------------------------------------------------------------
    // Form
    // ------------------------------------------------------------------------

    /// Validate and submit a contact form. At most one request is sent.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] when input is invalid; nothing is sent
    /// - [`Error::BackendRejection`] with the backend's message on a non-2xx
    ///   response or `success = false`
    /// - [`Error::Transport`] / [`Error::Config`] when the request fails
    pub async fn submit_contact(&self, form: &ContactForm) -> Result<SubmissionResponse> {
        let result = self.try_submit(form).await;
        if let Err(e) = &result {
            self.observer.form_rejected(e);
        }
        result
    }

    async fn try_submit(&self, form: &ContactForm) -> Result<SubmissionResponse> {
        form.validate()?;
        let endpoint = self.endpoint(endpoint_keys::FORM);
        let reply = self.source.submit_form(&endpoint, form).await?;
        if !reply.success {
            let message = if reply.message.trim().is_empty() {
                "submission was not accepted".to_string()
            } else {
                reply.message
            };
            return Err(Error::backend_rejection(message));
        }
        Ok(reply)
    }
}

fn decode_item<F: FieldSet>(endpoint: &str, raw: serde_json::Value) -> Result<ContentItem<F>> {
    serde_json::from_value(raw).map_err(|e| Error::decode(format!("{endpoint}: {e}")))
}

//! Backend source abstraction and implementations.

mod http;
mod mock;

pub use http::HttpSource;
pub use mock::MockSource;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::form::ContactForm;
use folio_core::Result;

/// Abstraction over the CMS REST backend.
///
/// A source performs exactly one attempt per call. Pagination, soft
/// failure and normalization live in [`ContentClient`](crate::ContentClient).
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch one page of a collection.
    ///
    /// An out-of-range page is an empty page, not an error.
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page>;

    /// Post a contact form to `endpoint`.
    ///
    /// Non-2xx responses are returned as [`Error::BackendRejection`]
    /// carrying the backend's message.
    ///
    /// [`Error::BackendRejection`]: folio_core::Error::BackendRejection
    async fn submit_form(&self, endpoint: &str, form: &ContactForm) -> Result<SubmissionResponse>;
}

/// A single page request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Endpoint path relative to the API base URL.
    pub endpoint: String,
    /// 1-based page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Restrict to the entity with this slug.
    pub slug: Option<String>,
    /// Ask the backend to embed linked resources.
    pub embed: bool,
}

impl PageRequest {
    /// Request page `page` of `endpoint`.
    pub fn new(endpoint: impl Into<String>, page: u32, per_page: u32) -> Self {
        Self {
            endpoint: endpoint.into(),
            page,
            per_page,
            slug: None,
            embed: false,
        }
    }

    /// Filter by slug.
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Request embedded resources.
    pub fn with_embed(mut self, embed: bool) -> Self {
        self.embed = embed;
        self
    }
}

/// One page of raw entity objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Entity objects in server order.
    pub items: Vec<Value>,
    /// Total page count, when the backend reported one.
    pub total_pages: Option<u32>,
}

impl Page {
    /// Create a page.
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            items,
            total_pages: None,
        }
    }

    /// Attach the backend's total page count.
    pub fn with_total_pages(mut self, total: u32) -> Self {
        self.total_pages = Some(total);
        self
    }
}

/// Body of a form submission response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    /// Whether the backend accepted the submission.
    #[serde(default)]
    pub success: bool,
    /// Backend message for the submitter.
    #[serde(default)]
    pub message: String,
}

impl SubmissionResponse {
    /// An accepted submission.
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// A refused submission.
    pub fn refused(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

//! In-process fake backend for testing.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use super::{ContentSource, Page, PageRequest, SubmissionResponse};
use crate::form::ContactForm;
use folio_core::{Error, Result};

/// Fake CMS that serves canned collections.
///
/// Collections are paginated by the request's `per_page`; pages past the
/// end are empty, as the real backend's "invalid page" reply is. Clones
/// share the request log, so a test can keep one handle and give another
/// to the client.
///
/// # Examples
///
/// ```
/// use folio_client::MockSource;
/// use serde_json::json;
///
/// let source = MockSource::new()
///     .with_items("wp/v2/posts", vec![json!({ "id": 1, "slug": "hello" })]);
/// ```
#[derive(Clone, Default)]
pub struct MockSource {
    collections: HashMap<String, Vec<Value>>,
    failing: HashSet<String>,
    report_total_pages: bool,
    delay: Option<Duration>,
    form_reply: Option<FormReply>,
    log: Arc<Mutex<MockLog>>,
}

#[derive(Clone)]
enum FormReply {
    Reply(SubmissionResponse),
    Reject(String),
}

#[derive(Default)]
struct MockLog {
    requests: Vec<PageRequest>,
    submissions: Vec<(String, ContactForm)>,
}

impl MockSource {
    /// Creates an empty fake; every collection is empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `items` from `endpoint`.
    pub fn with_items(mut self, endpoint: impl Into<String>, items: Vec<Value>) -> Self {
        self.collections.insert(endpoint.into(), items);
        self
    }

    /// Fail every request to `endpoint` with a transport error.
    pub fn with_failure(mut self, endpoint: impl Into<String>) -> Self {
        self.failing.insert(endpoint.into());
        self
    }

    /// Report the total page count the way the real backend's header does.
    pub fn with_total_pages(mut self) -> Self {
        self.report_total_pages = true;
        self
    }

    /// Delay every response.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Reply to form submissions with `reply`.
    pub fn with_form_reply(mut self, reply: SubmissionResponse) -> Self {
        self.form_reply = Some(FormReply::Reply(reply));
        self
    }

    /// Reject form submissions as a non-2xx response carrying `message`.
    pub fn with_form_rejection(mut self, message: impl Into<String>) -> Self {
        self.form_reply = Some(FormReply::Reject(message.into()));
        self
    }

    /// Every page request received so far, in order.
    pub async fn requests(&self) -> Vec<PageRequest> {
        self.log.lock().await.requests.clone()
    }

    /// Number of page requests made to `endpoint`.
    pub async fn request_count(&self, endpoint: &str) -> usize {
        self.log
            .lock()
            .await
            .requests
            .iter()
            .filter(|r| r.endpoint == endpoint)
            .count()
    }

    /// Every form submission received so far, with its endpoint.
    pub async fn submissions(&self) -> Vec<(String, ContactForm)> {
        self.log.lock().await.submissions.clone()
    }
}

#[async_trait]
impl ContentSource for MockSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page> {
        self.log.lock().await.requests.push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(&request.endpoint) {
            return Err(Error::transport(format!(
                "{}: connection refused",
                request.endpoint
            )));
        }

        let items: Vec<&Value> = self
            .collections
            .get(&request.endpoint)
            .map(|items| {
                items
                    .iter()
                    .filter(|item| match &request.slug {
                        Some(slug) => item["slug"].as_str() == Some(slug.as_str()),
                        None => true,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let per_page = request.per_page.max(1) as usize;
        let start = (request.page.max(1) as usize - 1).saturating_mul(per_page);
        let page_items: Vec<Value> = items
            .iter()
            .skip(start)
            .take(per_page)
            .map(|v| (*v).clone())
            .collect();

        let mut page = Page::new(page_items);
        if self.report_total_pages {
            let total = items.len().div_ceil(per_page);
            page = page.with_total_pages(u32::try_from(total).unwrap_or(u32::MAX));
        }
        Ok(page)
    }

    async fn submit_form(&self, endpoint: &str, form: &ContactForm) -> Result<SubmissionResponse> {
        self.log
            .lock()
            .await
            .submissions
            .push((endpoint.to_string(), form.clone()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.form_reply {
            Some(FormReply::Reply(reply)) => Ok(reply.clone()),
            Some(FormReply::Reject(message)) => Err(Error::backend_rejection(message.clone())),
            None => Ok(SubmissionResponse::accepted("Thank you! We'll get back to you soon.")),
        }
    }
}

//! reqwest-backed CMS source.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use super::{ContentSource, Page, PageRequest, SubmissionResponse};
use crate::form::ContactForm;
use folio_core::{ConfigProvider, Error, Result};

/// Header carrying the backend's total page count.
const TOTAL_PAGES_HEADER: &str = "x-wp-totalpages";

/// Error code the backend returns for a page past the end of a collection.
const INVALID_PAGE_CODE: &str = "rest_post_invalid_page_number";

/// CMS source over HTTP.
///
/// Constructed even when no API base URL is configured; every call then
/// fails with [`Error::Config`], which the client degrades to an empty
/// listing or a miss.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: Option<String>,
    client: reqwest::Client,
}

impl HttpSource {
    /// Creates a source for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client cannot be built.
    pub fn new(base_url: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;
        let base_url = base_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());
        Ok(Self { base_url, client })
    }

    /// Creates a source from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client cannot be built. A
    /// missing API base URL is not an error here.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.api_base_url().ok(), config.request_timeout())
    }

    /// The configured API base URL.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn url(&self, endpoint: &str) -> Result<String> {
        let base = self
            .base_url
            .as_deref()
            .ok_or_else(|| Error::config("API base URL is not configured"))?;
        Ok(format!("{base}/{}", endpoint.trim_start_matches('/')))
    }
}

fn transport(endpoint: &str, e: &reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::transport(format!("{endpoint}: request timed out"))
    } else {
        Error::transport(format!("{endpoint}: {e}"))
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page> {
        let url = self.url(&request.endpoint)?;

        let mut query: Vec<(&str, String)> = vec![
            ("page", request.page.to_string()),
            ("per_page", request.per_page.to_string()),
        ];
        if let Some(slug) = &request.slug {
            query.push(("slug", slug.clone()));
        }
        if request.embed {
            query.push(("_embed", "1".to_string()));
        }

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| transport(&request.endpoint, &e))?;

        let status = response.status();
        let total_pages = response
            .headers()
            .get(TOTAL_PAGES_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u32>().ok());

        if status == StatusCode::BAD_REQUEST {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            if body["code"].as_str() == Some(INVALID_PAGE_CODE) {
                tracing::debug!(endpoint = %request.endpoint, page = request.page, "page past end of collection");
                return Ok(Page {
                    items: Vec::new(),
                    total_pages,
                });
            }
            return Err(Error::transport(format!(
                "{}: HTTP {}",
                request.endpoint,
                status.as_u16()
            )));
        }

        if !status.is_success() {
            return Err(Error::transport(format!(
                "{}: HTTP {}",
                request.endpoint,
                status.as_u16()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::decode(format!("{}: {e}", request.endpoint)))?;

        match body {
            Value::Array(items) => Ok(Page { items, total_pages }),
            other => Err(Error::decode(format!(
                "{}: expected a JSON array, got {}",
                request.endpoint,
                kind_of(&other)
            ))),
        }
    }

    async fn submit_form(&self, endpoint: &str, form: &ContactForm) -> Result<SubmissionResponse> {
        let url = self.url(endpoint)?;

        let response = self
            .client
            .post(&url)
            .json(form)
            .send()
            .await
            .map_err(|e| transport(endpoint, &e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| transport(endpoint, &e))?;
        let body = serde_json::from_str::<SubmissionResponse>(&text).ok();

        if !status.is_success() {
            let message = body
                .map(|b| b.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(Error::backend_rejection(message));
        }

        body.ok_or_else(|| Error::decode(format!("{endpoint}: malformed submission response")))
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(server: &MockServer) -> HttpSource {
        HttpSource::new(
            Some(format!("{}/wp-json/", server.uri())),
            Duration::from_secs(2),
        )
        .unwrap()
    }

    fn contact() -> ContactForm {
        ContactForm::new("Ama", "ama@example.com", "+94 77 123 4567", "Hello")
    }

    #[tokio::test]
    async fn test_fetch_page_sends_query_and_reads_total() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wp-json/wp/v2/posts"))
            .and(query_param("page", "2"))
            .and(query_param("per_page", "10"))
            .and(query_param("_embed", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "id": 1, "slug": "a" }]))
                    .insert_header("X-WP-TotalPages", "3"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let page = source(&server)
            .fetch_page(&PageRequest::new("wp/v2/posts", 2, 10).with_embed(true))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_pages, Some(3));
    }

    #[tokio::test]
    async fn test_fetch_page_slug_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wp-json/wp/v2/services"))
            .and(query_param("slug", "weddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 4, "slug": "weddings" }])))
            .expect(1)
            .mount(&server)
            .await;

        let page = source(&server)
            .fetch_page(&PageRequest::new("wp/v2/services", 1, 1).with_slug("weddings"))
            .await
            .unwrap();
        assert_eq!(page.items[0]["slug"], "weddings");
        assert!(page.total_pages.is_none());
    }

    #[tokio::test]
    async fn test_invalid_page_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wp-json/wp/v2/posts"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": "rest_post_invalid_page_number",
                "message": "The page number requested is larger than the number of pages available.",
                "data": { "status": 400 }
            })))
            .mount(&server)
            .await;

        let page = source(&server)
            .fetch_page(&PageRequest::new("wp/v2/posts", 9, 100))
            .await
            .unwrap();
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = source(&server)
            .fetch_page(&PageRequest::new("wp/v2/posts", 1, 100))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = source(&server)
            .fetch_page(&PageRequest::new("wp/v2/posts", 1, 100))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn test_non_array_body_is_decode() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
            .mount(&server)
            .await;

        let err = source(&server)
            .fetch_page(&PageRequest::new("wp/v2/posts", 1, 100))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("an object"));
    }

    #[tokio::test]
    async fn test_timeout_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let source = HttpSource::new(Some(server.uri()), Duration::from_millis(50)).unwrap();
        let err = source
            .fetch_page(&PageRequest::new("wp/v2/posts", 1, 100))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn test_missing_base_url_is_config_error() {
        let source = HttpSource::new(None, Duration::from_secs(1)).unwrap();
        assert!(source.base_url().is_none());
        let err = source
            .fetch_page(&PageRequest::new("wp/v2/posts", 1, 100))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let blank = HttpSource::new(Some("  ".into()), Duration::from_secs(1)).unwrap();
        assert!(blank.base_url().is_none());
    }

    // ------------------------------------------------------------------------
    // Form submission
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_submit_form_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/wp-json/contact/v1/submit"))
            .and(body_json(json!({
                "name": "Ama",
                "email": "ama@example.com",
                "phone": "+94 77 123 4567",
                "subject": "",
                "message": "Hello"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Thanks!"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = source(&server)
            .submit_form("contact/v1/submit", &contact())
            .await
            .unwrap();
        assert!(reply.success);
        assert_eq!(reply.message, "Thanks!");
    }

    #[tokio::test]
    async fn test_submit_form_success_false_is_returned() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "Mailbox full"
            })))
            .mount(&server)
            .await;

        let reply = source(&server)
            .submit_form("contact/v1/submit", &contact())
            .await
            .unwrap();
        assert!(!reply.success);
        assert_eq!(reply.message, "Mailbox full");
    }

    #[tokio::test]
    async fn test_submit_form_rejection_message_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "success": false,
                "message": "Phone number looks wrong."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = source(&server)
            .submit_form("contact/v1/submit", &contact())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BackendRejection(_)));
        assert_eq!(err.to_string(), "Phone number looks wrong.");
    }

    #[tokio::test]
    async fn test_submit_form_rejection_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = source(&server)
            .submit_form("contact/v1/submit", &contact())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "HTTP 503");
    }
}

//! Default fetch observer.

use folio_core::{Error, FetchObserver};

/// Emits fetch-layer events as `tracing` events.
///
/// Degraded listings are warnings; misses and request starts are debug
/// events, since a miss for an unknown slug is ordinary traffic.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl FetchObserver for TracingObserver {
    fn request_started(&self, endpoint: &str, page: u32) {
        tracing::debug!(endpoint, page, "requesting page");
    }

    fn listing_degraded(&self, endpoint: &str, error: &Error) {
        tracing::warn!(endpoint, error = %error, "listing degraded to empty");
    }

    fn lookup_missed(&self, endpoint: &str, slug: &str, reason: &str) {
        tracing::debug!(endpoint, slug, reason, "lookup missed");
    }

    fn form_rejected(&self, error: &Error) {
        tracing::info!(error = %error, "contact form rejected");
    }
}

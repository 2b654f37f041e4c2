//! Folio client: the CMS fetch layer.
//!
//! # Modules
//!
//! - [`client`]: [`ContentClient`] with listings, lookups and page fan-out
//! - [`source`]: the [`ContentSource`] seam, HTTP and in-process backends
//! - [`form`]: contact form input and validation
//! - [`sitemap`]: sitemap entries and XML rendering
//! - [`observe`]: the default `tracing` observer

#![doc = include_str!("../README.md")]

pub mod client;
pub mod form;
pub mod observe;
pub mod sitemap;
pub mod source;

pub use client::{
    AlbumPage, ContentClient, DEFAULT_FORM_ENDPOINT, HomePage, Layout, ListOptions, MAX_PAGE_SIZE,
    endpoint_keys,
};
pub use form::ContactForm;
pub use observe::TracingObserver;
pub use sitemap::{Frequency, SitemapEntry};
pub use source::{ContentSource, HttpSource, MockSource, Page, PageRequest, SubmissionResponse};

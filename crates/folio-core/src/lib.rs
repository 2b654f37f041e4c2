//! Folio Core: shared errors and extension traits.
//!
//! This crate provides the foundational types used across all Folio crates.
//! It has no internal Folio dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error taxonomy, `NotFound` miss value and Result alias
//! - [`traits`]: Configuration and observability extension points

#![doc = include_str!("../README.md")]

pub mod error;
pub mod traits;

// Re-export key types at crate root for convenience
pub use error::{Error, FieldErrors, NotFound, Result};
pub use traits::{ConfigProvider, FetchObserver, NoopObserver};

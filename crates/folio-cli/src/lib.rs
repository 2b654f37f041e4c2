//! Folio CLI: the `folio` binary's building blocks.
//!
//! # Modules
//!
//! - [`cli`]: clap argument types
//! - [`config`]: [`FolioConfig`] loading via `confyg`
//! - [`app`]: [`FolioCli`], command execution and logging setup

#![doc = include_str!("../README.md")]

pub mod app;
pub mod cli;
pub mod config;
pub mod config_handlers;

pub use app::{FolioCli, init_logging};
pub use cli::{CliArgs, Command, ConfigAction, ConfigCommand};
pub use config::FolioConfig;

//! The `folio` application: wires config, logging and the content client.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::cli::{CliArgs, Command};
use crate::config::FolioConfig;
use crate::config_handlers;
use folio_client::{ContactForm, ContentClient, ListOptions};
use folio_content::{EntityKind, derive_slug};
use folio_core::traits::ConfigProvider;
use folio_core::{Error, Result};

// ============================================================================
// FolioCli
// ============================================================================

/// CLI application parameterized over a config provider.
pub struct FolioCli<C: ConfigProvider> {
    name: String,
    config: Arc<C>,
    client: ContentClient,
    version: String,
}

impl FolioCli<FolioConfig> {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(name: impl Into<String>, args: &CliArgs) -> Result<Self> {
        let config = FolioConfig::load(args.config.as_deref())?;
        Self::new(name, config)
    }
}

impl<C: ConfigProvider> FolioCli<C> {
    /// Create a CLI application with an HTTP-backed client built from `config`.
    pub fn new(name: impl Into<String>, config: C) -> Result<Self> {
        let client = ContentClient::from_config(&config)?;
        Ok(Self::with_client(name, config, client))
    }

    /// Create a CLI application around an existing client.
    pub fn with_client(name: impl Into<String>, config: C, client: ContentClient) -> Self {
        Self {
            name: name.into(),
            config: Arc::new(config),
            client,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Get a reference to the config provider.
    pub fn config(&self) -> &C {
        &self.config
    }

    /// The content client.
    pub fn client(&self) -> &ContentClient {
        &self.client
    }

    /// Run the CLI with the given arguments.
    ///
    /// Output for data commands is written to stdout as pretty JSON.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        match args.command {
            Some(Command::Config(config_cmd)) => {
                config_handlers::handle_config_command(args.config.as_deref(), config_cmd.command)
            }
            Some(command) => {
                let output = self.execute(command).await?;
                if !output.is_empty() {
                    println!("{output}");
                }
                Ok(())
            }
            None => {
                println!("{} {}: use --help for usage", self.name, self.version);
                Ok(())
            }
        }
    }

    /// Execute a content command and return what it would print.
    pub async fn execute(&self, command: Command) -> Result<String> {
        match command {
            Command::List {
                kind,
                all,
                per_page,
                page,
                raw,
            } => {
                let kind: EntityKind = kind.parse()?;
                let mut options = if all {
                    ListOptions::all()
                } else {
                    ListOptions::new()
                };
                options.per_page = per_page;
                options.page = page;
                if raw {
                    to_json(&self.client.list(kind, &options).await)
                } else {
                    to_json(&self.client.views(kind, &options).await)
                }
            }
            Command::Show { kind, slug } => {
                let kind: EntityKind = kind.parse()?;
                let view = self.client.view(kind, &slug).await?;
                to_json(&view)
            }
            Command::Album { service, segment } => {
                let page = self.client.album(&service, &segment).await?;
                to_json(&page)
            }
            Command::Home => to_json(&self.client.home_page().await),
            Command::Layout => to_json(&self.client.layout().await),
            Command::MapUrl { url } => Ok(self
                .client
                .normalizer()
                .routes()
                .map_external_url(url.as_deref())),
            Command::Slug { text } => Ok(derive_slug(&text)),
            Command::Sitemap { output } => {
                let xml = self.client.sitemap(&self.config.site_url()?).await?;
                match output {
                    Some(path) => {
                        write_file(Path::new(&path), &xml)?;
                        tracing::info!(path = %path, bytes = xml.len(), "sitemap written");
                        Ok(String::new())
                    }
                    None => Ok(xml),
                }
            }
            Command::Contact {
                name,
                email,
                phone,
                subject,
                message,
            } => {
                let mut form = ContactForm::new(name, email, phone, message);
                if let Some(subject) = subject {
                    form = form.with_subject(subject);
                }
                let reply = self.client.submit_contact(&form).await?;
                to_json(&reply)
            }
            Command::Version => Ok(format!("{} {}", self.name, self.version)),
            Command::Config(_) => Err(Error::config(
                "config commands are handled before the client is used",
            )),
        }
    }
}

/// Initialise tracing-based logging.
///
/// Uses `RUST_LOG` env var if set, otherwise defaults based on verbosity flags.
pub fn init_logging(verbose: bool, quiet: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if quiet {
        EnvFilter::new("warn")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Ignore error if a subscriber is already set (e.g. in tests).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::Serialization(e.to_string()))
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }
    std::fs::write(path, contents).map_err(|e| Error::io_with_path(e, path))
}

// ============================================================================
// Tests
// ============================================================================

//! Configuration for the `folio` binary.
//!
//! Provides [`FolioConfig`], loaded from TOML files, environment variables,
//! and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `FOLIO_CONFIG` environment variable
//! 3. XDG default: `~/.config/folio/config.toml`
//! 4. Built-in defaults
//!
//! `FOLIO_API_BASE_URL` and `FOLIO_SITE_URL` overlay whatever the file says.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use confyg::{Confygery, env};
use folio_core::traits::{ConfigProvider, DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT};
use folio_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "FOLIO_CONFIG";

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration for the `folio` binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// Project name, used for env var prefixes and default paths.
    pub project_name: String,

    /// CMS REST API settings.
    pub api: ApiConfig,

    /// Public site settings.
    pub site: SiteConfig,

    /// CMS path to site route rewrites.
    pub routes: RoutesConfig,
}

/// CMS REST API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API base URL, e.g. `https://cms.example.com/wp-json`.
    pub base_url: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Default items per listing request.
    pub page_size: u32,

    /// Contact form endpoint, relative to the base URL.
    pub form_endpoint: Option<String>,

    /// Endpoint overrides keyed by endpoint name (`services`, `footer`, ...).
    pub endpoints: BTreeMap<String, String>,
}

/// Public site settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Public base URL of the site.
    pub url: Option<String>,

    /// Extra hosts whose links are rewritten to site paths.
    pub cms_hosts: Vec<String>,

    /// Media hosts the image optimizer cannot reach.
    pub unoptimized_media_hosts: Vec<String>,
}

/// Route rewrites, applied in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Ordered rewrite rules.
    pub rewrites: Vec<RouteRewrite>,
}

/// A single `from` -> `to` path rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRewrite {
    /// CMS path prefix.
    pub from: String,
    /// Site path that replaces it.
    pub to: String,
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            project_name: "folio".to_string(),
            api: ApiConfig::default(),
            site: SiteConfig::default(),
            routes: RoutesConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            page_size: DEFAULT_PAGE_SIZE,
            form_endpoint: None,
            endpoints: BTreeMap::new(),
        }
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl FolioConfig {
    /// Load configuration from file, environment, and defaults.
    ///
    /// A config path that does not exist is not an error; the defaults and
    /// environment overlay still apply.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path)
            && path.exists()
        {
            builder
                .add_file(&path.to_string_lossy())
                .map_err(|e| Error::config(format!("config file: {e}")))?;
        }

        let mut env_opts = env::Options::with_top_level("FOLIO");
        env_opts.add_section("api");
        env_opts.add_section("site");
        env_opts.add_section("routes");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        Ok(config)
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        Self::resolve_config_path_with(explicit, std::env::var(CONFIG_ENV_VAR).ok())
    }

    fn resolve_config_path_with(explicit: Option<&str>, from_env: Option<String>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Some(path) = from_env.filter(|p| !p.trim().is_empty()) {
            return Some(PathBuf::from(path));
        }
        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("folio").join("config.toml"))
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten this config into environment variable pairs with `FOLIO_` prefix.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value: toml::Value =
            toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_toml_value(&value, "FOLIO", &mut vars);
        Ok(vars)
    }
}

// ============================================================================
// ConfigProvider implementation
// ============================================================================

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl ConfigProvider for FolioConfig {
    fn project_name(&self) -> &str {
        &self.project_name
    }

    fn api_base_url(&self) -> Result<String> {
        non_blank(self.api.base_url.as_ref())
            .ok_or_else(|| Error::config("API base URL is not set (FOLIO_API_BASE_URL)"))
    }

    fn site_url(&self) -> Result<String> {
        non_blank(self.site.url.as_ref())
            .ok_or_else(|| Error::config("site URL is not set (FOLIO_SITE_URL)"))
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs.max(1))
    }

    fn page_size(&self) -> u32 {
        self.api.page_size
    }

    fn cms_hosts(&self) -> Vec<String> {
        self.site.cms_hosts.clone()
    }

    fn route_rewrites(&self) -> Vec<(String, String)> {
        self.routes
            .rewrites
            .iter()
            .map(|r| (r.from.clone(), r.to.clone()))
            .collect()
    }

    fn media_hosts_unoptimized(&self) -> Vec<String> {
        self.site.unoptimized_media_hosts.clone()
    }

    fn endpoint_override(&self, key: &str) -> Option<String> {
        non_blank(self.api.endpoints.get(key))
    }

    fn form_endpoint(&self) -> Option<String> {
        non_blank(self.api.form_endpoint.as_ref())
    }
}

// ============================================================================
// Helper: flatten TOML to env vars
// ============================================================================

/// Recursively flatten a TOML value into `KEY=value` pairs.
fn flatten_toml_value(value: &toml::Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                let env_key = format!("{}_{}", prefix, key.to_uppercase().replace('-', "_"));
                flatten_toml_value(val, &env_key, out);
            }
        }
        toml::Value::Array(arr) => {
            if let Ok(json) = serde_json::to_string(arr) {
                out.push((prefix.to_string(), json));
            }
        }
        toml::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        toml::Value::Integer(i) => out.push((prefix.to_string(), i.to_string())),
        toml::Value::Float(f) => out.push((prefix.to_string(), f.to_string())),
        toml::Value::Boolean(b) => out.push((prefix.to_string(), b.to_string())),
        toml::Value::Datetime(dt) => out.push((prefix.to_string(), dt.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: CURSOR_, `__` between nesting levels)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/cursor-pagination/{service_name}/config.toml
//! 4. System directory: /etc/cursor-pagination/{service_name}/config.toml
//! 5. Default values
//!
//! ```toml
//! [service]
//! name = "catalog"
//! log_level = "debug"
//!
//! [paging]
//! default_page_size = 25
//! max_page_size = 200
//! integrity_secret = "change-me"
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::binder::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PAGE_PARAMETER, SIZE_PARAMETER, SORT_PARAMETER,
};
use crate::error::{Error, Result};

const ENV_PREFIX: &str = "CURSOR_";
const ENV_SEPARATOR: &str = "__";
const XDG_PREFIX: &str = "cursor-pagination";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Paging defaults and cursor integrity settings
    #[serde(default)]
    pub paging: PagingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Log level or `EnvFilter` directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Paging configuration
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PagingConfig {
    /// Page size when the request carries no `size`
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Upper bound on the page size
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    /// Name of the cursor query parameter
    #[serde(default = "default_page_parameter")]
    pub page_parameter: String,

    /// Name of the page size query parameter
    #[serde(default = "default_size_parameter")]
    pub size_parameter: String,

    /// Name of the sort query parameter
    #[serde(default = "default_sort_parameter")]
    pub sort_parameter: String,

    /// Secret for keyed cursor checksums
    #[serde(default)]
    pub integrity_secret: Option<String>,
}

impl PagingConfig {
    /// Check that the values are usable together
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.default_page_size == 0 {
            return Err(invalid("paging.default_page_size must be positive"));
        }
        if self.max_page_size == 0 {
            return Err(invalid("paging.max_page_size must be positive"));
        }
        if self.default_page_size > self.max_page_size {
            return Err(invalid(format!(
                "paging.default_page_size ({}) exceeds paging.max_page_size ({})",
                self.default_page_size, self.max_page_size
            )));
        }

        let names = [
            ("page_parameter", &self.page_parameter),
            ("size_parameter", &self.size_parameter),
            ("sort_parameter", &self.sort_parameter),
        ];
        for (field, name) in names {
            if name.trim().is_empty() {
                return Err(invalid(format!("paging.{field} must not be empty")));
            }
        }
        let distinct: HashSet<&str> = names.iter().map(|(_, name)| name.as_str()).collect();
        if distinct.len() != names.len() {
            return Err(invalid(
                "paging.page_parameter, size_parameter and sort_parameter must differ",
            ));
        }

        if self.integrity_secret.as_deref().is_some_and(str::is_empty) {
            return Err(invalid("paging.integrity_secret must not be empty when set"));
        }

        Ok(())
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            page_parameter: default_page_parameter(),
            size_parameter: default_size_parameter(),
            sort_parameter: default_sort_parameter(),
            integrity_secret: None,
        }
    }
}

impl fmt::Debug for PagingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagingConfig")
            .field("default_page_size", &self.default_page_size)
            .field("max_page_size", &self.max_page_size)
            .field("page_parameter", &self.page_parameter)
            .field("size_parameter", &self.size_parameter)
            .field("sort_parameter", &self.sort_parameter)
            .field(
                "integrity_secret",
                &self.integrity_secret.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidConfig(message.into())
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_max_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_page_parameter() -> String {
    PAGE_PARAMETER.to_string()
}

fn default_size_parameter() -> String {
    SIZE_PARAMETER.to_string()
}

fn default_sort_parameter() -> String {
    SORT_PARAMETER.to_string()
}

impl Config {
    /// Load configuration from all sources
    ///
    /// The service name is taken from the running binary.
    pub fn load() -> Result<Self> {
        let service_name = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| XDG_PREFIX.to_string());

        Self::load_for_service(&service_name)
    }

    /// Load configuration for a specific service name
    pub fn load_for_service(service_name: &str) -> Result<Self> {
        let config_paths = Self::find_config_paths(service_name);

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::named(service_name)));

        // Lowest priority first so later merges win
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        Self::finish(figment.merge(Self::env()))
    }

    /// Load configuration from a specific file
    ///
    /// Bypasses the search path; environment variables still override.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Self::env());

        Self::finish(figment)
    }

    /// Config file locations for a service, highest priority first
    pub fn find_config_paths(service_name: &str) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(XDG_PREFIX);
        let config_file_path = Path::new(service_name).join("config.toml");
        if let Ok(path) = xdg_dirs.place_config_file(&config_file_path) {
            paths.push(path);
        }

        paths.push(
            PathBuf::from("/etc")
                .join(XDG_PREFIX)
                .join(service_name)
                .join("config.toml"),
        );

        paths
    }

    /// Check the loaded values
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when the paging section is inconsistent.
    pub fn validate(&self) -> Result<()> {
        self.paging.validate()
    }

    fn named(service_name: &str) -> Self {
        let mut config = Self::default();
        config.service.name = service_name.to_string();
        config
    }

    fn env() -> Env {
        Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR)
    }

    fn finish(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: XDG_PREFIX.to_string(),
                log_level: default_log_level(),
            },
            paging: PagingConfig::default(),
        }
    }
}

//! Configuration loading and management
//!
//! Every field has a default, so an empty YAML document is a valid
//! configuration. Environment overrides are applied on top with
//! [`DashboardConfig::apply_env`].

use crate::core::auth::CREDENTIALS_PROVIDER;
use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Overrides `database.url`
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
/// Overrides `server.bind`
pub const ENV_BIND: &str = "DASHBOARD_BIND";

/// Paths the server routes itself; the invoice pages cannot live there
pub const RESERVED_ROUTES: [&str; 2] = ["/health", "/login"];

/// Route path without trailing slashes (`/dashboard/invoices/` → `/dashboard/invoices`)
pub fn normalize_route(path: &str) -> &str {
    path.trim_end_matches('/')
}

/// Complete configuration for the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub routes: RoutesConfig,
    pub auth: AuthConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Database connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Postgres connection URL; the in-memory store is used when absent
    pub url: Option<String>,

    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
        }
    }
}

/// Paths the actions revalidate and redirect to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Invoice listing page
    pub invoices: String,

    /// Destination after a successful sign-in
    pub after_login: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            invoices: "/dashboard/invoices".to_string(),
            after_login: "/dashboard".to_string(),
        }
    }
}

/// Sign-in settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Sign-in method name passed to the authenticator
    pub provider: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            provider: CREDENTIALS_PROVIDER.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_string(),
            },
            _ => ConfigError::Io {
                path: path.to_string(),
                message: e.to_string(),
            },
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
            file: None,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_DATABASE_URL).filter(|v| !v.is_empty()) {
            self.database.url = Some(url);
        }
        if let Some(bind) = lookup(ENV_BIND).filter(|v| !v.is_empty()) {
            self.server.bind = bind;
        }
        self
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("routes.invoices", &self.routes.invoices),
            ("routes.after_login", &self.routes.after_login),
        ] {
            if !value.starts_with('/') {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.clone(),
                    message: "route must be an absolute path".to_string(),
                });
            }
        }

        let invoices = normalize_route(&self.routes.invoices);
        if invoices.is_empty() || RESERVED_ROUTES.contains(&invoices) {
            return Err(ConfigError::InvalidValue {
                field: "routes.invoices".to_string(),
                value: self.routes.invoices.clone(),
                message: "invoice pages need their own path below the root".to_string(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.max_connections".to_string(),
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if self.auth.provider.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "auth.provider".to_string(),
                value: String::new(),
                message: "provider name cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

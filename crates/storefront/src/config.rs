//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CHECKOUT_BASE_URL` - Public URL for the storefront
//!
//! ## Optional
//! - `CHECKOUT_HOST` - Bind address (default: 127.0.0.1)
//! - `CHECKOUT_PORT` - Listen port (default: 3000)
//! - `POSTAL_LOOKUP_URL` - Postal-code service base URL (default: <https://viacep.com.br/ws>)
//! - `POSTAL_LOOKUP_TIMEOUT_SECS` - Lookup request timeout (default: 5)
//! - `POSTAL_LOOKUP_CACHE_SECS` - How long resolved codes are cached (default: 300, max: one week)
//! - `DELIVERY_CITY` - City the restaurant delivers to (default: São Luís)
//! - `DELIVERY_STATE` - Two-letter state code of that city (default: MA)
//! - `DELIVERY_STATE_NAME` - Full state name for display (default: Maranhão)
//! - `MENU_PATH` - Where customers land after ordering (default: /menu)
//! - `CHECKOUT_IDLE_MINUTES` - Idle time before a checkout is dropped (default: 60, max: 30 days)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use cardapio_core::Locality;
use thiserror::Error;
use url::Url;

/// Default postal-code service.
pub const VIACEP_URL: &str = "https://viacep.com.br/ws";

/// Longest accepted `POSTAL_LOOKUP_CACHE_SECS` (one week).
const MAX_CACHE_SECS: u64 = 7 * 24 * 60 * 60;

/// Longest accepted `CHECKOUT_IDLE_MINUTES` (thirty days).
const MAX_IDLE_MINUTES: u64 = 30 * 24 * 60;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Postal-code lookup configuration
    pub postal_lookup: PostalLookupConfig,
    /// The single delivery area
    pub delivery: Locality,
    /// Path of the menu view
    pub menu_path: String,
    /// Idle time after which a visitor's checkout is dropped
    pub checkout_idle: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Postal-code service configuration.
#[derive(Debug, Clone)]
pub struct PostalLookupConfig {
    /// Base URL; requests go to `{base_url}/{code}/json/`
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// Time-to-live of cached resolved codes
    pub cache_ttl: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key/value source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_source<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvSource(get);

        let host = env.parse_or("CHECKOUT_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = env.parse_or("CHECKOUT_PORT", 3000_u16)?;
        let base_url = env.required("CHECKOUT_BASE_URL")?;

        let postal_lookup = PostalLookupConfig {
            base_url: env.url_or("POSTAL_LOOKUP_URL", VIACEP_URL)?,
            timeout: Duration::from_secs(env.parse_or("POSTAL_LOOKUP_TIMEOUT_SECS", 5_u64)?),
            cache_ttl: Duration::from_secs(env.bounded_or(
                "POSTAL_LOOKUP_CACHE_SECS",
                300,
                MAX_CACHE_SECS,
            )?),
        };

        let delivery = Locality::new(
            env.or_default("DELIVERY_CITY", "São Luís"),
            env.or_default("DELIVERY_STATE", "MA"),
            env.or_default("DELIVERY_STATE_NAME", "Maranhão"),
        );

        let menu_path = env.or_default("MENU_PATH", "/menu");
        if !menu_path.starts_with('/') {
            return Err(ConfigError::InvalidEnvVar(
                "MENU_PATH".to_string(),
                "must start with '/'".to_string(),
            ));
        }

        let idle_minutes = env.bounded_or("CHECKOUT_IDLE_MINUTES", 60, MAX_IDLE_MINUTES)?;
        let checkout_idle = Duration::from_secs(idle_minutes * 60);

        Ok(Self {
            host,
            port,
            base_url,
            postal_lookup,
            delivery,
            menu_path,
            checkout_idle,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parse_or("SENTRY_SAMPLE_RATE", 1.0_f32)?,
            sentry_traces_sample_rate: env.parse_or("SENTRY_TRACES_SAMPLE_RATE", 0.0_f32)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct EnvSource<F>(F);

impl<F> EnvSource<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable; empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    /// Parse an integer no greater than `max`, falling back to `default` when unset.
    fn bounded_or(&self, key: &str, default: u64, max: u64) -> Result<u64, ConfigError> {
        let value = self.parse_or(key, default)?;
        if value > max {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("must be at most {max}"),
            ));
        }
        Ok(value)
    }

    /// Parse an http(s) URL, falling back to `default` when unset.
    fn url_or(&self, key: &str, default: &str) -> Result<Url, ConfigError> {
        let raw = self.or_default(key, default);
        let url = Url::parse(raw.trim())
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        Ok(url)
    }
}

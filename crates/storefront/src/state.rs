//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::services::{CheckoutSessions, LookupError, PostalCodeLookup, ViaCepClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration, the postal-code service and the checkout sessions.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    postal_lookup: Arc<dyn PostalCodeLookup>,
    sessions: CheckoutSessions,
}

impl AppState {
    /// Create a new application state backed by ViaCEP.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, LookupError> {
        let lookup = ViaCepClient::new(&config.postal_lookup)?;
        Ok(Self::with_lookup(config, Arc::new(lookup)))
    }

    /// Create application state with a custom postal-code service.
    #[must_use]
    pub fn with_lookup(config: StorefrontConfig, postal_lookup: Arc<dyn PostalCodeLookup>) -> Self {
        let sessions = CheckoutSessions::new(config.delivery.clone(), config.checkout_idle);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                postal_lookup,
                sessions,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a shared handle to the postal-code service.
    #[must_use]
    pub fn postal_lookup(&self) -> Arc<dyn PostalCodeLookup> {
        Arc::clone(&self.inner.postal_lookup)
    }

    /// Get a reference to the checkout session registry.
    #[must_use]
    pub fn sessions(&self) -> &CheckoutSessions {
        &self.inner.sessions
    }
}

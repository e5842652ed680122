//! Integration tests for Cardápio.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cardapio-integration-tests
//! ```
//!
//! Servers are bound to `127.0.0.1:0` inside the test process, so no
//! external services are needed.
//!
//! # Test Categories
//!
//! - `checkout_flow` - Full checkout over HTTP with a scripted postal-code service
//! - `postal_lookup` - ViaCEP client against a fake ViaCEP server

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use cardapio_core::PostalCode;
use cardapio_core::checkout::LookupResult;
use cardapio_storefront::config::StorefrontConfig;
use cardapio_storefront::services::{LookupError, PostalCodeLookup};
use cardapio_storefront::state::AppState;
use reqwest::Client;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// A storefront running on a random local port.
pub struct TestContext {
    /// Client with a cookie store, so it behaves as one visitor.
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Start a storefront that resolves postal codes with `lookup`.
    pub async fn start(lookup: Arc<dyn PostalCodeLookup>) -> Self {
        let config = test_config(&[]);
        let state = AppState::with_lookup(config, lookup);
        let base_url = serve(cardapio_storefront::app(state)).await;

        Self {
            client: visitor_client(),
            base_url,
        }
    }

    /// A second visitor on the same server.
    #[must_use]
    pub fn other_visitor(&self) -> Self {
        Self {
            client: visitor_client(),
            base_url: self.base_url.clone(),
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn visitor_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Configuration for tests, with `overrides` applied on top of the defaults.
#[must_use]
pub fn test_config(overrides: &[(&str, &str)]) -> StorefrontConfig {
    let mut vars: HashMap<String, String> =
        HashMap::from([("CHECKOUT_BASE_URL".to_string(), "http://127.0.0.1".to_string())]);
    for (key, value) in overrides {
        vars.insert((*key).to_string(), (*value).to_string());
    }

    StorefrontConfig::from_source(|key| vars.get(key).cloned()).expect("Invalid test config")
}

/// Serve `router` on a random local port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Test server error");
    });

    format!("http://{addr}")
}

// =============================================================================
// Postal-code fakes
// =============================================================================

/// Answers from a fixed table; unknown codes are not found.
#[derive(Default)]
pub struct TableLookup {
    entries: HashMap<String, LookupResult>,
    calls: Mutex<Vec<String>>,
}

impl TableLookup {
    #[must_use]
    pub fn with(mut self, postal_code: &str, result: LookupResult) -> Self {
        self.entries.insert(postal_code.to_string(), result);
        self
    }

    /// Codes looked up so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PostalCodeLookup for TableLookup {
    async fn lookup(&self, postal_code: &PostalCode) -> Result<LookupResult, LookupError> {
        self.calls.lock().unwrap().push(postal_code.to_string());
        Ok(self
            .entries
            .get(postal_code.as_str())
            .cloned()
            .unwrap_or_else(LookupResult::not_found))
    }
}

/// Holds each lookup until the test releases it.
#[derive(Default)]
pub struct ScriptedLookup {
    pending: Mutex<HashMap<String, oneshot::Receiver<LookupResult>>>,
}

impl ScriptedLookup {
    /// Register a lookup for `postal_code`; send on the returned channel to
    /// let it finish.
    pub fn expect(&self, postal_code: &str) -> oneshot::Sender<LookupResult> {
        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .unwrap()
            .insert(postal_code.to_string(), rx);
        tx
    }
}

#[async_trait]
impl PostalCodeLookup for ScriptedLookup {
    async fn lookup(&self, postal_code: &PostalCode) -> Result<LookupResult, LookupError> {
        let rx = self
            .pending
            .lock()
            .unwrap()
            .remove(postal_code.as_str())
            .expect("Unexpected lookup");

        rx.await.map_err(|_| LookupError::Api { status: 503 })
    }
}

/// A São Luís address.
#[must_use]
pub fn sao_luis(district: &str, street: &str) -> LookupResult {
    LookupResult::found("São Luís", "MA", district, street)
}

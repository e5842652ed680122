//! Postal-code (CEP) resolution via ViaCEP.
//!
//! `GET {base}/{cep}/json/` answers either with the address fields or with
//! `{"erro": true}` for unknown codes. Resolved codes are cached with `moka`;
//! unknown codes and failures are not, so a later retry by the customer
//! always reaches the service.

use std::sync::Arc;

use async_trait::async_trait;
use cardapio_core::PostalCode;
use cardapio_core::checkout::LookupResult;
use moka::future::Cache;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::PostalLookupConfig;

/// Errors that can occur when resolving a postal code.
#[derive(Debug, Error)]
pub enum LookupError {
    /// HTTP request failed (connection, timeout, body decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API error: {status}")]
    Api { status: u16 },

    /// Only complete postal codes can be resolved.
    #[error("Incomplete postal code: {0}")]
    Incomplete(String),
}

/// Resolves postal codes to addresses.
#[async_trait]
pub trait PostalCodeLookup: Send + Sync {
    /// Resolve a complete postal code.
    async fn lookup(&self, postal_code: &PostalCode) -> Result<LookupResult, LookupError>;
}

/// Raw ViaCEP response.
///
/// `erro` has been seen both as the boolean `true` and as the string `"true"`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ViaCepResponse {
    erro: Option<serde_json::Value>,
    localidade: String,
    uf: String,
    bairro: String,
    logradouro: String,
}

impl From<ViaCepResponse> for LookupResult {
    fn from(response: ViaCepResponse) -> Self {
        let not_found = match &response.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        };

        if not_found {
            return Self::not_found();
        }

        Self {
            found: true,
            city: response.localidade,
            state: response.uf,
            district: response.bairro,
            street: response.logradouro,
        }
    }
}

/// ViaCEP client.
#[derive(Clone)]
pub struct ViaCepClient {
    inner: Arc<ViaCepClientInner>,
}

struct ViaCepClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, LookupResult>,
}

impl ViaCepClient {
    /// Create a new ViaCEP client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &PostalLookupConfig) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        let cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ViaCepClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    fn endpoint(&self, postal_code: &PostalCode) -> String {
        format!("{}/{postal_code}/json/", self.inner.base_url)
    }
}

#[async_trait]
impl PostalCodeLookup for ViaCepClient {
    #[instrument(skip(self, postal_code), fields(postal_code = %postal_code))]
    async fn lookup(&self, postal_code: &PostalCode) -> Result<LookupResult, LookupError> {
        if !postal_code.is_complete() {
            return Err(LookupError::Incomplete(postal_code.to_string()));
        }

        if let Some(cached) = self.inner.cache.get(postal_code.as_str()).await {
            debug!("Postal code cache hit");
            return Ok(cached);
        }

        let response = self
            .inner
            .client
            .get(self.endpoint(postal_code))
            .header("Accept", "application/json")
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            return Err(LookupError::Api {
                status: status.as_u16(),
            });
        }

        let result = LookupResult::from(response.json::<ViaCepResponse>().await?);
        debug!(found = result.found, city = %result.city, "Postal code resolved");

        if result.found {
            self.inner
                .cache
                .insert(postal_code.as_str().to_string(), result.clone())
                .await;
        }

        Ok(result)
    }
}

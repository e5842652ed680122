//! ViaCEP client against a fake ViaCEP server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use cardapio_core::PostalCode;
use cardapio_core::checkout::LookupResult;
use cardapio_integration_tests::serve;
use cardapio_storefront::config::PostalLookupConfig;
use cardapio_storefront::services::{LookupError, PostalCodeLookup, ViaCepClient};
use serde_json::json;
use url::Url;

#[derive(Clone, Default)]
struct Hits(Arc<AtomicUsize>);

async fn viacep(State(hits): State<Hits>, Path(cep): Path<String>) -> Response {
    hits.0.fetch_add(1, Ordering::SeqCst);

    match cep.as_str() {
        "65010000" => Json(json!({
            "cep": "65010-000",
            "logradouro": "Rua Grande",
            "complemento": "",
            "bairro": "Centro",
            "localidade": "São Luís",
            "uf": "MA",
            "ibge": "2111300",
            "gia": "",
            "ddd": "98",
            "siafi": "0921"
        }))
        .into_response(),
        "50000000" => StatusCode::BAD_GATEWAY.into_response(),
        "60000000" => Json(json!({"erro": "true"})).into_response(),
        _ => Json(json!({"erro": true})).into_response(),
    }
}

async fn start_fake_viacep() -> (ViaCepClient, Hits) {
    let hits = Hits::default();
    let router = Router::new()
        .route("/ws/{cep}/json/", get(viacep))
        .with_state(hits.clone());
    let base_url = serve(router).await;

    let client = ViaCepClient::new(&PostalLookupConfig {
        base_url: Url::parse(&format!("{base_url}/ws/")).unwrap(),
        timeout: Duration::from_secs(5),
        cache_ttl: Duration::from_secs(60),
    })
    .unwrap();

    (client, hits)
}

fn code(s: &str) -> PostalCode {
    PostalCode::parse(s).unwrap()
}

#[tokio::test]
async fn test_resolves_known_code() {
    let (client, _) = start_fake_viacep().await;

    let result = client.lookup(&code("65010000")).await.unwrap();

    assert_eq!(
        result,
        LookupResult::found("São Luís", "MA", "Centro", "Rua Grande")
    );
}

#[tokio::test]
async fn test_unknown_code_is_not_found() {
    let (client, _) = start_fake_viacep().await;

    assert!(!client.lookup(&code("99999999")).await.unwrap().found);
    assert!(!client.lookup(&code("60000000")).await.unwrap().found);
}

#[tokio::test]
async fn test_server_error_is_reported() {
    let (client, _) = start_fake_viacep().await;

    let err = client.lookup(&code("50000000")).await.unwrap_err();

    assert!(matches!(err, LookupError::Api { status: 502 }));
}

#[tokio::test]
async fn test_found_codes_are_cached() {
    let (client, hits) = start_fake_viacep().await;

    client.lookup(&code("65010000")).await.unwrap();
    client.lookup(&code("65010000")).await.unwrap();
    assert_eq!(hits.0.load(Ordering::SeqCst), 1);

    client.lookup(&code("99999999")).await.unwrap();
    client.lookup(&code("99999999")).await.unwrap();
    assert_eq!(hits.0.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_unreachable_service() {
    let client = ViaCepClient::new(&PostalLookupConfig {
        base_url: Url::parse("http://127.0.0.1:1/ws").unwrap(),
        timeout: Duration::from_secs(1),
        cache_ttl: Duration::from_secs(60),
    })
    .unwrap();

    let err = client.lookup(&code("65010000")).await.unwrap_err();

    assert!(matches!(err, LookupError::Http(_)));
}

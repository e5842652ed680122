//! End-to-end checkout over HTTP.
//!
//! Each test starts its own storefront on a random port with a fake
//! postal-code service, and drives it with a cookie-keeping client.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use cardapio_core::checkout::LookupResult;
use cardapio_integration_tests::{ScriptedLookup, TableLookup, TestContext, sao_luis};
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn get(ctx: &TestContext, path: &str) -> (StatusCode, Value) {
    let resp = ctx.client.get(ctx.url(path)).send().await.unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap_or(Value::Null))
}

async fn post(ctx: &TestContext, path: &str, body: Value) -> (StatusCode, Value) {
    let resp = ctx
        .client
        .post(ctx.url(path))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap_or(Value::Null))
}

async fn fill_cart(ctx: &TestContext) {
    let (status, _) = post(
        ctx,
        "/cart/items",
        json!({"id": 1, "name": "Arroz de cuxá", "unit_price": "32.00", "quantity": 2}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = post(
        ctx,
        "/cart/items",
        json!({"id": 2, "name": "Guaraná Jesus", "unit_price": "6.50"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, cart) = post(ctx, "/cart/select", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["selected_total"], "R$ 70,50");
}

fn storefront_lookup() -> TableLookup {
    TableLookup::default()
        .with("65000000", sao_luis("Centro", "Rua Grande"))
        .with(
            "01000000",
            LookupResult::found("São Paulo", "SP", "Sé", "Praça da Sé"),
        )
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::start(Arc::new(TableLookup::default())).await;
    let resp = ctx.client.get(ctx.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_full_checkout_clears_cart_and_returns_to_menu() {
    let lookup = Arc::new(storefront_lookup());
    let ctx = TestContext::start(lookup.clone()).await;
    fill_cart(&ctx).await;

    // Incomplete codes are stored without a lookup.
    let (_, body) = post(&ctx, "/checkout/postal-code", json!({"postal_code": "6500"})).await;
    assert_eq!(body["outcome"], "accepted");
    assert_eq!(body["checkout"]["postal_code_hint"], "O valor do CEP não é válido");
    assert!(lookup.calls().is_empty());

    let (_, body) = post(&ctx, "/checkout/postal-code", json!({"postal_code": "65000000"})).await;
    assert_eq!(body["outcome"], "resolved");
    assert_eq!(body["verdict"]["kind"], "deliverable");
    assert_eq!(body["checkout"]["postal_code_valid"], true);
    assert_eq!(body["checkout"]["form"]["district"], "Centro");
    assert_eq!(body["checkout"]["form"]["street"], "Rua Grande");
    assert_eq!(body["checkout"]["postal_code_hint"], Value::Null);
    assert_eq!(lookup.calls(), vec!["65000000"]);

    let (_, view) = post(&ctx, "/checkout/address", json!({"number": "100", "complement": "casa"})).await;
    assert_eq!(view["ready"], false);
    assert_eq!(
        view["address_confirmation"]["street_line"],
        "Rua Grande, nº 100 - casa"
    );

    let (_, view) = post(&ctx, "/checkout/payment", json!({"method": "pix"})).await;
    assert_eq!(view["ready"], true);
    assert_eq!(view["card_form_visible"], false);
    assert_eq!(view["summary"]["item_count"], 3);
    assert_eq!(view["summary"]["line_count"], 2);
    assert_eq!(view["summary"]["payment_label"], "Pix");

    let (status, view) = post(&ctx, "/checkout/finalize", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["finalize"]["state"], "confirmation_pending");
    assert_eq!(
        view["confirmation_message"],
        "O pedido foi finalizado! Aguarde enquanto preparamos o seu pedido"
    );

    // The cart is untouched until the prompt is acknowledged.
    let (_, cart) = get(&ctx, "/cart").await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 2);

    // The form is locked while the prompt is open.
    let (status, body) = post(&ctx, "/checkout/postal-code", json!({"postal_code": "6500000"})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "confirmation_pending");

    let resp = ctx
        .client
        .post(ctx.url("/checkout/confirm"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/menu");

    let (_, cart) = get(&ctx, "/cart").await;
    assert!(cart["items"].as_array().unwrap().is_empty());
    assert!(cart["selected"].as_array().unwrap().is_empty());
    assert_eq!(cart["selected_total"], "R$ 0,00");

    let (_, view) = get(&ctx, "/checkout").await;
    assert_eq!(view["ready"], false);
    assert_eq!(view["finalize"]["state"], "idle");
    assert_eq!(view["form"]["postal_code"], "");
}

#[tokio::test]
async fn test_postal_code_outside_delivery_area() {
    let ctx = TestContext::start(Arc::new(storefront_lookup())).await;
    fill_cart(&ctx).await;

    post(&ctx, "/checkout/address", json!({"number": "10", "street": "Rua Velha"})).await;
    post(&ctx, "/checkout/payment", json!({"method": "cash"})).await;

    let (_, body) = post(&ctx, "/checkout/postal-code", json!({"postal_code": "01000000"})).await;
    assert_eq!(body["verdict"]["kind"], "outside_delivery_area");
    assert_eq!(body["checkout"]["postal_code_valid"], false);
    assert_eq!(body["checkout"]["form"]["street"], "");
    assert_eq!(
        body["checkout"]["postal_code_hint"],
        "O CEP não pertence a cidade de São Luís(MA)"
    );
    assert_eq!(body["checkout"]["ready"], false);

    let (status, body) = post(&ctx, "/checkout/finalize", json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "not_ready");

    let (_, cart) = get(&ctx, "/cart").await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unknown_postal_code() {
    let ctx = TestContext::start(Arc::new(storefront_lookup())).await;

    let (_, body) = post(&ctx, "/checkout/postal-code", json!({"postal_code": "99999999"})).await;
    assert_eq!(body["verdict"]["kind"], "not_found");
    assert_eq!(body["checkout"]["postal_code_hint"], "O valor do CEP não é válido");
}

#[tokio::test]
async fn test_invalid_keystrokes_are_ignored() {
    let ctx = TestContext::start(Arc::new(storefront_lookup())).await;
    post(&ctx, "/checkout/postal-code", json!({"postal_code": "6500"})).await;

    let (status, body) = post(&ctx, "/checkout/postal-code", json!({"postal_code": "6500a"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "rejected");
    assert_eq!(body["checkout"]["form"]["postal_code"], "6500");

    post(&ctx, "/checkout/address", json!({"number": "12"})).await;
    let (_, view) = post(&ctx, "/checkout/address", json!({"number": "12b"})).await;
    assert_eq!(view["form"]["number"], "12");
}

#[tokio::test]
async fn test_slow_lookup_for_old_code_is_discarded() {
    let lookup = Arc::new(ScriptedLookup::default());
    let ctx = TestContext::start(lookup.clone()).await;
    // Establish the visitor before issuing concurrent requests.
    get(&ctx, "/checkout").await;

    let old = lookup.expect("65000000");
    let old_request = {
        let client = ctx.client.clone();
        let url = ctx.url("/checkout/postal-code");
        tokio::spawn(async move {
            let resp = client
                .post(url)
                .json(&json!({"postal_code": "65000000"}))
                .send()
                .await
                .unwrap();
            resp.json::<Value>().await.unwrap()
        })
    };

    // Wait until the first lookup is running.
    let mut in_flight = false;
    for _ in 0..200 {
        let (_, view) = get(&ctx, "/checkout").await;
        if view["lookup_in_flight"] == true {
            in_flight = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(in_flight, "first lookup never started");

    post(&ctx, "/checkout/postal-code", json!({"postal_code": "6500000"})).await;
    let new = lookup.expect("65000001");
    let new_request = {
        let client = ctx.client.clone();
        let url = ctx.url("/checkout/postal-code");
        tokio::spawn(async move {
            let resp = client
                .post(url)
                .json(&json!({"postal_code": "65000001"}))
                .send()
                .await
                .unwrap();
            resp.json::<Value>().await.unwrap()
        })
    };

    // The newer lookup fails first...
    new.send(LookupResult::not_found()).unwrap();
    let body = new_request.await.unwrap();
    assert_eq!(body["verdict"]["kind"], "not_found");

    // ...then the older one succeeds, too late.
    old.send(sao_luis("Centro", "Rua Grande")).unwrap();
    let body = old_request.await.unwrap();
    assert_eq!(body["outcome"], "superseded");

    let (_, view) = get(&ctx, "/checkout").await;
    assert_eq!(view["form"]["postal_code"], "65000001");
    assert_eq!(view["postal_code_valid"], false);
    assert_eq!(view["form"]["street"], "");
}

#[tokio::test]
async fn test_acknowledge_without_prompt_is_rejected() {
    let ctx = TestContext::start(Arc::new(storefront_lookup())).await;
    fill_cart(&ctx).await;

    let (status, body) = post(&ctx, "/checkout/confirm", json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "no_confirmation_pending");

    let (_, cart) = get(&ctx, "/cart").await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_dismiss_places_the_order_too() {
    let ctx = TestContext::start(Arc::new(storefront_lookup())).await;
    fill_cart(&ctx).await;
    post(&ctx, "/checkout/postal-code", json!({"postal_code": "65000000"})).await;
    post(&ctx, "/checkout/address", json!({"number": "7"})).await;
    post(&ctx, "/checkout/payment", json!({"method": "debit_card"})).await;
    let (status, _) = post(&ctx, "/checkout/finalize", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let resp = ctx
        .client
        .post(ctx.url("/checkout/dismiss"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let (_, cart) = get(&ctx, "/cart").await;
    assert!(cart["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_visitors_are_isolated() {
    let ctx = TestContext::start(Arc::new(storefront_lookup())).await;
    fill_cart(&ctx).await;

    let other = ctx.other_visitor();
    let (_, cart) = get(&other, "/cart").await;
    assert!(cart["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_select_unknown_item() {
    let ctx = TestContext::start(Arc::new(storefront_lookup())).await;
    fill_cart(&ctx).await;

    let (status, body) = post(&ctx, "/cart/select", json!({"ids": [1, 99]})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "unknown_item");

    let (_, cart) = get(&ctx, "/cart").await;
    assert_eq!(cart["selected"].as_array().unwrap().len(), 2);
}

//! Cart route handlers.
//!
//! The cart is filled from the menu and a selection of its items is carried
//! into checkout. Responses are JSON.

use axum::{Json, http::StatusCode};
use cardapio_core::{CartItem, CartItemId, CartStore, Price};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::VisitorCheckout;
use crate::services::InMemoryCartStore;

/// Cart item display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub id: CartItemId,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            image: item.image.clone(),
            quantity: item.quantity,
            price: item.unit_price.display(),
            line_price: item.line_total().display(),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub selected: Vec<CartItemView>,
    pub selected_total: String,
    pub item_count: u32,
}

impl CartView {
    fn of(cart: &InMemoryCartStore) -> Self {
        let items = cart.items();
        let selection = cart.snapshot();

        Self {
            items: items.iter().map(CartItemView::from).collect(),
            selected: selection.items.iter().map(CartItemView::from).collect(),
            selected_total: selection.total.display(),
            item_count: items
                .iter()
                .fold(0, |count, item| count.saturating_add(item.quantity)),
        }
    }
}

/// Add to cart request.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub id: CartItemId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub unit_price: Price,
    pub quantity: Option<u32>,
}

/// Selection request; an absent `ids` selects the whole cart.
#[derive(Debug, Default, Deserialize)]
pub struct SelectRequest {
    pub ids: Option<Vec<CartItemId>>,
}

/// Show the cart.
#[instrument(skip(session))]
pub async fn show(VisitorCheckout(session): VisitorCheckout) -> Json<CartView> {
    Json(CartView::of(session.cart()))
}

/// Add a dish to the cart.
#[instrument(skip(session), fields(item_id = %form.id))]
pub async fn add(
    VisitorCheckout(session): VisitorCheckout,
    Json(form): Json<AddToCartRequest>,
) -> Result<(StatusCode, Json<CartView>)> {
    let quantity = form.quantity.unwrap_or(1);
    if quantity == 0 {
        return Err(AppError::BadRequest("quantity must be at least 1".to_string()));
    }
    if form.unit_price.amount().is_sign_negative() {
        return Err(AppError::BadRequest("unit price cannot be negative".to_string()));
    }

    let item_id = form.id.to_string();
    add_breadcrumb("cart", "Added item", Some(&[("item_id", item_id.as_str())]));

    session.cart().add_item(CartItem {
        id: form.id,
        name: form.name,
        image: form.image,
        unit_price: form.unit_price,
        quantity,
    })?;

    Ok((StatusCode::CREATED, Json(CartView::of(session.cart()))))
}

/// Choose which cart items go to checkout.
#[instrument(skip(session, form))]
pub async fn select(
    VisitorCheckout(session): VisitorCheckout,
    form: Option<Json<SelectRequest>>,
) -> Result<Json<CartView>> {
    let form = form.map(|Json(form)| form).unwrap_or_default();

    match form.ids {
        Some(ids) => session.cart().select(&ids)?,
        None => session.cart().select_all(),
    }

    Ok(Json(CartView::of(session.cart())))
}

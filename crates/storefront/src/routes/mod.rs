//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Cart
//! GET  /cart                   - Cart contents and checkout selection
//! POST /cart/items             - Add a dish to the cart
//! POST /cart/select            - Choose the items to check out (all if no ids)
//!
//! # Checkout
//! GET  /checkout               - Checkout page data
//! POST /checkout/postal-code   - Postal-code keystroke (runs the lookup)
//! POST /checkout/address       - District, street, number, complement
//! POST /checkout/payment       - Select payment method
//! POST /checkout/finalize      - Open the confirmation prompt (409 if not ready)
//! POST /checkout/confirm       - Place the order, redirect to the menu
//! POST /checkout/dismiss       - Same as confirm
//! ```

pub mod cart;
pub mod checkout;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", post(cart::add))
        .route("/select", post(cart::select))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/postal-code", post(checkout::postal_code))
        .route("/address", post(checkout::address))
        .route("/payment", post(checkout::payment))
        .route("/finalize", post(checkout::finalize))
        .route("/confirm", post(checkout::confirm))
        .route("/dismiss", post(checkout::dismiss))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
}

//! Checkout route handlers.
//!
//! Every handler answers with the full [`CheckoutView`] so the page can
//! re-render from a single payload. Acknowledging the confirmation prompt
//! redirects to the menu.

use axum::{Json, extract::State, response::Redirect};
use cardapio_core::checkout::{
    CONFIRMATION_MESSAGE, FinalizeState, ModalAction, OrderSummary, SummaryLine,
};
use cardapio_core::{AddressConfirmation, AddressForm, CartSnapshot, CartStore, Checkout, PaymentMethod};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{Result, add_breadcrumb};
use crate::middleware::VisitorCheckout;
use crate::services::{CheckoutSession, PostalCodeUpdate};
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// One payment radio button.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentOptionView {
    pub method: PaymentMethod,
    pub label: &'static str,
    pub selected: bool,
}

/// One line of the order summary.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryLineView {
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&SummaryLine> for SummaryLineView {
    fn from(line: &SummaryLine) -> Self {
        Self {
            name: line.name.clone(),
            image: line.image.clone(),
            quantity: line.quantity,
            line_total: line.line_total.display(),
        }
    }
}

/// The order summary panel.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    pub lines: Vec<SummaryLineView>,
    pub item_count: u32,
    pub line_count: usize,
    pub total: String,
    pub discount: String,
    pub payment_label: Option<&'static str>,
}

impl From<&OrderSummary> for SummaryView {
    fn from(summary: &OrderSummary) -> Self {
        Self {
            lines: summary.lines.iter().map(SummaryLineView::from).collect(),
            item_count: summary.item_count,
            line_count: summary.line_count,
            total: summary.total.display(),
            discount: summary.discount.display(),
            payment_label: summary.payment_label,
        }
    }
}

/// Checkout page data.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutView {
    pub form: AddressForm,
    pub postal_code_valid: bool,
    /// Text under the postal-code field; absent when the code is good.
    pub postal_code_hint: Option<String>,
    pub lookup_in_flight: bool,
    pub payment_options: Vec<PaymentOptionView>,
    pub card_form_visible: bool,
    pub ready: bool,
    pub finalize: FinalizeState,
    pub confirmation_message: Option<&'static str>,
    pub address_confirmation: Option<AddressConfirmation>,
    pub summary: SummaryView,
}

impl CheckoutView {
    #[must_use]
    pub fn new(checkout: &Checkout, cart: &CartSnapshot) -> Self {
        let payment_options = PaymentMethod::ALL
            .iter()
            .map(|&method| PaymentOptionView {
                method,
                label: method.label(),
                selected: checkout.payment() == Some(method),
            })
            .collect();

        Self {
            form: checkout.form().clone(),
            postal_code_valid: checkout.is_postal_code_valid(),
            postal_code_hint: checkout.postal_code_hint().map(String::from),
            lookup_in_flight: checkout.is_lookup_in_flight(),
            payment_options,
            card_form_visible: checkout.card_details_required(),
            ready: checkout.is_ready(),
            finalize: checkout.finalize_state(),
            confirmation_message: checkout
                .finalize_state()
                .is_pending()
                .then_some(CONFIRMATION_MESSAGE),
            address_confirmation: checkout.address_confirmation(),
            summary: SummaryView::from(&OrderSummary::new(cart, checkout.payment())),
        }
    }
}

/// Postal-code edit response: what happened, and the page after it.
#[derive(Debug, Clone, Serialize)]
pub struct PostalCodeResponse {
    #[serde(flatten)]
    pub update: PostalCodeUpdate,
    pub checkout: CheckoutView,
}

async fn render(session: &CheckoutSession) -> CheckoutView {
    let cart = session.cart().snapshot();
    CheckoutView::new(&*session.checkout().await, &cart)
}

// =============================================================================
// Requests
// =============================================================================

/// Postal-code keystroke.
#[derive(Debug, Deserialize)]
pub struct PostalCodeRequest {
    pub postal_code: String,
}

/// Edits to the other address fields; absent fields are left alone.
#[derive(Debug, Default, Deserialize)]
pub struct AddressRequest {
    pub district: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
}

/// Payment method choice.
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub method: PaymentMethod,
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the checkout page.
#[instrument(skip(session))]
pub async fn show(VisitorCheckout(session): VisitorCheckout) -> Json<CheckoutView> {
    Json(render(&session).await)
}

/// Apply a postal-code keystroke, looking the code up once it is complete.
#[instrument(skip(state, session))]
pub async fn postal_code(
    State(state): State<AppState>,
    VisitorCheckout(session): VisitorCheckout,
    Json(form): Json<PostalCodeRequest>,
) -> Result<Json<PostalCodeResponse>> {
    let update = session
        .edit_postal_code(state.postal_lookup(), &form.postal_code)
        .await?;

    Ok(Json(PostalCodeResponse {
        update,
        checkout: render(&session).await,
    }))
}

/// Edit district, street, number or complement.
#[instrument(skip(session))]
pub async fn address(
    VisitorCheckout(session): VisitorCheckout,
    Json(form): Json<AddressRequest>,
) -> Result<Json<CheckoutView>> {
    {
        let mut checkout = session.checkout().await;

        if let Some(district) = &form.district {
            checkout.set_district(district)?;
        }
        if let Some(street) = &form.street {
            checkout.set_street(street)?;
        }
        if let Some(number) = &form.number {
            let accepted = checkout.set_number(number)?;
            if !accepted {
                debug!(number = %number, "Ignored non-numeric house number");
            }
        }
        if let Some(complement) = &form.complement {
            checkout.set_complement(complement)?;
        }
    }

    Ok(Json(render(&session).await))
}

/// Choose a payment method.
#[instrument(skip(session))]
pub async fn payment(
    VisitorCheckout(session): VisitorCheckout,
    Json(form): Json<PaymentRequest>,
) -> Result<Json<CheckoutView>> {
    session.checkout().await.select_payment(form.method)?;
    add_breadcrumb(
        "checkout",
        "Selected payment method",
        Some(&[("method", form.method.as_str())]),
    );

    Ok(Json(render(&session).await))
}

/// Open the confirmation prompt. Answers 409 if the form is incomplete.
#[instrument(skip(session))]
pub async fn finalize(VisitorCheckout(session): VisitorCheckout) -> Result<Json<CheckoutView>> {
    session.checkout().await.request_finalize()?;
    add_breadcrumb("checkout", "Requested finalize", None);

    Ok(Json(render(&session).await))
}

/// Confirm the prompt: place the order and go back to the menu.
#[instrument(skip(state, session))]
pub async fn confirm(
    State(state): State<AppState>,
    VisitorCheckout(session): VisitorCheckout,
) -> Result<Redirect> {
    acknowledge(&state, &session, ModalAction::Confirm).await
}

/// Close the prompt. The order is placed all the same.
#[instrument(skip(state, session))]
pub async fn dismiss(
    State(state): State<AppState>,
    VisitorCheckout(session): VisitorCheckout,
) -> Result<Redirect> {
    acknowledge(&state, &session, ModalAction::Dismiss).await
}

async fn acknowledge(
    state: &AppState,
    session: &CheckoutSession,
    action: ModalAction,
) -> Result<Redirect> {
    let (receipt, view) = session.acknowledge(action).await?;
    let reference = receipt.reference.to_string();
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("reference", reference.as_str()), ("view", view.name())]),
    );

    Ok(Redirect::to(&state.config().menu_path))
}

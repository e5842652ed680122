//! The checkout state machine.
//!
//! [`Checkout`] owns the delivery form, the payment choice and the finalizer
//! state. It performs no I/O: the postal-code lookup is handed out as a
//! [`LookupTicket`] and its outcome fed back through
//! [`Checkout::apply_lookup`]; the cart store and navigator are passed in on
//! acknowledgment.
//!
//! # Postal-code validity
//!
//! Every accepted postal-code edit marks the code invalid and bumps an edit
//! generation. Only a lookup issued under the current generation may mark it
//! valid again, so a slow response for an older code can never overwrite the
//! state of a newer one.
//!
//! # Example
//!
//! ```
//! use cardapio_core::checkout::{LookupOutcome, LookupResult, PostalCodeEdit};
//! use cardapio_core::{Checkout, Locality, PaymentMethod};
//!
//! let mut checkout = Checkout::new(Locality::sao_luis());
//! let PostalCodeEdit::Lookup(ticket) = checkout.edit_postal_code("65000000")? else {
//!     unreachable!("a complete code always asks for a lookup");
//! };
//!
//! let response = LookupResult::found("São Luís", "MA", "Centro", "Rua Grande");
//! checkout.apply_lookup(&ticket, LookupOutcome::Resolved(response));
//! checkout.set_number("100")?;
//! checkout.select_payment(PaymentMethod::Pix)?;
//!
//! assert!(checkout.is_ready());
//! # Ok::<(), cardapio_core::CheckoutError>(())
//! ```

mod finalize;
mod lookup;
mod readiness;
mod summary;

pub use finalize::{
    CONFIRMATION_MESSAGE, FinalizeState, ModalAction, Navigator, OrderReceipt, View,
};
pub use lookup::{AddressVerdict, LookupApplied, LookupOutcome, LookupResult, LookupTicket};
pub use readiness::{ReadinessInputs, is_ready};
pub use summary::{OrderSummary, SummaryLine};

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::types::{
    AddressConfirmation, AddressForm, CartStore, HouseNumber, Locality, PaymentMethod,
    PostalCode, Price,
};

/// Hint under the postal-code field when no specific error applies.
pub const DEFAULT_POSTAL_CODE_HINT: &str = "O valor do CEP não é válido";

/// Errors returned by checkout transitions.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutError {
    /// Finalize was requested before the form was complete.
    #[error("the order is not ready to be placed")]
    NotReady,

    /// The confirmation prompt is open; the form is locked.
    #[error("the order is awaiting confirmation")]
    ConfirmationPending,

    /// Acknowledgment arrived with no prompt open.
    #[error("there is no order awaiting confirmation")]
    NoConfirmationPending,
}

/// Result of a postal-code keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostalCodeEdit {
    /// Not digits, or too long. The field is unchanged.
    Rejected,
    /// Stored; the code is not complete so nothing is looked up.
    Accepted,
    /// Stored and complete; run the lookup and feed it back.
    Lookup(LookupTicket),
}

/// Checkout state for one customer.
#[derive(Debug, Clone)]
pub struct Checkout {
    locality: Locality,
    form: AddressForm,
    payment: Option<PaymentMethod>,
    postal_code_valid: bool,
    error_message: Option<String>,
    generation: u64,
    lookup_in_flight: bool,
    finalize: FinalizeState,
}

impl Checkout {
    /// Create an empty checkout delivering to `locality`.
    #[must_use]
    pub fn new(locality: Locality) -> Self {
        Self {
            locality,
            form: AddressForm::default(),
            payment: None,
            postal_code_valid: false,
            error_message: None,
            generation: 0,
            lookup_in_flight: false,
            finalize: FinalizeState::Idle,
        }
    }

    // =========================================================================
    // Address Lookup Gate
    // =========================================================================

    /// Apply a postal-code keystroke.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::ConfirmationPending`] while the prompt is open.
    pub fn edit_postal_code(&mut self, input: &str) -> Result<PostalCodeEdit, CheckoutError> {
        self.ensure_editable()?;

        let Ok(postal_code) = PostalCode::parse(input) else {
            return Ok(PostalCodeEdit::Rejected);
        };

        self.error_message = None;
        self.postal_code_valid = false;
        self.generation = self.generation.wrapping_add(1);
        self.form.postal_code = postal_code;

        if self.form.postal_code.is_complete() {
            self.lookup_in_flight = true;
            Ok(PostalCodeEdit::Lookup(LookupTicket {
                generation: self.generation,
                postal_code: self.form.postal_code.clone(),
            }))
        } else {
            self.lookup_in_flight = false;
            Ok(PostalCodeEdit::Accepted)
        }
    }

    /// Feed back the outcome of a lookup.
    ///
    /// Outcomes for superseded or already-used tickets are ignored.
    pub fn apply_lookup(&mut self, ticket: &LookupTicket, outcome: LookupOutcome) -> LookupApplied {
        if !self.lookup_in_flight
            || ticket.generation != self.generation
            || ticket.postal_code != self.form.postal_code
        {
            return LookupApplied::Stale;
        }

        self.lookup_in_flight = false;
        let verdict = outcome.verdict(&self.locality);

        match &verdict {
            AddressVerdict::NotFound => self.invalidate_address(None),
            AddressVerdict::OutsideDeliveryArea => {
                self.invalidate_address(Some(self.locality.restriction_message()));
            }
            AddressVerdict::Deliverable { district, street } => {
                self.postal_code_valid = true;
                self.form.district.clone_from(district);
                self.form.street.clone_from(street);
                self.error_message = None;
            }
        }

        LookupApplied::Applied(verdict)
    }

    fn invalidate_address(&mut self, message: Option<String>) {
        self.postal_code_valid = false;
        self.form.district.clear();
        self.form.street.clear();
        self.error_message = message;
    }

    // =========================================================================
    // Other form fields
    // =========================================================================

    /// Apply a house-number keystroke. Returns false if it was rejected.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::ConfirmationPending`] while the prompt is open.
    pub fn set_number(&mut self, input: &str) -> Result<bool, CheckoutError> {
        self.ensure_editable()?;
        match HouseNumber::parse(input) {
            Ok(number) => {
                self.form.number = number;
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }

    /// Overwrite the district.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::ConfirmationPending`] while the prompt is open.
    pub fn set_district(&mut self, district: &str) -> Result<(), CheckoutError> {
        self.ensure_editable()?;
        district.clone_into(&mut self.form.district);
        Ok(())
    }

    /// Overwrite the street.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::ConfirmationPending`] while the prompt is open.
    pub fn set_street(&mut self, street: &str) -> Result<(), CheckoutError> {
        self.ensure_editable()?;
        street.clone_into(&mut self.form.street);
        Ok(())
    }

    /// Overwrite the complement.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::ConfirmationPending`] while the prompt is open.
    pub fn set_complement(&mut self, complement: &str) -> Result<(), CheckoutError> {
        self.ensure_editable()?;
        complement.clone_into(&mut self.form.complement);
        Ok(())
    }

    /// Choose a payment method, replacing any previous choice.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::ConfirmationPending`] while the prompt is open.
    pub fn select_payment(&mut self, method: PaymentMethod) -> Result<(), CheckoutError> {
        self.ensure_editable()?;
        self.payment = Some(method);
        Ok(())
    }

    const fn ensure_editable(&self) -> Result<(), CheckoutError> {
        if self.finalize.is_pending() {
            Err(CheckoutError::ConfirmationPending)
        } else {
            Ok(())
        }
    }

    // =========================================================================
    // Readiness
    // =========================================================================

    /// Whether the finalize action is enabled.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        is_ready(&ReadinessInputs {
            postal_code: &self.form.postal_code,
            district: &self.form.district,
            street: &self.form.street,
            number: &self.form.number,
            payment: self.payment,
            postal_code_valid: self.postal_code_valid,
        })
    }

    // =========================================================================
    // Order Finalizer
    // =========================================================================

    /// Open the confirmation prompt.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::ConfirmationPending`] if the prompt is
    /// already open, or [`CheckoutError::NotReady`] if the form is incomplete.
    pub fn request_finalize(&mut self) -> Result<(), CheckoutError> {
        self.ensure_editable()?;
        let Some(payment) = self.payment.filter(|_| self.is_ready()) else {
            return Err(CheckoutError::NotReady);
        };
        self.finalize = FinalizeState::ConfirmationPending { payment };
        Ok(())
    }

    /// Close the confirmation prompt and place the order.
    ///
    /// Deletes every selected item from the cart, resets the selection to
    /// empty with a zero total and navigates to the menu. The checkout is
    /// then reset to an empty form; any lookup still in flight becomes stale.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NoConfirmationPending`] if the prompt is not
    /// open. Nothing is mutated in that case.
    pub fn acknowledge<C, N>(
        &mut self,
        action: ModalAction,
        cart: &C,
        navigator: &N,
    ) -> Result<OrderReceipt, CheckoutError>
    where
        C: CartStore + ?Sized,
        N: Navigator + ?Sized,
    {
        let FinalizeState::ConfirmationPending { payment } = self.finalize else {
            return Err(CheckoutError::NoConfirmationPending);
        };

        let snapshot = cart.snapshot();
        for item in &snapshot.items {
            cart.delete_item(item.id);
        }
        cart.set_selected_items(Vec::new(), Price::ZERO);
        navigator.navigate(View::Menu);

        let receipt = OrderReceipt {
            reference: Uuid::new_v4(),
            placed_at: Utc::now(),
            items: snapshot.items,
            total: snapshot.total,
            payment,
            address: std::mem::take(&mut self.form),
            acknowledged_by: action,
        };

        self.reset();
        Ok(receipt)
    }

    fn reset(&mut self) {
        let generation = self.generation.wrapping_add(1);
        let locality = std::mem::take(&mut self.locality);
        *self = Self::new(locality);
        self.generation = generation;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn form(&self) -> &AddressForm {
        &self.form
    }

    #[must_use]
    pub const fn payment(&self) -> Option<PaymentMethod> {
        self.payment
    }

    /// Whether the card-data form should be shown.
    #[must_use]
    pub fn card_details_required(&self) -> bool {
        self.payment.is_some_and(PaymentMethod::requires_card_details)
    }

    #[must_use]
    pub const fn is_postal_code_valid(&self) -> bool {
        self.postal_code_valid
    }

    /// The specific postal-code error, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Text under the postal-code field, or `None` when the code is good.
    #[must_use]
    pub fn postal_code_hint(&self) -> Option<&str> {
        if self.postal_code_valid && self.form.postal_code.is_complete() {
            None
        } else {
            Some(self.error_message().unwrap_or(DEFAULT_POSTAL_CODE_HINT))
        }
    }

    /// Whether a lookup for the current code is outstanding.
    #[must_use]
    pub const fn is_lookup_in_flight(&self) -> bool {
        self.lookup_in_flight
    }

    #[must_use]
    pub const fn finalize_state(&self) -> FinalizeState {
        self.finalize
    }

    #[must_use]
    pub const fn locality(&self) -> &Locality {
        &self.locality
    }

    /// Current edit generation.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Address lines for the confirmation panel.
    #[must_use]
    pub fn address_confirmation(&self) -> Option<AddressConfirmation> {
        self.form.confirmation(&self.locality)
    }
}

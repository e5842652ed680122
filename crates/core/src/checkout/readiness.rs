//! Whether an order can be placed.

use crate::types::{HouseNumber, PaymentMethod, PostalCode};

/// Everything readiness depends on, borrowed from the checkout.
#[derive(Debug, Clone, Copy)]
pub struct ReadinessInputs<'a> {
    pub postal_code: &'a PostalCode,
    pub district: &'a str,
    pub street: &'a str,
    pub number: &'a HouseNumber,
    pub payment: Option<PaymentMethod>,
    pub postal_code_valid: bool,
}

/// True iff every address field has content, the postal code is complete
/// and confirmed by a lookup, and a payment method is chosen.
///
/// Card details are not consulted even for card payments.
#[must_use]
pub fn is_ready(inputs: &ReadinessInputs<'_>) -> bool {
    !inputs.postal_code.is_empty()
        && !inputs.district.is_empty()
        && !inputs.number.is_empty()
        && !inputs.street.is_empty()
        && inputs.payment.is_some()
        && inputs.postal_code_valid
        && inputs.postal_code.is_complete()
}

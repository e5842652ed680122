//! Postal-code lookup requests and how their responses are judged.

use serde::{Deserialize, Serialize};

use crate::types::{Locality, PostalCode};

/// Permission to run one postal-code lookup.
///
/// Issued by [`Checkout::edit_postal_code`](super::Checkout::edit_postal_code)
/// when the code reaches its full length. The ticket remembers the edit
/// generation it was issued under; a response is only applied while that
/// generation is still current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub(crate) generation: u64,
    pub(crate) postal_code: PostalCode,
}

impl LookupTicket {
    /// The complete postal code to resolve.
    #[must_use]
    pub const fn postal_code(&self) -> &PostalCode {
        &self.postal_code
    }

    /// Edit generation this lookup belongs to.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// What the postal-code service said about a code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    pub found: bool,
    pub city: String,
    pub state: String,
    pub district: String,
    pub street: String,
}

impl LookupResult {
    /// A response for a code the service does not know.
    #[must_use]
    pub fn not_found() -> Self {
        Self::default()
    }

    /// A response for a resolved code.
    #[must_use]
    pub fn found(
        city: impl Into<String>,
        state: impl Into<String>,
        district: impl Into<String>,
        street: impl Into<String>,
    ) -> Self {
        Self {
            found: true,
            city: city.into(),
            state: state.into(),
            district: district.into(),
            street: street.into(),
        }
    }
}

/// Result of one lookup attempt, as handed back to the checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The service answered.
    Resolved(LookupResult),
    /// The service could not be reached or answered garbage.
    Failed,
}

impl LookupOutcome {
    /// Judge the outcome against the delivery area.
    ///
    /// Transport failures are indistinguishable from unknown codes.
    #[must_use]
    pub fn verdict(self, locality: &Locality) -> AddressVerdict {
        match self {
            Self::Failed => AddressVerdict::NotFound,
            Self::Resolved(result) if !result.found => AddressVerdict::NotFound,
            Self::Resolved(result) if !locality.contains(&result.city, &result.state) => {
                AddressVerdict::OutsideDeliveryArea
            }
            Self::Resolved(result) => AddressVerdict::Deliverable {
                district: result.district,
                street: result.street,
            },
        }
    }
}

/// The three ways a lookup can leave the address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AddressVerdict {
    NotFound,
    OutsideDeliveryArea,
    Deliverable { district: String, street: String },
}

impl AddressVerdict {
    /// Short name for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::OutsideDeliveryArea => "outside_delivery_area",
            Self::Deliverable { .. } => "deliverable",
        }
    }
}

/// Whether a lookup response was taken into account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupApplied {
    Applied(AddressVerdict),
    /// The postal code was edited after the ticket was issued, or the ticket
    /// was already used.
    Stale,
}

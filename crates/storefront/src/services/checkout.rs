//! Per-visitor checkout sessions.
//!
//! A [`CheckoutSession`] pairs a visitor's [`Checkout`] with their cart and
//! drives the postal-code lookup. The checkout lock is released while the
//! lookup is awaited; the outcome is fed back through the ticket, so edits
//! made in the meantime win over the slower response.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use cardapio_core::checkout::{
    AddressVerdict, LookupApplied, LookupOutcome, LookupTicket, ModalAction, Navigator,
    OrderReceipt, PostalCodeEdit, View,
};
use cardapio_core::{Checkout, CheckoutError, Locality};
use moka::future::Cache;
use serde::Serialize;
use tokio::sync::{Mutex as AsyncMutex, MutexGuard};
use tracing::{Instrument, error, info, instrument, warn};
use uuid::Uuid;

use super::cart::InMemoryCartStore;
use super::postal_code::PostalCodeLookup;

/// What became of one postal-code keystroke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PostalCodeUpdate {
    /// Not digits, or too long; the field is unchanged.
    Rejected,
    /// Stored; incomplete codes are not looked up.
    Accepted,
    /// The lookup came back and was applied.
    Resolved { verdict: AddressVerdict },
    /// Another edit landed while the lookup was running.
    Superseded,
}

/// Navigator that remembers the last requested view.
#[derive(Debug, Default)]
pub struct RecordedNavigation(Mutex<Option<View>>);

impl RecordedNavigation {
    #[must_use]
    pub fn take(&self) -> Option<View> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

impl Navigator for RecordedNavigation {
    fn navigate(&self, view: View) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(view);
    }
}

/// One visitor's checkout and cart.
#[derive(Debug)]
pub struct CheckoutSession {
    checkout: AsyncMutex<Checkout>,
    cart: InMemoryCartStore,
}

impl CheckoutSession {
    #[must_use]
    pub fn new(locality: Locality) -> Self {
        Self {
            checkout: AsyncMutex::new(Checkout::new(locality)),
            cart: InMemoryCartStore::new(),
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &InMemoryCartStore {
        &self.cart
    }

    /// Lock the checkout for reading or a synchronous edit.
    pub async fn checkout(&self) -> MutexGuard<'_, Checkout> {
        self.checkout.lock().await
    }

    /// Apply a postal-code keystroke, resolving the code when it is complete.
    ///
    /// The lookup runs on its own task and is applied even if the caller
    /// stops waiting, so the in-flight flag always clears.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::ConfirmationPending`] while the prompt is open.
    #[instrument(skip(self, lookup))]
    pub async fn edit_postal_code(
        self: &Arc<Self>,
        lookup: Arc<dyn PostalCodeLookup>,
        input: &str,
    ) -> Result<PostalCodeUpdate, CheckoutError> {
        let edit = self.checkout.lock().await.edit_postal_code(input)?;
        let ticket = match edit {
            PostalCodeEdit::Rejected => return Ok(PostalCodeUpdate::Rejected),
            PostalCodeEdit::Accepted => return Ok(PostalCodeUpdate::Accepted),
            PostalCodeEdit::Lookup(ticket) => ticket,
        };

        let task = tokio::spawn(
            Arc::clone(self)
                .resolve(lookup, ticket.clone())
                .in_current_span(),
        );
        let applied = match task.await {
            Ok(applied) => applied,
            Err(e) => {
                error!(error = %e, "Postal code lookup task failed");
                self.checkout
                    .lock()
                    .await
                    .apply_lookup(&ticket, LookupOutcome::Failed)
            }
        };

        match applied {
            LookupApplied::Applied(verdict) => {
                info!(verdict = verdict.as_str(), "Postal code checked");
                Ok(PostalCodeUpdate::Resolved { verdict })
            }
            LookupApplied::Stale => {
                info!(generation = ticket.generation(), "Discarded stale lookup");
                Ok(PostalCodeUpdate::Superseded)
            }
        }
    }

    async fn resolve(
        self: Arc<Self>,
        lookup: Arc<dyn PostalCodeLookup>,
        ticket: LookupTicket,
    ) -> LookupApplied {
        let outcome = match lookup.lookup(ticket.postal_code()).await {
            Ok(result) => LookupOutcome::Resolved(result),
            Err(e) => {
                warn!(error = %e, postal_code = %ticket.postal_code(), "Postal code lookup failed");
                LookupOutcome::Failed
            }
        };

        self.checkout.lock().await.apply_lookup(&ticket, outcome)
    }

    /// Close the confirmation prompt, clearing the cart.
    ///
    /// Returns the receipt and the view the customer should be sent to.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NoConfirmationPending`] if the prompt is not open.
    #[instrument(skip(self))]
    pub async fn acknowledge(
        &self,
        action: ModalAction,
    ) -> Result<(OrderReceipt, View), CheckoutError> {
        let navigation = RecordedNavigation::default();
        let receipt = self
            .checkout
            .lock()
            .await
            .acknowledge(action, &self.cart, &navigation)?;

        info!(
            reference = %receipt.reference,
            items = receipt.item_count(),
            total = %receipt.total,
            payment = receipt.payment.as_str(),
            "Order placed"
        );

        Ok((receipt, navigation.take().unwrap_or(View::Menu)))
    }
}

/// All live checkout sessions, keyed by visitor id.
///
/// Sessions idle for longer than the configured time are dropped.
#[derive(Clone)]
pub struct CheckoutSessions {
    sessions: Cache<Uuid, Arc<CheckoutSession>>,
    locality: Locality,
}

impl CheckoutSessions {
    #[must_use]
    pub fn new(locality: Locality, idle: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(10_000)
            .time_to_idle(idle)
            .build();

        Self { sessions, locality }
    }

    /// The visitor's session, created on first use.
    pub async fn get_or_create(&self, visitor: Uuid) -> Arc<CheckoutSession> {
        self.sessions
            .get_with(visitor, async {
                Arc::new(CheckoutSession::new(self.locality.clone()))
            })
            .await
    }
}

//! Order finalization: confirmation prompt and its side effects.
//!
//! ```text
//! Idle ──request_finalize()──► ConfirmationPending ──acknowledge()──► Idle
//!  ▲ (only when ready)                                  │
//!  └───────── cart cleared, navigate to menu ◄──────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{AddressForm, CartItem, PaymentMethod, Price};

/// Message shown in the confirmation prompt.
pub const CONFIRMATION_MESSAGE: &str =
    "O pedido foi finalizado! Aguarde enquanto preparamos o seu pedido";

/// Where the finalizer is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum FinalizeState {
    #[default]
    Idle,
    /// The prompt is open; nothing has been mutated yet.
    ConfirmationPending { payment: PaymentMethod },
}

impl FinalizeState {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::ConfirmationPending { .. })
    }
}

/// How the customer left the confirmation prompt.
///
/// Both actions acknowledge the order. The prompt announces an order that
/// has already been placed, so closing it is not a way to back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalAction {
    Confirm,
    Dismiss,
}

/// Views the checkout can send the customer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Menu,
}

impl View {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Menu => "menu",
        }
    }
}

/// Navigation collaborator.
pub trait Navigator {
    /// Ask for the customer to be taken to `view`.
    fn navigate(&self, view: View);
}

/// Record of an acknowledged order. Logged, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderReceipt {
    pub reference: Uuid,
    pub placed_at: DateTime<Utc>,
    pub items: Vec<CartItem>,
    pub total: Price,
    pub payment: PaymentMethod,
    pub address: AddressForm,
    pub acknowledged_by: ModalAction,
}

impl OrderReceipt {
    /// Number of units ordered.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

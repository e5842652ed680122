//! Cart items and the cart store seam.

use serde::{Deserialize, Serialize};

use super::id::CartItemId;
use super::price::Price;

/// A dish in the customer's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub name: String,
    /// Path of the dish image, relative to the static asset root.
    pub image: String,
    pub unit_price: Price,
    pub quantity: u32,
}

impl CartItem {
    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }

    /// `unit_price × quantity`, or `None` if it does not fit in a [`Price`].
    #[must_use]
    pub fn checked_line_total(&self) -> Option<Price> {
        self.unit_price.checked_times(self.quantity)
    }
}

/// Read-only view of the items selected for checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub total: Price,
}

impl CartSnapshot {
    /// Number of units across all lines (a line with quantity 3 counts 3).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |count, item| count.saturating_add(item.quantity))
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The cart store the checkout reads from and clears on finalization.
///
/// The store owns cart state and serializes its own mutations; the checkout
/// only reads the selection and issues the two writes below. Local mutations
/// are assumed to always succeed.
pub trait CartStore: Send + Sync {
    /// Items currently selected for checkout.
    fn selected_items(&self) -> Vec<CartItem>;

    /// Total price of the selection, as computed by the store.
    fn selected_total(&self) -> Price;

    /// Remove an item from the cart entirely.
    fn delete_item(&self, id: CartItemId);

    /// Replace the selection and its total.
    fn set_selected_items(&self, items: Vec<CartItem>, total: Price);

    /// Snapshot of the current selection.
    fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.selected_items(),
            total: self.selected_total(),
        }
    }
}

//! In-memory cart store.
//!
//! Each visitor gets one store. It holds every dish added to the cart and
//! the subset selected for checkout, along with the selection total.

use std::sync::{Mutex, PoisonError};

use cardapio_core::{CartItem, CartItemId, CartStore, Price};
use thiserror::Error;

/// Errors from cart operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CartError {
    #[error("cart item {0} is not in the cart")]
    UnknownItem(CartItemId),

    #[error("cart total is too large")]
    TooLarge,
}

#[derive(Debug, Default)]
struct CartState {
    items: Vec<CartItem>,
    selected: Vec<CartItem>,
    selected_total: Price,
}

/// Cart store kept in process memory.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    state: Mutex<CartState>,
}

impl InMemoryCartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut CartState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Add a dish; an item with the same id has its quantity increased.
    ///
    /// The total of the whole cart always fits in a [`Price`], so any
    /// selection of it can be summed.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::TooLarge`] if the quantity or the cart total
    /// would overflow; the cart is left unchanged in that case.
    pub fn add_item(&self, item: CartItem) -> Result<(), CartError> {
        self.with_state(|state| {
            let mut items = state.items.clone();
            if let Some(existing) = items.iter_mut().find(|i| i.id == item.id) {
                existing.quantity = existing
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or(CartError::TooLarge)?;
            } else {
                items.push(item);
            }

            items
                .iter()
                .try_fold(Price::ZERO, |total, item| {
                    total.checked_add(item.checked_line_total()?)
                })
                .ok_or(CartError::TooLarge)?;

            state.items = items;
            Ok(())
        })
    }

    /// Every dish in the cart, selected or not.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.with_state(|state| state.items.clone())
    }

    /// Select the given ids for checkout and recompute the total.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownItem`] if an id is not in the cart; the
    /// selection is left unchanged in that case.
    pub fn select(&self, ids: &[CartItemId]) -> Result<(), CartError> {
        self.with_state(|state| {
            let selected = ids
                .iter()
                .map(|id| {
                    state
                        .items
                        .iter()
                        .find(|item| item.id == *id)
                        .cloned()
                        .ok_or(CartError::UnknownItem(*id))
                })
                .collect::<Result<Vec<_>, _>>()?;

            state.selected_total = selected.iter().map(CartItem::line_total).sum();
            state.selected = selected;
            Ok(())
        })
    }

    /// Select every dish in the cart.
    pub fn select_all(&self) {
        self.with_state(|state| {
            state.selected = state.items.clone();
            state.selected_total = state.selected.iter().map(CartItem::line_total).sum();
        });
    }
}

impl CartStore for InMemoryCartStore {
    fn selected_items(&self) -> Vec<CartItem> {
        self.with_state(|state| state.selected.clone())
    }

    fn selected_total(&self) -> Price {
        self.with_state(|state| state.selected_total)
    }

    fn delete_item(&self, id: CartItemId) {
        self.with_state(|state| state.items.retain(|item| item.id != id));
    }

    fn set_selected_items(&self, items: Vec<CartItem>, total: Price) {
        self.with_state(|state| {
            state.selected = items;
            state.selected_total = total;
        });
    }
}

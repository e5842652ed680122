//! Cardápio Core - Shared types and checkout logic.
//!
//! This crate provides the types and the checkout state machine used by the
//! Cardápio components:
//! - `storefront` - HTTP service hosting the cart and checkout flow
//! - `integration-tests` - End-to-end checkout flows against mock collaborators
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure state transitions - no
//! I/O, no HTTP clients. The postal-code lookup is driven from the outside:
//! the checkout hands out a [`checkout::LookupTicket`] and later accepts the
//! outcome, so the crate never awaits anything itself.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, postal codes, addresses,
//!   payment methods and cart items
//! - [`checkout`] - Address lookup gate, readiness evaluation and order
//!   finalization

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod types;

pub use checkout::{Checkout, CheckoutError};
pub use types::*;

//! Core types for Cardápio.
//!
//! This module provides type-safe wrappers for the checkout domain.

pub mod address;
pub mod cart;
pub mod id;
pub mod payment;
pub mod postal_code;
pub mod price;

pub use address::{AddressConfirmation, AddressForm, HouseNumber, HouseNumberError, Locality};
pub use cart::{CartItem, CartSnapshot, CartStore};
pub use id::*;
pub use payment::PaymentMethod;
pub use postal_code::{PostalCode, PostalCodeError};
pub use price::Price;

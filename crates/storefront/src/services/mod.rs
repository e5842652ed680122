//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `postal_code` - Postal-code (CEP) resolution via ViaCEP
//! - `cart` - In-memory cart store, one per visitor
//! - `checkout` - Per-visitor checkout sessions and the lookup driver

pub mod cart;
pub mod checkout;
pub mod postal_code;

pub use cart::{CartError, InMemoryCartStore};
pub use checkout::{CheckoutSession, CheckoutSessions, PostalCodeUpdate, RecordedNavigation};
pub use postal_code::{LookupError, PostalCodeLookup, ViaCepClient};

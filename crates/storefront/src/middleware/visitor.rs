//! Visitor extractor.
//!
//! Resolves the visitor's [`CheckoutSession`] from the session cookie,
//! assigning a fresh visitor id on first contact.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use uuid::Uuid;

use super::session::keys;
use crate::error::AppError;
use crate::services::CheckoutSession;
use crate::state::AppState;

/// Extractor for the current visitor's checkout.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(VisitorCheckout(session): VisitorCheckout) -> impl IntoResponse {
///     let checkout = session.checkout().await;
///     checkout.is_ready().to_string()
/// }
/// ```
pub struct VisitorCheckout(pub Arc<CheckoutSession>);

impl FromRequestParts<AppState> for VisitorCheckout {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let visitor = visitor_id(session).await?;

        Ok(Self(state.sessions().get_or_create(visitor).await))
    }
}

/// The visitor id stored in the session, created on first use.
async fn visitor_id(session: &Session) -> Result<Uuid, AppError> {
    if let Some(id) = session.get::<Uuid>(keys::VISITOR_ID).await? {
        return Ok(id);
    }

    let id = Uuid::new_v4();
    session.insert(keys::VISITOR_ID, id).await?;
    tracing::debug!(visitor = %id, "New visitor");
    Ok(id)
}

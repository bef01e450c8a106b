//! Request guards for editor endpoints
//!
//! Both extractors run before the body is touched, so a rejected caller
//! never reaches the page store.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::error::ApiError;
use super::state::AppState;
use crate::auth::{Caller, Capability, EDITOR_ACTION};

pub const NONCE_HEADER: &str = "X-Pagebox-Nonce";

/// Authenticated caller holding the editor capability
#[derive(Debug, Clone)]
pub struct Editor(pub Caller);

impl FromRequestParts<AppState> for Editor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = state.auth.authenticate(&parts.headers).await?;
        caller.require(Capability::EditPages)?;
        Ok(Editor(caller))
    }
}

/// [`Editor`] that also presented a valid nonce for the editor action
#[derive(Debug, Clone)]
pub struct VerifiedEditor(pub Caller);

impl FromRequestParts<AppState> for VerifiedEditor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = state.auth.authenticate(&parts.headers).await?;

        let nonce = parts
            .headers
            .get(NONCE_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        state.nonces.verify(&caller.user, EDITOR_ACTION, nonce)?;

        caller.require(Capability::EditPages)?;
        Ok(VerifiedEditor(caller))
    }
}

//! Authentication middleware.
//!
//! The sync trigger is meant for a scheduler, not a browser; callers
//! present the shared bearer secret from configuration. No token is ever
//! issued, so rejection happens before any side effect.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};

use crate::AppState;

/// Proof that the caller presented the configured bearer secret.
#[derive(Debug, Clone)]
pub struct AuthCaller;

impl FromRequestParts<AppState> for AuthCaller {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        match auth_header {
            Some(header) if header.starts_with("Bearer ") => {
                let token = header.trim_start_matches("Bearer ");

                if token == state.config.cron_secret {
                    Ok(AuthCaller)
                } else {
                    tracing::warn!("Unauthorized access attempt");
                    Err((StatusCode::UNAUTHORIZED, "Invalid bearer token"))
                }
            }
            Some(_) => Err((
                StatusCode::UNAUTHORIZED,
                "Invalid authorization header format",
            )),
            None => Err((StatusCode::UNAUTHORIZED, "Missing authorization header")),
        }
    }
}

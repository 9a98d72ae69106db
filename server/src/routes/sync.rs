//! Sync trigger route.

use axum::{extract::State, routing::post, Json, Router};

use crate::auth::AuthCaller;
use crate::error::Result;
use crate::handlers::{handle_sync, SyncResponse};
use crate::AppState;

/// Create sync routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/sync", post(sync_handler))
}

/// POST /sync - run one full catalog sync pass.
async fn sync_handler(
    State(state): State<AppState>,
    _auth: AuthCaller,
) -> Result<Json<SyncResponse>> {
    let response = handle_sync(&state).await?;
    Ok(Json(response))
}

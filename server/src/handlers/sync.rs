//! Sync pipeline handler: session, paged fetch, reconcile, report.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::handlers::compare_and_sync;
use crate::remote::{fetch_all, SessionToken};
use crate::AppState;
use stocksync_engine::{RemoteItem, SyncOutcome};

/// Response for a completed sync pass.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    /// Human-readable summary
    pub message: String,
    /// Item count reported by the remote collection
    pub total_items: i64,
    /// Items actually retrieved across all pages
    pub items_fetched: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Non-fatal validation and batch-write failures
    pub errors: Vec<String>,
    /// Wall-clock duration of the whole pass in milliseconds
    pub elapsed_ms: u128,
}

/// Runs one full sync pass.
///
/// Login, count, fetch, and initial-read failures are fatal. The session
/// is released best-effort afterwards either way; a logout failure is
/// only logged.
pub async fn handle_sync(state: &AppState) -> Result<SyncResponse> {
    let started = Instant::now();

    let token = state.remote.login().await?;
    tracing::info!("Logged in to remote API");

    let result = fetch_and_reconcile(state, &token).await;

    if let Err(e) = state.remote.logout(&token).await {
        tracing::warn!("Logout failed: {}", e);
    } else {
        tracing::info!("Logged out of remote API");
    }

    let (total_items, items_fetched, outcome) = result?;

    Ok(SyncResponse {
        message: "Catalog sync completed".to_string(),
        total_items,
        items_fetched,
        created: outcome.created,
        updated: outcome.updated,
        unchanged: outcome.unchanged,
        errors: outcome.errors,
        elapsed_ms: started.elapsed().as_millis(),
    })
}

/// Fetch phase plus reconcile phase, separated so the caller releases
/// the session no matter where this fails.
async fn fetch_and_reconcile(
    state: &AppState,
    token: &SessionToken,
) -> Result<(i64, usize, SyncOutcome)> {
    let total_items = state.remote.item_count(token).await?;
    tracing::info!("Remote collection reports {} items", total_items);

    let items = fetch_items(state, token.clone(), total_items).await?;
    tracing::info!("Fetched {} items across all pages", items.len());

    let outcome = compare_and_sync(&state.pool, &items).await?;

    Ok((total_items, items.len(), outcome))
}

/// Runs the paged fetch under the configured deadline.
async fn fetch_items(
    state: &AppState,
    token: SessionToken,
    total_count: i64,
) -> Result<Vec<RemoteItem>> {
    let cancel = CancellationToken::new();

    // Arm the fetch deadline; workers observe the token cooperatively.
    let deadline = tokio::spawn({
        let cancel = cancel.clone();
        let timeout = state.config.fetch_timeout;
        async move {
            tokio::time::sleep(timeout).await;
            cancel.cancel();
        }
    });

    let fetched = fetch_all(
        Arc::new(state.remote.clone()),
        token,
        total_count,
        state.config.page_size,
        state.config.fetch_workers,
        cancel,
    )
    .await;

    deadline.abort();
    Ok(fetched?)
}

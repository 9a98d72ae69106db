//! Compare-and-sync: classify remote items and dispatch batched writes.

use crate::db::ProductStore;
use crate::error::Result;
use stocksync_engine::{plan_sync, RemoteItem, SyncOutcome, SyncPlan};

/// Reconciles the fetched remote items against the products table.
///
/// The full table is read once (an error here is fatal to the pass), the
/// diff is computed, and the create and update batches are dispatched
/// concurrently. A batch failure is collected into the outcome instead
/// of aborting the sibling batch. Counts reflect the dispatched batch
/// sizes; inserts skipped on a handle conflict still count as created.
pub async fn compare_and_sync<S: ProductStore>(
    store: &S,
    remote_items: &[RemoteItem],
) -> Result<SyncOutcome> {
    let persisted = store.get_all().await?;

    let SyncPlan {
        creates,
        updates,
        unchanged,
        validation_errors,
    } = plan_sync(remote_items, &persisted);

    let mut outcome = SyncOutcome {
        created: 0,
        updated: 0,
        unchanged,
        errors: validation_errors,
    };

    let create = async {
        if creates.is_empty() {
            return Ok(0);
        }
        store.create_batch(&creates).await.map(|_| creates.len())
    };
    let update = async {
        if updates.is_empty() {
            return Ok(0);
        }
        store.update_batch(&updates).await.map(|_| updates.len())
    };

    let (created, updated) = tokio::join!(create, update);

    match created {
        Ok(count) => {
            outcome.created = count;
            if count > 0 {
                tracing::info!("Created {} new products", count);
            }
        }
        Err(e) => outcome.errors.push(format!("batch create failed: {e}")),
    }

    match updated {
        Ok(count) => {
            outcome.updated = count;
            if count > 0 {
                tracing::info!("Updated {} products", count);
            }
        }
        Err(e) => outcome.errors.push(format!("batch update failed: {e}")),
    }

    Ok(outcome)
}

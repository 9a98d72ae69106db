//! Create/update/unchanged classification for a sync pass.
//!
//! Given the full remote item set and the full persisted product set,
//! [`plan_sync`] partitions every valid remote item into exactly one of
//! three buckets and collects a validation error for each invalid item.
//! The plan itself touches nothing; the caller dispatches the batches.
//!
//! Matching is by normalized title, as in the upstream catalog. This is a
//! known limitation: two remote items whose names normalize equally both
//! classify as creates (the second insert dies on the handle conflict),
//! and a renamed item is indistinguishable from a delete plus a create.

use crate::item::{display_name, RemoteItem};
use crate::normalize::{comparison_key, derive_handle};
use crate::product::{NewProduct, ProductChange, ProductRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The partition produced by one classification pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncPlan {
    /// Items with no matching persisted row
    pub creates: Vec<NewProduct>,
    /// Items whose persisted row differs in title or handle
    pub updates: Vec<ProductChange>,
    /// Items whose persisted row matches exactly
    pub unchanged: usize,
    /// One message per item that failed display-name extraction
    pub validation_errors: Vec<String>,
}

/// Counts reported to the caller once the batches are dispatched.
///
/// `created` and `updated` reflect the dispatched batch sizes, not rows
/// actually affected; inserts skipped on a handle conflict still count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub errors: Vec<String>,
}

/// Classifies remote items against persisted products.
///
/// Persisted rows are indexed by [`comparison_key`]; every valid remote
/// item lands in exactly one of create/update/unchanged.
pub fn plan_sync(remote_items: &[RemoteItem], persisted: &[ProductRecord]) -> SyncPlan {
    let mut by_key: HashMap<String, &ProductRecord> = HashMap::with_capacity(persisted.len());
    for record in persisted {
        by_key.insert(comparison_key(&record.title), record);
    }

    let mut plan = SyncPlan::default();
    for item in remote_items {
        let title = match display_name(item) {
            Ok(name) => name,
            Err(e) => {
                plan.validation_errors.push(e.to_string());
                continue;
            }
        };

        let handle = derive_handle(title);
        match by_key.get(&comparison_key(title)) {
            None => plan.creates.push(NewProduct {
                title: title.to_string(),
                handle,
            }),
            Some(existing) if existing.title == title && existing.handle == handle => {
                plan.unchanged += 1;
            }
            Some(existing) => plan.updates.push(ProductChange {
                id: existing.id,
                title: title.to_string(),
                handle,
            }),
        }
    }

    plan
}

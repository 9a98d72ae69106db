//! # Stocksync Engine
//!
//! Pure reconciliation logic for syncing a remote item catalog into a
//! local product table.
//!
//! The engine decides *what* to write, never *how*: it plans page
//! requests over the remote collection, normalizes display names, and
//! partitions remote items into create/update/unchanged sets. Dispatching
//! the resulting batches is the caller's job.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine has no knowledge of HTTP, databases, or runtimes
//! - **Deterministic**: the same inputs always produce the same plan
//! - **Testable**: pure logic, no mocks needed
//!
//! ## Core Concepts
//!
//! ### Items
//!
//! Remote items are open-ended JSON objects ([`RemoteItem`]). The engine
//! reads only the `ItemName` field and treats everything else as opaque.
//! An item whose display name is absent, non-string, or empty fails
//! extraction; the failure is recorded per item, never for the whole pass.
//!
//! ### Keys and handles
//!
//! Matching against persisted rows uses [`comparison_key`], a trimmed and
//! lowercased form of the title that is never stored. [`derive_handle`]
//! produces the URL-safe identifier that *is* stored next to the title.
//!
//! ### Diffing
//!
//! [`plan_sync`] indexes the persisted rows by comparison key and assigns
//! every valid remote item to exactly one bucket: create (no match),
//! update (match with a differing title or handle), or unchanged.
//!
//! ## Quick Start
//!
//! ```rust
//! use stocksync_engine::{plan_sync, ProductRecord, RemoteItem};
//! use serde_json::json;
//!
//! let remote: Vec<RemoteItem> = [
//!     json!({"ItemName": "Product A", "ItemCode": "A001"}),
//!     json!({"ItemName": "Product B", "ItemCode": "B001"}),
//! ]
//! .iter()
//! .map(|v| v.as_object().unwrap().clone())
//! .collect();
//!
//! let persisted = vec![ProductRecord {
//!     id: 1,
//!     title: "Product A".to_string(),
//!     handle: "product-a".to_string(),
//! }];
//!
//! let plan = plan_sync(&remote, &persisted);
//! assert_eq!(plan.creates.len(), 1); // Product B is new
//! assert_eq!(plan.updates.len(), 0);
//! assert_eq!(plan.unchanged, 1); // Product A matches exactly
//! ```

pub mod diff;
pub mod error;
pub mod item;
pub mod normalize;
pub mod page;
pub mod product;

// Re-export main types at crate root
pub use diff::{plan_sync, SyncOutcome, SyncPlan};
pub use error::Error;
pub use item::{display_name, RemoteItem, ITEM_NAME_FIELD};
pub use normalize::{comparison_key, derive_handle};
pub use page::{plan_pages, PageRequest};
pub use product::{NewProduct, ProductChange, ProductRecord};

/// Type aliases for clarity
pub type ProductId = i32;

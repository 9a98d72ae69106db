//! Remote item payloads.
//!
//! The remote collection returns open-ended JSON objects. The engine
//! never deserializes them into a fixed shape; it reads the display-name
//! field and leaves everything else opaque for the caller.

use crate::error::{Error, Result};
use serde_json::Value;

/// Field holding an item's display name.
pub const ITEM_NAME_FIELD: &str = "ItemName";

/// An item as returned by the remote collection: an open-ended mapping of
/// field name to JSON value.
pub type RemoteItem = serde_json::Map<String, Value>;

/// Extracts the display name from a remote item.
///
/// Fails when the field is absent, not a string, or exactly the empty
/// string. The emptiness check is exact: a whitespace-only name passes
/// extraction and is normalized during matching.
pub fn display_name(item: &RemoteItem) -> Result<&str> {
    match item.get(ITEM_NAME_FIELD) {
        Some(Value::String(name)) if !name.is_empty() => Ok(name),
        _ => Err(Error::InvalidItemField(ITEM_NAME_FIELD)),
    }
}

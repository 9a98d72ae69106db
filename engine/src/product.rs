//! Product data contracts shared between the diff engine and callers.

use crate::ProductId;
use serde::{Deserialize, Serialize};

/// A product row as persisted in the local store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Primary key assigned by the store
    pub id: ProductId,
    /// Display title, as last written
    pub title: String,
    /// URL-safe handle derived from the title at last write
    pub handle: String,
}

/// A product to insert, produced by the diff for items with no match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    pub handle: String,
}

/// An update to an existing product, addressed by primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductChange {
    pub id: ProductId,
    pub title: String,
    pub handle: String,
}

//! Request handlers for the sync pipeline.

mod reconcile;
mod sync;

pub use reconcile::*;
pub use sync::*;

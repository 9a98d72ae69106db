//! Authentication for the sync trigger endpoint.

mod middleware;

pub use middleware::*;

//! Remote Service Layer access: session client and paged fetcher.

mod client;
mod fetcher;

pub use client::*;
pub use fetcher::*;

//! Search gateway: wraps the remote index behind [`SearchBackend`].
//!
//! One call, one request: no paging, retries or re-ranking. Results come
//! back in the order the service ranked them.

pub mod client;
pub mod types;

pub use client::{AzureSearchClient, SearchBackend, API_VERSION};
pub use types::*;

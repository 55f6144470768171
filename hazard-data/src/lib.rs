//! HTTP access to an OGC API Features server.
//!
//! Responsibilities:
//! - Implement [`hazard_core::PageSource`] over `reqwest`.
//! - Offer a synchronous client that drives fetches on an owned runtime.
//!
//! Boundaries:
//! - Pagination rules live in `hazard-core`; this crate only moves bytes.
//! - No retries. A failed request surfaces as a transport error.

mod client;
mod source;

pub use client::FeatureApiClient;
pub use source::{
    ClientBuildError, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, HttpPageSource, HttpPageSourceConfig,
};

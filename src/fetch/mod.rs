//! Fetch layer: request execution, classification, retry, and fallback.
//!
//! - `executor`: one request with one strategy, classified outcome
//! - `retry`: the shared bounded retry/backoff primitive
//! - `fallback`: strategy sweep × per-source retries × source rotation

pub mod executor;
pub mod fallback;
pub mod retry;

pub use executor::{FailureKind, FetchExecutor, FetchOutcome};
pub use fallback::{Acquisition, FallbackController, TerminalFailure};
pub use retry::{BackoffShape, RetryPolicy};

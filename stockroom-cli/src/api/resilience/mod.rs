//! Resilience features for API reads
//!
//! Provides the retry policy applied to catalog fetches.

pub mod retry;

pub use retry::{RetryConfig, RetryPolicy};

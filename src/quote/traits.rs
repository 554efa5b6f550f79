//! Trait abstraction for the quote service to enable mocking in tests

use async_trait::async_trait;

use super::client::{QuoteError, QuoteReceipt, QuoteRequest};

/// Trait for quote submission, enabling mocking in tests.
///
/// The current implementation is simulated; a real transport replaces it
/// behind this seam without touching the wizard state machine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteService: Send + Sync {
    /// Submit a validated quote request and wait for the receipt
    async fn submit_quote(&self, request: QuoteRequest) -> Result<QuoteReceipt, QuoteError>;
}

// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Ledger client traits and account types
//!
//! This crate provides the narrow interface through which the census consumes
//! a ledger node, so that the pipeline can be driven by the real JSON-RPC
//! client or by an in-memory fake in tests.
//!
//! # Core Abstractions
//!
//! - **`LedgerClient` Trait**: program-account scans, parsed account lookups
//!   and health probing, all async
//! - **Account Types**: [`AccountFilter`], [`KeyedAccount`], [`ParsedAccount`]
//! - **Error Handling**: [`LedgerError`] classifies transport, rate limit and
//!   payload failures

use shared_types::Address;
use thiserror::Error;

pub mod health;
pub mod types;

pub use health::*;
pub use types::*;

/// Read-only access to ledger account state
///
/// Implementations must be shareable across concurrent lookups; a single
/// client instance serves every in-flight request of a batch.
pub trait LedgerClient: Send + Sync {
    /// Check the health of the ledger node
    ///
    /// # Errors
    ///
    /// Returns an error if the health probe itself cannot be performed
    fn health_check(&self) -> impl Future<Output = Result<HealthStatus, LedgerError>> + Send;

    /// Fetch every account owned by `program_id` that satisfies all `filters`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the response cannot be decoded
    fn get_program_accounts(
        &self,
        program_id: &Address,
        filters: &[AccountFilter],
    ) -> impl Future<Output = Result<Vec<KeyedAccount>, LedgerError>> + Send;

    /// Fetch the parsed representation of a single account
    ///
    /// # Returns
    ///
    /// * `Ok(Some(account))` if the account exists and could be parsed
    /// * `Ok(None)` if the node reports no state for the account
    /// * `Err(error)` if the lookup failed
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures, rate limiting or malformed payloads
    fn get_parsed_account(
        &self,
        address: &Address,
    ) -> impl Future<Output = Result<Option<ParsedAccount>, LedgerError>> + Send;

    /// Get the name/identifier of this client
    fn name(&self) -> &'static str;
}

/// Common errors that can occur when talking to a ledger node
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum LedgerError {
    /// HTTP request failed
    #[error("HTTP request failed: {message}")]
    Http { message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_seconds} seconds")]
    RateLimitExceeded { retry_after_seconds: u64 },

    /// Authentication with the RPC provider failed
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The node answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Invalid response format
    #[error("Invalid response format: {message}")]
    InvalidResponse { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Network timeout
    #[error("Request timeout after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },
}

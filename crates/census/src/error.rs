// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for census operations
//!
//! Errors fall into two groups. Enumeration, persistence and cancellation
//! failures abort a run. Lookup failures for a single holder are isolated by
//! the batch pipeline and only ever reach the logs.

use std::path::PathBuf;

use ledger_client::LedgerError;
use shared_types::Address;
use thiserror::Error;

use crate::pipeline::PipelineError;

/// Result type alias for census operations
pub type CensusResult<T> = Result<T, CensusError>;

/// Errors raised while taking a holder snapshot
#[derive(Debug, Error)]
pub enum CensusError {
    /// The holder scan for a mint failed
    #[error("Failed to enumerate holders of {mint}: {source}")]
    Enumeration {
        /// Mint being scanned
        mint: Address,
        /// Underlying ledger failure
        #[source]
        source: LedgerError,
    },

    /// A single ledger lookup failed
    #[error("Ledger lookup failed: {0}")]
    Lookup(#[from] LedgerError),

    /// The ledger reports no state for the account
    #[error("Account {account} not found")]
    AccountNotFound {
        /// Account that was looked up
        account: Address,
    },

    /// The account exists but its parsed data is unusable
    #[error("Invalid account data for {account}: {message}")]
    InvalidAccountData {
        /// Account that was looked up
        account: Address,
        /// What was wrong with the payload
        message: String,
    },

    /// Batch processing stopped before completion
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Snapshot file could not be written
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Snapshot could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CensusError {
    /// Create an invalid account data error
    pub fn invalid_account_data(account: Address, message: impl Into<String>) -> Self {
        Self::InvalidAccountData {
            account,
            message: message.into(),
        }
    }

    /// Create an I/O error for the given path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check whether this error aborts a run
    ///
    /// Per-holder lookup failures are isolated; everything else is fatal.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::Lookup(_) | Self::AccountNotFound { .. } | Self::InvalidAccountData { .. }
        )
    }
}

// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error handling module
//!
//! Every variant is fatal: the binary logs it once and exits with a failure
//! status.

use census::CensusError;
use solana_rpc::SolanaRpcError;
use thiserror::Error;

/// Errors that abort a snapshot run
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// The snapshot date is not a `YYYY-MM-DD` calendar date
    #[error("Invalid date format. Use YYYY-MM-DD (got {input:?})")]
    InvalidDate {
        /// Rejected input
        input: String,
    },

    /// The mint is not a structurally valid address
    #[error("Invalid token mint address format.")]
    InvalidMint {
        /// Rejected input
        input: String,
    },

    /// Signal handlers could not be installed
    #[error("Signal handling error: {message}")]
    Signal {
        /// Error message
        message: String,
    },

    /// The RPC client could not be constructed
    #[error("RPC client error: {0}")]
    Client(#[from] SolanaRpcError),

    /// The snapshot run failed
    #[error("Error taking snapshot: {0}")]
    Census(#[from] CensusError),
}

impl AppError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(error: config::ConfigError) -> Self {
        Self::config(format!("failed to load configuration: {error}"))
    }
}

/// Result type for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use census::PipelineError;

    use super::*;

    #[test]
    fn messages() {
        let mint = AppError::InvalidMint {
            input: "0xdeadbeef".to_string(),
        };
        assert_eq!(mint.to_string(), "Invalid token mint address format.");

        let date = AppError::InvalidDate {
            input: "2024-13-01".to_string(),
        };
        assert!(date.to_string().contains("YYYY-MM-DD"));
        assert!(date.to_string().contains("2024-13-01"));

        let cancelled = AppError::from(CensusError::from(PipelineError::Cancelled {
            completed_batches: 1,
            total_batches: 4,
        }));
        assert!(cancelled.to_string().contains("cancelled after 1 of 4 batches"));
    }

    #[test]
    fn config_errors_are_wrapped() {
        let error = AppError::from(config::ConfigError::Message("missing field".to_string()));
        assert!(matches!(error, AppError::Config { .. }));
        assert!(error.to_string().contains("missing field"));
    }
}

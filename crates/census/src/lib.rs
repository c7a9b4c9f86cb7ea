// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Token holder census
//!
//! This crate takes point-in-time holder snapshots of SPL token mints. It is
//! generic over any [`ledger_client::LedgerClient`], so the same code runs
//! against a live Solana node or an in-memory ledger in tests.
//!
//! # Architecture
//!
//! - [`enumerator`]: scans the token program for accounts of a mint and
//!   decodes their balances
//! - [`pipeline`]: runs per-holder work in sequential, rate-limited batches
//!   with per-item failure isolation
//! - [`resolver`]: resolves the wallet owning each token account
//! - [`snapshot`]: writes the enriched holders to a JSON file
//! - [`census`]: orchestrates a complete run
//! - [`error`]: error types shared by the stages
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use census::{BatchPipeline, BatchPolicy, Census, SnapshotWriter};
//! use chrono::NaiveDate;
//! use solana_rpc::{SolanaRpcClient, SolanaRpcConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SolanaRpcConfig::with_endpoint("https://api.mainnet-beta.solana.com")?;
//! let client = Arc::new(SolanaRpcClient::new(config)?);
//!
//! let census = Census::new(
//!     client,
//!     BatchPipeline::new(BatchPolicy::default()),
//!     SnapshotWriter::new("."),
//! );
//!
//! let mint = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".parse()?;
//! let date = NaiveDate::from_ymd_opt(2024, 3, 1).ok_or("invalid date")?;
//! let summary = census.take_snapshot(&mint, date).await?;
//!
//! println!("{} holders written to {}", summary.resolved, summary.path.display());
//! # Ok(())
//! # }
//! ```

pub mod census;
pub mod enumerator;
pub mod error;
pub mod pipeline;
pub mod resolver;
pub mod snapshot;

#[cfg(test)]
mod test_support;

pub use census::{Census, SnapshotSummary};
pub use enumerator::{HolderEnumerator, TOKEN_PROGRAM_ID, decode_balance};
pub use error::{CensusError, CensusResult};
pub use pipeline::{BatchPipeline, BatchPolicy, BatchReport, ItemFailure, PipelineError};
pub use resolver::OwnerResolver;
pub use snapshot::SnapshotWriter;

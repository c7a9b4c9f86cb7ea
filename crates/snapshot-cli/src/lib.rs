// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Token snapshot command-line application
//!
//! This crate provides the `token-snapshot` binary: it validates its
//! arguments, loads layered configuration, and runs a [`census::Census`]
//! against a Solana JSON-RPC node until completion or a shutdown signal.
//!
//! # Module Structure
//!
//! - [`cli`]: Argument parsing and validation of the date and mint
//! - [`config`]: Layered configuration with validated newtypes
//! - [`app`]: Client wiring, signal handling and the snapshot run
//! - [`error`]: Fatal error types

pub mod app;
pub mod cli;
pub mod config;
pub mod error;

pub use app::App;
pub use cli::Cli;
pub use config::SnapshotConfig;
pub use error::{AppError, AppResult};

use census::SnapshotSummary;

/// Validate `cli`, load configuration and take the snapshot
///
/// # Errors
///
/// Returns an error if the arguments or configuration are invalid, or the
/// run fails
pub async fn run(cli: &Cli) -> AppResult<SnapshotSummary> {
    let mint = cli.mint_address()?;
    let date = cli.snapshot_date()?;

    let config = SnapshotConfig::load(cli.config.as_deref())?
        .with_overrides(cli.rpc_url_override()?, cli.output_dir.clone());

    App::new(config).run_until_signal(mint, date).await
}

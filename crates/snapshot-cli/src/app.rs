// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Application runner
//!
//! Wires configuration into a Solana RPC client and a [`Census`], and ties
//! the run to process signals through a `CancellationToken`.

use std::sync::Arc;

use census::{BatchPipeline, Census, SnapshotSummary, SnapshotWriter};
use chrono::NaiveDate;
use shared_types::Address;
use solana_rpc::SolanaRpcClient;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
    config::SnapshotConfig,
    error::{AppError, AppResult},
};

/// A configured snapshot application
#[derive(Debug)]
pub struct App {
    config: SnapshotConfig,
    cancellation_token: CancellationToken,
}

impl App {
    /// Create an application from validated configuration
    pub fn new(config: SnapshotConfig) -> Self {
        Self {
            config,
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Configuration in effect
    pub fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    /// Returns a clone of the cancellation token for coordinated shutdown
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    /// Take a snapshot of `mint` labelled with `date`
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built, the run fails or the
    /// run is cancelled
    pub async fn run(&self, mint: Address, date: NaiveDate) -> AppResult<SnapshotSummary> {
        let client = Arc::new(SolanaRpcClient::new(self.config.rpc_config()?)?);
        let pipeline =
            BatchPipeline::with_cancellation(self.config.batch_policy()?, self.cancellation_token());
        let census = Census::new(
            client,
            pipeline,
            SnapshotWriter::new(&self.config.output_dir),
        );

        info!(
            rpc_url = %self.config.rpc_url,
            commitment = %self.config.commitment,
            batch_size = self.config.batch_size.value(),
            batch_delay_ms = self.config.batch_delay_ms,
            "Taking snapshot for token mint {} on {}",
            mint,
            date
        );

        Ok(census.take_snapshot(&mint, date).await?)
    }

    /// Take a snapshot, cancelling the run on SIGINT or SIGTERM
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`App::run`]
    pub async fn run_until_signal(&self, mint: Address, date: NaiveDate) -> AppResult<SnapshotSummary> {
        let signal_handler = tokio::spawn(shutdown_signal_handler(self.cancellation_token()));
        let result = self.run(mint, date).await;
        signal_handler.abort();
        result
    }
}

/// Handle shutdown signals and trigger coordinated cancellation
///
/// Listens for SIGINT (Ctrl+C) and SIGTERM and cancels `cancellation_token`
/// when one arrives.
pub async fn shutdown_signal_handler(cancellation_token: CancellationToken) {
    tokio::select! {
        signal = wait_for_signal() => match signal {
            Ok(signal_name) => {
                warn!("Shutdown signal {} received, cancelling snapshot...", signal_name);
                cancellation_token.cancel();
            }
            Err(e) => error!(error = %e, "Failed to install signal handlers"),
        },
        () = cancellation_token.cancelled() => {
            warn!("Cancellation token already cancelled, shutdown signal handler exiting");
        }
    }
}

async fn wait_for_signal() -> AppResult<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let register = |kind: SignalKind, name: &str| {
            signal(kind).map_err(|e| AppError::Signal {
                message: format!("failed to register {name} handler: {e}"),
            })
        };
        let mut sigterm = register(SignalKind::terminate(), "SIGTERM")?;
        let mut sigint = register(SignalKind::interrupt(), "SIGINT")?;

        tokio::select! {
            _ = sigterm.recv() => Ok("SIGTERM"),
            _ = sigint.recv() => Ok("SIGINT"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| AppError::Signal {
                message: format!("failed to install CTRL+C handler: {e}"),
            })?;
        Ok("CTRL+C")
    }
}

// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Snapshot orchestration
//!
//! [`Census`] ties the stages of a run together: enumerate the holders of a
//! mint, resolve every holder's owner through the batch pipeline, and persist
//! the enriched records.

use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::NaiveDate;
use ledger_client::{HealthStatus, LedgerClient};
use shared_types::{Address, EnrichedHolder};
use tracing::{info, instrument, warn};

use crate::{
    enumerator::HolderEnumerator,
    error::{CensusError, CensusResult},
    pipeline::{BatchPipeline, BatchReport},
    resolver::OwnerResolver,
    snapshot::SnapshotWriter,
};

/// Outcome of a completed snapshot run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSummary {
    /// Mint that was scanned
    pub mint: Address,
    /// Snapshot date
    pub date: NaiveDate,
    /// Written snapshot file
    pub path: PathBuf,
    /// Holders with a positive balance
    pub enumerated: usize,
    /// Holders whose owner was resolved and persisted
    pub resolved: usize,
    /// Holders dropped because owner resolution failed
    pub failed: usize,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

/// Takes holder snapshots of SPL token mints
#[derive(Debug)]
pub struct Census<C> {
    client: Arc<C>,
    enumerator: HolderEnumerator<C>,
    resolver: OwnerResolver<C>,
    pipeline: BatchPipeline,
    writer: SnapshotWriter,
}

impl<C: LedgerClient> Census<C> {
    /// Create a census over `client`
    pub fn new(client: Arc<C>, pipeline: BatchPipeline, writer: SnapshotWriter) -> Self {
        Self {
            enumerator: HolderEnumerator::new(Arc::clone(&client)),
            resolver: OwnerResolver::new(Arc::clone(&client)),
            client,
            pipeline,
            writer,
        }
    }

    /// Probe the ledger node before a run
    ///
    /// An unhealthy node only produces a warning; the run still proceeds.
    pub async fn probe(&self) -> HealthStatus {
        match self.client.health_check().await {
            Ok(status) => {
                if status.is_available() {
                    info!(client = self.client.name(), "Ledger node is {}", status.description());
                } else {
                    warn!(
                        client = self.client.name(),
                        "Ledger node is {}, proceeding anyway",
                        status.description()
                    );
                }
                status
            }
            Err(e) => {
                warn!(client = self.client.name(), "Health check error: {}, proceeding anyway", e);
                HealthStatus::Down {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Enumerate the holders of `mint` and resolve their owners
    ///
    /// # Errors
    ///
    /// Returns an error if enumeration fails or the run is cancelled.
    /// Individual resolution failures only count towards [`BatchReport::failed`].
    #[instrument(skip(self))]
    pub async fn collect_holders(&self, mint: &Address) -> CensusResult<(usize, BatchReport<EnrichedHolder>)> {
        let holders = self
            .enumerator
            .enumerate(mint)
            .await
            .map_err(|source| CensusError::Enumeration { mint: *mint, source })?;
        let enumerated = holders.len();

        info!(
            holders = enumerated,
            batches = self.pipeline.policy().batch_count(enumerated),
            "Resolving token account owners"
        );

        let resolver = &self.resolver;
        let report = self
            .pipeline
            .run_with_report(holders, |holder| resolver.enrich(holder))
            .await?;

        Ok((enumerated, report))
    }

    /// Take a snapshot of `mint` labelled with `date`
    ///
    /// # Errors
    ///
    /// Returns an error if enumeration fails, the run is cancelled, or the
    /// snapshot cannot be written
    #[instrument(skip(self), fields(client = self.client.name()))]
    pub async fn take_snapshot(&self, mint: &Address, date: NaiveDate) -> CensusResult<SnapshotSummary> {
        let started = Instant::now();
        info!("Fetching token holders for mint {}", mint);

        self.probe().await;

        let (enumerated, report) = self.collect_holders(mint).await?;
        if report.failed > 0 {
            warn!(
                failed = report.failed,
                enumerated,
                "Some holders were dropped because their owner could not be resolved"
            );
        }

        let path = self.writer.write(mint, date, &report.results).await?;

        let summary = SnapshotSummary {
            mint: *mint,
            date,
            path,
            enumerated,
            resolved: report.succeeded(),
            failed: report.failed,
            elapsed: started.elapsed(),
        };
        info!(
            path = %summary.path.display(),
            enumerated = summary.enumerated,
            resolved = summary.resolved,
            failed = summary.failed,
            elapsed = ?summary.elapsed,
            "Snapshot complete"
        );
        Ok(summary)
    }
}

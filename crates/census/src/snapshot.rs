// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Snapshot persistence
//!
//! A snapshot is a pretty-printed JSON array of holder records, written to
//! `snapshot_<mint>_<YYYY-MM-DD>.json` under the output directory.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use shared_types::{Address, EnrichedHolder};
use tracing::{info, warn};

use crate::error::{CensusError, CensusResult};

/// Writes holder snapshots to disk
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    output_dir: PathBuf,
}

impl SnapshotWriter {
    /// Create a writer targeting `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Directory snapshots are written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File name for a snapshot of `mint` on `date`
    pub fn file_name(mint: &Address, date: NaiveDate) -> String {
        format!("snapshot_{mint}_{}.json", date.format("%Y-%m-%d"))
    }

    /// Full path a snapshot of `mint` on `date` is written to
    pub fn path_for(&self, mint: &Address, date: NaiveDate) -> PathBuf {
        self.output_dir.join(Self::file_name(mint, date))
    }

    /// Persist `holders` and return the written path
    ///
    /// The output directory is created if missing; an existing snapshot for
    /// the same mint and date is replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any filesystem operation fails
    pub async fn write(
        &self,
        mint: &Address,
        date: NaiveDate,
        holders: &[EnrichedHolder],
    ) -> CensusResult<PathBuf> {
        let path = self.path_for(mint, date);
        let body = serde_json::to_vec_pretty(holders)?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| CensusError::io(&self.output_dir, e))?;

        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            warn!(path = %path.display(), "Overwriting existing snapshot");
        }

        tokio::fs::write(&path, body)
            .await
            .map_err(|e| CensusError::io(&path, e))?;

        info!(
            path = %path.display(),
            holders = holders.len(),
            "Snapshot saved"
        );
        Ok(path)
    }
}

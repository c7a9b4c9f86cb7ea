// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Snapshot configuration module
//!
//! Configuration is layered with the `config` crate. Validated newtypes keep
//! timeouts, batch sizes and the RPC endpoint within range, so a loaded
//! [`SnapshotConfig`] is always usable.

use std::{
    fmt,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Result, anyhow, ensure};
use census::{BatchPolicy, pipeline::DEFAULT_BATCH_SIZE};
use config::{Config, ConfigError, Environment, File, Map};
use serde::{Deserialize, Deserializer, de};
use solana_rpc::{Commitment, MAINNET_BETA_URL, SolanaRpcConfig};
use tracing::{debug, warn};
use url::Url;

use crate::error::{AppError, AppResult};

// Configuration constants
const ENV_PREFIX: &str = "SNAPSHOT";
const RPC_URL_ENV: &str = "SOLANA_RPC_URL";
const DEFAULT_CONFIG_FILE: &str = "snapshot";
const DOTENV_FILE: &str = ".env";
const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Largest accepted batch size
pub const MAX_BATCH_SIZE: usize = 100;

/// A validated timeout duration in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutSeconds(Duration);

impl TimeoutSeconds {
    /// Create a new `TimeoutSeconds`, ensuring the value is within valid bounds
    ///
    /// # Errors
    ///
    /// Returns an error if timeout is 0 or greater than 300 seconds
    pub fn new(seconds: u64) -> Result<Self> {
        ensure!(seconds != 0, "timeout must be greater than 0");
        ensure!(
            seconds <= MAX_TIMEOUT_SECONDS,
            "timeout cannot exceed {MAX_TIMEOUT_SECONDS}"
        );
        Ok(Self(Duration::from_secs(seconds)))
    }

    /// Default health check timeout (5 seconds)
    pub const fn health_check() -> Self {
        Self(Duration::from_secs(5))
    }

    /// Get the timeout value
    pub fn value(&self) -> Duration {
        self.0
    }

    /// Get the timeout value in whole seconds
    pub fn as_secs(&self) -> u64 {
        self.0.as_secs()
    }
}

impl<'de> Deserialize<'de> for TimeoutSeconds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = u64::deserialize(deserializer)?;
        Self::new(seconds).map_err(|e| de::Error::custom(e.to_string()))
    }
}

/// A validated number of concurrent lookups per batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSize(NonZeroUsize);

impl BatchSize {
    /// Create a new `BatchSize`
    ///
    /// # Errors
    ///
    /// Returns an error if the size is 0 or greater than [`MAX_BATCH_SIZE`]
    pub fn new(size: usize) -> Result<Self> {
        ensure!(size <= MAX_BATCH_SIZE, "batch size cannot exceed {MAX_BATCH_SIZE}");
        NonZeroUsize::new(size)
            .map(Self)
            .ok_or_else(|| anyhow!("batch size must be greater than 0"))
    }

    /// Get the batch size
    pub fn value(&self) -> usize {
        self.0.get()
    }
}

impl<'de> Deserialize<'de> for BatchSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let size = usize::deserialize(deserializer)?;
        Self::new(size).map_err(|e| de::Error::custom(e.to_string()))
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self(NonZeroUsize::new(DEFAULT_BATCH_SIZE).unwrap_or(NonZeroUsize::MIN))
    }
}

/// A validated http(s) JSON-RPC endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcUrl(Url);

impl RpcUrl {
    /// Parse and validate an endpoint URL
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or not http(s)
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url.trim()).map_err(|e| anyhow!("invalid RPC URL {url:?}: {e}"))?;
        ensure!(
            matches!(url.scheme(), "http" | "https"),
            "RPC URL must use http or https, got {}",
            url.scheme()
        );
        Ok(Self(url))
    }

    /// The endpoint as a string
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RpcUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RpcUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let url = String::deserialize(deserializer)?;
        Self::new(&url).map_err(|e| de::Error::custom(e.to_string()))
    }
}

/// Settings for a snapshot run
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotConfig {
    /// Solana JSON-RPC endpoint
    pub rpc_url: RpcUrl,
    /// Commitment level for every query
    pub commitment: Commitment,
    /// Per-request timeout (validated range: 1-300)
    pub request_timeout_seconds: TimeoutSeconds,
    /// Timeout for the pre-run health probe (validated range: 1-300)
    pub health_check_timeout_seconds: TimeoutSeconds,
    /// Owner lookups in flight at once (validated range: 1-100)
    pub batch_size: BatchSize,
    /// Pause after each batch, in milliseconds
    pub batch_delay_ms: u64,
    /// Optional deadline for a single owner lookup
    #[serde(default)]
    pub item_timeout_seconds: Option<TimeoutSeconds>,
    /// Directory snapshots are written to
    pub output_dir: PathBuf,
}

impl SnapshotConfig {
    /// Load configuration from files and the process environment
    ///
    /// Variables from a `.env` file in the working directory fill in
    /// whatever the process environment leaves unset, including
    /// `SOLANA_RPC_URL`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if configuration is invalid or cannot be loaded.
    pub fn load(config_file: Option<&Path>) -> AppResult<Self> {
        let environment = environment_with_dotenv(Path::new(DOTENV_FILE));
        let default_rpc_url = environment.get(RPC_URL_ENV).cloned();
        Ok(Self::load_from(
            config_file,
            default_rpc_url.as_deref(),
            Some(environment),
        )?)
    }

    /// Load configuration using the config crate with hierarchical sources
    ///
    /// Configuration is loaded in the following order (later sources override earlier ones):
    /// 1. Default values (`default_rpc_url` or mainnet-beta for the endpoint)
    /// 2. Optional `snapshot.{json,toml}` in the working directory
    /// 3. `config_file`, if given (must exist)
    /// 4. Environment variables with `SNAPSHOT_` prefix, read from `environment`
    ///    or from the process when `None`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or is invalid.
    pub fn load_from(
        config_file: Option<&Path>,
        default_rpc_url: Option<&str>,
        environment: Option<Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("rpc_url", default_rpc_url.unwrap_or(MAINNET_BETA_URL))?
            .set_default("commitment", Commitment::default().as_str())?
            .set_default("request_timeout_seconds", 30)?
            .set_default("health_check_timeout_seconds", 5)?
            .set_default("batch_size", 10)?
            .set_default("batch_delay_ms", 2000)?
            .set_default("output_dir", ".")?
            .add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false));

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(environment),
            )
            .build()?
            .try_deserialize()
    }

    /// Create configuration for tests: no inter-batch delay, short timeouts
    pub fn for_testing(rpc_url: RpcUrl, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            rpc_url,
            commitment: Commitment::Confirmed,
            request_timeout_seconds: TimeoutSeconds::health_check(),
            health_check_timeout_seconds: TimeoutSeconds::health_check(),
            batch_size: BatchSize::default(),
            batch_delay_ms: 0,
            item_timeout_seconds: None,
            output_dir: output_dir.into(),
        }
    }

    /// Apply command-line overrides
    #[must_use]
    pub fn with_overrides(mut self, rpc_url: Option<RpcUrl>, output_dir: Option<PathBuf>) -> Self {
        if let Some(rpc_url) = rpc_url {
            self.rpc_url = rpc_url;
        }
        if let Some(output_dir) = output_dir {
            self.output_dir = output_dir;
        }
        self
    }

    /// Settings for the Solana RPC client
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the endpoint is rejected by the client
    pub fn rpc_config(&self) -> AppResult<SolanaRpcConfig> {
        SolanaRpcConfig::new(
            self.rpc_url.as_str(),
            self.commitment,
            self.request_timeout_seconds.as_secs(),
            self.health_check_timeout_seconds.as_secs(),
        )
        .map_err(AppError::config)
    }

    /// Batch sizing and pacing for owner resolution
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the batch size is rejected
    pub fn batch_policy(&self) -> AppResult<BatchPolicy> {
        let policy = BatchPolicy::new(
            self.batch_size.value(),
            Duration::from_millis(self.batch_delay_ms),
        )
        .map_err(|e| AppError::config(e.to_string()))?;

        Ok(match self.item_timeout_seconds {
            Some(limit) => policy.with_item_timeout(limit.value()),
            None => policy,
        })
    }
}

/// The process environment layered over the variables of a dotenv file
///
/// A missing file contributes nothing. Unreadable files and malformed lines
/// are logged and skipped.
fn environment_with_dotenv(path: &Path) -> Map<String, String> {
    let mut environment = Map::new();

    match dotenvy::from_path_iter(path) {
        Ok(pairs) => {
            for pair in pairs {
                match pair {
                    Ok((key, value)) => {
                        environment.insert(key, value);
                    }
                    Err(e) => warn!(path = %path.display(), error = %e, "Skipping malformed dotenv line"),
                }
            }
            debug!(path = %path.display(), "Loaded dotenv file");
        }
        Err(e) if e.not_found() => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to read dotenv file"),
    }

    environment.extend(std::env::vars());
    environment
}

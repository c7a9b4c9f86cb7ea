// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Solana JSON-RPC integration
//!
//! This module provides an implementation of the `LedgerClient` trait on top of
//! the Solana JSON-RPC HTTP API. Each call is a single POST; nothing is retried,
//! quota handling is left to the caller's batching policy.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use base64::{Engine, engine::general_purpose::STANDARD};
use ledger_client::{
    AccountFilter, HealthStatus, KeyedAccount, LedgerClient, LedgerError, ParsedAccount,
};
use reqwest::{Client, StatusCode, header::RETRY_AFTER};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use shared_types::Address;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    non_empty_string::NonEmptyString,
    wire::{
        JSONRPC_VERSION, JsonRpcRequest, JsonRpcResponse, RpcAccountData, RpcContextual,
        RpcKeyedAccount, RpcParsedAccount, filter_to_json,
    },
};

// Solana RPC constants
const DEFAULT_SOLANA_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_SOLANA_HEALTH_CHECK_TIMEOUT_SECONDS: u64 = 5;
const DEFAULT_RETRY_AFTER_SECONDS: u64 = 2;
const USER_AGENT: &str = concat!("token-snapshot/", env!("CARGO_PKG_VERSION"));

/// Public mainnet-beta endpoint
pub const MAINNET_BETA_URL: &str = "https://api.mainnet-beta.solana.com";

/// Commitment level requested from the node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    /// Most recent block seen by the node
    Processed,
    /// Block voted on by a supermajority
    #[default]
    Confirmed,
    /// Block rooted by a supermajority
    Finalized,
}

impl Commitment {
    /// Wire name of the commitment level
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the Solana RPC client
/// This type is always valid by construction.
#[derive(Debug, Clone)]
pub struct SolanaRpcConfig {
    /// HTTP(S) URL of the JSON-RPC endpoint
    pub endpoint: NonEmptyString,
    /// Commitment level for every query
    pub commitment: Commitment,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Health check timeout in seconds
    pub health_check_timeout_seconds: u64,
}

impl SolanaRpcConfig {
    /// Create a new `SolanaRpcConfig` with validation
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is blank or not an http(s) URL
    pub fn new(
        endpoint: impl Into<String>,
        commitment: Commitment,
        timeout_seconds: u64,
        health_check_timeout_seconds: u64,
    ) -> Result<Self, String> {
        let endpoint = NonEmptyString::new(endpoint)?;
        let url = Url::parse(endpoint.as_str()).map_err(|e| format!("Invalid endpoint: {e}"))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!("Unsupported endpoint scheme: {}", url.scheme()));
        }

        Ok(Self {
            endpoint,
            commitment,
            timeout_seconds,
            health_check_timeout_seconds,
        })
    }

    /// Configuration for `endpoint` with default commitment and timeouts
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is invalid
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, String> {
        Self::new(
            endpoint,
            Commitment::default(),
            DEFAULT_SOLANA_TIMEOUT_SECONDS,
            DEFAULT_SOLANA_HEALTH_CHECK_TIMEOUT_SECONDS,
        )
    }
}

/// Solana JSON-RPC client
#[derive(Debug)]
pub struct SolanaRpcClient {
    client: Client,
    config: SolanaRpcConfig,
    next_id: AtomicU64,
}

/// Errors specific to the Solana RPC client
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum SolanaRpcError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Endpoint answered with an unexpected HTTP status
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited { retry_after_seconds: u64 },

    /// Authentication failed
    #[error("Authentication failed")]
    Unauthorized,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Timeout error
    #[error("Request timeout")]
    Timeout { seconds: u64 },

    /// Response was well-formed JSON but not the expected payload
    #[error("Unexpected payload: {0}")]
    Payload(String),
}

impl From<SolanaRpcError> for LedgerError {
    fn from(value: SolanaRpcError) -> Self {
        match value {
            SolanaRpcError::Http(error) => LedgerError::Http {
                message: error.to_string(),
            },
            SolanaRpcError::Json(error) => LedgerError::InvalidResponse {
                message: error.to_string(),
            },
            SolanaRpcError::ApiError { status, message } => LedgerError::Http {
                message: format!("{status}: {message}"),
            },
            SolanaRpcError::Rpc { code, message } => LedgerError::Rpc { code, message },
            SolanaRpcError::RateLimited {
                retry_after_seconds,
            } => LedgerError::RateLimitExceeded {
                retry_after_seconds,
            },
            SolanaRpcError::Unauthorized => LedgerError::Authentication {
                message: value.to_string(),
            },
            SolanaRpcError::Config(message) => LedgerError::Configuration { message },
            SolanaRpcError::Timeout { seconds } => LedgerError::Timeout {
                timeout_seconds: seconds,
            },
            SolanaRpcError::Payload(message) => LedgerError::InvalidResponse { message },
        }
    }
}

impl SolanaRpcClient {
    /// Create a new Solana RPC client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(config: SolanaRpcConfig) -> Result<Self, SolanaRpcError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(USER_AGENT)
            .build()
            .map_err(SolanaRpcError::Http)?;

        Ok(Self {
            client,
            config,
            next_id: AtomicU64::new(1),
        })
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &SolanaRpcConfig {
        &self.config
    }

    /// Issue one JSON-RPC call and decode its `result`
    async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
        timeout_seconds: u64,
    ) -> Result<R, SolanaRpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION,
            id,
            method,
            params,
        };

        debug!(method, id, "sending Solana RPC request");

        let send = self
            .client
            .post(self.config.endpoint.as_str())
            .json(&request)
            .send();

        let response = timeout(Duration::from_secs(timeout_seconds), send)
            .await
            .map_err(|_| SolanaRpcError::Timeout {
                seconds: timeout_seconds,
            })?
            .map_err(|e| {
                if e.is_timeout() {
                    SolanaRpcError::Timeout {
                        seconds: timeout_seconds,
                    }
                } else {
                    SolanaRpcError::Http(e)
                }
            })?;

        match response.status() {
            StatusCode::OK => {
                let body = response.bytes().await.map_err(SolanaRpcError::Http)?;
                let envelope: JsonRpcResponse<R> = serde_json::from_slice(&body)?;

                if let Some(error) = envelope.error {
                    return Err(SolanaRpcError::Rpc {
                        code: error.code,
                        message: error.message,
                    });
                }

                envelope.result.ok_or_else(|| {
                    SolanaRpcError::Payload(format!("{method} response carried no result"))
                })
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after_seconds = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.trim().parse().ok())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECONDS);
                warn!(method, retry_after_seconds, "Solana RPC rate limited");
                Err(SolanaRpcError::RateLimited {
                    retry_after_seconds,
                })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SolanaRpcError::Unauthorized),
            status => {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                warn!(
                    method,
                    status = status.as_u16(),
                    error = error_text,
                    "Solana RPC error"
                );
                Err(SolanaRpcError::ApiError {
                    status: status.as_u16(),
                    message: error_text,
                })
            }
        }
    }

    /// Scan every account owned by `program_id` matching `filters`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or an entry cannot be decoded
    pub async fn program_accounts(
        &self,
        program_id: &Address,
        filters: &[AccountFilter],
    ) -> Result<Vec<KeyedAccount>, SolanaRpcError> {
        let filters: Vec<Value> = filters.iter().map(filter_to_json).collect();
        let params = json!([
            program_id.to_string(),
            {
                "encoding": "base64",
                "commitment": self.config.commitment.as_str(),
                "filters": filters,
            }
        ]);

        let entries: Vec<RpcKeyedAccount> = self
            .call("getProgramAccounts", params, self.config.timeout_seconds)
            .await?;

        debug!(
            program = %program_id,
            count = entries.len(),
            "received program accounts"
        );

        entries.into_iter().map(Self::decode_keyed_account).collect()
    }

    /// Fetch the `jsonParsed` representation of a single account
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the node cannot parse the account
    pub async fn parsed_account(
        &self,
        address: &Address,
    ) -> Result<Option<ParsedAccount>, SolanaRpcError> {
        let params = json!([
            address.to_string(),
            {
                "encoding": "jsonParsed",
                "commitment": self.config.commitment.as_str(),
            }
        ]);

        let response: RpcContextual<Option<RpcParsedAccount>> = self
            .call("getAccountInfo", params, self.config.timeout_seconds)
            .await?;

        let Some(account) = response.value else {
            debug!(%address, "no account state returned");
            return Ok(None);
        };

        match account.data {
            RpcAccountData::Parsed(data) => Ok(Some(ParsedAccount {
                program: data.program,
                account_type: data.parsed.account_type,
                info: data.parsed.info,
            })),
            RpcAccountData::Binary(_) => Err(SolanaRpcError::Payload(format!(
                "account {address} has no parsed representation"
            ))),
        }
    }

    fn decode_keyed_account(entry: RpcKeyedAccount) -> Result<KeyedAccount, SolanaRpcError> {
        let pubkey: Address = entry
            .pubkey
            .parse()
            .map_err(|e| SolanaRpcError::Payload(format!("invalid pubkey {}: {e}", entry.pubkey)))?;

        let (payload, encoding) = entry.account.data;
        if encoding != "base64" {
            return Err(SolanaRpcError::Payload(format!(
                "unexpected data encoding {encoding} for {pubkey}"
            )));
        }

        let data = STANDARD
            .decode(payload)
            .map_err(|e| SolanaRpcError::Payload(format!("invalid base64 data for {pubkey}: {e}")))?;

        Ok(KeyedAccount { pubkey, data })
    }
}

impl LedgerClient for SolanaRpcClient {
    async fn health_check(&self) -> Result<HealthStatus, LedgerError> {
        debug!("performing health check on Solana RPC");

        let start_time = std::time::Instant::now();
        let result: Result<String, _> = self
            .call(
                "getHealth",
                json!([]),
                self.config.health_check_timeout_seconds,
            )
            .await;
        let response_time = start_time.elapsed();

        match result {
            Ok(status) if status == "ok" => {
                info!("Solana RPC health check passed in {:?}", response_time);
                Ok(HealthStatus::Up)
            }
            Ok(status) => Ok(HealthStatus::Degraded {
                reason: format!("node reported {status}"),
            }),
            Err(SolanaRpcError::Rpc { message, .. }) => {
                warn!("Solana RPC health check degraded: {}", message);
                Ok(HealthStatus::Degraded { reason: message })
            }
            Err(SolanaRpcError::Unauthorized) => Ok(HealthStatus::Down {
                reason: "Authentication failed".to_string(),
            }),
            Err(SolanaRpcError::RateLimited { .. }) => Ok(HealthStatus::Degraded {
                reason: "rate limited".to_string(),
            }),
            Err(e @ (SolanaRpcError::Http(_) | SolanaRpcError::Timeout { .. })) => {
                warn!("Solana RPC health check failed: {}", e);
                Ok(HealthStatus::Down {
                    reason: e.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_program_accounts(
        &self,
        program_id: &Address,
        filters: &[AccountFilter],
    ) -> Result<Vec<KeyedAccount>, LedgerError> {
        info!(program = %program_id, "fetching program accounts from Solana RPC");
        Ok(self.program_accounts(program_id, filters).await?)
    }

    async fn get_parsed_account(
        &self,
        address: &Address,
    ) -> Result<Option<ParsedAccount>, LedgerError> {
        Ok(self.parsed_account(address).await?)
    }

    fn name(&self) -> &'static str {
        "solana-rpc"
    }
}

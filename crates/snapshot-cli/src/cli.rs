// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line interface

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use shared_types::Address;

use crate::{
    config::RpcUrl,
    error::{AppError, AppResult},
};

/// Format of the snapshot date argument
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Take a point-in-time snapshot of every holder of an SPL token
#[derive(Debug, Clone, Parser)]
#[command(name = "token-snapshot", version)]
pub struct Cli {
    /// Snapshot date (YYYY-MM-DD), used to label the output file
    #[arg(value_name = "DATE")]
    pub date: String,

    /// Base58 address of the token mint
    #[arg(value_name = "TOKEN_MINT_ADDRESS")]
    pub mint: String,

    /// Additional configuration file (JSON or TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Solana JSON-RPC endpoint, overriding configuration
    #[arg(long, value_name = "URL")]
    pub rpc_url: Option<String>,

    /// Directory the snapshot is written to, overriding configuration
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

impl Cli {
    /// The validated snapshot date
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidDate` unless the date is a valid `YYYY-MM-DD` calendar date
    pub fn snapshot_date(&self) -> AppResult<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).map_err(|_| AppError::InvalidDate {
            input: self.date.clone(),
        })
    }

    /// The validated token mint
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidMint` if the mint is not a structurally valid address
    pub fn mint_address(&self) -> AppResult<Address> {
        let invalid = || AppError::InvalidMint {
            input: self.mint.clone(),
        };

        let mint = self.mint.trim();
        if !Address::is_valid(mint) {
            return Err(invalid());
        }
        mint.parse().map_err(|_| invalid())
    }

    /// The validated RPC endpoint override, if any
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the URL is malformed or not http(s)
    pub fn rpc_url_override(&self) -> AppResult<Option<RpcUrl>> {
        self.rpc_url
            .as_deref()
            .map(RpcUrl::new)
            .transpose()
            .map_err(|e| AppError::config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("token-snapshot").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn positional_arguments() {
        let cli = parse(&["2024-03-01", USDC]);

        assert_eq!(
            cli.snapshot_date().unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert!(Address::is_valid(USDC));
        assert_eq!(cli.mint_address().unwrap().to_string(), USDC);
        assert!(cli.config.is_none());
        assert!(cli.rpc_url_override().unwrap().is_none());
    }

    #[test]
    fn missing_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["token-snapshot"]).is_err());
        assert!(Cli::try_parse_from(["token-snapshot", "2024-03-01"]).is_err());
    }

    #[test]
    fn invalid_dates() {
        for date in ["2024-13-01", "2024-02-30", "01/03/2024", "yesterday", ""] {
            let cli = parse(&[date, USDC]);
            assert!(
                matches!(cli.snapshot_date(), Err(AppError::InvalidDate { .. })),
                "{date:?} should be rejected"
            );
        }
    }

    #[test]
    fn invalid_mints() {
        for mint in ["0OIl", "abc", "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1vv"] {
            let cli = parse(&["2024-03-01", mint]);
            assert!(!Address::is_valid(mint));
            assert!(
                matches!(cli.mint_address(), Err(AppError::InvalidMint { .. })),
                "{mint:?} should be rejected"
            );
        }
    }

    #[test]
    fn overrides() {
        let cli = parse(&[
            "2024-03-01",
            USDC,
            "--rpc-url",
            "http://127.0.0.1:8899",
            "--output-dir",
            "out",
            "--config",
            "snapshot.toml",
        ]);

        assert_eq!(
            cli.rpc_url_override().unwrap().unwrap().as_str(),
            "http://127.0.0.1:8899/"
        );
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        assert_eq!(cli.config, Some(PathBuf::from("snapshot.toml")));

        let bad = parse(&["2024-03-01", USDC, "--rpc-url", "wss://example.com"]);
        assert!(matches!(bad.rpc_url_override(), Err(AppError::Config { .. })));
    }
}

// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Solana JSON-RPC ledger client
//!
//! This crate implements the [`ledger_client::LedgerClient`] trait against a
//! Solana JSON-RPC endpoint.
//!
//! # Architecture
//!
//! - **Client Implementation**: [`client::SolanaRpcClient`] issues
//!   `getProgramAccounts`, `getAccountInfo` (`jsonParsed`) and `getHealth`
//! - **Wire Format**: JSON-RPC envelopes and account payloads, decoded from
//!   base64 or the node's parsed view
//! - **Validation Utilities**: [`non_empty_string::NonEmptyString`] keeps
//!   configuration valid by construction
//!
//! # Features
//!
//! - **Error Classification**: HTTP 429, authentication failures, JSON-RPC error
//!   objects and malformed payloads map onto distinct `LedgerError` variants
//! - **Bounded Requests**: every call is wrapped in a timeout
//! - **Testing Support**: behavior is covered with wiremock HTTP simulation

pub mod client;
pub mod non_empty_string;
mod wire;

pub use client::*;
pub use non_empty_string::NonEmptyString;

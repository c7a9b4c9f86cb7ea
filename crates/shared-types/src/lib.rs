// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Shared types for the token snapshot workspace
//!
//! This crate provides the ledger address type and the holder records that
//! flow between the RPC client, the census pipeline and the snapshot writer,
//! avoiding circular dependencies between those crates.

pub mod address;
pub mod holder;

pub use address::{ADDRESS_LEN, Address, AddressError};
pub use holder::{EnrichedHolder, RawHolder};

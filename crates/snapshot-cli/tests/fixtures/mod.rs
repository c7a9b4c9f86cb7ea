// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Test fixtures for end-to-end snapshot runs
//!
//! This module provides a mocked Solana node seeded with token accounts.

pub mod ledger;

pub use ledger::*;

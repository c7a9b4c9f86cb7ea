// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Account data types returned by ledger clients

use serde_json::{Map, Value};
use shared_types::Address;

/// Server-side filter applied to a program-account scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountFilter {
    /// Keep accounts whose data is exactly this many bytes
    DataSize(u64),
    /// Keep accounts whose data contains `bytes` starting at `offset`
    Memcmp {
        /// Byte offset into the account data
        offset: usize,
        /// Bytes that must match at `offset`
        bytes: Vec<u8>,
    },
}

impl AccountFilter {
    /// Create a `Memcmp` filter
    pub fn memcmp(offset: usize, bytes: impl Into<Vec<u8>>) -> Self {
        Self::Memcmp {
            offset,
            bytes: bytes.into(),
        }
    }

    /// Evaluate the filter locally against raw account data
    pub fn matches(&self, data: &[u8]) -> bool {
        match self {
            AccountFilter::DataSize(size) => u64::try_from(data.len()).is_ok_and(|len| len == *size),
            AccountFilter::Memcmp { offset, bytes } => offset
                .checked_add(bytes.len())
                .and_then(|end| data.get(*offset..end))
                .is_some_and(|window| window == bytes.as_slice()),
        }
    }
}

/// An account returned by a program-account scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedAccount {
    /// Address of the account
    pub pubkey: Address,
    /// Raw account data
    pub data: Vec<u8>,
}

/// The node's parsed view of an account
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAccount {
    /// Name of the parser that decoded the account (e.g. `spl-token`)
    pub program: String,
    /// Parsed account kind (e.g. `account`, `mint`)
    pub account_type: Option<String>,
    /// Parsed fields
    pub info: Map<String, Value>,
}

impl ParsedAccount {
    /// The `owner` field of the parsed account, if present
    pub fn owner(&self) -> Option<&str> {
        self.info.get("owner").and_then(Value::as_str)
    }
}

// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Ledger account addresses
//!
//! Solana identifies every account (wallets, token accounts, mints, programs)
//! by a 32-byte public key written in base58. [`Address`] is only ever
//! constructed from bytes of the right length, so holding one means the
//! identifier is structurally valid.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

/// Length in bytes of a ledger address
pub const ADDRESS_LEN: usize = 32;

/// Errors produced when parsing an [`Address`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Input was empty or whitespace-only
    #[error("address cannot be empty")]
    Empty,

    /// Input contained characters outside the base58 alphabet
    #[error("invalid base58 encoding: {message}")]
    InvalidBase58 {
        /// Decoder message
        message: String,
    },

    /// Input decoded to the wrong number of bytes
    #[error("invalid address length: expected {ADDRESS_LEN} bytes, got {actual}")]
    InvalidLength {
        /// Number of decoded bytes
        actual: usize,
    },
}

/// A 32-byte ledger account address
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Create an address from raw bytes
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Check whether `candidate` is a structurally valid address
    ///
    /// Never fails: every malformed input collapses to `false`.
    pub fn is_valid(candidate: &str) -> bool {
        candidate.parse::<Self>().is_ok()
    }

    /// Raw address bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Base58 representation, as used on the wire
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(AddressError::Empty);
        }

        let decoded = bs58::decode(s)
            .into_vec()
            .map_err(|e| AddressError::InvalidBase58 {
                message: e.to_string(),
            })?;

        Self::try_from(decoded.as_slice())
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = AddressError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| AddressError::InvalidLength {
            actual: bytes.len(),
        })?;
        Ok(Self(bytes))
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

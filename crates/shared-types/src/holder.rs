// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Token holder records

use serde::{Deserialize, Serialize};

use crate::Address;

/// A token account holding a non-zero balance, before owner resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHolder {
    /// The token account holding the balance
    pub token_account: Address,
    /// Balance in the token's smallest unit
    pub balance: u64,
}

/// A token account paired with the wallet that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedHolder {
    /// The token account holding the balance
    pub token_account: Address,
    /// Wallet that owns the token account
    pub wallet_address: Address,
    /// Balance in the token's smallest unit, carried over unchanged
    pub balance: u64,
}

impl RawHolder {
    /// Create a new raw holder record
    pub const fn new(token_account: Address, balance: u64) -> Self {
        Self {
            token_account,
            balance,
        }
    }

    /// Pair this holder with its owning wallet
    pub const fn with_owner(self, wallet_address: Address) -> EnrichedHolder {
        EnrichedHolder {
            token_account: self.token_account,
            wallet_address,
            balance: self.balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn with_owner_keeps_balance() {
        let raw = RawHolder::new(Address::new([1; 32]), 1_000);
        let enriched = raw.with_owner(Address::new([2; 32]));

        assert_eq!(enriched.token_account, raw.token_account);
        assert_eq!(enriched.wallet_address, Address::new([2; 32]));
        assert_eq!(enriched.balance, 1_000);
    }

    #[test]
    fn enriched_holder_json_shape() {
        let token_account = Address::new([1; 32]);
        let wallet_address = Address::new([2; 32]);
        let holder = EnrichedHolder {
            token_account,
            wallet_address,
            balance: 42,
        };

        let value = serde_json::to_value(holder).unwrap();
        assert_eq!(
            value,
            json!({
                "tokenAccount": token_account.to_string(),
                "walletAddress": wallet_address.to_string(),
                "balance": 42
            })
        );
    }
}

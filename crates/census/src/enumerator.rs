// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Holder enumeration for an SPL token mint
//!
//! A single program-account scan returns every token account of the mint.
//! Balances are decoded straight from the raw account layout; accounts
//! holding nothing are dropped.

use std::sync::Arc;

use ledger_client::{AccountFilter, KeyedAccount, LedgerClient, LedgerError};
use shared_types::{ADDRESS_LEN, Address, RawHolder};
use tracing::{debug, info, instrument, warn};

/// SPL Token program (`TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`)
pub const TOKEN_PROGRAM_ID: Address = Address::new([
    0x06, 0xdd, 0xf6, 0xe1, 0xd7, 0x65, 0xa1, 0x93, 0xd9, 0xcb, 0xe1, 0x46, 0xce, 0xeb, 0x79, 0xac,
    0x1c, 0xb4, 0x85, 0xed, 0x5f, 0x5b, 0x37, 0x91, 0x3a, 0x8c, 0xf5, 0x85, 0x7e, 0xff, 0x00, 0xa9,
]);

/// Size of an SPL token account
pub const TOKEN_ACCOUNT_LEN: u64 = 165;

/// Offset of the mint within a token account
pub const MINT_OFFSET: usize = 0;

/// Offset of the owner within a token account
pub const OWNER_OFFSET: usize = MINT_OFFSET + ADDRESS_LEN;

/// Offset of the little-endian `u64` amount within a token account
pub const AMOUNT_OFFSET: usize = OWNER_OFFSET + ADDRESS_LEN;

/// Decode the token amount from raw account data
///
/// Returns `None` if the data is too short to carry an amount.
pub fn decode_balance(data: &[u8]) -> Option<u64> {
    let bytes = data.get(AMOUNT_OFFSET..AMOUNT_OFFSET + size_of::<u64>())?;
    bytes.try_into().ok().map(u64::from_le_bytes)
}

/// Filters selecting every token account of `mint`
pub fn holder_filters(mint: &Address) -> Vec<AccountFilter> {
    vec![
        AccountFilter::DataSize(TOKEN_ACCOUNT_LEN),
        AccountFilter::memcmp(MINT_OFFSET, mint.as_bytes().to_vec()),
    ]
}

/// Lists the token accounts of a mint with a positive balance
#[derive(Debug)]
pub struct HolderEnumerator<C> {
    client: Arc<C>,
    program_id: Address,
}

impl<C> Clone for HolderEnumerator<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            program_id: self.program_id,
        }
    }
}

impl<C: LedgerClient> HolderEnumerator<C> {
    /// Create an enumerator over the SPL Token program
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            program_id: TOKEN_PROGRAM_ID,
        }
    }

    /// Scan a different token program with the same account layout
    #[must_use]
    pub fn with_program_id(mut self, program_id: Address) -> Self {
        self.program_id = program_id;
        self
    }

    /// Enumerate holders of `mint`, in the order the ledger returns them
    ///
    /// # Errors
    ///
    /// Returns an error if the scan fails; no partial result is produced
    #[instrument(skip(self), fields(client = self.client.name()))]
    pub async fn enumerate(&self, mint: &Address) -> Result<Vec<RawHolder>, LedgerError> {
        let accounts = self
            .client
            .get_program_accounts(&self.program_id, &holder_filters(mint))
            .await?;
        let scanned = accounts.len();

        let holders: Vec<RawHolder> = accounts.iter().filter_map(to_holder).collect();

        info!(
            scanned,
            holders = holders.len(),
            "Enumerated token accounts for mint {}",
            mint
        );
        Ok(holders)
    }
}

fn to_holder(account: &KeyedAccount) -> Option<RawHolder> {
    let Some(balance) = decode_balance(&account.data) else {
        warn!(
            account = %account.pubkey,
            len = account.data.len(),
            "Skipping token account too short to carry a balance"
        );
        return None;
    };

    if balance == 0 {
        debug!(account = %account.pubkey, "Skipping empty token account");
        return None;
    }

    Some(RawHolder::new(account.pubkey, balance))
}

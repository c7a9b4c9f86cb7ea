// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory ledger for unit tests

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use ledger_client::{
    AccountFilter, HealthStatus, KeyedAccount, LedgerClient, LedgerError, ParsedAccount,
};
use serde_json::{Map, Value, json};
use shared_types::Address;

use crate::enumerator::{AMOUNT_OFFSET, OWNER_OFFSET, TOKEN_ACCOUNT_LEN, TOKEN_PROGRAM_ID};

/// Raw SPL token account data
pub(crate) fn token_account(mint: Address, owner: Address, amount: u64) -> Vec<u8> {
    let mut data = vec![0u8; usize::try_from(TOKEN_ACCOUNT_LEN).unwrap()];
    data[..32].copy_from_slice(mint.as_bytes());
    data[OWNER_OFFSET..OWNER_OFFSET + 32].copy_from_slice(owner.as_bytes());
    data[AMOUNT_OFFSET..AMOUNT_OFFSET + 8].copy_from_slice(&amount.to_le_bytes());
    data
}

/// Parsed view of a token account with the given owner field
pub(crate) fn parsed_token_account(owner: Value) -> ParsedAccount {
    let mut info = Map::new();
    info.insert("owner".to_string(), owner);
    info.insert("state".to_string(), json!("initialized"));
    ParsedAccount {
        program: "spl-token".to_string(),
        account_type: Some("account".to_string()),
        info,
    }
}

/// Ledger backed by fixed account tables
///
/// Lookups of accounts with no registered entry fail with an RPC error.
#[derive(Debug, Default)]
pub(crate) struct FakeLedger {
    accounts: Vec<KeyedAccount>,
    parsed: HashMap<Address, Option<ParsedAccount>>,
    fail_scan: bool,
    health: Option<HealthStatus>,
    lookups: AtomicUsize,
    last_program_id: Mutex<Option<Address>>,
}

impl FakeLedger {
    pub(crate) fn with_account(mut self, pubkey: Address, data: Vec<u8>) -> Self {
        self.accounts.push(KeyedAccount { pubkey, data });
        self
    }

    pub(crate) fn with_owner(self, account: Address, owner: Address) -> Self {
        self.with_parsed(account, parsed_token_account(json!(owner.to_string())))
    }

    pub(crate) fn with_parsed(mut self, account: Address, parsed: ParsedAccount) -> Self {
        self.parsed.insert(account, Some(parsed));
        self
    }

    pub(crate) fn with_missing(mut self, account: Address) -> Self {
        self.parsed.insert(account, None);
        self
    }

    pub(crate) fn with_health(mut self, health: HealthStatus) -> Self {
        self.health = Some(health);
        self
    }

    pub(crate) fn failing_scan(mut self) -> Self {
        self.fail_scan = true;
        self
    }

    pub(crate) fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub(crate) fn last_program_id(&self) -> Option<Address> {
        *self.last_program_id.lock().unwrap()
    }
}

impl LedgerClient for FakeLedger {
    async fn health_check(&self) -> Result<HealthStatus, LedgerError> {
        Ok(self.health.clone().unwrap_or(HealthStatus::Up))
    }

    async fn get_program_accounts(
        &self,
        program_id: &Address,
        filters: &[AccountFilter],
    ) -> Result<Vec<KeyedAccount>, LedgerError> {
        *self.last_program_id.lock().unwrap() = Some(*program_id);

        if self.fail_scan {
            return Err(LedgerError::Http {
                message: "connection reset".to_string(),
            });
        }
        if *program_id != TOKEN_PROGRAM_ID {
            return Ok(Vec::new());
        }

        Ok(self
            .accounts
            .iter()
            .filter(|account| filters.iter().all(|filter| filter.matches(&account.data)))
            .cloned()
            .collect())
    }

    async fn get_parsed_account(
        &self,
        address: &Address,
    ) -> Result<Option<ParsedAccount>, LedgerError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        self.parsed
            .get(address)
            .cloned()
            .ok_or_else(|| LedgerError::Rpc {
                code: -32603,
                message: format!("lookup of {address} failed"),
            })
    }

    fn name(&self) -> &'static str {
        "fake-ledger"
    }
}

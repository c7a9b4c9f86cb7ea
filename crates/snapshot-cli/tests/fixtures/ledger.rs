// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0
#![allow(dead_code)]

//! Mocked Solana node
//!
//! Seeds a wiremock server with a program-account scan and per-account
//! `jsonParsed` lookups.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Value, json};
use shared_types::Address;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, method},
};

const TOKEN_ACCOUNT_LEN: usize = 165;
const OWNER_OFFSET: usize = 32;
const AMOUNT_OFFSET: usize = 64;

/// One token account of the mint under test
#[derive(Debug, Clone, Copy)]
pub struct SeededAccount {
    /// Token account address
    pub account: Address,
    /// Owning wallet, or `None` if the node has no state for the account
    pub owner: Option<Address>,
    /// Raw token amount
    pub balance: u64,
}

impl SeededAccount {
    /// Account whose owner lookup succeeds
    pub fn owned(seed: u8, balance: u64) -> Self {
        Self {
            account: Address::new([seed; 32]),
            owner: Some(Address::new([seed.wrapping_add(100); 32])),
            balance,
        }
    }

    /// Account whose owner lookup reports no state
    pub fn vanished(seed: u8, balance: u64) -> Self {
        Self {
            account: Address::new([seed; 32]),
            owner: None,
            balance,
        }
    }
}

/// Mocked Solana node holding the token accounts of one mint
#[derive(Debug)]
pub struct MockLedger {
    pub server: MockServer,
    pub mint: Address,
}

impl MockLedger {
    /// Start a node that reports healthy
    pub async fn start(mint: Address) -> Self {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("getHealth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(result(json!("ok"))))
            .mount(&server)
            .await;
        Self { server, mint }
    }

    /// Serve `accounts` from the program-account scan and their lookups
    ///
    /// Zero-balance accounts must never be looked up.
    pub async fn seed(&self, accounts: &[SeededAccount]) {
        self.mount_scan(accounts).await;
        self.mount_lookups(accounts).await;
    }

    /// Serve `accounts` from a single program-account scan
    pub async fn mount_scan(&self, accounts: &[SeededAccount]) {
        let entries: Vec<Value> = accounts
            .iter()
            .map(|seeded| {
                json!({
                    "pubkey": seeded.account.to_string(),
                    "account": {
                        "data": [STANDARD.encode(self.token_account_data(seeded)), "base64"],
                        "executable": false,
                        "lamports": 2_039_280,
                        "owner": "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
                        "space": TOKEN_ACCOUNT_LEN
                    }
                })
            })
            .collect();

        Mock::given(method("POST"))
            .and(body_string_contains("getProgramAccounts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(result(Value::Array(entries))))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Serve one `jsonParsed` lookup per positive-balance account
    pub async fn mount_lookups(&self, accounts: &[SeededAccount]) {
        for seeded in accounts {
            let value = match seeded.owner {
                Some(owner) => json!({
                    "data": {
                        "program": "spl-token",
                        "parsed": {
                            "type": "account",
                            "info": {
                                "mint": self.mint.to_string(),
                                "owner": owner.to_string(),
                                "state": "initialized",
                                "tokenAmount": {"amount": seeded.balance.to_string(), "decimals": 6}
                            }
                        },
                        "space": TOKEN_ACCOUNT_LEN
                    },
                    "executable": false,
                    "lamports": 2_039_280,
                    "owner": "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
                }),
                None => Value::Null,
            };

            Mock::given(method("POST"))
                .and(body_string_contains("getAccountInfo"))
                .and(body_string_contains(seeded.account.to_string()))
                .respond_with(ResponseTemplate::new(200).set_body_json(result(json!({
                    "context": {"slot": 300_000_000},
                    "value": value
                }))))
                .expect(u64::from(seeded.balance > 0))
                .mount(&self.server)
                .await;
        }
    }

    /// Fail the program-account scan with a JSON-RPC error
    pub async fn fail_scan(&self) {
        Mock::given(method("POST"))
            .and(body_string_contains("getProgramAccounts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {"code": -32010, "message": "excluded from account secondary indexes"}
            })))
            .mount(&self.server)
            .await;
    }

    fn token_account_data(&self, seeded: &SeededAccount) -> Vec<u8> {
        let mut data = vec![0u8; TOKEN_ACCOUNT_LEN];
        data[..32].copy_from_slice(self.mint.as_bytes());
        if let Some(owner) = seeded.owner {
            data[OWNER_OFFSET..OWNER_OFFSET + 32].copy_from_slice(owner.as_bytes());
        }
        data[AMOUNT_OFFSET..AMOUNT_OFFSET + 8].copy_from_slice(&seeded.balance.to_le_bytes());
        data
    }
}

fn result(result: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": 1, "result": result})
}

// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! JSON-RPC envelopes and Solana response payloads

use ledger_client::AccountFilter;
use serde::{Deserialize, Serialize, de::IgnoredAny};
use serde_json::{Map, Value, json};

pub(crate) const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC request envelope
#[derive(Debug, Serialize)]
pub(crate) struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

/// JSON-RPC response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcResponse<R> {
    pub result: Option<R>,
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error object
#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

/// Result wrapper carrying the slot context
#[derive(Debug, Deserialize)]
pub(crate) struct RpcContextual<T> {
    pub value: T,
}

/// One entry of a `getProgramAccounts` result
#[derive(Debug, Deserialize)]
pub(crate) struct RpcKeyedAccount {
    pub pubkey: String,
    pub account: RpcBinaryAccount,
}

/// Account returned with `base64` encoding
#[derive(Debug, Deserialize)]
pub(crate) struct RpcBinaryAccount {
    /// `[payload, encoding]`
    pub data: (String, String),
}

/// Account returned with `jsonParsed` encoding
#[derive(Debug, Deserialize)]
pub(crate) struct RpcParsedAccount {
    pub data: RpcAccountData,
}

/// `jsonParsed` falls back to binary for accounts the node cannot parse
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RpcAccountData {
    Parsed(RpcParsedData),
    Binary(IgnoredAny),
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcParsedData {
    pub program: String,
    pub parsed: RpcParsedBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcParsedBody {
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    #[serde(default)]
    pub info: Map<String, Value>,
}

/// Render a filter the way `getProgramAccounts` expects it
pub(crate) fn filter_to_json(filter: &AccountFilter) -> Value {
    match filter {
        AccountFilter::DataSize(size) => json!({ "dataSize": size }),
        AccountFilter::Memcmp { offset, bytes } => json!({
            "memcmp": {
                "offset": offset,
                "bytes": bs58::encode(bytes).into_string(),
                "encoding": "base58",
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_render_as_rpc_json() {
        assert_eq!(
            filter_to_json(&AccountFilter::DataSize(165)),
            json!({"dataSize": 165})
        );
        assert_eq!(
            filter_to_json(&AccountFilter::memcmp(0, [0u8; 32])),
            json!({
                "memcmp": {
                    "offset": 0,
                    "bytes": "11111111111111111111111111111111",
                    "encoding": "base58"
                }
            })
        );
    }

    #[test]
    fn parsed_and_binary_account_data() {
        let parsed: RpcParsedAccount = serde_json::from_value(json!({
            "data": {
                "program": "spl-token",
                "parsed": {"type": "account", "info": {"owner": "abc"}},
                "space": 165
            },
            "lamports": 2_039_280
        }))
        .unwrap();
        let RpcAccountData::Parsed(data) = parsed.data else {
            panic!("expected parsed data");
        };
        assert_eq!(data.program, "spl-token");
        assert_eq!(data.parsed.account_type.as_deref(), Some("account"));
        assert_eq!(data.parsed.info.get("owner"), Some(&json!("abc")));

        let binary: RpcParsedAccount = serde_json::from_value(json!({
            "data": ["AAAA", "base64"]
        }))
        .unwrap();
        assert!(matches!(binary.data, RpcAccountData::Binary(_)));
    }
}

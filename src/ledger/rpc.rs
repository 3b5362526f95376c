//! JSON-RPC ledger client
//!
//! Concrete [`LedgerApi`] implementation speaking JSON-RPC 2.0 over HTTP.
//! Cells travel hex-encoded in their tree form; amounts travel as decimal
//! nano strings.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::types::{Address, Coins};

use super::api::{
    AccountSnapshot, BlockId, LedgerApi, LedgerError, MessageRequest, SendMode, StackValue,
    TxCursor,
};

#[derive(Serialize)]
struct JsonRpcRequest<'a, P: Serialize> {
    jsonrpc: &'static str,
    method: &'a str,
    params: P,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse<R> {
    result: Option<R>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct LastBlockResult {
    seqno: u32,
}

#[derive(Serialize)]
struct AccountStateParams<'a> {
    seqno: u32,
    address: &'a Address,
}

#[derive(Deserialize)]
struct TxCursorResult {
    lt: u64,
    hash: String,
}

#[derive(Deserialize)]
struct AccountStateResult {
    balance: String,
    last: Option<TxCursorResult>,
    code_hash: Option<String>,
    data: Option<String>,
}

#[derive(Serialize)]
struct SendMessageParams<'a> {
    to: &'a Address,
    value: String,
    body: String,
    state_init: Option<String>,
    mode: &'static str,
}

#[derive(Serialize)]
struct RunGetMethodParams<'a> {
    address: &'a Address,
    method: &'a str,
    stack: Vec<JsonStackValue>,
}

#[derive(Deserialize)]
struct RunGetMethodResult {
    exit_code: i32,
    stack: Vec<JsonStackValue>,
}

/// Wire form of a stack value
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
enum JsonStackValue {
    Int(String),
    Cell(String),
    Slice(String),
    Null,
}

impl JsonStackValue {
    fn from_value(value: &StackValue) -> JsonStackValue {
        match value {
            StackValue::Int(v) => JsonStackValue::Int(v.to_string()),
            StackValue::Cell(c) => JsonStackValue::Cell(hex::encode(c.encode_tree())),
            StackValue::Slice(c) => JsonStackValue::Slice(hex::encode(c.encode_tree())),
            StackValue::Null => JsonStackValue::Null,
        }
    }

    fn into_value(self) -> Result<StackValue, LedgerError> {
        let cell = |text: String| -> Result<Cell, LedgerError> {
            let bytes = hex::decode(&text)
                .map_err(|e| LedgerError::Malformed(format!("stack cell hex: {e}")))?;
            Cell::decode_tree(&bytes)
                .map_err(|e| LedgerError::Malformed(format!("stack cell tree: {e}")))
        };
        Ok(match self {
            JsonStackValue::Int(v) => StackValue::Int(
                v.parse()
                    .map_err(|_| LedgerError::Malformed(format!("stack int {v:?}")))?,
            ),
            JsonStackValue::Cell(c) => StackValue::Cell(cell(c)?),
            JsonStackValue::Slice(c) => StackValue::Slice(cell(c)?),
            JsonStackValue::Null => StackValue::Null,
        })
    }
}

fn parse_hash(text: &str, what: &str) -> Result<[u8; 32], LedgerError> {
    let bytes =
        hex::decode(text).map_err(|e| LedgerError::Malformed(format!("{what} hex: {e}")))?;
    bytes
        .try_into()
        .map_err(|_| LedgerError::Malformed(format!("{what} must be 32 bytes")))
}

/// HTTP JSON-RPC implementation of [`LedgerApi`]
pub struct JsonRpcLedger {
    client: Client,
    endpoint: String,
    request_id: AtomicU64,
}

impl JsonRpcLedger {
    /// Connect to a node endpoint, e.g. `http://127.0.0.1:8545`
    pub fn new(endpoint: impl Into<String>) -> Result<Self, LedgerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(3))
            .build()
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            request_id: AtomicU64::new(1),
        })
    }

    async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, LedgerError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.request_id.fetch_add(1, Ordering::Relaxed),
        };

        log::debug!("rpc call {method}");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        let response: JsonRpcResponse<R> = response
            .json()
            .await
            .map_err(|e| LedgerError::Malformed(e.to_string()))?;

        if let Some(err) = response.error {
            return Err(LedgerError::Rpc(format!("{} (code {})", err.message, err.code)));
        }
        response
            .result
            .ok_or_else(|| LedgerError::Malformed("response carries neither result nor error".into()))
    }
}

#[async_trait]
impl LedgerApi for JsonRpcLedger {
    async fn last_block(&self) -> Result<BlockId, LedgerError> {
        let result: LastBlockResult = self.call("ledger_lastBlock", ()).await?;
        Ok(BlockId {
            seqno: result.seqno,
        })
    }

    async fn account_state(
        &self,
        at: BlockId,
        address: &Address,
    ) -> Result<AccountSnapshot, LedgerError> {
        let result: AccountStateResult = self
            .call(
                "ledger_accountState",
                AccountStateParams {
                    seqno: at.seqno,
                    address,
                },
            )
            .await?;

        let balance = result
            .balance
            .parse()
            .map(Coins::from_nano)
            .map_err(|_| LedgerError::Malformed(format!("balance {:?}", result.balance)))?;

        let last = match result.last {
            Some(cursor) => Some(TxCursor {
                lt: cursor.lt,
                hash: parse_hash(&cursor.hash, "transaction hash")?,
            }),
            None => None,
        };

        let code_hash = match result.code_hash {
            Some(h) => Some(parse_hash(&h, "code hash")?),
            None => None,
        };

        let data = match result.data {
            Some(d) => Some(
                hex::decode(&d).map_err(|e| LedgerError::Malformed(format!("data hex: {e}")))?,
            ),
            None => None,
        };

        Ok(AccountSnapshot {
            balance,
            last,
            code_hash,
            data,
        })
    }

    async fn send_message(&self, request: MessageRequest) -> Result<(), LedgerError> {
        let mode = match request.mode {
            SendMode::PayFeesSeparately => "pay_fees_separately",
        };
        self.call::<_, bool>(
            "ledger_sendMessage",
            SendMessageParams {
                to: &request.to,
                value: request.value.as_nano().to_string(),
                body: hex::encode(request.body.encode_tree()),
                state_init: request.state_init.map(|c| hex::encode(c.encode_tree())),
                mode,
            },
        )
        .await?;
        Ok(())
    }

    async fn run_get_method(
        &self,
        address: &Address,
        method: &str,
        args: Vec<StackValue>,
    ) -> Result<Vec<StackValue>, LedgerError> {
        let result: RunGetMethodResult = self
            .call(
                "ledger_runGetMethod",
                RunGetMethodParams {
                    address,
                    method,
                    stack: args.iter().map(JsonStackValue::from_value).collect(),
                },
            )
            .await?;

        if result.exit_code != 0 {
            return Err(LedgerError::MethodFailed {
                method: method.to_string(),
                exit_code: result.exit_code,
            });
        }

        result
            .stack
            .into_iter()
            .map(JsonStackValue::into_value)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_value_wire_roundtrip() {
        let mut b = crate::cell::CellBuilder::new();
        b.store_uint(7, 8).unwrap();
        let cell = b.build();

        for value in [
            StackValue::Int(123_456_789_000),
            StackValue::Cell(cell.clone()),
            StackValue::Slice(cell),
            StackValue::Null,
        ] {
            let wire = JsonStackValue::from_value(&value);
            let json = serde_json::to_string(&wire).unwrap();
            let back: JsonStackValue = serde_json::from_str(&json).unwrap();
            assert_eq!(back.into_value().unwrap(), value);
        }
    }

    #[test]
    fn test_stack_value_json_shape() {
        let wire = JsonStackValue::from_value(&StackValue::Int(5));
        assert_eq!(
            serde_json::to_string(&wire).unwrap(),
            r#"{"type":"int","value":"5"}"#
        );
    }
}

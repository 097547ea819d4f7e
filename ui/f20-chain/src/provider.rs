//! The wallet provider capability and its JSON-RPC implementation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy_primitives::{Address, Bytes, B256, U256, U64};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::ChainError;

/// Read-only contract call (`eth_call`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub to: Address,
    pub data: Bytes,
}

/// Transaction handed to the wallet for signing (`eth_sendTransaction`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    #[serde(default)]
    pub block_number: Option<U64>,
    /// Absent on pre-Byzantium chains, where inclusion implies success.
    #[serde(default)]
    pub status: Option<U64>,
}

impl TransactionReceipt {
    pub fn succeeded(&self) -> bool {
        self.status.map_or(true, |status| !status.is_zero())
    }
}

/// Request/response access to whatever wallet brokers accounts and signing.
///
/// Calls block until the wallet answers; UI code runs them on a blocking
/// task. Implementations hold no view state, so one instance is shared by
/// every in-flight operation.
pub trait WalletProvider: Send + Sync {
    /// Asks the user to expose accounts (`eth_requestAccounts`). May prompt.
    fn request_accounts(&self) -> Result<Vec<Address>, ChainError>;

    /// Accounts currently exposed, without prompting (`eth_accounts`).
    fn accounts(&self) -> Result<Vec<Address>, ChainError>;

    fn call(&self, request: &CallRequest) -> Result<Bytes, ChainError>;

    /// Submits a transaction for the wallet to sign and broadcast.
    fn send_transaction(&self, request: &TransactionRequest) -> Result<B256, ChainError>;

    /// `None` until the transaction is mined.
    fn transaction_receipt(&self, hash: B256) -> Result<Option<TransactionReceipt>, ChainError>;
}

// ---------------------------------------------------------------------------
// HttpWallet
// ---------------------------------------------------------------------------

/// Wallet reached over a local JSON-RPC endpoint.
pub struct HttpWallet {
    client: Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpWallet {
    pub fn new(url: impl Into<String>) -> Result<Self, ChainError> {
        // Signing prompts wait on the user, so no request deadline is set.
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| ChainError::Provider(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, ChainError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(method, id, "wallet rpc request");

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .map_err(transport_error)?;
        let status = response.status();
        let text = response.text().map_err(transport_error)?;
        if !status.is_success() && text.trim().is_empty() {
            return Err(ChainError::Provider(format!("{method}: http {status}")));
        }
        decode_response(method, &text)
    }
}

impl WalletProvider for HttpWallet {
    fn request_accounts(&self) -> Result<Vec<Address>, ChainError> {
        self.request("eth_requestAccounts", json!([]))
    }

    fn accounts(&self) -> Result<Vec<Address>, ChainError> {
        self.request("eth_accounts", json!([]))
    }

    fn call(&self, request: &CallRequest) -> Result<Bytes, ChainError> {
        self.request("eth_call", json!([request, "latest"]))
    }

    fn send_transaction(&self, request: &TransactionRequest) -> Result<B256, ChainError> {
        self.request("eth_sendTransaction", json!([request]))
    }

    fn transaction_receipt(&self, hash: B256) -> Result<Option<TransactionReceipt>, ChainError> {
        self.request("eth_getTransactionReceipt", json!([hash]))
    }
}

fn transport_error(e: reqwest::Error) -> ChainError {
    if e.is_connect() {
        warn!(error = %e, "wallet endpoint unreachable");
        ChainError::NoWalletExtension
    } else {
        ChainError::Provider(e.to_string())
    }
}

#[derive(Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    #[serde(default)]
    message: String,
}

/// Unwraps a JSON-RPC response body into the typed result.
fn decode_response<T: DeserializeOwned>(method: &str, body: &str) -> Result<T, ChainError> {
    let envelope: RpcEnvelope =
        serde_json::from_str(body).map_err(|e| ChainError::Decode(format!("{method}: {e}")))?;
    if let Some(err) = envelope.error {
        return Err(ChainError::from_rpc(err.code, err.message));
    }
    serde_json::from_value(envelope.result.unwrap_or(Value::Null))
        .map_err(|e| ChainError::Decode(format!("{method}: {e}")))
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread::{self, JoinHandle};

    use alloy_primitives::address;

    use super::*;

    /// Answers exactly one HTTP request with `status` and `body`, handing
    /// back the JSON-RPC request body it received.
    fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request_body(&mut stream);
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            request
        });
        (url, server)
    }

    fn read_request_body(stream: &mut TcpStream) -> String {
        let mut reader = BufReader::new(stream);
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if line.trim().is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }
        let mut body = vec![0; content_length];
        reader.read_exact(&mut body).unwrap();
        String::from_utf8(body).unwrap()
    }

    #[test]
    fn refused_connection_means_no_wallet() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let wallet = HttpWallet::new(url).unwrap();
        let err = wallet.request_accounts().unwrap_err();
        assert_eq!(err, ChainError::NoWalletExtension);
        assert!(err.is_fatal());
    }

    #[test]
    fn rejection_over_http_is_user_rejected() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":4001,"message":"User rejected the request."}}"#,
        );
        let wallet = HttpWallet::new(url).unwrap();
        assert_eq!(wallet.request_accounts().unwrap_err(), ChainError::UserRejected);

        let request: Value = serde_json::from_str(&server.join().unwrap()).unwrap();
        assert_eq!(request["method"], "eth_requestAccounts");
        assert_eq!(request["jsonrpc"], "2.0");
    }

    #[test]
    fn empty_error_response_is_a_provider_error() {
        let (url, server) = serve_once("500 Internal Server Error", "");
        let wallet = HttpWallet::new(url).unwrap();
        let err = wallet.accounts().unwrap_err();
        assert_eq!(
            err,
            ChainError::Provider("eth_accounts: http 500 Internal Server Error".into())
        );
        server.join().unwrap();
    }

    #[test]
    fn accounts_come_back_over_http() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"jsonrpc":"2.0","id":1,"result":["0x126630e0bf6f76a26d5d228c285e708941e64d0b"]}"#,
        );
        let wallet = HttpWallet::new(url).unwrap();
        assert_eq!(
            wallet.accounts().unwrap(),
            vec![address!("126630e0bf6f76a26d5d228c285e708941e64d0b")]
        );

        let request: Value = serde_json::from_str(&server.join().unwrap()).unwrap();
        assert_eq!(request["method"], "eth_accounts");
        assert_eq!(request["params"], json!([]));
    }

    #[test]
    fn decodes_account_list() {
        let body = r#"{"jsonrpc":"2.0","id":1,"result":["0x126630e0bf6f76a26d5d228c285e708941e64d0b"]}"#;
        let accounts: Vec<Address> = decode_response("eth_accounts", body).unwrap();
        assert_eq!(
            accounts,
            vec![address!("126630e0bf6f76a26d5d228c285e708941e64d0b")]
        );
    }

    #[test]
    fn user_rejection_is_recognised() {
        let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":4001,"message":"User rejected the request."}}"#;
        let err = decode_response::<Vec<Address>>("eth_requestAccounts", body).unwrap_err();
        assert_eq!(err, ChainError::UserRejected);
    }

    #[test]
    fn other_rpc_errors_keep_code_and_message() {
        let body = r#"{"jsonrpc":"2.0","id":3,"error":{"code":3,"message":"execution reverted"}}"#;
        let err = decode_response::<Bytes>("eth_call", body).unwrap_err();
        assert_eq!(
            err,
            ChainError::Rpc {
                code: 3,
                message: "execution reverted".into()
            }
        );
    }

    #[test]
    fn pending_receipt_is_none() {
        let body = r#"{"jsonrpc":"2.0","id":4,"result":null}"#;
        let receipt: Option<TransactionReceipt> =
            decode_response("eth_getTransactionReceipt", body).unwrap();
        assert!(receipt.is_none());
    }

    #[test]
    fn receipt_status_decides_success() {
        let mined = r#"{"jsonrpc":"2.0","id":5,"result":{
            "transactionHash":"0x0000000000000000000000000000000000000000000000000000000000000abc",
            "blockNumber":"0x10",
            "status":"0x1"
        }}"#;
        let receipt: Option<TransactionReceipt> =
            decode_response("eth_getTransactionReceipt", mined).unwrap();
        let receipt = receipt.unwrap();
        assert!(receipt.succeeded());
        assert_eq!(receipt.block_number, Some(U64::from(16u64)));

        let reverted = mined.replace("\"0x1\"", "\"0x0\"");
        let receipt: Option<TransactionReceipt> =
            decode_response("eth_getTransactionReceipt", &reverted).unwrap();
        assert!(!receipt.unwrap().succeeded());
    }

    #[test]
    fn garbage_body_is_a_decode_error() {
        let err = decode_response::<Bytes>("eth_call", "<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, ChainError::Decode(msg) if msg.starts_with("eth_call")));
    }

    #[test]
    fn transaction_request_serialises_as_quantities() {
        let request = TransactionRequest {
            from: Address::ZERO,
            to: Address::ZERO,
            data: Bytes::from(vec![0xde, 0xad]),
            value: Some(U256::from(255u64)),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["data"], "0xdead");
        assert_eq!(value["value"], "0xff");

        let without_value = TransactionRequest {
            value: None,
            ..request
        };
        let value = serde_json::to_value(&without_value).unwrap();
        assert!(value.get("value").is_none());
    }
}

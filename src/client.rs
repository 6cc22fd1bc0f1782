//! Read-only access to the public JSON-RPC endpoint of the target network.

use crate::{
    chain::NetworkTarget,
    error::{QueryError, RpcError},
};
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};

#[async_trait(?Send)]
pub trait Transport {
    /// send a JSON-RPC request, returns its `result`
    async fn request(&self, method: &str, params: Value) -> Result<Value, QueryError>;
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

impl JsonRpcResponse {
    fn into_result(self) -> Result<Value, QueryError> {
        if let Some(error) = self.error {
            return Err(QueryError::Rpc(error));
        }

        self.result
            .ok_or_else(|| QueryError::InvalidResponse("No result in RPC response".to_owned()))
    }
}

/// JSON-RPC over HTTP POST.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    id: AtomicU64,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, QueryError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.id.fetch_add(1, Ordering::Relaxed),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|error| QueryError::Unreachable(error.to_string()))?;

        if !response.status().is_success() {
            return Err(QueryError::Status(response.status().as_u16()));
        }

        let response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|error| QueryError::InvalidResponse(error.to_string()))?;

        response.into_result()
    }
}

/// Client for the public endpoint of a [`NetworkTarget`]. It never goes
/// through the wallet.
pub struct PublicClient<T = HttpTransport> {
    target: NetworkTarget,
    transport: T,
}

impl PublicClient<HttpTransport> {
    /// client using the default HTTP endpoint of the target
    pub fn http(target: NetworkTarget) -> Result<Self, QueryError> {
        let url = target
            .rpc_url()
            .ok_or_else(|| QueryError::NoEndpoint(target.chain_id()))?
            .to_owned();

        Ok(Self::new(target, HttpTransport::new(url)))
    }
}

impl<T: Transport> PublicClient<T> {
    pub fn new(target: NetworkTarget, transport: T) -> Self {
        Self { target, transport }
    }

    pub fn target(&self) -> &NetworkTarget {
        &self.target
    }

    /// balance of `address` at the latest block, in wei
    pub async fn get_balance(&self, address: &Address) -> Result<U256, QueryError> {
        let balance = self
            .transport
            .request(
                "eth_getBalance",
                json!([address.to_checksum(None), "latest"]),
            )
            .await?;

        parse_quantity(&balance)
    }
}

/// decode a JSON-RPC hexadecimal quantity (`"0x1bc16d674ec80000"`)
fn parse_quantity(value: &Value) -> Result<U256, QueryError> {
    let invalid = || QueryError::InvalidResponse(format!("Invalid quantity: {value}"));

    let digits = value
        .as_str()
        .and_then(|hex| hex.strip_prefix("0x"))
        .filter(|digits| !digits.is_empty())
        .ok_or_else(invalid)?;

    U256::from_str_radix(digits, 16).map_err(|_| invalid())
}

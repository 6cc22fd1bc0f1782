//! In-memory wallet and endpoint standing in for the browser in tests.

use crate::{
    chain::ChainId,
    client::Transport,
    config::MINIPAY_FLAG,
    connection::ConnectAffordance,
    error::{ProviderError, ProviderErrorCode, QueryError, RpcError},
    provider::WalletProvider,
};
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::{Value, json};
use std::{cell::RefCell, collections::HashMap, rc::Rc};

pub(crate) const ALICE: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

#[derive(Default)]
struct Wallet {
    flags: Vec<String>,
    chain_id: ChainId,
    accounts: Vec<String>,
    requests: Vec<(String, Value)>,
    failures: HashMap<String, i64>,
    responses: HashMap<String, Value>,
    held_connection: Option<oneshot::Receiver<()>>,
    affordance: Option<ConnectAffordance>,
    hidden_when_connecting: Option<bool>,
}

/// Answers like a wallet that approves every prompt, unless told otherwise.
#[derive(Clone, Default)]
pub(crate) struct FakeProvider(Rc<RefCell<Wallet>>);

impl FakeProvider {
    pub fn generic(chain_id: ChainId) -> Self {
        let provider = Self::default();
        {
            let mut wallet = provider.0.borrow_mut();
            wallet.chain_id = chain_id;
            wallet.accounts = vec![ALICE.to_owned()];
        }
        provider
    }

    /// MiniPay also presents itself as MetaMask
    pub fn in_app(chain_id: ChainId) -> Self {
        Self::generic(chain_id)
            .with_flag(MINIPAY_FLAG)
            .with_flag("isMetaMask")
    }

    pub fn with_flag(self, flag: &str) -> Self {
        self.0.borrow_mut().flags.push(flag.to_owned());
        self
    }

    pub fn with_accounts(self, accounts: &[&str]) -> Self {
        self.0.borrow_mut().accounts = accounts.iter().map(|a| (*a).to_owned()).collect();
        self
    }

    /// make every call to `method` fail with the given EIP-1193 error code
    pub fn fail(&self, method: &str, code: i64) {
        self.0.borrow_mut().failures.insert(method.to_owned(), code);
    }

    pub fn respond_with(&self, method: &str, response: Value) {
        self.0
            .borrow_mut()
            .responses
            .insert(method.to_owned(), response);
    }

    /// keep the next `eth_requestAccounts` prompt open until the returned
    /// sender fires
    pub fn hold_connection(&self) -> oneshot::Sender<()> {
        let (sender, receiver) = oneshot::channel();
        self.0.borrow_mut().held_connection = Some(receiver);
        sender
    }

    /// record the state of `affordance` when the connection is requested
    pub fn watch(&self, affordance: ConnectAffordance) {
        self.0.borrow_mut().affordance = Some(affordance);
    }

    pub fn hidden_when_connecting(&self) -> Option<bool> {
        self.0.borrow().hidden_when_connecting
    }

    pub fn methods(&self) -> Vec<String> {
        self.0
            .borrow()
            .requests
            .iter()
            .map(|(method, _)| method.clone())
            .collect()
    }

    pub fn count(&self, method: &str) -> usize {
        self.methods().iter().filter(|m| *m == method).count()
    }

    pub fn params_of(&self, method: &str) -> Vec<Value> {
        self.0
            .borrow()
            .requests
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, params)| params.clone())
            .collect()
    }
}

#[async_trait(?Send)]
impl WalletProvider for FakeProvider {
    fn flag(&self, name: &str) -> bool {
        self.0.borrow().flags.iter().any(|flag| flag == name)
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let held = {
            let mut wallet = self.0.borrow_mut();
            wallet
                .requests
                .push((method.to_owned(), params.clone()));

            if method == "eth_requestAccounts" {
                wallet.hidden_when_connecting =
                    wallet.affordance.as_ref().map(ConnectAffordance::is_hidden);
                wallet.held_connection.take()
            } else {
                None
            }
        };

        if let Some(held) = held {
            let _ = held.await;
        }

        let mut wallet = self.0.borrow_mut();

        if let Some(code) = wallet.failures.get(method) {
            return Err(ProviderError {
                code: ProviderErrorCode::from(*code),
                message: format!("{method} failed"),
            });
        }

        if let Some(response) = wallet.responses.get(method) {
            return Ok(response.clone());
        }

        match method {
            "eth_requestAccounts" | "eth_accounts" => Ok(json!(wallet.accounts)),
            "eth_chainId" => Ok(json!(wallet.chain_id.to_hex())),
            "wallet_switchEthereumChain" => {
                let chain_id = params[0]["chainId"]
                    .as_str()
                    .and_then(ChainId::from_hex)
                    .ok_or_else(|| ProviderError::internal("invalid chainId"))?;
                wallet.chain_id = chain_id;
                Ok(Value::Null)
            }
            _ => Err(ProviderError {
                code: ProviderErrorCode::UnsupportedMethod,
                message: format!("{method} is not supported"),
            }),
        }
    }
}

#[derive(Default)]
struct Node {
    balances: HashMap<Address, U256>,
    failure: Option<QueryError>,
    requests: Vec<(String, Value)>,
}

/// A JSON-RPC endpoint serving `eth_getBalance` from memory.
#[derive(Clone, Default)]
pub(crate) struct FakeTransport(Rc<RefCell<Node>>);

impl FakeTransport {
    pub fn with_balance(self, address: &Address, wei: U256) -> Self {
        self.set_balance(address, wei);
        self
    }

    pub fn set_balance(&self, address: &Address, wei: U256) {
        self.0.borrow_mut().balances.insert(*address, wei);
    }

    pub fn fail(&self, error: QueryError) {
        self.0.borrow_mut().failure = Some(error);
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.0.borrow().requests.clone()
    }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, QueryError> {
        let mut node = self.0.borrow_mut();
        node.requests.push((method.to_owned(), params.clone()));

        if let Some(error) = &node.failure {
            return Err(error.clone());
        }

        match method {
            "eth_getBalance" => {
                let address = params[0]
                    .as_str()
                    .and_then(|address| address.parse::<Address>().ok())
                    .ok_or_else(|| RpcError {
                        code: -32602,
                        message: "invalid argument 0".to_owned(),
                    })?;
                let balance = node.balances.get(&address).copied().unwrap_or_default();
                Ok(json!(format!("0x{balance:x}")))
            }
            _ => Err(QueryError::Rpc(RpcError {
                code: -32601,
                message: format!("the method {method} does not exist"),
            })),
        }
    }
}

use crate::{chain::ChainId, error::ProviderError, ffi};
use alloy_primitives::Address;
use async_trait::async_trait;
use serde::Serialize as _;
use serde_json::{Value, json};
use wasm_bindgen::JsValue;

/// The part of an injected [EIP-1193] provider this crate relies on.
///
/// Only [`WalletProvider::flag`] and [`WalletProvider::request`] need to be
/// implemented, the typed calls are all built on top of `request`. The
/// browser implementation is [`BrowserProvider`], tests substitute their
/// own.
///
/// [EIP-1193]: https://eips.ethereum.org/EIPS/eip-1193
#[async_trait(?Send)]
pub trait WalletProvider {
    /// read a boolean marker set by the wallet on the provider object
    /// (`isMetaMask`, `isMiniPay`, ...). Missing or non boolean values
    /// are `false`.
    fn flag(&self, name: &str) -> bool;

    /// send a JSON-RPC request to the wallet
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;

    /// ask the user to authorise the page. Prompts the user unless the page
    /// was already authorised.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let accounts = self.request("eth_requestAccounts", Value::Null).await?;
        decode_accounts(accounts)
    }

    /// the accounts the page is already authorised for, never prompts
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let accounts = self.request("eth_accounts", Value::Null).await?;
        decode_accounts(accounts)
    }

    async fn chain_id(&self) -> Result<ChainId, ProviderError> {
        let chain_id = self.request("eth_chainId", Value::Null).await?;
        chain_id
            .as_str()
            .and_then(ChainId::from_hex)
            .ok_or_else(|| ProviderError::internal(format!("Unexpected chain id: {chain_id}")))
    }

    /// ask the wallet to switch to `chain_id`. May prompt the user.
    ///
    /// More details [EIP-3326](https://eips.ethereum.org/EIPS/eip-3326)
    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), ProviderError> {
        self.request(
            "wallet_switchEthereumChain",
            json!([{ "chainId": chain_id.to_hex() }]),
        )
        .await?;
        Ok(())
    }
}

fn decode_accounts(accounts: Value) -> Result<Vec<Address>, ProviderError> {
    serde_json::from_value(accounts)
        .map_err(|error| ProviderError::internal(format!("Invalid account list: {error}")))
}

/// The provider injected in `window.ethereum`.
#[derive(Clone, PartialEq)]
pub struct BrowserProvider {
    ethereum: ffi::Eip1193Provider,
}

impl BrowserProvider {
    /// Find the injected provider, `None` if there is no wallet.
    ///
    /// Wallet extensions inject their provider while the page loads, make
    /// sure the page is fully loaded before calling this function (or call it
    /// again later).
    pub fn injected() -> Option<Self> {
        // look it up again in case it was injected after the initial check
        let fresh = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("ethereum"))
            .ok()
            .filter(looks_like_eip1193_provider)
            .map(ffi::Eip1193Provider::from);

        fresh
            .or_else(|| ffi::eip1193::ETHEREUM.with(|ethereum| ethereum.clone()))
            .map(|ethereum| Self { ethereum })
    }
}

fn looks_like_eip1193_provider(value: &JsValue) -> bool {
    value.is_object()
        && js_sys::Reflect::get(value, &JsValue::from_str("request"))
            .map(|request| request.is_function())
            .unwrap_or(false)
}

#[async_trait(?Send)]
impl WalletProvider for BrowserProvider {
    fn flag(&self, name: &str) -> bool {
        js_sys::Reflect::get(self.ethereum.as_ref(), &JsValue::from_str(name))
            .ok()
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let args = ffi::RequestArguments { method, params }
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|error| {
                ProviderError::internal(format!("Couldn't encode the request: {error}"))
            })?;

        tracing::trace!(method, "provider request");

        match self.ethereum.request(args).await {
            Ok(result) => serde_wasm_bindgen::from_value(result).map_err(|decode_error| {
                ProviderError::internal(format!("Couldn't decode the result: {decode_error}"))
            }),
            Err(error) => Err(
                serde_wasm_bindgen::from_value(error.clone()).unwrap_or_else(|decode_error| {
                    ProviderError::internal(format!(
                        "Couldn't decode the error content: {decode_error} ({error:?})"
                    ))
                }),
            ),
        }
    }
}

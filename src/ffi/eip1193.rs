use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// The provider injected by the wallet extension (or by the in-app
    /// browser of a mobile wallet).
    #[wasm_bindgen(thread_local_v2, js_namespace = ["window"], js_name = "ethereum")]
    pub static ETHEREUM: Option<Eip1193Provider>;
}

#[wasm_bindgen]
extern "C" {
    #[derive(Clone, PartialEq)]
    pub type Eip1193Provider;

    /// Submit a JSON-RPC request to the wallet. The returned promise resolves
    /// with the `result` or rejects with a `ProviderRpcError` (an object with
    /// a numeric `code` and a `message`).
    ///
    /// More details [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193#request)
    ///
    #[wasm_bindgen(method, catch, js_name = "request")]
    pub async fn request(this: &Eip1193Provider, args: JsValue) -> Result<JsValue, JsValue>;
}

/// argument of [`Eip1193Provider::request`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestArguments<'a> {
    pub method: &'a str,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
}

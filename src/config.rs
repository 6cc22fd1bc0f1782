use crate::chain::NetworkTarget;
use serde::{Deserialize, Serialize};

/// flag MiniPay sets on the provider it injects in its in-app browser
pub const MINIPAY_FLAG: &str = "isMiniPay";

/// How to recognise and connect to the wallet whose in-app browser we run
/// in. Such a wallet authorises the page on its own: the manual connect
/// control is hidden and no network switch is requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InAppWallet {
    /// boolean property of the injected provider identifying the wallet
    pub flag: String,
    /// target of the injected connector used to connect to it
    pub connector_target: String,
}

impl Default for InAppWallet {
    fn default() -> Self {
        Self {
            flag: MINIPAY_FLAG.to_owned(),
            connector_target: "metaMask".to_owned(),
        }
    }
}

/// Everything that is fixed for the lifetime of the page.
///
/// ```
/// # use evm_wallet_connector::{Config, chain::ChainId};
/// let config = Config::from_json(r#"{
///     "target": {
///         "id": 44787,
///         "name": "Alfajores",
///         "nativeCurrency": { "name": "CELO", "symbol": "A-CELO", "decimals": 18 },
///         "rpcUrls": ["https://alfajores-forno.celo-testnet.org"]
///     }
/// }"#)?;
/// assert_eq!(config.target.chain_id(), ChainId::new(44787));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub target: NetworkTarget,
    pub in_app_wallet: InAppWallet,
}

impl Config {
    pub fn new(target: NetworkTarget) -> Self {
        Self {
            target,
            in_app_wallet: InAppWallet::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

pub mod units;

use crate::error::QueryError;
use alloy_primitives::Address;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Parse a `0x` prefixed account address.
///
/// Lower or upper case addresses are accepted as is, mixed case addresses
/// must carry a valid [EIP-55](https://eips.ethereum.org/EIPS/eip-55)
/// checksum.
pub fn parse_address(address: &str) -> Result<Address, QueryError> {
    let invalid = || QueryError::InvalidAddress(address.to_owned());

    let digits = address.strip_prefix("0x").ok_or_else(invalid)?;
    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let mixed_case = digits.chars().any(|c| c.is_ascii_lowercase())
        && digits.chars().any(|c| c.is_ascii_uppercase());

    if mixed_case {
        Address::parse_checksummed(address, None).map_err(|_| invalid())
    } else {
        address.parse().map_err(|_| invalid())
    }
}

/// [EIP-155](https://eips.ethereum.org/EIPS/eip-155) chain identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ChainId(u64);

impl ChainId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// encode the chain id as expected by `wallet_switchEthereumChain`,
    /// i.e. `0x` prefixed without leading zeros.
    pub fn to_hex(self) -> String {
        format!("{:#x}", self.0)
    }

    /// decode the hexadecimal quantity returned by `eth_chainId`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex
            .strip_prefix("0x")
            .or_else(|| hex.strip_prefix("0X"))?;
        if digits.is_empty() {
            return None;
        }
        u64::from_str_radix(digits, 16).ok().map(Self)
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl NativeCurrency {
    fn new(name: &str, symbol: &str) -> Self {
        Self {
            name: name.to_owned(),
            symbol: symbol.to_owned(),
            decimals: units::ETHER_DECIMALS,
        }
    }
}

/// Description of an EVM network: what the wallet has to be switched to and
/// where the read-only client sends its queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    pub id: ChainId,
    pub name: String,
    pub native_currency: NativeCurrency,
    /// public HTTP JSON-RPC endpoints, the first one is used
    pub rpc_urls: Vec<String>,
}

impl Chain {
    pub fn celo() -> Self {
        Self {
            id: ChainId::new(42_220),
            name: "Celo".to_owned(),
            native_currency: NativeCurrency::new("CELO", "CELO"),
            rpc_urls: vec!["https://forno.celo.org".to_owned()],
        }
    }

    pub fn celo_alfajores() -> Self {
        Self {
            id: ChainId::new(44_787),
            name: "Alfajores".to_owned(),
            native_currency: NativeCurrency::new("CELO", "A-CELO"),
            rpc_urls: vec!["https://alfajores-forno.celo-testnet.org".to_owned()],
        }
    }

    pub fn mainnet() -> Self {
        Self {
            id: ChainId::new(1),
            name: "Ethereum".to_owned(),
            native_currency: NativeCurrency::new("Ether", "ETH"),
            rpc_urls: vec!["https://eth.merkle.io".to_owned()],
        }
    }

    /// the default HTTP endpoint of this chain
    pub fn rpc_url(&self) -> Option<&str> {
        self.rpc_urls.first().map(String::as_str)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// The network the connected wallet is required to be on.
///
/// Once built the target cannot be modified: the connection manager and the
/// balance reader hold their own copy for their whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkTarget(Chain);

impl NetworkTarget {
    pub fn new(chain: Chain) -> Self {
        Self(chain)
    }

    pub fn chain(&self) -> &Chain {
        &self.0
    }

    pub fn chain_id(&self) -> ChainId {
        self.0.id
    }

    pub fn rpc_url(&self) -> Option<&str> {
        self.0.rpc_url()
    }

    pub fn decimals(&self) -> u8 {
        self.0.native_currency.decimals
    }

    pub fn matches(&self, chain_id: ChainId) -> bool {
        self.0.id == chain_id
    }
}

impl Default for NetworkTarget {
    fn default() -> Self {
        Self(Chain::celo())
    }
}

impl fmt::Display for NetworkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

use crate::{
    chain::{
        NetworkTarget, parse_address,
        units::{ETHER_DECIMALS, format_units},
    },
    client::{HttpTransport, PublicClient, Transport},
    connection::ConnectionState,
    error::WalletError,
};
use alloy_primitives::{Address, U256};
use core::fmt;

/// Native balance of an account, read from the network.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Balance {
    /// amount in the smallest unit
    pub wei: U256,
    /// amount in the display unit, e.g. `"2.5"`
    pub formatted: String,
    pub symbol: String,
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.formatted, self.symbol)
    }
}

/// Reads native balances from the public endpoint of the target network.
///
/// Balances are never cached, every call is a network round trip. Calls
/// are independent from each other and may run concurrently.
pub struct BalanceReader<T = HttpTransport> {
    client: PublicClient<T>,
}

impl BalanceReader<HttpTransport> {
    pub fn new(target: NetworkTarget) -> Result<Self, WalletError> {
        Ok(Self {
            client: PublicClient::http(target)?,
        })
    }
}

impl<T: Transport> BalanceReader<T> {
    pub fn with_client(client: PublicClient<T>) -> Self {
        Self { client }
    }

    pub async fn balance(&self, address: &Address) -> Result<Balance, WalletError> {
        let target = self.client.target();
        let wei = self.client.get_balance(address).await.inspect_err(|error| {
            tracing::warn!(%address, %error, "balance query failed");
        })?;

        tracing::debug!(%address, %wei, chain_id = %target.chain_id(), "balance");

        Ok(Balance {
            wei,
            // native EVM currencies always have 18 decimals
            formatted: format_units(wei, ETHER_DECIMALS),
            symbol: target.chain().native_currency.symbol.clone(),
        })
    }

    /// same as [`BalanceReader::balance`], `address` being a `0x` prefixed
    /// hexadecimal address (checksummed if mixed case)
    pub async fn balance_of(&self, address: &str) -> Result<Balance, WalletError> {
        let address = parse_address(address)?;
        self.balance(&address).await
    }

    /// balance of the active account, fails with
    /// [`WalletError::NotConnected`] without querying anything if there is
    /// none.
    pub async fn connected_balance(
        &self,
        state: &ConnectionState,
    ) -> Result<Balance, WalletError> {
        match state.active_address() {
            Some(address) if state.is_connected() => self.balance(&address).await,
            _ => Err(WalletError::NotConnected),
        }
    }
}

/*!

# Connector for injected EVM wallets

This library is meant to be used for web applications that need to connect to
the EVM wallet injected in the page (`window.ethereum`, see
[EIP-1193](https://eips.ethereum.org/EIPS/eip-1193)), make sure it is on the
network the application expects and display the balance of the connected
account.

## Features

- Detect the injected wallet, recognising the in-app browser of a mobile
  wallet (MiniPay by default)
- Connect to the wallet and switch it to the target network
- Retrieve the native balance of the connected account

## Usage

First find out what the page has access to:

```no_run
use evm_wallet_connector::{Config, ConnectionManager, ProviderKind};

let manager = ConnectionManager::browser(Config::default());
let env = manager.detect();

if env.provider_kind() == ProviderKind::None {
    println!("please install a wallet");
}
```

Then connect. In the in-app browser of the wallet the page is authorised
without prompting and [`ConnectAffordance::is_hidden`] tells the UI to hide
its connect button. Any other wallet is asked to switch to the target network
if needed.

```no_run
# use evm_wallet_connector::{BalanceReader, Config, ConnectionManager};
#
# async fn test() -> anyhow::Result<()> {
# let manager = ConnectionManager::browser(Config::default());
# let env = manager.detect();
let state = manager.ensure_connected(&env).await?;

let reader = BalanceReader::new(manager.target().clone())?;
let balance = reader.connected_balance(&state).await?;
println!("{balance}");
# Ok(()) }
```

*/

mod balance;
pub mod chain;
pub mod client;
pub mod config;
mod connection;
pub mod connector;
mod detector;
pub mod error;
pub mod ffi;
mod provider;
#[cfg(test)]
mod test_utils;

pub use self::{
    balance::{Balance, BalanceReader},
    chain::{Chain, ChainId, NetworkTarget},
    config::{Config, InAppWallet},
    connection::{ConnectAffordance, ConnectionManager, ConnectionState},
    detector::{ProviderKind, WalletEnvironment, detect, detect_with},
    error::WalletError,
    provider::{BrowserProvider, WalletProvider},
};
pub use alloy_primitives::{Address, U256};

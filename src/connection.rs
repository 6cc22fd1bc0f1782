use crate::{
    Config,
    chain::{ChainId, NetworkTarget},
    connector::{Connector as _, ConnectorId, InjectedConnector, Session},
    detector::{ProviderKind, WalletEnvironment},
    error::WalletError,
    provider::{BrowserProvider, WalletProvider},
};
use alloy_primitives::Address;
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

/// Snapshot of the connection with the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionState {
    connector: Option<ConnectorId>,
    address: Option<Address>,
    chain_id: Option<ChainId>,
}

impl ConnectionState {
    fn connected(session: &Session, chain_id: ChainId) -> Self {
        Self {
            connector: Some(session.connector.clone()),
            address: session.account(),
            chain_id: Some(chain_id),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    pub fn active_address(&self) -> Option<Address> {
        self.address
    }

    pub fn active_chain_id(&self) -> Option<ChainId> {
        self.chain_id
    }

    /// the connector the session was opened with
    pub fn connector(&self) -> Option<&ConnectorId> {
        self.connector.as_ref()
    }
}

/// Tells the UI whether to hide its manual "connect" control. The UI owns
/// the rendering, we only flip the flag.
#[derive(Debug, Clone, Default)]
pub struct ConnectAffordance(Rc<Cell<bool>>);

impl ConnectAffordance {
    pub fn hide(&self) {
        self.0.set(true)
    }

    pub fn show(&self) {
        self.0.set(false)
    }

    pub fn is_hidden(&self) -> bool {
        self.0.get()
    }
}

/// released when the connection attempt completes or is abandoned
struct PendingGuard<'a>(&'a Cell<bool>);

impl<'a> PendingGuard<'a> {
    fn acquire(pending: &'a Cell<bool>) -> Option<Self> {
        if pending.replace(true) {
            None
        } else {
            Some(Self(pending))
        }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false)
    }
}

/// Owns the [`ConnectionState`] and drives the connect then switch network
/// sequence.
///
/// ```no_run
/// # use evm_wallet_connector::{Config, ConnectionManager};
/// # async fn test() -> anyhow::Result<()> {
/// let manager = ConnectionManager::browser(Config::default());
/// let env = manager.detect();
/// let state = manager.ensure_connected(&env).await?;
/// println!("connected as {:?}", state.active_address());
/// # Ok(()) }
/// ```
pub struct ConnectionManager<P> {
    provider: Option<P>,
    config: Config,
    state: RefCell<ConnectionState>,
    affordance: ConnectAffordance,
    pending: Cell<bool>,
}

impl ConnectionManager<BrowserProvider> {
    /// manager for the provider injected in `window.ethereum`, if any
    pub fn browser(config: Config) -> Self {
        Self::new(BrowserProvider::injected(), config)
    }
}

impl<P: WalletProvider> ConnectionManager<P> {
    pub fn new(provider: Option<P>, config: Config) -> Self {
        Self {
            provider,
            config,
            state: RefCell::new(ConnectionState::default()),
            affordance: ConnectAffordance::default(),
            pending: Cell::new(false),
        }
    }

    pub fn target(&self) -> &NetworkTarget {
        &self.config.target
    }

    /// classify the provider this manager was given
    pub fn detect(&self) -> WalletEnvironment {
        WalletEnvironment::classify(self.provider.as_ref(), &self.config.in_app_wallet.flag)
    }

    pub fn state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    /// the flag the UI watches to hide its connect control
    pub fn connect_affordance(&self) -> ConnectAffordance {
        self.affordance.clone()
    }

    /// forget the session, e.g. when the wallet emits `disconnect` or
    /// `accountsChanged`
    pub fn disconnect(&self) {
        tracing::debug!("wallet disconnected");
        self.state.replace(ConnectionState::default());
    }

    /// Connect to the wallet and make sure it is on the target network.
    ///
    /// * in the in-app wallet the connect control is hidden and the scoped
    ///   injected connector is used. The control is shown again if that
    ///   fails. The in-app wallet is expected to already be on the target
    ///   network: no switch is ever requested there.
    /// * any other injected wallet is connected, then asked to switch if it
    ///   is on another chain.
    ///
    /// Nothing is retried. On error the state is reset to disconnected.
    /// While an attempt is pending, further calls fail with
    /// [`WalletError::ConnectionPending`] without prompting the user again.
    pub async fn ensure_connected(
        &self,
        env: &WalletEnvironment,
    ) -> Result<ConnectionState, WalletError> {
        let (kind, provider) = match (env.provider_kind(), &self.provider) {
            (ProviderKind::None, _) | (_, None) => {
                tracing::warn!("no injected wallet");
                return Err(WalletError::NoProvider);
            }
            (kind, Some(provider)) => (kind, provider),
        };

        let Some(_pending) = PendingGuard::acquire(&self.pending) else {
            tracing::debug!("connection already pending, ignoring");
            return Err(WalletError::ConnectionPending);
        };

        let result = if kind == ProviderKind::SpecificInAppWallet {
            self.connect_in_app(provider).await
        } else {
            self.connect_injected(provider).await
        };

        match result {
            Ok(state) => {
                tracing::info!(
                    address = ?state.active_address(),
                    chain_id = ?state.active_chain_id(),
                    "wallet connected"
                );
                self.state.replace(state.clone());
                Ok(state)
            }
            Err(error) => {
                tracing::warn!(%error, "wallet connection failed");
                self.state.replace(ConnectionState::default());
                Err(error)
            }
        }
    }

    async fn connect_in_app(&self, provider: &P) -> Result<ConnectionState, WalletError> {
        // the in-app wallet authorises the page by itself
        self.affordance.hide();

        let connector =
            InjectedConnector::target(provider, &self.config.in_app_wallet.connector_target);
        // give the control back so the user can try again
        let session = connector
            .connect()
            .await
            .inspect_err(|_| self.affordance.show())?;

        if !self.config.target.matches(session.chain_id) {
            tracing::warn!(
                chain_id = %session.chain_id,
                target = %self.config.target,
                "in-app wallet is not on the target network"
            );
        }

        Ok(ConnectionState::connected(&session, session.chain_id))
    }

    async fn connect_injected(&self, provider: &P) -> Result<ConnectionState, WalletError> {
        let session = InjectedConnector::new(provider).connect().await?;
        let target = self.config.target.chain_id();

        if session.chain_id != target {
            tracing::info!(from = %session.chain_id, to = %target, "switching network");
            provider
                .switch_chain(target)
                .await
                .map_err(|error| WalletError::switch(target, error))?;
        }

        Ok(ConnectionState::connected(&session, target))
    }
}

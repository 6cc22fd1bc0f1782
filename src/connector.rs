use crate::{
    chain::ChainId,
    error::{ProviderError, ProviderErrorCode, WalletError},
    provider::WalletProvider,
};
use alloy_primitives::Address;
use async_trait::async_trait;
use core::fmt;

/// Name of a wallet integration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConnectorId {
    /// whatever is injected in `window.ethereum`
    Injected,
    /// the injected provider, scoped to the named wallet (`"metaMask"`...)
    InjectedTarget(String),
}

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Injected => write!(f, "injected"),
            Self::InjectedTarget(target) => write!(f, "injected({target})"),
        }
    }
}

/// An authorised session with a wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub connector: ConnectorId,
    /// never empty, the first one is the active account
    pub accounts: Vec<Address>,
    /// chain the wallet was on when the session was opened
    pub chain_id: ChainId,
}

impl Session {
    pub fn account(&self) -> Option<Address> {
        self.accounts.first().copied()
    }
}

#[async_trait(?Send)]
pub trait Connector {
    fn id(&self) -> ConnectorId;

    /// open a session, this may prompt the user
    async fn connect(&self) -> Result<Session, WalletError>;
}

/// Connects through the injected provider with `eth_requestAccounts`.
pub struct InjectedConnector<'a, P> {
    provider: &'a P,
    target: Option<String>,
}

impl<'a, P: WalletProvider> InjectedConnector<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            target: None,
        }
    }

    /// Only connect if the injected provider is the `target` wallet.
    ///
    /// Wallets announce themselves with an `is<Target>` flag on the provider
    /// object (`"metaMask"` is recognised by `isMetaMask`).
    pub fn target(provider: &'a P, target: impl Into<String>) -> Self {
        Self {
            provider,
            target: Some(target.into()),
        }
    }

    fn matches_target(&self) -> bool {
        match &self.target {
            None => true,
            Some(target) => self.provider.flag(&target_flag(target)),
        }
    }
}

/// `"metaMask"` -> `"isMetaMask"`
fn target_flag(target: &str) -> String {
    let mut chars = target.chars();
    match chars.next() {
        Some(first) => format!("is{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => "is".to_owned(),
    }
}

#[async_trait(?Send)]
impl<P: WalletProvider> Connector for InjectedConnector<'_, P> {
    fn id(&self) -> ConnectorId {
        match &self.target {
            None => ConnectorId::Injected,
            Some(target) => ConnectorId::InjectedTarget(target.clone()),
        }
    }

    async fn connect(&self) -> Result<Session, WalletError> {
        if !self.matches_target() {
            tracing::debug!(connector = %self.id(), "injected provider is not the target wallet");
            return Err(WalletError::NoProvider);
        }

        let accounts = self
            .provider
            .request_accounts()
            .await
            .map_err(WalletError::connect)?;

        // some wallets resolve with an empty list instead of rejecting
        if accounts.is_empty() {
            return Err(WalletError::ConnectionRejected(ProviderError {
                code: ProviderErrorCode::Unauthorized,
                message: "No account was authorised.".to_owned(),
            }));
        }

        let chain_id = self
            .provider
            .chain_id()
            .await
            .map_err(WalletError::connect)?;

        Ok(Session {
            connector: self.id(),
            accounts,
            chain_id,
        })
    }
}

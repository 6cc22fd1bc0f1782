use crate::{
    config::MINIPAY_FLAG,
    provider::{BrowserProvider, WalletProvider},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProviderKind {
    /// nothing is injected, the user needs to install a wallet
    #[default]
    None,
    /// we are running inside the in-app browser of a known wallet
    SpecificInAppWallet,
    /// any other injected wallet (browser extension...)
    GenericInjected,
}

/// What the page has access to. Computed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WalletEnvironment {
    provider_kind: ProviderKind,
}

impl WalletEnvironment {
    pub fn new(provider_kind: ProviderKind) -> Self {
        Self { provider_kind }
    }

    /// classify the (possibly absent) injected provider.
    ///
    /// This only reads `in_app_flag` on the provider, it does not send any
    /// request to the wallet.
    pub fn classify<P: WalletProvider>(provider: Option<&P>, in_app_flag: &str) -> Self {
        let provider_kind = match provider {
            None => ProviderKind::None,
            Some(provider) if provider.flag(in_app_flag) => ProviderKind::SpecificInAppWallet,
            Some(_) => ProviderKind::GenericInjected,
        };

        Self { provider_kind }
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.provider_kind
    }

    pub fn has_injected_provider(&self) -> bool {
        self.provider_kind != ProviderKind::None
    }
}

/// Inspect `window.ethereum`, recognising MiniPay as the in-app wallet.
///
/// Absence of a wallet is a valid result, not an error.
pub fn detect() -> WalletEnvironment {
    detect_with(MINIPAY_FLAG)
}

/// same as [`detect`] with a different in-app wallet flag
pub fn detect_with(in_app_flag: &str) -> WalletEnvironment {
    WalletEnvironment::classify(BrowserProvider::injected().as_ref(), in_app_flag)
}

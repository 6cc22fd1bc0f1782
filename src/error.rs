use crate::chain::ChainId;

/// Error codes a wallet provider reports, see
/// [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193#provider-errors) and
/// [EIP-3085](https://eips.ethereum.org/EIPS/eip-3085).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error)]
pub enum ProviderErrorCode {
    #[error("The user rejected the request.")]
    UserRejected,
    #[error("The requested method and/or account has not been authorized by the user.")]
    Unauthorized,
    #[error("The provider does not support the requested method.")]
    UnsupportedMethod,
    #[error("The provider is disconnected from all chains.")]
    Disconnected,
    #[error("The provider is not connected to the requested chain.")]
    ChainDisconnected,
    /// The chain has not been added to the wallet yet.
    #[error("Unrecognized chain ID.")]
    UnrecognizedChain,
    /// Usually a previous prompt is still waiting on the user.
    #[error("A request of the same kind is already pending.")]
    ResourceUnavailable,
    #[error("Internal JSON-RPC error.")]
    InternalError,
    #[error("Unknown error code `{0}'")]
    Unknown(i64),
}

impl ProviderErrorCode {
    pub fn code(&self) -> i64 {
        match self {
            Self::UserRejected => 4001,
            Self::Unauthorized => 4100,
            Self::UnsupportedMethod => 4200,
            Self::Disconnected => 4900,
            Self::ChainDisconnected => 4901,
            Self::UnrecognizedChain => 4902,
            Self::ResourceUnavailable => -32002,
            Self::InternalError => -32603,
            Self::Unknown(code) => *code,
        }
    }

    /// the user (or the wallet on their behalf) declined the request
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::UserRejected | Self::Unauthorized)
    }
}

impl From<i64> for ProviderErrorCode {
    fn from(code: i64) -> Self {
        match code {
            4001 => Self::UserRejected,
            4100 => Self::Unauthorized,
            4200 => Self::UnsupportedMethod,
            4900 => Self::Disconnected,
            4901 => Self::ChainDisconnected,
            4902 => Self::UnrecognizedChain,
            -32002 => Self::ResourceUnavailable,
            -32603 => Self::InternalError,
            unknown => Self::Unknown(unknown),
        }
    }
}

/// The error object thrown by `window.ethereum.request`.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error, serde::Deserialize,
)]
#[error("{code} {message}")]
pub struct ProviderError {
    pub code: ProviderErrorCode,
    #[serde(default)]
    pub message: String,
}

impl ProviderError {
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self {
            code: ProviderErrorCode::InternalError,
            message: message.into(),
        }
    }
}

/// The `error` member of a JSON-RPC response from the public endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Deserialize)]
#[error("RPC error {code}: {message}")]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

/// Failure of the read-only client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Invalid address `{0}'")]
    InvalidAddress(String),
    #[error("No RPC endpoint configured for chain {0}")]
    NoEndpoint(ChainId),
    #[error("The endpoint could not be reached: {0}")]
    Unreachable(String),
    #[error("The endpoint answered with HTTP status {0}")]
    Status(u16),
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    /// Terminal: the user needs to install a wallet.
    #[error("No injected wallet was found, install one to continue.")]
    NoProvider,
    /// The user declined the connection or the network switch. Triggering
    /// the flow again is allowed.
    #[error("The wallet refused the request: {0}")]
    ConnectionRejected(ProviderError),
    /// The wallet cannot serve the target chain.
    #[error("The wallet could not switch to chain {chain_id}: {source}")]
    NetworkSwitch {
        chain_id: ChainId,
        #[source]
        source: ProviderError,
    },
    #[error("Balance query failed: {0}")]
    NetworkQuery(#[from] QueryError),
    #[error("A connection request is already pending.")]
    ConnectionPending,
    #[error("No account is connected.")]
    NotConnected,
    #[error(transparent)]
    Provider(ProviderError),
}

impl WalletError {
    pub(crate) fn connect(error: ProviderError) -> Self {
        if error.code.is_rejection() {
            Self::ConnectionRejected(error)
        } else {
            Self::Provider(error)
        }
    }

    pub(crate) fn switch(chain_id: ChainId, error: ProviderError) -> Self {
        if error.code.is_rejection() {
            Self::ConnectionRejected(error)
        } else {
            Self::NetworkSwitch {
                chain_id,
                source: error,
            }
        }
    }

    /// `true` if the user may simply trigger the action again.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionRejected(_)
                | Self::NetworkQuery(_)
                | Self::ConnectionPending
                | Self::NotConnected
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitsError {
    #[error("Empty amount")]
    Empty,
    #[error("Invalid character `{0}' in amount")]
    InvalidDigit(char),
    #[error("Too many decimal places: {found} (max {max})")]
    TooManyDecimals { found: usize, max: u8 },
    #[error("Amount does not fit in 256 bits")]
    Overflow,
}

impl<'de> serde::Deserialize<'de> for ProviderErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Visitor;
        impl serde::de::Visitor<'_> for Visitor {
            type Value = ProviderErrorCode;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(formatter, "Expecting an integer ProviderErrorCode")
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(ProviderErrorCode::from(v))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                i64::try_from(v)
                    .map(ProviderErrorCode::from)
                    .map_err(|_| E::custom(format!("error code out of range: {v}")))
            }

            // javascript numbers may come through as floats
            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
                    Ok(ProviderErrorCode::from(v as i64))
                } else {
                    Err(E::custom(format!("invalid error code: {v}")))
                }
            }
        }

        deserializer.deserialize_i64(Visitor)
    }
}

use {
    stcex_abi::AbiError,
    stcex_cli_output::StakeStatus,
    stcex_rpc_client::{ProviderError, TxHash},
    thiserror::Error,
};

/// Broad class of a [`ClientError`], used to pick the notice a presenter
/// shows. None of them is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No wallet, wrong network, or a failed provider round-trip.
    Connectivity,
    /// Detected client-side; nothing was sent to the chain.
    Precondition,
    /// The wallet refused the transaction or it reverted.
    Transaction,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("no wallet provider available: {0}")]
    NoWallet(String),

    #[error("wrong network: wallet is on chain {actual}, expected chain {expected}")]
    WrongNetwork { expected: u64, actual: u64 },

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("unexpected contract data: {0}")]
    Decode(#[from] AbiError),

    #[error("wallet not connected")]
    NotConnected,

    #[error("nothing to claim: {0} is zero")]
    NothingToClaim(&'static str),

    #[error("allowance {allowance} is below the package price {price}; approve first")]
    InsufficientAllowance { allowance: String, price: String },

    #[error("invalid sponsor address '{0}'")]
    InvalidSponsor(String),

    #[error("stake {index} cannot be claimed while {status}")]
    StakeNotReady { index: u64, status: StakeStatus },

    #[error("no active packages")]
    NoActivePackages,

    #[error("package {0} is not active")]
    PackageInactive(u64),

    #[error("referral links are available once the account holds an active package")]
    ReferralUnavailable,

    #[error("transaction rejected: {0}")]
    Rejected(String),

    #[error("transaction {0} reverted")]
    Reverted(TxHash),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::NoWallet(_)
            | ClientError::WrongNetwork { .. }
            | ClientError::Provider(_)
            | ClientError::Decode(_) => ErrorKind::Connectivity,
            ClientError::NotConnected
            | ClientError::NothingToClaim(_)
            | ClientError::InsufficientAllowance { .. }
            | ClientError::InvalidSponsor(_)
            | ClientError::StakeNotReady { .. }
            | ClientError::NoActivePackages
            | ClientError::PackageInactive(_)
            | ClientError::ReferralUnavailable => ErrorKind::Precondition,
            ClientError::Rejected(_) | ClientError::Reverted(_) => ErrorKind::Transaction,
        }
    }

    /// Maps a failed `eth_sendTransaction`. A JSON-RPC error there means the
    /// wallet (or the node's gas estimation) refused the transaction.
    pub(crate) fn from_submission(err: ProviderError) -> Self {
        match err {
            ProviderError::Rpc { message, .. } => ClientError::Rejected(message),
            other => ClientError::Provider(other),
        }
    }
}

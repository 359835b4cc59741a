//! Wallet provider boundary for the STCEx client.
//!
//! The client talks to exactly one endpoint: an EIP-1193 style provider that
//! answers the standard `eth_*` reads, signs and submits transactions on the
//! user's behalf (`eth_sendTransaction`), and understands the
//! `wallet_switchEthereumChain` / `wallet_addEthereumChain` extensions.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`provider`]      | `WalletProvider` trait with typed helpers |
//! | [`http_provider`] | JSON-RPC over HTTP implementation |
//! | [`request`]       | `RpcRequest` method table and hex quantity helpers |
//! | [`response`]      | Receipts, transaction hashes, chain parameters |
//! | [`confirm`]       | Waiting for a transaction receipt |
//! | [`error`]         | `ProviderError` |

pub mod confirm;
pub mod error;
pub mod http_provider;
pub mod provider;
pub mod request;
pub mod response;

pub use {
    error::ProviderError,
    http_provider::HttpProvider,
    provider::WalletProvider,
    response::{AddChainParams, NativeCurrency, TransactionReceipt, TransactionRequest, TxHash},
};

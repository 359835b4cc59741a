//! Request and response payloads exchanged with the wallet provider.

use {
    crate::{error::ProviderError, request::parse_quantity},
    serde::{Deserialize, Serialize},
    stcex_abi::{decode_hex, encode_hex, Address},
    std::{fmt, str::FromStr},
};

/// A 32-byte transaction hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TxHash(pub [u8; 32]);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_hex(&self.0))
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({self})")
    }
}

impl FromStr for TxHash {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_hex(s)?;
        let hash: [u8; 32] = bytes
            .try_into()
            .map_err(|_| ProviderError::InvalidResponse(format!("bad transaction hash: {s}")))?;
        Ok(Self(hash))
    }
}

impl Serialize for TxHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Parameters of `eth_sendTransaction`. Gas and nonce are left to the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    #[serde(serialize_with = "serialize_data")]
    pub data: Vec<u8>,
}

fn serialize_data<S: serde::Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&encode_hex(data))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcTransactionReceipt {
    transaction_hash: String,
    block_number: Option<String>,
    status: Option<String>,
    gas_used: Option<String>,
}

/// The mined outcome of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    pub block_number: u64,
    /// `false` when the transaction reverted.
    pub success: bool,
    pub gas_used: u64,
}

impl TransactionReceipt {
    /// Decodes the `eth_getTransactionReceipt` result. `null` means the
    /// transaction is still pending.
    pub fn from_rpc(value: serde_json::Value) -> Result<Option<Self>, ProviderError> {
        if value.is_null() {
            return Ok(None);
        }
        let raw: RpcTransactionReceipt = serde_json::from_value(value)?;
        let Some(block_number) = raw.block_number.as_deref() else {
            return Ok(None);
        };
        Ok(Some(Self {
            transaction_hash: raw.transaction_hash.parse()?,
            block_number: parse_quantity(block_number)?,
            // Pre-Byzantium receipts carry no status field; treat as success.
            success: raw.status.as_deref().map_or(Ok(true), |s| parse_quantity(s).map(|v| v == 1))?,
            gas_used: raw.gas_used.as_deref().map_or(Ok(0), parse_quantity)?,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Parameters of `wallet_addEthereumChain` (EIP-3085).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

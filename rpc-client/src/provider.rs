use {
    crate::{
        error::ProviderError,
        request::{parse_quantity, to_quantity, RpcRequest},
        response::{AddChainParams, TransactionReceipt, TransactionRequest, TxHash},
    },
    async_trait::async_trait,
    log::debug,
    serde_json::{json, Value},
    stcex_abi::{decode_hex, encode_hex, Address},
};

/// An EIP-1193 style request interface.
///
/// Implementors only provide [`request`](WalletProvider::request); the typed
/// helpers are built on top of it so test doubles stay small.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn request(&self, method: RpcRequest, params: Value) -> Result<Value, ProviderError>;

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        let value = self.request(RpcRequest::ChainId, json!([])).await?;
        let quantity = value
            .as_str()
            .ok_or_else(|| ProviderError::InvalidResponse(format!("chain id: {value}")))?;
        parse_quantity(quantity)
    }

    /// Accounts already authorised, without prompting.
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let value = self.request(RpcRequest::Accounts, json!([])).await?;
        parse_accounts(value)
    }

    /// Prompts for account access if necessary.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let value = self.request(RpcRequest::RequestAccounts, json!([])).await?;
        parse_accounts(value)
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError> {
        self.request(
            RpcRequest::SwitchEthereumChain,
            json!([{ "chainId": to_quantity(chain_id) }]),
        )
        .await?;
        Ok(())
    }

    async fn add_chain(&self, params: &AddChainParams) -> Result<(), ProviderError> {
        self.request(RpcRequest::AddEthereumChain, json!([params]))
            .await?;
        Ok(())
    }

    /// Read-only `eth_call` against the latest block.
    async fn call(&self, to: Address, data: &[u8]) -> Result<Vec<u8>, ProviderError> {
        let value = self
            .request(
                RpcRequest::Call,
                json!([{ "to": to, "data": encode_hex(data) }, "latest"]),
            )
            .await?;
        let hex = value
            .as_str()
            .ok_or_else(|| ProviderError::InvalidResponse(format!("call result: {value}")))?;
        Ok(decode_hex(hex)?)
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash, ProviderError> {
        debug!("eth_sendTransaction from {} to {}", tx.from, tx.to);
        let value = self
            .request(RpcRequest::SendTransaction, json!([tx]))
            .await?;
        let hash = value
            .as_str()
            .ok_or_else(|| ProviderError::InvalidResponse(format!("tx hash: {value}")))?;
        hash.parse()
    }

    async fn transaction_receipt(
        &self,
        hash: &TxHash,
    ) -> Result<Option<TransactionReceipt>, ProviderError> {
        let value = self
            .request(RpcRequest::GetTransactionReceipt, json!([hash]))
            .await?;
        TransactionReceipt::from_rpc(value)
    }
}

fn parse_accounts(value: Value) -> Result<Vec<Address>, ProviderError> {
    let accounts: Vec<String> = serde_json::from_value(value)?;
    accounts
        .iter()
        .map(|a| a.parse().map_err(ProviderError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use {super::*, std::sync::Mutex};

    /// Answers every request with a canned value and records the calls.
    struct Canned {
        answer: Value,
        seen: Mutex<Vec<(RpcRequest, Value)>>,
    }

    #[async_trait]
    impl WalletProvider for Canned {
        async fn request(&self, method: RpcRequest, params: Value) -> Result<Value, ProviderError> {
            self.seen.lock().unwrap().push((method, params));
            Ok(self.answer.clone())
        }
    }

    fn canned(answer: Value) -> Canned {
        Canned {
            answer,
            seen: Mutex::new(vec![]),
        }
    }

    #[tokio::test]
    async fn test_chain_id() {
        let p = canned(json!("0x38"));
        assert_eq!(p.chain_id().await.unwrap(), 56);
    }

    #[tokio::test]
    async fn test_accounts_parsed() {
        let p = canned(json!(["0x55d398326f99059ff775485246999027b3197955"]));
        let accounts = p.request_accounts().await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(
            accounts[0].to_string(),
            "0x55d398326f99059fF775485246999027B3197955"
        );
    }

    #[tokio::test]
    async fn test_call_encodes_data_and_block_tag() {
        let p = canned(json!("0x0000000000000000000000000000000000000000000000000000000000000001"));
        let out = p.call(Address::new([9; 20]), &[0x31, 0x3c, 0xe5, 0x67]).await.unwrap();
        assert_eq!(out.len(), 32);
        let seen = p.seen.lock().unwrap();
        assert_eq!(seen[0].0, RpcRequest::Call);
        assert_eq!(seen[0].1[0]["data"], "0x313ce567");
        assert_eq!(seen[0].1[1], "latest");
    }

    #[tokio::test]
    async fn test_switch_chain_uses_hex_id() {
        let p = canned(Value::Null);
        p.switch_chain(56).await.unwrap();
        let seen = p.seen.lock().unwrap();
        assert_eq!(seen[0].1[0]["chainId"], "0x38");
    }
}

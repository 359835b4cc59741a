use {
    crate::error::ClientError,
    log::{debug, info, warn},
    stcex_abi::Address,
    stcex_rpc_client::WalletProvider,
    std::{sync::Arc, time::Duration},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    AccountsChanged(Vec<Address>),
    ChainChanged(u64),
}

/// Detects account and chain switches by polling `eth_accounts` and
/// `eth_chainId`.
pub struct WalletWatcher {
    provider: Arc<dyn WalletProvider>,
    period: Duration,
    accounts: Vec<Address>,
    chain_id: u64,
}

impl WalletWatcher {
    /// Takes the current accounts and chain as the baseline.
    pub async fn new(
        provider: Arc<dyn WalletProvider>,
        period: Duration,
    ) -> Result<Self, ClientError> {
        let accounts = provider.accounts().await?;
        let chain_id = provider.chain_id().await?;
        Ok(Self {
            provider,
            period,
            accounts,
            chain_id,
        })
    }

    /// Compares the wallet against the baseline once and moves the baseline
    /// forward on a change. A chain change is reported before an account
    /// change.
    pub async fn poll(&mut self) -> Result<Option<WalletEvent>, ClientError> {
        let chain_id = self.provider.chain_id().await?;
        if chain_id != self.chain_id {
            info!("wallet chain changed {} -> {chain_id}", self.chain_id);
            self.chain_id = chain_id;
            return Ok(Some(WalletEvent::ChainChanged(chain_id)));
        }
        let accounts = self.provider.accounts().await?;
        if accounts != self.accounts {
            info!("wallet accounts changed");
            self.accounts = accounts.clone();
            return Ok(Some(WalletEvent::AccountsChanged(accounts)));
        }
        Ok(None)
    }

    /// Waits for the next change. Poll failures are logged and retried.
    pub async fn next_event(&mut self) -> WalletEvent {
        loop {
            match self.poll().await {
                Ok(Some(event)) => return event,
                Ok(None) => debug!("wallet unchanged"),
                Err(err) => warn!("wallet poll failed: {err}"),
            }
            tokio::time::sleep(self.period).await;
        }
    }
}

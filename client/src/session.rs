//! Connection manager: network check, account access, contract binding.

use {
    crate::{
        contracts::{
            ContractHandle, CoreContract, EarningsContract, StakingContract, TokenContract,
        },
        error::ClientError,
    },
    log::{info, warn},
    stcex_abi::Address,
    stcex_cli_config::Config,
    stcex_cli_output::{
        display::{short_address, PLACEHOLDER},
        SessionView,
    },
    stcex_rpc_client::{AddChainParams, NativeCurrency, ProviderError, WalletProvider},
    std::sync::Arc,
};

/// The connected account and its contract handles.
///
/// Built once per connection. On an account or chain change the controller
/// drops it and connects again; it is never patched in place.
#[derive(Debug, Clone)]
pub struct Session {
    pub account: Address,
    pub chain_id: u64,
    pub token: TokenContract,
    pub core: CoreContract,
    pub earnings: EarningsContract,
    pub staking: StakingContract,
}

impl Session {
    pub fn bind(
        provider: Arc<dyn WalletProvider>,
        config: &Config,
        account: Address,
        chain_id: u64,
    ) -> Self {
        let contracts = &config.contracts;
        let handle = |address| ContractHandle::new(address, account, provider.clone());
        Self {
            account,
            chain_id,
            token: TokenContract(handle(contracts.token)),
            core: CoreContract(handle(contracts.core)),
            earnings: EarningsContract(handle(contracts.earnings)),
            staking: StakingContract(handle(contracts.staking)),
        }
    }

    pub fn view(&self, config: &Config) -> SessionView {
        let account = self.account.to_string();
        let core = config.contracts.core.to_string();
        let modules = [
            ("Token", Some(config.contracts.token)),
            ("Earnings", Some(config.contracts.earnings)),
            ("Staking", Some(config.contracts.staking)),
            ("Referral", config.contracts.referral),
            ("Binary", config.contracts.binary),
            ("Vault", config.contracts.vault),
        ]
        .into_iter()
        .map(|(name, address)| {
            let address = address.map_or_else(|| PLACEHOLDER.to_string(), |a| a.to_string());
            (name.to_string(), address)
        })
        .collect();
        SessionView {
            network: format!("chainId: {}", self.chain_id),
            chain_name: config.chain_name.clone(),
            account_short: short_address(&account),
            account_explorer_url: config.explorer_address_url(&self.account),
            account,
            core_short: short_address(&core),
            core_explorer_url: config.explorer_address_url(&config.contracts.core),
            core,
            modules,
        }
    }
}

pub fn add_chain_params(config: &Config) -> AddChainParams {
    AddChainParams {
        chain_id: config.chain_id_hex(),
        chain_name: config.chain_name.clone(),
        native_currency: NativeCurrency {
            name: config.native_currency_name.clone(),
            symbol: config.native_currency_symbol.clone(),
            decimals: 18,
        },
        rpc_urls: vec![config.rpc_url.clone()],
        block_explorer_urls: vec![config.block_explorer.clone()],
    }
}

fn unreachable_wallet(err: ProviderError) -> ClientError {
    match err {
        ProviderError::Transport(err) => ClientError::NoWallet(err.to_string()),
        other => ClientError::Provider(other),
    }
}

/// Makes sure the wallet is on the configured chain, asking it to switch,
/// or to add the chain first when it does not know it.
pub async fn ensure_network(
    provider: &dyn WalletProvider,
    config: &Config,
) -> Result<u64, ClientError> {
    let expected = config.chain_id;
    let actual = provider.chain_id().await.map_err(unreachable_wallet)?;
    if actual == expected {
        return Ok(actual);
    }
    info!("wallet is on chain {actual}, requesting switch to {expected}");

    let switched = match provider.switch_chain(expected).await {
        Ok(()) => Ok(()),
        Err(err) if err.is_unrecognized_chain() => {
            info!("wallet does not know chain {expected}, adding it");
            match provider.add_chain(&add_chain_params(config)).await {
                Ok(()) => provider.switch_chain(expected).await,
                Err(err) => Err(err),
            }
        }
        Err(err) => Err(err),
    };
    if let Err(err) = switched {
        warn!("network switch failed: {err}");
        return Err(ClientError::WrongNetwork { expected, actual });
    }

    let now = provider.chain_id().await?;
    if now != expected {
        warn!("wallet reported chain {now} after switching");
        return Err(ClientError::WrongNetwork {
            expected,
            actual: now,
        });
    }
    Ok(now)
}

/// Verifies the network, requests account access and binds the contracts.
pub async fn connect(
    provider: Arc<dyn WalletProvider>,
    config: &Config,
) -> Result<Session, ClientError> {
    let chain_id = ensure_network(provider.as_ref(), config).await?;
    let accounts = provider.request_accounts().await?;
    let account = accounts
        .first()
        .copied()
        .ok_or_else(|| ClientError::NoWallet("wallet exposed no accounts".to_string()))?;
    info!("connected {account} on chain {chain_id}");
    Ok(Session::bind(provider, config, account, chain_id))
}

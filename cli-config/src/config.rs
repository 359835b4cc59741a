// Wallet and contract configuration.
use {
    crate::ConfigError,
    serde::{Deserialize, Serialize},
    stcex_abi::Address,
    std::{path::Path, sync::LazyLock, time::Duration},
    url::Url,
};

/// The default path to the CLI configuration file.
///
/// This is a [LazyLock] of an `Option<String>`, the value of which is
///
/// > `~/.config/stcex/cli/config.yml`
///
/// It will only be `None` if it is unable to identify the user's home
/// directory, which should not happen under typical OS environments.
pub static CONFIG_FILE: LazyLock<Option<String>> = LazyLock::new(|| {
    dirs_next::home_dir().and_then(|mut path| {
        path.extend([".config", "stcex", "cli", "config.yml"]);
        path.to_str().map(str::to_string)
    })
});

const DEFAULT_TOKEN: Address = Address::from_literal("0x55d398326f99059fF775485246999027B3197955");
const DEFAULT_CORE: Address = Address::from_literal("0xF1e4eAD1b7f772AF0eC629f0e2695c78C29E11dE");
// users() at this address returns five words, not the six the client
// decodes, so account fields read from it show placeholders.
const DEFAULT_EARNINGS: Address =
    Address::from_literal("0xf4e58b87909c68a07327ea3c82450D2Db51e6f0C");
const DEFAULT_STAKING: Address = Address::from_literal("0x575B29195ee74bcdAB538Ab4464BabADA13E24DA");
const DEFAULT_REFERRAL: Address =
    Address::from_literal("0xC9053Afa331Cc4c9edeE3326A8BbC69539c15Cf5");
const DEFAULT_BINARY: Address = Address::from_literal("0xCFfbdaD135F10FF4AcC756d2a98AB0f75955eD54");
const DEFAULT_VAULT: Address = Address::from_literal("0xF703d77075976c5F4FB9ac264e5351a5D301c425");

/// Addresses of the contracts the client binds to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ContractAddresses {
    /// The 18-decimal payment token (USDT BEP-20).
    pub token: Address,
    /// Packages, purchases and the per-user stake index.
    pub core: Address,
    /// Rank, referral and matching earnings.
    pub earnings: Address,
    /// Stake records and stake claims.
    pub staking: Address,
    /// Auxiliary modules; displayed only.
    #[serde(default)]
    pub referral: Option<Address>,
    #[serde(default)]
    pub binary: Option<Address>,
    #[serde(default)]
    pub vault: Option<Address>,
}

impl Default for ContractAddresses {
    fn default() -> Self {
        Self {
            token: DEFAULT_TOKEN,
            core: DEFAULT_CORE,
            earnings: DEFAULT_EARNINGS,
            staking: DEFAULT_STAKING,
            referral: Some(DEFAULT_REFERRAL),
            binary: Some(DEFAULT_BINARY),
            vault: Some(DEFAULT_VAULT),
        }
    }
}

/// The CLI configuration.
///
/// Read once at startup and never mutated afterwards; callers share it
/// behind an `Arc`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub chain_id: u64,
    pub chain_name: String,
    pub native_currency_name: String,
    pub native_currency_symbol: String,
    /// Public node, advertised to the wallet when the chain must be added.
    pub rpc_url: String,
    pub block_explorer: String,
    /// The wallet provider endpoint that holds the user's accounts.
    pub wallet_url: String,
    /// Landing page used as the base of shareable referral links.
    pub dapp_url: String,
    pub contracts: ContractAddresses,
    pub default_sponsor: Address,
    /// Query parameters accepted as the referral address, in priority order.
    /// The first one is used when building links.
    pub ref_param_keys: Vec<String>,
    pub side_param_key: String,
    pub countdown_interval_ms: u64,
    pub confirm_poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chain_id: 56,
            chain_name: "BNB Smart Chain".to_string(),
            native_currency_name: "BNB".to_string(),
            native_currency_symbol: "BNB".to_string(),
            rpc_url: "https://bsc-dataseed.binance.org/".to_string(),
            block_explorer: "https://bscscan.com".to_string(),
            wallet_url: "http://127.0.0.1:1248".to_string(),
            dapp_url: String::new(),
            contracts: ContractAddresses::default(),
            default_sponsor: Address::ZERO,
            ref_param_keys: vec!["ref".to_string(), "sponsor".to_string(), "upline".to_string()],
            side_param_key: "side".to_string(),
            countdown_interval_ms: 1_000,
            confirm_poll_interval_ms: 2_000,
        }
    }
}

impl Config {
    /// Load a configuration from file.
    pub fn load(config_file: impl AsRef<Path>) -> Result<Self, ConfigError> {
        crate::load_config_file(config_file)
    }

    /// Save a configuration to file.
    pub fn save(&self, config_file: impl AsRef<Path>) -> Result<(), ConfigError> {
        crate::save_config_file(self, config_file)
    }

    /// Chain id as a hex quantity, as wallets expect it (`0x38`).
    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    /// Key written into referral links.
    pub fn primary_ref_param(&self) -> &str {
        self.ref_param_keys
            .first()
            .map(String::as_str)
            .unwrap_or("ref")
    }

    pub fn explorer_address_url(&self, address: &Address) -> String {
        format!("{}/address/{}", self.block_explorer, address)
    }

    pub fn explorer_tx_url(&self, hash: impl std::fmt::Display) -> String {
        format!("{}/tx/{}", self.block_explorer, hash)
    }

    pub fn countdown_interval(&self) -> Duration {
        Duration::from_millis(self.countdown_interval_ms)
    }

    pub fn confirm_poll_interval(&self) -> Duration {
        Duration::from_millis(self.confirm_poll_interval_ms)
    }

    /// Parse `url`, or the configured landing page when `url` is `None`.
    pub fn page_url(&self, url: Option<&str>) -> Result<Url, ConfigError> {
        let raw = url.unwrap_or(&self.dapp_url);
        Url::parse(raw).map_err(|err| ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployment() {
        let config = Config::default();
        assert_eq!(config.chain_id, 56);
        assert_eq!(config.chain_id_hex(), "0x38");
        assert_eq!(config.primary_ref_param(), "ref");
        assert_eq!(
            config.contracts.core.to_string(),
            "0xF1e4eAD1b7f772AF0eC629f0e2695c78C29E11dE"
        );
        assert!(config.default_sponsor.is_zero());
    }

    #[test]
    fn test_default_contracts_parse_like_user_input() {
        let contracts = ContractAddresses::default();
        let parsed = |s: &str| s.parse::<Address>().unwrap();
        assert_eq!(contracts.token, parsed("0x55d398326f99059fF775485246999027B3197955"));
        assert_eq!(contracts.earnings, parsed("0xf4e58b87909c68a07327ea3c82450D2Db51e6f0C"));
        assert_eq!(contracts.staking, parsed("0x575B29195ee74bcdAB538Ab4464BabADA13E24DA"));
        assert_eq!(
            contracts.vault,
            Some(parsed("0xF703d77075976c5F4FB9ac264e5351a5D301c425"))
        );
    }

    #[test]
    fn test_explorer_links() {
        let config = Config::default();
        let core = config.contracts.core;
        assert_eq!(
            config.explorer_address_url(&core),
            "https://bscscan.com/address/0xF1e4eAD1b7f772AF0eC629f0e2695c78C29E11dE"
        );
        assert_eq!(config.explorer_tx_url("0xabc"), "https://bscscan.com/tx/0xabc");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        let config = Config {
            dapp_url: "https://example.com/app".to_string(),
            chain_id: 97,
            ..Config::default()
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_takes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "chain_id: 97\nwallet_url: http://localhost:8545\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.chain_id, 97);
        assert_eq!(config.wallet_url, "http://localhost:8545");
        assert_eq!(config.contracts, ContractAddresses::default());
    }

    #[test]
    fn test_bad_address_rejected_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "default_sponsor: 0x1234\n").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_page_url() {
        let config = Config::default();
        assert!(matches!(config.page_url(None), Err(ConfigError::InvalidUrl { .. })));
        let url = config.page_url(Some("https://example.com/?ref=0x00")).unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
    }
}

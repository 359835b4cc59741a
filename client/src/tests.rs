use {
    crate::{
        contracts::{core_abi, earnings_abi, staking_abi, token_abi, Package, StakeRecord, UserAccount},
        error::ClientError,
        referral::{Clipboard, CopyOutcome, Side, SponsorSource},
        test_utils::{test_config, FakeChain, ManualClock, RecordingPresenter, SwitchBehavior},
        wallet_watch::{WalletEvent, WalletWatcher},
        Control, Dapp,
    },
    assert_matches::assert_matches,
    num_bigint::BigUint,
    stcex_abi::Address,
    stcex_cli_config::Config,
    stcex_cli_output::StakeStatus,
    stcex_rpc_client::request::RpcRequest,
    std::{cell::RefCell, sync::Arc, time::Duration},
    url::Url,
};

const NOW: u64 = 1_700_000_000;

fn buyer() -> Address {
    Address::new([0xaa; 20])
}

fn upline() -> Address {
    Address::new([0x5b; 20])
}

fn tokens(units: u64) -> BigUint {
    BigUint::from(units) * BigUint::from(10u64).pow(18)
}

fn package(id: u64, price: u64, rank: u8) -> Package {
    Package {
        id,
        active: true,
        price: tokens(price),
        token_amount: tokens(price * 10),
        daily_bp: 50,
        lock_seconds: 30 * 86_400,
        rank,
    }
}

fn stake(end_ts: u64) -> StakeRecord {
    StakeRecord {
        principal: tokens(100),
        daily_bp: 50,
        start_ts: end_ts - 30 * 86_400,
        end_ts,
        total_reward: tokens(15),
        claimed: false,
    }
}

struct Harness {
    chain: Arc<FakeChain>,
    presenter: Arc<RecordingPresenter>,
    clock: Arc<ManualClock>,
    config: Config,
    dapp: Dapp,
}

impl Harness {
    fn new(chain: FakeChain, page: Option<&str>) -> Self {
        Self::with_config(chain, page, test_config())
    }

    fn with_config(chain: FakeChain, page: Option<&str>, config: Config) -> Self {
        let chain = Arc::new(chain);
        let presenter = Arc::new(RecordingPresenter::default());
        let clock = Arc::new(ManualClock::new(NOW));
        let dapp = Dapp::new(
            Arc::new(config.clone()),
            chain.clone(),
            presenter.clone(),
            clock.clone(),
            page.map(|p| Url::parse(p).unwrap()),
        );
        Self {
            chain,
            presenter,
            clock,
            config,
            dapp,
        }
    }

    /// A chain with the default packages, on the configured network.
    fn ready(page: Option<&str>) -> Self {
        Self::ready_with_config(page, test_config())
    }

    fn ready_with_config(page: Option<&str>, config: Config) -> Self {
        let chain = FakeChain::new(config.chain_id, buyer());
        chain.update(|s| {
            s.packages = vec![package(0, 100, 1), package(1, 500, 2)];
            s.default_sponsor = upline();
        });
        Self::with_config(chain, page, config)
    }

    fn approve_directly(&self, amount: BigUint) {
        let core = self.config.contracts.core;
        self.chain.update(|s| {
            s.allowances.insert((buyer(), core), amount);
        });
    }
}

#[tokio::test]
async fn test_connect_rejects_wrong_network_when_switch_declined() {
    let chain = FakeChain::new(1, buyer());
    chain.update(|s| s.switch = SwitchBehavior::Reject);
    let mut h = Harness::new(chain, None);

    let err = h.dapp.connect().await.unwrap_err();
    assert_matches!(err, ClientError::WrongNetwork { expected: 56, actual: 1 });
    assert!(h.dapp.session().is_none());
    assert_eq!(
        h.presenter.last_notice().unwrap().message,
        "Wrong network: switch the wallet to BNB Smart Chain (chainId 56)"
    );
    assert!(!h.chain.requested(RpcRequest::RequestAccounts));
    assert!(h.chain.sent().is_empty());
}

#[tokio::test]
async fn test_connect_switches_network() {
    let mut h = Harness::new(FakeChain::new(1, buyer()), None);

    h.dapp.connect().await.unwrap();
    assert_eq!(h.chain.read(|s| s.chain_id), 56);
    assert!(!h.chain.requested(RpcRequest::AddEthereumChain));
    assert_eq!(h.dapp.session().unwrap().chain_id, 56);
}

#[tokio::test]
async fn test_connect_adds_unknown_chain_then_switches() {
    let chain = FakeChain::new(1, buyer());
    chain.update(|s| s.switch = SwitchBehavior::UnknownChain);
    let mut h = Harness::new(chain, None);

    h.dapp.connect().await.unwrap();
    assert!(h.chain.read(|s| s.chain_added));
    assert_eq!(h.chain.read(|s| s.chain_id), 56);
}

#[tokio::test]
async fn test_connect_fails_when_adding_chain_declined() {
    let chain = FakeChain::new(1, buyer());
    chain.update(|s| s.switch = SwitchBehavior::UnknownChainRejectAdd);
    let mut h = Harness::new(chain, None);

    assert_matches!(
        h.dapp.connect().await,
        Err(ClientError::WrongNetwork { expected: 56, actual: 1 })
    );
    assert!(h.dapp.session().is_none());
}

#[tokio::test]
async fn test_connect_without_accounts() {
    let chain = FakeChain::new(56, buyer());
    chain.update(|s| s.accounts.clear());
    let mut h = Harness::new(chain, None);

    assert_matches!(h.dapp.connect().await, Err(ClientError::NoWallet(_)));
    assert!(h.dapp.session().is_none());
}

#[tokio::test]
async fn test_connect_binds_contracts_and_loads_packages() {
    let mut h = Harness::ready(None);
    h.dapp.connect().await.unwrap();

    let session = h.dapp.session().unwrap();
    assert_eq!(session.account, buyer());
    assert_eq!(session.token.0.address(), h.config.contracts.token);
    assert_eq!(session.core.address(), h.config.contracts.core);
    assert_eq!(session.earnings.0.address(), h.config.contracts.earnings);
    assert_eq!(session.staking.0.address(), h.config.contracts.staking);

    let recorded = h.presenter.recorded();
    let shown = recorded.session.unwrap();
    assert_eq!(shown.network, "chainId: 56");
    assert_eq!(shown.account, buyer().to_string());

    let packages = recorded.packages.unwrap();
    assert_eq!(
        packages.packages.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![0, 1]
    );
    assert_eq!(packages.selected, Some(0));
    assert_eq!(packages.selected_price.as_deref(), Some("100.0"));

    assert_eq!(h.presenter.is_enabled(Control::Connect), Some(false));
    assert_eq!(h.presenter.is_enabled(Control::Buy), Some(true));
    assert!(h.presenter.messages().contains(&"Connected".to_string()));
    assert!(h.dapp.is_counting_down());
}

#[tokio::test]
async fn test_package_load_skips_failed_slot() {
    let chain = FakeChain::new(56, buyer());
    chain.update(|s| {
        s.packages = vec![package(0, 100, 1), package(1, 500, 2), package(2, 1_000, 3)];
        s.packages[0].active = false;
        s.failing_packages.insert(1);
    });
    let mut h = Harness::new(chain, None);
    h.dapp.connect().await.unwrap();

    let packages = h.dapp.packages().unwrap();
    assert_eq!(packages.packages.len(), 1);
    assert_eq!(packages.packages[0].id, 2);
    assert_eq!(packages.skipped, vec![1]);
    assert_eq!(packages.selected, Some(2));
}

#[tokio::test]
async fn test_no_active_packages_disables_purchase() {
    let chain = FakeChain::new(56, buyer());
    let mut h = Harness::new(chain, None);
    h.dapp.connect().await.unwrap();

    assert!(h.presenter.messages().contains(&"no active packages".to_string()));
    assert_eq!(h.presenter.is_enabled(Control::Buy), Some(false));
    assert_matches!(h.dapp.buy(None).await, Err(ClientError::NoActivePackages));
}

#[tokio::test]
async fn test_select_package_previews_fresh_price() {
    let mut h = Harness::ready(None);
    h.dapp.connect().await.unwrap();
    h.chain.update(|s| s.packages[1].price = tokens(750));

    assert_eq!(h.dapp.select_package(1).await.unwrap(), "750.0");
    assert_eq!(h.dapp.packages().unwrap().selected, Some(1));

    h.chain.update(|s| s.packages[1].active = false);
    assert_matches!(
        h.dapp.select_package(1).await,
        Err(ClientError::PackageInactive(1))
    );
}

#[tokio::test]
async fn test_buy_blocked_below_price() {
    let mut h = Harness::ready(None);
    h.dapp.connect().await.unwrap();
    h.approve_directly(tokens(99));

    assert_matches!(
        h.dapp.buy(None).await,
        Err(ClientError::InsufficientAllowance { .. })
    );
    assert_eq!(h.chain.sent_count(core_abi::BUY), 0);
    assert!(h
        .presenter
        .last_notice()
        .unwrap()
        .message
        .starts_with("allowance 99.0 is below the package price 100.0"));
}

#[tokio::test]
async fn test_approve_then_buy() {
    let mut h = Harness::ready(Some("https://stcex.io/app?lang=en"));
    h.dapp.connect().await.unwrap();
    assert_matches!(h.dapp.referral_links(), Err(ClientError::ReferralUnavailable));

    let approval = h.dapp.approve(None).await.unwrap();
    assert_eq!(approval.action, "Approve");
    let sent = h.chain.sent();
    assert_eq!(sent[0].function, token_abi::APPROVE.signature);
    assert_eq!(sent[0].address_arg(0), h.config.contracts.core);
    assert_eq!(sent[0].uint_arg(1), tokens(100));

    let (view, decision) = h.dapp.buy(None).await.unwrap();
    assert_eq!(view.action, "Buy");
    assert_eq!(decision.sponsor, upline());
    assert_eq!(decision.source, SponsorSource::ContractDefault);

    let buy = &h.chain.sent()[1];
    assert_eq!(buy.function, core_abi::BUY.signature);
    assert_eq!(buy.to, h.config.contracts.core);
    assert_eq!(buy.uint_arg(0), BigUint::from(0u64));
    assert_eq!(buy.address_arg(1), upline());
    assert_eq!(buy.uint_arg(2), BigUint::from(0u64));

    // The refresh after the purchase sees the activated account.
    let account = h.presenter.recorded().account.unwrap();
    assert_eq!(account.status, "ACTIVE");
    assert_eq!(account.rank, "Bronze");
    let (left, right) = h.dapp.referral_links().unwrap();
    assert!(left.starts_with("https://stcex.io/app?lang=en&ref="));
    assert!(left.contains(&buyer().to_string()));
    assert!(left.ends_with("side=0"));
    assert!(right.ends_with("side=1"));
}

#[tokio::test]
async fn test_buy_uses_locked_referral_link() {
    let page = format!("https://stcex.io/app?sponsor={}&side=R", upline().to_lower_hex());
    let mut h = Harness::ready(Some(&page));
    h.chain.update(|s| s.default_sponsor = Address::new([0x11; 20]));
    h.dapp.connect().await.unwrap();
    h.approve_directly(tokens(100));

    let form = h.presenter.recorded().form.unwrap();
    assert!(form.sponsor_locked);
    assert!(form.side_locked);
    assert_eq!(form.side, "right");
    assert_eq!(h.presenter.is_enabled(Control::SponsorField), Some(false));
    assert!(!h.dapp.set_sponsor_input("0x0000000000000000000000000000000000000001"));
    assert!(!h.dapp.set_side(Side::Left));

    let (_, decision) = h.dapp.buy(None).await.unwrap();
    assert_eq!(decision.source, SponsorSource::ReferralLink);
    let buy = &h.chain.sent()[0];
    assert_eq!(buy.address_arg(1), upline());
    assert_eq!(buy.uint_arg(2), BigUint::from(1u64));
}

#[tokio::test]
async fn test_buy_never_sponsors_self() {
    let page = format!("https://stcex.io/app?ref={}", buyer());
    let mut h = Harness::ready(Some(&page));
    h.dapp.connect().await.unwrap();
    h.approve_directly(tokens(100));
    assert!(!h.dapp.form().sponsor_locked());

    assert!(h.dapp.set_sponsor_input(&buyer().to_string()));
    let (_, decision) = h.dapp.buy(None).await.unwrap();
    assert!(decision.self_referral_blocked);
    assert_eq!(decision.sponsor, Address::ZERO);
    assert_eq!(h.chain.sent()[0].address_arg(1), Address::ZERO);
}

#[tokio::test]
async fn test_buy_falls_back_to_configured_sponsor() {
    let mut h = Harness::ready(None);
    h.chain.update(|s| {
        s.failing_calls.insert(core_abi::DEFAULT_SPONSOR.signature);
    });
    h.dapp.connect().await.unwrap();
    h.approve_directly(tokens(100));

    let (_, decision) = h.dapp.buy(None).await.unwrap();
    assert_eq!(decision.source, SponsorSource::ConfigDefault);
    assert_eq!(decision.sponsor, h.config.default_sponsor);
    assert_eq!(decision.notes.len(), 2);
}

#[tokio::test]
async fn test_contract_default_outranks_prefilled_config_sponsor() {
    let configured = Address::new([0x11; 20]);
    let config = Config {
        default_sponsor: configured,
        ..test_config()
    };
    let mut h = Harness::ready_with_config(None, config);
    h.dapp.connect().await.unwrap();
    h.approve_directly(tokens(100));
    assert_eq!(h.dapp.form().sponsor_input(), configured.to_string());
    assert!(!h.dapp.form().sponsor_edited());

    let (_, decision) = h.dapp.buy(None).await.unwrap();
    assert_eq!(decision.source, SponsorSource::ContractDefault);
    assert_eq!(decision.sponsor, upline());
    assert_eq!(h.chain.sent()[0].address_arg(1), upline());
}

#[tokio::test]
async fn test_edited_prefill_is_used_as_input() {
    let configured = Address::new([0x11; 20]);
    let config = Config {
        default_sponsor: configured,
        ..test_config()
    };
    let mut h = Harness::ready_with_config(None, config);
    h.dapp.connect().await.unwrap();
    h.approve_directly(tokens(100));

    // Re-entering the same value counts as a choice.
    assert!(h.dapp.set_sponsor_input(&configured.to_string()));
    let (_, decision) = h.dapp.buy(None).await.unwrap();
    assert_eq!(decision.source, SponsorSource::InputField);
    assert_eq!(decision.sponsor, configured);
}

#[tokio::test]
async fn test_configured_sponsor_when_contract_default_unset() {
    let configured = Address::new([0x11; 20]);
    let config = Config {
        default_sponsor: configured,
        ..test_config()
    };
    let mut h = Harness::ready_with_config(None, config);
    h.chain.update(|s| s.default_sponsor = Address::ZERO);
    h.dapp.connect().await.unwrap();
    h.approve_directly(tokens(100));

    let (_, decision) = h.dapp.buy(None).await.unwrap();
    assert_eq!(decision.source, SponsorSource::ConfigDefault);
    assert_eq!(decision.sponsor, configured);
    assert_eq!(
        decision.notes,
        vec![
            "sponsor field holds the configured default".to_string(),
            "contract default sponsor is unset".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_purchase_requires_connection() {
    let mut h = Harness::ready(None);

    assert_matches!(h.dapp.approve(Some(0)).await, Err(ClientError::NotConnected));
    assert_matches!(h.dapp.buy(None).await, Err(ClientError::NotConnected));
    assert_matches!(h.dapp.buy(Some(1)).await, Err(ClientError::NotConnected));
    assert_eq!(
        h.presenter.last_notice().unwrap().message,
        ClientError::NotConnected.to_string()
    );
    assert!(h.chain.sent().is_empty());

    h.dapp.connect().await.unwrap();
    h.dapp.disconnect();
    assert_matches!(h.dapp.approve(None).await, Err(ClientError::NotConnected));
}

#[tokio::test]
async fn test_buy_rejects_malformed_sponsor() {
    let mut h = Harness::ready(None);
    h.dapp.connect().await.unwrap();
    h.approve_directly(tokens(100));

    h.dapp.set_sponsor_input("0x1234");
    assert_matches!(h.dapp.buy(None).await, Err(ClientError::InvalidSponsor(input)) if input == "0x1234");
    assert!(h.chain.sent().is_empty());
}

#[tokio::test]
async fn test_claim_stake_by_contract_index() {
    let mut h = Harness::ready(None);
    h.chain.update(|s| {
        s.stake_indices.insert(buyer(), vec![3, 7]);
        s.stakes.insert((buyer(), 3), stake(NOW + 86_400));
        s.stakes.insert((buyer(), 7), stake(NOW - 60));
    });
    h.dapp.connect().await.unwrap();

    let stakes = h.presenter.recorded().stakes.unwrap();
    assert_eq!(stakes.count, 2);
    assert_eq!(
        stakes.stakes.iter().map(|s| (s.position, s.index)).collect::<Vec<_>>(),
        vec![(0, 3), (1, 7)]
    );
    assert_eq!(h.presenter.is_enabled(Control::ClaimStake(3)), Some(false));
    assert_eq!(h.presenter.is_enabled(Control::ClaimStake(7)), Some(true));

    let view = h.dapp.claim_stake(7).await.unwrap();
    assert_eq!(view.action, "Claim Stake #7");

    let sent = h.chain.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].function, staking_abi::CLAIM.signature);
    assert_eq!(sent[0].to, h.config.contracts.staking);
    assert_eq!(sent[0].uint_arg(0), BigUint::from(7u64));

    assert_eq!(
        h.presenter.toggles_of(Control::ClaimStake(7)),
        vec![true, false, true, false]
    );
    let messages = h.presenter.messages();
    assert!(messages.contains(&"Claim Stake #7 submitted".to_string()));
    assert!(messages.contains(&"Claim Stake #7 confirmed".to_string()));

    let stakes = h.presenter.recorded().stakes.unwrap();
    let claimed = stakes.stakes.iter().find(|s| s.index == 7).unwrap();
    assert_eq!(claimed.status, Some(StakeStatus::Claimed));
    assert!(!claimed.claim_enabled);
}

#[tokio::test]
async fn test_claim_locked_stake_is_refused() {
    let mut h = Harness::ready(None);
    h.chain.update(|s| {
        s.stake_indices.insert(buyer(), vec![3]);
        s.stakes.insert((buyer(), 3), stake(NOW + 86_400));
    });
    h.dapp.connect().await.unwrap();

    assert_matches!(
        h.dapp.claim_stake(3).await,
        Err(ClientError::StakeNotReady { index: 3, status: StakeStatus::Locked })
    );
    assert!(h.chain.sent().is_empty());

    h.clock.advance(86_400);
    h.dapp.claim_stake(3).await.unwrap();
    assert_eq!(h.chain.sent_count(staking_abi::CLAIM), 1);
}

#[tokio::test]
async fn test_stake_read_failure_shows_placeholder_row() {
    let mut h = Harness::ready(None);
    h.chain.update(|s| {
        s.stake_indices.insert(buyer(), vec![3, 7]);
        s.stakes.insert((buyer(), 3), stake(NOW - 1));
    });
    h.dapp.connect().await.unwrap();

    let stakes = h.presenter.recorded().stakes.unwrap();
    assert_eq!(stakes.stakes.len(), 2);
    let missing = &stakes.stakes[1];
    assert_eq!(missing.index, 7);
    assert_eq!(missing.status, None);
    assert!(!missing.claim_enabled);
    assert_eq!(h.dapp.last_refresh().unwrap().stakes.countdown.len(), 1);
}

#[tokio::test]
async fn test_claim_referral_requires_accrued_amount() {
    let mut h = Harness::ready(None);
    h.dapp.connect().await.unwrap();

    assert_matches!(
        h.dapp.claim_referral().await,
        Err(ClientError::NothingToClaim(_))
    );
    assert_eq!(
        h.presenter.last_notice().unwrap().message,
        "nothing to claim: accrued referral is zero"
    );
    assert!(h.chain.sent().is_empty());
}

#[tokio::test]
async fn test_claim_referral_sends_accrued_amount() {
    let mut h = Harness::ready(None);
    h.chain.update(|s| {
        s.users.insert(
            buyer(),
            UserAccount {
                rank: 1,
                active: true,
                accrued_referral: tokens(5),
                ..UserAccount::default()
            },
        );
        s.pending_polls = 2;
    });
    h.dapp.connect().await.unwrap();
    assert_eq!(h.presenter.is_enabled(Control::ClaimReferral), Some(true));

    h.dapp.claim_referral().await.unwrap();
    let sent = h.chain.sent();
    assert_eq!(sent[0].function, earnings_abi::CLAIM_REFERRAL.signature);
    assert_eq!(sent[0].uint_arg(0), tokens(5));

    let account = h.presenter.recorded().account.unwrap();
    assert_eq!(account.accrued_referral, "0.0");
    assert_eq!(account.claimed_total, "5.0");
}

#[tokio::test]
async fn test_reverted_claim_reenables_control() {
    let mut h = Harness::ready(None);
    h.chain.update(|s| {
        s.users.insert(
            buyer(),
            UserAccount {
                rank: 2,
                active: true,
                accrued_matching: tokens(3),
                ..UserAccount::default()
            },
        );
        s.revert_next_transaction = true;
    });
    h.dapp.connect().await.unwrap();

    assert_matches!(h.dapp.claim_all().await, Err(ClientError::Reverted(_)));
    assert_eq!(h.presenter.toggles_of(Control::ClaimAll).last(), Some(&true));
    assert!(h
        .presenter
        .last_notice()
        .unwrap()
        .message
        .starts_with("Claim All failed: transaction"));
}

#[tokio::test]
async fn test_rejected_claim_is_reported() {
    let mut h = Harness::ready(None);
    h.chain.update(|s| {
        s.users.insert(
            buyer(),
            UserAccount {
                rank: 1,
                active: true,
                accrued_matching: tokens(1),
                ..UserAccount::default()
            },
        );
        s.reject_next_transaction = true;
    });
    h.dapp.connect().await.unwrap();

    assert_matches!(h.dapp.claim_matching().await, Err(ClientError::Rejected(_)));
    assert_eq!(h.presenter.is_enabled(Control::ClaimMatching), Some(true));
    assert!(!h
        .presenter
        .messages()
        .iter()
        .any(|m| m.ends_with("submitted")));
}

#[tokio::test]
async fn test_write_rechecks_network() {
    let mut h = Harness::ready(None);
    h.dapp.connect().await.unwrap();
    h.chain.update(|s| {
        s.chain_id = 1;
        s.switch = SwitchBehavior::Reject;
    });

    assert_matches!(
        h.dapp.approve(None).await,
        Err(ClientError::WrongNetwork { .. })
    );
    assert!(h.chain.sent().is_empty());
}

#[tokio::test]
async fn test_account_switch_rebuilds_session() {
    let mut h = Harness::ready(None);
    h.dapp.connect().await.unwrap();
    let mut watcher = WalletWatcher::new(h.chain.clone(), Duration::from_millis(5))
        .await
        .unwrap();
    assert_eq!(watcher.poll().await.unwrap(), None);

    let other = Address::new([0xcc; 20]);
    h.chain.update(|s| s.accounts = vec![other]);
    let event = watcher.next_event().await;
    assert_eq!(event, WalletEvent::AccountsChanged(vec![other]));

    h.dapp.handle_wallet_event(event).await.unwrap();
    assert_eq!(h.dapp.session().unwrap().account, other);
    assert_eq!(h.presenter.recorded().session.unwrap().account, other.to_string());
}

#[tokio::test]
async fn test_watcher_reports_chain_change_first() {
    let chain = Arc::new(FakeChain::new(56, buyer()));
    let mut watcher = WalletWatcher::new(chain.clone(), Duration::from_millis(5))
        .await
        .unwrap();

    chain.update(|s| {
        s.chain_id = 97;
        s.accounts = vec![upline()];
    });
    assert_eq!(watcher.poll().await.unwrap(), Some(WalletEvent::ChainChanged(97)));
    assert_eq!(
        watcher.poll().await.unwrap(),
        Some(WalletEvent::AccountsChanged(vec![upline()]))
    );
    assert_eq!(watcher.poll().await.unwrap(), None);
}

struct BrokenClipboard;

impl Clipboard for BrokenClipboard {
    fn write_text(&self, _text: &str) -> Result<(), String> {
        Err("no display".to_string())
    }
}

#[derive(Default)]
struct MemoryClipboard(RefCell<String>);

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), String> {
        *self.0.borrow_mut() = text.to_string();
        Ok(())
    }
}

#[tokio::test]
async fn test_copy_referral_link() {
    let mut h = Harness::ready(Some("https://stcex.io/app"));
    h.chain.update(|s| {
        s.users.insert(
            buyer(),
            UserAccount {
                rank: 1,
                active: true,
                ..UserAccount::default()
            },
        );
    });
    h.dapp.connect().await.unwrap();

    let clipboard = MemoryClipboard::default();
    assert_eq!(
        h.dapp.copy_referral_link(Side::Right, &clipboard).unwrap(),
        CopyOutcome::Copied
    );
    assert!(clipboard.0.borrow().ends_with("side=1"));
    assert_eq!(h.presenter.last_notice().unwrap().message, "Copied");

    let outcome = h.dapp.copy_referral_link(Side::Left, &BrokenClipboard).unwrap();
    assert_matches!(outcome, CopyOutcome::Manual(text) if text.ends_with("side=0"));
    assert!(!h.presenter.last_notice().unwrap().ok);
}

#[tokio::test]
async fn test_disconnect_clears_state() {
    let mut h = Harness::ready(None);
    h.dapp.connect().await.unwrap();
    h.dapp.disconnect();

    assert!(h.dapp.session().is_none());
    assert!(h.dapp.dashboard().is_none());
    assert!(!h.dapp.is_counting_down());
    assert_eq!(h.presenter.is_enabled(Control::Connect), Some(true));
    assert_matches!(h.dapp.claim_all().await, Err(ClientError::NotConnected));
}

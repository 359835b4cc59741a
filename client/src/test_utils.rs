//! In-memory doubles for the wallet, the presenter and the clock.

use {
    crate::{
        clock::Clock,
        contracts::{core_abi, earnings_abi, staking_abi, token_abi, Package, StakeRecord, UserAccount},
        presenter::{Control, Notice, Presenter, ReferralFormView},
    },
    async_trait::async_trait,
    num_bigint::BigUint,
    parking_lot::Mutex,
    serde_json::{json, Value},
    stcex_abi::{decode_hex, encode_words, Address, Decoder, Function, Token, SELECTOR_LEN},
    stcex_cli_config::Config,
    stcex_cli_output::{AccountView, PackageList, SessionView, StakeList, TransactionView},
    stcex_rpc_client::{
        error::{UNRECOGNIZED_CHAIN, USER_REJECTED_REQUEST},
        request::{parse_quantity, to_quantity, RpcRequest},
        ProviderError, TxHash, WalletProvider,
    },
    std::{
        collections::{HashMap, HashSet},
        sync::atomic::{AtomicU64, Ordering},
    },
};

const KNOWN_FUNCTIONS: [Function; 16] = [
    token_abi::BALANCE_OF,
    token_abi::ALLOWANCE,
    token_abi::APPROVE,
    core_abi::PACKAGE_COUNT,
    core_abi::PACKAGES,
    core_abi::BUY,
    core_abi::USER_STAKE_COUNT,
    core_abi::USER_STAKE_INDEX_AT,
    core_abi::DEFAULT_SPONSOR,
    earnings_abi::USERS,
    earnings_abi::WITHDRAWABLE,
    earnings_abi::CLAIM_REFERRAL,
    earnings_abi::CLAIM_MATCHING,
    earnings_abi::CLAIM_ALL,
    staking_abi::STAKES,
    staking_abi::CLAIM,
];

/// How the fake wallet answers `wallet_switchEthereumChain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchBehavior {
    #[default]
    Accept,
    /// The user declines the switch.
    Reject,
    /// The chain is unknown until `wallet_addEthereumChain` is called.
    UnknownChain,
    /// The chain is unknown and the user declines adding it.
    UnknownChainRejectAdd,
}

/// A transaction the fake wallet accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentTransaction {
    pub from: Address,
    pub to: Address,
    pub function: &'static str,
    pub args: Vec<u8>,
    pub hash: TxHash,
}

impl SentTransaction {
    fn word(&self, i: usize) -> &[u8] {
        &self.args[i * 32..(i + 1) * 32]
    }

    pub fn uint_arg(&self, i: usize) -> BigUint {
        BigUint::from_bytes_be(self.word(i))
    }

    pub fn address_arg(&self, i: usize) -> Address {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&self.word(i)[12..]);
        Address::new(bytes)
    }
}

#[derive(Debug, Default)]
pub struct ChainState {
    pub chain_id: u64,
    pub accounts: Vec<Address>,
    pub switch: SwitchBehavior,
    pub chain_added: bool,
    pub balances: HashMap<Address, BigUint>,
    pub allowances: HashMap<(Address, Address), BigUint>,
    pub packages: Vec<Package>,
    pub default_sponsor: Address,
    pub users: HashMap<Address, UserAccount>,
    pub withdrawable: HashMap<Address, BigUint>,
    /// Contract-assigned stake indices per user, in list order.
    pub stake_indices: HashMap<Address, Vec<u64>>,
    pub stakes: HashMap<(Address, u64), StakeRecord>,
    /// Signatures whose `eth_call` fails, e.g. `"packages(uint256)"`.
    pub failing_calls: HashSet<&'static str>,
    /// Package ids whose read fails.
    pub failing_packages: HashSet<u64>,
    pub reject_next_transaction: bool,
    pub revert_next_transaction: bool,
    /// Receipt polls answered with `null` before each receipt appears.
    pub pending_polls: u64,
    pub sent: Vec<SentTransaction>,
    pub requests: Vec<RpcRequest>,
    receipts: HashMap<TxHash, (u64, bool)>,
    polls_left: HashMap<TxHash, u64>,
}

/// A scripted wallet plus the four contracts behind it.
#[derive(Debug, Default)]
pub struct FakeChain {
    state: Mutex<ChainState>,
}

impl FakeChain {
    pub fn new(chain_id: u64, account: Address) -> Self {
        Self {
            state: Mutex::new(ChainState {
                chain_id,
                accounts: vec![account],
                ..ChainState::default()
            }),
        }
    }

    pub fn update(&self, f: impl FnOnce(&mut ChainState)) {
        f(&mut self.state.lock());
    }

    pub fn read<T>(&self, f: impl FnOnce(&ChainState) -> T) -> T {
        f(&self.state.lock())
    }

    pub fn sent(&self) -> Vec<SentTransaction> {
        self.state.lock().sent.clone()
    }

    pub fn sent_count(&self, function: Function) -> usize {
        self.state
            .lock()
            .sent
            .iter()
            .filter(|tx| tx.function == function.signature)
            .count()
    }

    pub fn requested(&self, method: RpcRequest) -> bool {
        self.state.lock().requests.contains(&method)
    }
}

fn reverted() -> ProviderError {
    ProviderError::Rpc {
        code: -32000,
        message: "execution reverted".to_string(),
    }
}

fn field<'a>(params: &'a Value, key: &str) -> Result<&'a str, ProviderError> {
    params[0][key]
        .as_str()
        .ok_or_else(|| ProviderError::InvalidResponse(format!("missing {key}")))
}

fn split_call(data: &[u8]) -> Result<(Function, &[u8]), ProviderError> {
    if data.len() < SELECTOR_LEN {
        return Err(reverted());
    }
    let (selector, args) = data.split_at(SELECTOR_LEN);
    let function = KNOWN_FUNCTIONS
        .into_iter()
        .find(|f| f.selector().as_slice() == selector)
        .ok_or_else(reverted)?;
    Ok((function, args))
}

fn words(tokens: &[Token]) -> Result<Value, ProviderError> {
    Ok(json!(stcex_abi::encode_hex(&encode_words(tokens)?)))
}

impl ChainState {
    fn call(&self, data: &[u8]) -> Result<Value, ProviderError> {
        let (function, args) = split_call(data)?;
        if self.failing_calls.contains(function.signature) {
            return Err(reverted());
        }
        let sig = function.signature;
        if sig == token_abi::BALANCE_OF.signature {
            let owner = Decoder::exact(args, 1)?.address()?;
            words(&[self.balances.get(&owner).cloned().unwrap_or_default().into()])
        } else if sig == token_abi::ALLOWANCE.signature {
            let mut d = Decoder::exact(args, 2)?;
            let key = (d.address()?, d.address()?);
            words(&[self.allowances.get(&key).cloned().unwrap_or_default().into()])
        } else if sig == core_abi::PACKAGE_COUNT.signature {
            words(&[(self.packages.len() as u64).into()])
        } else if sig == core_abi::PACKAGES.signature {
            let id = Decoder::exact(args, 1)?.u64()?;
            if self.failing_packages.contains(&id) {
                return Err(reverted());
            }
            let p = self
                .packages
                .iter()
                .find(|p| p.id == id)
                .ok_or_else(reverted)?;
            words(&[
                p.active.into(),
                p.price.clone().into(),
                p.token_amount.clone().into(),
                p.daily_bp.into(),
                p.lock_seconds.into(),
                p.rank.into(),
            ])
        } else if sig == core_abi::USER_STAKE_COUNT.signature {
            let user = Decoder::exact(args, 1)?.address()?;
            let count = self.stake_indices.get(&user).map_or(0, Vec::len);
            words(&[(count as u64).into()])
        } else if sig == core_abi::USER_STAKE_INDEX_AT.signature {
            let mut d = Decoder::exact(args, 2)?;
            let user = d.address()?;
            let position = d.u64()?;
            let index = self
                .stake_indices
                .get(&user)
                .and_then(|indices| indices.get(position as usize))
                .ok_or_else(reverted)?;
            words(&[(*index).into()])
        } else if sig == core_abi::DEFAULT_SPONSOR.signature {
            words(&[self.default_sponsor.into()])
        } else if sig == earnings_abi::USERS.signature {
            let user = Decoder::exact(args, 1)?.address()?;
            let u = self.users.get(&user).cloned().unwrap_or_default();
            words(&[
                u.rank.into(),
                u.active.into(),
                u.paid_total.into(),
                u.accrued_referral.into(),
                u.accrued_matching.into(),
                u.claimed_total.into(),
            ])
        } else if sig == earnings_abi::WITHDRAWABLE.signature {
            let user = Decoder::exact(args, 1)?.address()?;
            words(&[self.withdrawable.get(&user).cloned().unwrap_or_default().into()])
        } else if sig == staking_abi::STAKES.signature {
            let mut d = Decoder::exact(args, 2)?;
            let key = (d.address()?, d.u64()?);
            let s = self.stakes.get(&key).ok_or_else(reverted)?;
            words(&[
                s.principal.clone().into(),
                s.daily_bp.into(),
                s.start_ts.into(),
                s.end_ts.into(),
                s.total_reward.clone().into(),
                s.claimed.into(),
            ])
        } else {
            Err(reverted())
        }
    }

    fn apply(
        &mut self,
        from: Address,
        to: Address,
        function: Function,
        args: &[u8],
    ) -> Result<(), ProviderError> {
        let sig = function.signature;
        if sig == token_abi::APPROVE.signature {
            let mut d = Decoder::exact(args, 2)?;
            let spender = d.address()?;
            self.allowances.insert((from, spender), d.uint()?);
        } else if sig == earnings_abi::CLAIM_REFERRAL.signature {
            let user = self.users.entry(from).or_default();
            user.claimed_total += std::mem::take(&mut user.accrued_referral);
        } else if sig == earnings_abi::CLAIM_MATCHING.signature {
            let user = self.users.entry(from).or_default();
            user.claimed_total += std::mem::take(&mut user.accrued_matching);
        } else if sig == earnings_abi::CLAIM_ALL.signature {
            let user = self.users.entry(from).or_default();
            user.claimed_total += std::mem::take(&mut user.accrued_referral);
            user.claimed_total += std::mem::take(&mut user.accrued_matching);
        } else if sig == staking_abi::CLAIM.signature {
            let index = Decoder::exact(args, 1)?.u64()?;
            let stake = self.stakes.get_mut(&(from, index)).ok_or_else(reverted)?;
            if stake.claimed {
                return Err(reverted());
            }
            stake.claimed = true;
        } else if sig == core_abi::BUY.signature {
            let id = Decoder::exact(args, 3)?.u64()?;
            let package = self
                .packages
                .iter()
                .find(|p| p.id == id && p.active)
                .cloned()
                .ok_or_else(reverted)?;
            let allowance = self.allowances.entry((from, to)).or_default();
            if *allowance < package.price {
                return Err(reverted());
            }
            *allowance -= &package.price;
            let user = self.users.entry(from).or_default();
            user.active = true;
            user.rank = user.rank.max(package.rank);
            user.paid_total += package.price;
        }
        Ok(())
    }

    fn send(&mut self, params: &Value) -> Result<Value, ProviderError> {
        if std::mem::take(&mut self.reject_next_transaction) {
            return Err(ProviderError::Rpc {
                code: USER_REJECTED_REQUEST,
                message: "User denied transaction signature".to_string(),
            });
        }
        let from: Address = field(params, "from")?.parse()?;
        let to: Address = field(params, "to")?.parse()?;
        let data = decode_hex(field(params, "data")?)?;
        let (function, args) = split_call(&data)?;

        let nonce = self.sent.len() as u64 + 1;
        let mut hash = [0u8; 32];
        hash[24..].copy_from_slice(&nonce.to_be_bytes());
        let hash = TxHash(hash);

        let success = !std::mem::take(&mut self.revert_next_transaction)
            && self.apply(from, to, function, args).is_ok();
        self.receipts.insert(hash, (100 + nonce, success));
        self.polls_left.insert(hash, self.pending_polls);
        self.sent.push(SentTransaction {
            from,
            to,
            function: function.signature,
            args: args.to_vec(),
            hash,
        });
        Ok(json!(hash.to_string()))
    }

    fn receipt(&mut self, params: &Value) -> Result<Value, ProviderError> {
        let hash: TxHash = params[0]
            .as_str()
            .ok_or_else(|| ProviderError::InvalidResponse("missing hash".to_string()))?
            .parse()?;
        if let Some(left) = self.polls_left.get_mut(&hash) {
            if *left > 0 {
                *left -= 1;
                return Ok(Value::Null);
            }
        }
        let Some((block, success)) = self.receipts.get(&hash) else {
            return Ok(Value::Null);
        };
        Ok(json!({
            "transactionHash": hash.to_string(),
            "blockNumber": to_quantity(*block),
            "status": if *success { "0x1" } else { "0x0" },
            "gasUsed": "0x5208",
        }))
    }

    fn switch(&mut self, params: &Value) -> Result<Value, ProviderError> {
        let chain_id = parse_quantity(field(params, "chainId")?)?;
        match self.switch {
            SwitchBehavior::Reject => Err(ProviderError::Rpc {
                code: USER_REJECTED_REQUEST,
                message: "User rejected the request".to_string(),
            }),
            SwitchBehavior::UnknownChain | SwitchBehavior::UnknownChainRejectAdd
                if !self.chain_added =>
            {
                Err(ProviderError::Rpc {
                    code: UNRECOGNIZED_CHAIN,
                    message: format!("Unrecognized chain ID {}", to_quantity(chain_id)),
                })
            }
            _ => {
                self.chain_id = chain_id;
                Ok(Value::Null)
            }
        }
    }
}

#[async_trait]
impl WalletProvider for FakeChain {
    async fn request(&self, method: RpcRequest, params: Value) -> Result<Value, ProviderError> {
        let mut state = self.state.lock();
        state.requests.push(method);
        match method {
            RpcRequest::ChainId => Ok(json!(to_quantity(state.chain_id))),
            RpcRequest::Accounts | RpcRequest::RequestAccounts => Ok(json!(state
                .accounts
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>())),
            RpcRequest::Call => {
                let data = decode_hex(field(&params, "data")?)?;
                state.call(&data)
            }
            RpcRequest::SendTransaction => state.send(&params),
            RpcRequest::GetTransactionReceipt => state.receipt(&params),
            RpcRequest::SwitchEthereumChain => state.switch(&params),
            RpcRequest::AddEthereumChain => {
                if state.switch == SwitchBehavior::UnknownChainRejectAdd {
                    return Err(ProviderError::Rpc {
                        code: USER_REJECTED_REQUEST,
                        message: "User rejected the request".to_string(),
                    });
                }
                state.chain_added = true;
                Ok(Value::Null)
            }
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Recorded {
    pub notices: Vec<Notice>,
    pub toggles: Vec<(Control, bool)>,
    pub session: Option<SessionView>,
    pub form: Option<ReferralFormView>,
    pub packages: Option<PackageList>,
    pub account: Option<AccountView>,
    pub stakes: Option<StakeList>,
    pub countdown: HashMap<u64, String>,
    pub countdown_updates: usize,
    pub transactions: Vec<TransactionView>,
}

/// Keeps everything it is shown.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    recorded: Mutex<Recorded>,
}

impl RecordingPresenter {
    pub fn recorded(&self) -> Recorded {
        self.recorded.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.recorded
            .lock()
            .notices
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }

    pub fn last_notice(&self) -> Option<Notice> {
        self.recorded.lock().notices.last().cloned()
    }

    /// Latest enablement of `control`, if it was ever set.
    pub fn is_enabled(&self, control: Control) -> Option<bool> {
        self.recorded
            .lock()
            .toggles
            .iter()
            .rev()
            .find(|(c, _)| *c == control)
            .map(|(_, enabled)| *enabled)
    }

    pub fn toggles_of(&self, control: Control) -> Vec<bool> {
        self.recorded
            .lock()
            .toggles
            .iter()
            .filter(|(c, _)| *c == control)
            .map(|(_, enabled)| *enabled)
            .collect()
    }

    pub fn countdown(&self, index: u64) -> Option<String> {
        self.recorded.lock().countdown.get(&index).cloned()
    }

    pub fn countdown_updates(&self) -> usize {
        self.recorded.lock().countdown_updates
    }
}

impl Presenter for RecordingPresenter {
    fn notify(&self, notice: Notice) {
        self.recorded.lock().notices.push(notice);
    }

    fn set_enabled(&self, control: Control, enabled: bool) {
        self.recorded.lock().toggles.push((control, enabled));
    }

    fn show_session(&self, session: &SessionView) {
        self.recorded.lock().session = Some(session.clone());
    }

    fn show_referral_form(&self, form: &ReferralFormView) {
        self.recorded.lock().form = Some(form.clone());
    }

    fn show_packages(&self, packages: &PackageList) {
        self.recorded.lock().packages = Some(packages.clone());
    }

    fn show_account(&self, account: &AccountView) {
        self.recorded.lock().account = Some(account.clone());
    }

    fn show_stakes(&self, stakes: &StakeList) {
        self.recorded.lock().stakes = Some(stakes.clone());
    }

    fn show_countdown(&self, index: u64, text: &str) {
        let mut recorded = self.recorded.lock();
        recorded.countdown.insert(index, text.to_string());
        recorded.countdown_updates += 1;
    }

    fn show_transaction(&self, transaction: &TransactionView) {
        self.recorded.lock().transactions.push(transaction.clone());
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicU64);

impl ManualClock {
    pub fn new(now: u64) -> Self {
        Self(AtomicU64::new(now))
    }

    pub fn set(&self, now: u64) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: u64) {
        self.0.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// A deployment-shaped configuration whose polling intervals suit tests.
pub fn test_config() -> Config {
    Config {
        dapp_url: "https://stcex.io/app".to_string(),
        confirm_poll_interval_ms: 10,
        countdown_interval_ms: 1_000,
        ..Config::default()
    }
}

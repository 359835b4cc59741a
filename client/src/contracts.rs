//! Typed handles to the four contracts.
//!
//! Every read has exactly one decoding function that asserts the number of
//! returned words, so a changed ABI fails loudly at the read boundary instead
//! of surfacing as a misplaced field.

use {
    crate::{error::ClientError, referral::Side},
    num_bigint::BigUint,
    stcex_abi::{AbiError, Address, Decoder, Function, Token},
    stcex_rpc_client::{TransactionRequest, TxHash, WalletProvider},
    std::{fmt, sync::Arc},
};

pub mod token_abi {
    use super::Function;
    pub const BALANCE_OF: Function = Function::new("balanceOf(address)");
    pub const ALLOWANCE: Function = Function::new("allowance(address,address)");
    pub const APPROVE: Function = Function::new("approve(address,uint256)");
}

pub mod core_abi {
    use super::Function;
    pub const PACKAGE_COUNT: Function = Function::new("packageCount()");
    pub const PACKAGES: Function = Function::new("packages(uint256)");
    pub const BUY: Function = Function::new("buy(uint256,address,uint8)");
    pub const USER_STAKE_COUNT: Function = Function::new("userStakeCount(address)");
    pub const USER_STAKE_INDEX_AT: Function = Function::new("userStakeIndexAt(address,uint256)");
    pub const DEFAULT_SPONSOR: Function = Function::new("defaultSponsor()");
}

pub mod earnings_abi {
    use super::Function;
    pub const USERS: Function = Function::new("users(address)");
    pub const WITHDRAWABLE: Function = Function::new("withdrawable(address)");
    pub const CLAIM_REFERRAL: Function = Function::new("claimReferral(uint256)");
    pub const CLAIM_MATCHING: Function = Function::new("claimMatching(uint256)");
    pub const CLAIM_ALL: Function = Function::new("claimAll()");
}

pub mod staking_abi {
    use super::Function;
    pub const STAKES: Function = Function::new("stakes(address,uint256)");
    pub const CLAIM: Function = Function::new("claim(uint256)");
}

/// `packages(uint256)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Slot index in the core contract.
    pub id: u64,
    pub active: bool,
    pub price: BigUint,
    pub token_amount: BigUint,
    pub daily_bp: u64,
    pub lock_seconds: u64,
    pub rank: u8,
}

impl Package {
    pub const WORDS: usize = 6;

    pub fn decode(id: u64, data: &[u8]) -> Result<Self, AbiError> {
        let mut d = Decoder::exact(data, Self::WORDS)?;
        Ok(Self {
            id,
            active: d.bool()?,
            price: d.uint()?,
            token_amount: d.uint()?,
            daily_bp: d.u64()?,
            lock_seconds: d.u64()?,
            rank: d.u8()?,
        })
    }
}

/// `users(address)` on the earnings contract.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserAccount {
    pub rank: u8,
    pub active: bool,
    pub paid_total: BigUint,
    pub accrued_referral: BigUint,
    pub accrued_matching: BigUint,
    pub claimed_total: BigUint,
}

impl UserAccount {
    pub const WORDS: usize = 6;

    pub fn decode(data: &[u8]) -> Result<Self, AbiError> {
        let mut d = Decoder::exact(data, Self::WORDS)?;
        Ok(Self {
            rank: d.u8()?,
            active: d.bool()?,
            paid_total: d.uint()?,
            accrued_referral: d.uint()?,
            accrued_matching: d.uint()?,
            claimed_total: d.uint()?,
        })
    }

    /// Referral links may be shared only by a ranked, active account.
    pub fn can_share_referral(&self) -> bool {
        self.rank > 0 && self.active
    }
}

/// `stakes(address,uint256)` on the staking contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeRecord {
    pub principal: BigUint,
    pub daily_bp: u64,
    pub start_ts: u64,
    pub end_ts: u64,
    pub total_reward: BigUint,
    pub claimed: bool,
}

impl StakeRecord {
    pub const WORDS: usize = 6;

    pub fn decode(data: &[u8]) -> Result<Self, AbiError> {
        let mut d = Decoder::exact(data, Self::WORDS)?;
        Ok(Self {
            principal: d.uint()?,
            daily_bp: d.u64()?,
            start_ts: d.u64()?,
            end_ts: d.u64()?,
            total_reward: d.uint()?,
            claimed: d.bool()?,
        })
    }
}

fn decode_uint(data: &[u8]) -> Result<BigUint, AbiError> {
    Decoder::exact(data, 1)?.uint()
}

fn decode_u64(data: &[u8]) -> Result<u64, AbiError> {
    Decoder::exact(data, 1)?.u64()
}

fn decode_address(data: &[u8]) -> Result<Address, AbiError> {
    Decoder::exact(data, 1)?.address()
}

/// A contract address bound to the provider and to the account that signs
/// its writes.
#[derive(Clone)]
pub struct ContractHandle {
    address: Address,
    signer: Address,
    provider: Arc<dyn WalletProvider>,
}

impl fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractHandle")
            .field("address", &self.address)
            .field("signer", &self.signer)
            .finish_non_exhaustive()
    }
}

impl ContractHandle {
    pub fn new(address: Address, signer: Address, provider: Arc<dyn WalletProvider>) -> Self {
        Self {
            address,
            signer,
            provider,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn signer(&self) -> Address {
        self.signer
    }

    async fn read(&self, function: Function, args: &[Token]) -> Result<Vec<u8>, ClientError> {
        let data = function.encode(args)?;
        Ok(self.provider.call(self.address, &data).await?)
    }

    async fn write(&self, function: Function, args: &[Token]) -> Result<TxHash, ClientError> {
        let tx = TransactionRequest {
            from: self.signer,
            to: self.address,
            data: function.encode(args)?,
        };
        self.provider
            .send_transaction(&tx)
            .await
            .map_err(ClientError::from_submission)
    }
}

/// The 18-decimal payment token.
#[derive(Debug, Clone)]
pub struct TokenContract(pub ContractHandle);

impl TokenContract {
    pub async fn balance_of(&self, owner: Address) -> Result<BigUint, ClientError> {
        let data = self.0.read(token_abi::BALANCE_OF, &[owner.into()]).await?;
        Ok(decode_uint(&data)?)
    }

    pub async fn allowance(&self, owner: Address, spender: Address) -> Result<BigUint, ClientError> {
        let data = self
            .0
            .read(token_abi::ALLOWANCE, &[owner.into(), spender.into()])
            .await?;
        Ok(decode_uint(&data)?)
    }

    pub async fn approve(&self, spender: Address, amount: BigUint) -> Result<TxHash, ClientError> {
        self.0
            .write(token_abi::APPROVE, &[spender.into(), amount.into()])
            .await
    }
}

/// Packages, purchases and the per-user stake index.
#[derive(Debug, Clone)]
pub struct CoreContract(pub ContractHandle);

impl CoreContract {
    pub fn address(&self) -> Address {
        self.0.address()
    }

    pub async fn package_count(&self) -> Result<u64, ClientError> {
        let data = self.0.read(core_abi::PACKAGE_COUNT, &[]).await?;
        Ok(decode_u64(&data)?)
    }

    pub async fn package(&self, id: u64) -> Result<Package, ClientError> {
        let data = self.0.read(core_abi::PACKAGES, &[id.into()]).await?;
        Ok(Package::decode(id, &data)?)
    }

    pub async fn buy(
        &self,
        package_id: u64,
        sponsor: Address,
        side: Side,
    ) -> Result<TxHash, ClientError> {
        self.0
            .write(
                core_abi::BUY,
                &[package_id.into(), sponsor.into(), side.as_u8().into()],
            )
            .await
    }

    pub async fn user_stake_count(&self, user: Address) -> Result<u64, ClientError> {
        let data = self.0.read(core_abi::USER_STAKE_COUNT, &[user.into()]).await?;
        Ok(decode_u64(&data)?)
    }

    /// Contract-assigned stake index of the stake at `position` in the
    /// user's list.
    pub async fn user_stake_index_at(&self, user: Address, position: u64) -> Result<u64, ClientError> {
        let data = self
            .0
            .read(core_abi::USER_STAKE_INDEX_AT, &[user.into(), position.into()])
            .await?;
        Ok(decode_u64(&data)?)
    }

    pub async fn default_sponsor(&self) -> Result<Address, ClientError> {
        let data = self.0.read(core_abi::DEFAULT_SPONSOR, &[]).await?;
        Ok(decode_address(&data)?)
    }
}

/// Rank, referral and matching earnings.
#[derive(Debug, Clone)]
pub struct EarningsContract(pub ContractHandle);

impl EarningsContract {
    pub async fn user(&self, user: Address) -> Result<UserAccount, ClientError> {
        let data = self.0.read(earnings_abi::USERS, &[user.into()]).await?;
        Ok(UserAccount::decode(&data)?)
    }

    pub async fn withdrawable(&self, user: Address) -> Result<BigUint, ClientError> {
        let data = self.0.read(earnings_abi::WITHDRAWABLE, &[user.into()]).await?;
        Ok(decode_uint(&data)?)
    }

    pub async fn claim_referral(&self, amount: BigUint) -> Result<TxHash, ClientError> {
        self.0.write(earnings_abi::CLAIM_REFERRAL, &[amount.into()]).await
    }

    pub async fn claim_matching(&self, amount: BigUint) -> Result<TxHash, ClientError> {
        self.0.write(earnings_abi::CLAIM_MATCHING, &[amount.into()]).await
    }

    pub async fn claim_all(&self) -> Result<TxHash, ClientError> {
        self.0.write(earnings_abi::CLAIM_ALL, &[]).await
    }
}

/// Stake records and stake claims, both keyed by the authoritative index.
#[derive(Debug, Clone)]
pub struct StakingContract(pub ContractHandle);

impl StakingContract {
    pub async fn stake(&self, user: Address, index: u64) -> Result<StakeRecord, ClientError> {
        let data = self
            .0
            .read(staking_abi::STAKES, &[user.into(), index.into()])
            .await?;
        Ok(StakeRecord::decode(&data)?)
    }

    pub async fn claim(&self, index: u64) -> Result<TxHash, ClientError> {
        self.0.write(staking_abi::CLAIM, &[index.into()]).await
    }
}

#[cfg(test)]
mod tests {
    use {super::*, assert_matches::assert_matches, stcex_abi::encode_words};

    #[test]
    fn test_package_decode() {
        let data = encode_words(&[
            true.into(),
            BigUint::from(100u64).into(),
            BigUint::from(5u64).into(),
            50u64.into(),
            86_400u64.into(),
            2u8.into(),
        ])
        .unwrap();
        let package = Package::decode(3, &data).unwrap();
        assert_eq!(package.id, 3);
        assert!(package.active);
        assert_eq!(package.daily_bp, 50);
        assert_eq!(package.lock_seconds, 86_400);
        assert_eq!(package.rank, 2);
    }

    #[test]
    fn test_decode_asserts_field_count() {
        // A five-word users() record, as returned by the currently deployed
        // earnings contract, is rejected rather than guessed at.
        let data = encode_words(&[1u8.into(), 0u64.into(), 0u64.into(), 0u64.into(), 0u64.into()])
            .unwrap();
        assert_matches!(
            UserAccount::decode(&data),
            Err(AbiError::LengthMismatch {
                expected: 192,
                actual: 160
            })
        );
    }

    #[test]
    fn test_can_share_referral() {
        let mut user = UserAccount {
            rank: 1,
            active: true,
            ..UserAccount::default()
        };
        assert!(user.can_share_referral());
        user.active = false;
        assert!(!user.can_share_referral());
        user.active = true;
        user.rank = 0;
        assert!(!user.can_share_referral());
    }

    #[test]
    fn test_stake_decode() {
        let data = encode_words(&[
            BigUint::from(10u64).into(),
            50u64.into(),
            1_000u64.into(),
            2_000u64.into(),
            BigUint::from(3u64).into(),
            false.into(),
        ])
        .unwrap();
        let stake = StakeRecord::decode(&data).unwrap();
        assert_eq!(stake.start_ts, 1_000);
        assert_eq!(stake.end_ts, 2_000);
        assert!(!stake.claimed);
    }
}

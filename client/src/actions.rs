//! Approve, buy and claim handlers.
//!
//! Each handler re-reads the values it acts on, checks its preconditions
//! client-side, then hands the submission to [`Transactor::submit`], which
//! disables the control, waits for the receipt without a deadline and
//! re-enables the control on every path. Failures are returned to the
//! caller, which reports them.

use {
    crate::{
        clock::Clock,
        error::ClientError,
        presenter::{Control, Notice, Presenter},
        referral::{resolve_sponsor, ReferralForm, SponsorDecision},
        session::Session,
        stakes::stake_status,
    },
    log::{info, warn},
    num_bigint::BigUint,
    stcex_cli_config::Config,
    stcex_cli_output::{display::format_amount, StakeStatus, TransactionView},
    stcex_rpc_client::{confirm::wait_for_receipt, TxHash, WalletProvider},
    std::future::Future,
};

/// Submits a transaction and follows it to its receipt.
pub struct Transactor<'a> {
    pub provider: &'a dyn WalletProvider,
    pub config: &'a Config,
    pub presenter: &'a dyn Presenter,
}

impl Transactor<'_> {
    pub async fn submit<F>(
        &self,
        control: Control,
        action: &str,
        send: F,
    ) -> Result<TransactionView, ClientError>
    where
        F: Future<Output = Result<TxHash, ClientError>>,
    {
        self.presenter.set_enabled(control, false);
        let result = self.send_and_confirm(action, send).await;
        self.presenter.set_enabled(control, true);

        match &result {
            Ok(view) => {
                info!("{action} confirmed: {}", view.explorer_url);
                self.presenter
                    .notify(Notice::info(format!("{action} confirmed")));
                self.presenter.show_transaction(view);
            }
            Err(err) => warn!("{action} failed: {err}"),
        }
        result
    }

    async fn send_and_confirm<F>(&self, action: &str, send: F) -> Result<TransactionView, ClientError>
    where
        F: Future<Output = Result<TxHash, ClientError>>,
    {
        let hash = send.await?;
        info!("{action} submitted: {hash}");
        self.presenter
            .notify(Notice::info(format!("{action} submitted")));

        let receipt =
            wait_for_receipt(self.provider, &hash, self.config.confirm_poll_interval()).await?;
        if !receipt.success {
            return Err(ClientError::Reverted(hash));
        }
        Ok(TransactionView {
            action: action.to_string(),
            hash: hash.to_string(),
            block_number: receipt.block_number,
            explorer_url: self.config.explorer_tx_url(hash),
        })
    }
}

/// Approves the core contract for exactly the current price of `package_id`.
pub async fn approve(
    session: &Session,
    tx: &Transactor<'_>,
    package_id: u64,
) -> Result<TransactionView, ClientError> {
    let package = session.core.package(package_id).await?;
    if !package.active {
        return Err(ClientError::PackageInactive(package_id));
    }
    let spender = session.core.address();
    tx.submit(
        Control::Approve,
        "Approve",
        session.token.approve(spender, package.price),
    )
    .await
}

/// Buys `package_id`, crediting the resolved sponsor on the form's side.
///
/// Nothing is submitted when the current allowance is below the current
/// price.
pub async fn buy(
    session: &Session,
    tx: &Transactor<'_>,
    form: &ReferralForm,
    package_id: u64,
) -> Result<(TransactionView, SponsorDecision), ClientError> {
    let decision = resolve_sponsor(form, &session.core, tx.config, session.account).await?;

    let package = session.core.package(package_id).await?;
    if !package.active {
        return Err(ClientError::PackageInactive(package_id));
    }
    let allowance = session
        .token
        .allowance(session.account, session.core.address())
        .await?;
    if allowance < package.price {
        return Err(ClientError::InsufficientAllowance {
            allowance: format_amount(&allowance, 4),
            price: format_amount(&package.price, 4),
        });
    }

    let view = tx
        .submit(
            Control::Buy,
            "Buy",
            session.core.buy(package_id, decision.sponsor, form.side()),
        )
        .await?;
    Ok((view, decision))
}

fn nonzero(amount: BigUint, what: &'static str) -> Result<BigUint, ClientError> {
    if amount == BigUint::default() {
        return Err(ClientError::NothingToClaim(what));
    }
    Ok(amount)
}

/// Claims the whole accrued referral reward, as read just now.
pub async fn claim_referral(
    session: &Session,
    tx: &Transactor<'_>,
) -> Result<TransactionView, ClientError> {
    let user = session.earnings.user(session.account).await?;
    let amount = nonzero(user.accrued_referral, "accrued referral")?;
    tx.submit(
        Control::ClaimReferral,
        "Claim Referral",
        session.earnings.claim_referral(amount),
    )
    .await
}

/// Claims the whole accrued matching reward, as read just now.
pub async fn claim_matching(
    session: &Session,
    tx: &Transactor<'_>,
) -> Result<TransactionView, ClientError> {
    let user = session.earnings.user(session.account).await?;
    let amount = nonzero(user.accrued_matching, "accrued matching")?;
    tx.submit(
        Control::ClaimMatching,
        "Claim Matching",
        session.earnings.claim_matching(amount),
    )
    .await
}

pub async fn claim_all(
    session: &Session,
    tx: &Transactor<'_>,
) -> Result<TransactionView, ClientError> {
    let user = session.earnings.user(session.account).await?;
    nonzero(
        user.accrued_referral + user.accrued_matching,
        "accrued referral and matching",
    )?;
    tx.submit(
        Control::ClaimAll,
        "Claim All",
        session.earnings.claim_all(),
    )
    .await
}

/// Claims the stake with contract-assigned index `index`. The record is
/// re-read first and must be READY.
pub async fn claim_stake(
    session: &Session,
    tx: &Transactor<'_>,
    clock: &dyn Clock,
    index: u64,
) -> Result<TransactionView, ClientError> {
    let stake = session.staking.stake(session.account, index).await?;
    let status = stake_status(&stake, clock.now());
    if status != StakeStatus::Ready {
        return Err(ClientError::StakeNotReady { index, status });
    }
    tx.submit(
        Control::ClaimStake(index),
        &format!("Claim Stake #{index}"),
        session.staking.claim(index),
    )
    .await
}

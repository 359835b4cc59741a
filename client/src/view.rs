//! The refresh engine: a full re-derivation of the account view from chain
//! state.

use {
    crate::{
        clock::Clock,
        contracts::UserAccount,
        referral::ReferralLinks,
        session::Session,
        stakes::{load_stakes, LoadedStakes},
    },
    log::warn,
    num_bigint::BigUint,
    stcex_cli_output::{
        display::{format_amount, rank_name, PLACEHOLDER},
        AccountView,
    },
    url::Url,
};

/// Decimal places shown for balances and earnings.
pub const AMOUNT_DP: usize = 4;

pub const NEED_PACKAGE_NOTICE: &str =
    "A package must be bought before referral links can be shared.";

/// Everything one refresh produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refresh {
    pub account: AccountView,
    /// `None` when the earnings read failed.
    pub user: Option<UserAccount>,
    pub stakes: LoadedStakes,
}

impl Refresh {
    pub fn can_share_referral(&self) -> bool {
        self.account.can_share_referral
    }
}

fn amount_or_placeholder(field: &str, value: Result<BigUint, impl std::fmt::Display>) -> String {
    match value {
        Ok(amount) => format_amount(&amount, AMOUNT_DP),
        Err(err) => {
            warn!("{field} read failed: {err}");
            PLACEHOLDER.to_string()
        }
    }
}

/// Reads balance, allowance, earnings and withdrawable amount one after the
/// other, then the stake list. A failed read shows the placeholder in its
/// own field and does not stop the others.
pub async fn refresh_all(
    session: &Session,
    clock: &dyn Clock,
    page: Option<&Url>,
    links: &ReferralLinks,
) -> Refresh {
    let account = session.account;
    let core = session.core.address();

    let token_balance =
        amount_or_placeholder("balanceOf", session.token.balance_of(account).await);
    let allowance =
        amount_or_placeholder("allowance", session.token.allowance(account, core).await);

    let user = match session.earnings.user(account).await {
        Ok(user) => Some(user),
        Err(err) => {
            warn!("users() read failed: {err}");
            None
        }
    };
    let withdrawable =
        amount_or_placeholder("withdrawable", session.earnings.withdrawable(account).await);

    let can_share_referral = user.as_ref().is_some_and(UserAccount::can_share_referral);
    let referral_links = match page {
        Some(page) if can_share_referral => {
            let (left, right) = links.build_pair(page, account);
            Some(stcex_cli_output::ReferralLinks {
                left: left.to_string(),
                right: right.to_string(),
            })
        }
        _ => None,
    };

    let field = |f: fn(&UserAccount) -> String| {
        user.as_ref().map_or_else(|| PLACEHOLDER.to_string(), f)
    };
    let view = AccountView {
        token_balance,
        allowance,
        rank: field(|u| rank_name(u.rank).to_string()),
        status: if can_share_referral { "ACTIVE" } else { "NEED_BUY" }.to_string(),
        paid_total: field(|u| format_amount(&u.paid_total, AMOUNT_DP)),
        accrued_referral: field(|u| format_amount(&u.accrued_referral, AMOUNT_DP)),
        accrued_matching: field(|u| format_amount(&u.accrued_matching, AMOUNT_DP)),
        claimed_total: field(|u| format_amount(&u.claimed_total, AMOUNT_DP)),
        withdrawable,
        can_share_referral,
        referral_links,
        notice: (!can_share_referral).then(|| NEED_PACKAGE_NOTICE.to_string()),
    };

    let stakes = load_stakes(session, clock).await;
    Refresh {
        account: view,
        user,
        stakes,
    }
}

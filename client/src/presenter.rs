use stcex_cli_output::{
    AccountView, PackageList, SessionView, StakeList, TransactionView,
};

/// User-triggerable controls whose enablement the client drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Connect,
    Approve,
    Buy,
    ClaimReferral,
    ClaimMatching,
    ClaimAll,
    /// The claim button of the stake with this authoritative index.
    ClaimStake(u64),
    SponsorField,
    SideField,
}

/// A transient, non-blocking message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub ok: bool,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Sponsor and side inputs of the buy form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralFormView {
    pub sponsor: String,
    pub sponsor_locked: bool,
    pub side: String,
    pub side_locked: bool,
}

/// Receives display state from the client. Binding it to a concrete UI is
/// up to the implementor.
pub trait Presenter: Send + Sync {
    fn notify(&self, notice: Notice);

    fn set_enabled(&self, control: Control, enabled: bool);

    fn show_session(&self, _session: &SessionView) {}

    fn show_referral_form(&self, _form: &ReferralFormView) {}

    fn show_packages(&self, _packages: &PackageList) {}

    fn show_account(&self, _account: &AccountView) {}

    /// Called with the whole list on every reload; rows are never patched.
    fn show_stakes(&self, _stakes: &StakeList) {}

    /// Countdown text of the stake with authoritative index `index`.
    fn show_countdown(&self, _index: u64, _text: &str) {}

    fn show_transaction(&self, _transaction: &TransactionView) {}
}

//! Connection, view model and transaction handlers for the STCEx contracts.
//!
//! The client is driven by a [`Dapp`] controller that owns the wallet
//! [`Session`] and pushes everything it derives to a [`Presenter`].
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`session`]      | Network check, account access, contract binding |
//! | [`contracts`]    | Typed handles and decoded records for the four contracts |
//! | [`packages`]     | Package list and price preview |
//! | [`referral`]     | Referral links, the buy form and sponsor resolution |
//! | [`view`]         | Account refresh |
//! | [`stakes`]       | Stake enumeration and status |
//! | [`countdown`]    | Periodic remaining-time rendering |
//! | [`actions`]      | Approve, buy and claim handlers |
//! | [`wallet_watch`] | Account and chain change detection |
//! | [`controller`]   | The [`Dapp`] controller |

pub mod actions;
pub mod clock;
pub mod contracts;
pub mod controller;
pub mod countdown;
pub mod error;
pub mod packages;
pub mod presenter;
pub mod referral;
pub mod session;
pub mod stakes;
#[cfg(feature = "dev-context-only-utils")]
pub mod test_utils;
pub mod view;
pub mod wallet_watch;

#[cfg(test)]
mod tests;

pub use {
    clock::{Clock, SystemClock},
    controller::Dapp,
    error::{ClientError, ErrorKind},
    presenter::{Control, Notice, Presenter, ReferralFormView},
    referral::{Clipboard, CopyOutcome, Side, SponsorDecision, SponsorSource},
    session::Session,
    wallet_watch::{WalletEvent, WalletWatcher},
};

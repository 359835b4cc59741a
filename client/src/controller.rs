use {
    crate::{
        actions::{self, Transactor},
        clock::Clock,
        countdown::{Countdown, CountdownHandle},
        error::{ClientError, ErrorKind},
        packages,
        presenter::{Control, Notice, Presenter, ReferralFormView},
        referral::{
            copy_text, Clipboard, CopyOutcome, ReferralForm, ReferralLinks, Side, SponsorDecision,
        },
        session::{self, Session},
        view::{self, Refresh},
        wallet_watch::WalletEvent,
    },
    log::info,
    stcex_cli_config::Config,
    stcex_cli_output::{DashboardView, PackageList, TransactionView},
    stcex_rpc_client::WalletProvider,
    std::sync::Arc,
    url::Url,
};

/// Owns the session and drives the presenter.
///
/// Inner components never see the controller; they receive the session or
/// the contract handle they need as an argument.
pub struct Dapp {
    config: Arc<Config>,
    provider: Arc<dyn WalletProvider>,
    presenter: Arc<dyn Presenter>,
    clock: Arc<dyn Clock>,
    links: ReferralLinks,
    page: Option<Url>,
    session: Option<Session>,
    form: ReferralForm,
    packages: Option<PackageList>,
    last_refresh: Option<Refresh>,
    countdown: Option<CountdownHandle>,
}

impl Dapp {
    pub fn new(
        config: Arc<Config>,
        provider: Arc<dyn WalletProvider>,
        presenter: Arc<dyn Presenter>,
        clock: Arc<dyn Clock>,
        page: Option<Url>,
    ) -> Self {
        Self {
            links: ReferralLinks::from_config(&config),
            config,
            provider,
            presenter,
            clock,
            page,
            session: None,
            form: ReferralForm::default(),
            packages: None,
            last_refresh: None,
            countdown: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn form(&self) -> &ReferralForm {
        &self.form
    }

    pub fn packages(&self) -> Option<&PackageList> {
        self.packages.as_ref()
    }

    pub fn last_refresh(&self) -> Option<&Refresh> {
        self.last_refresh.as_ref()
    }

    pub fn is_counting_down(&self) -> bool {
        self.countdown.is_some()
    }

    fn report(&self, err: &ClientError) {
        let message = match err {
            ClientError::WrongNetwork { .. } => format!(
                "Wrong network: switch the wallet to {} (chainId {})",
                self.config.chain_name, self.config.chain_id
            ),
            err => err.to_string(),
        };
        self.presenter.notify(Notice::error(message));
    }

    /// Drops the session and everything derived from it.
    pub fn disconnect(&mut self) {
        self.session = None;
        self.packages = None;
        self.last_refresh = None;
        self.countdown = None;
        self.form = ReferralForm::default();
        self.presenter.set_enabled(Control::Connect, true);
    }

    /// Connects, then performs the initial load of packages, account and
    /// stakes. On failure the client is left disconnected.
    pub async fn connect(&mut self) -> Result<(), ClientError> {
        self.disconnect();
        let session = match session::connect(self.provider.clone(), &self.config).await {
            Ok(session) => session,
            Err(err) => {
                self.report(&err);
                return Err(err);
            }
        };
        self.presenter.show_session(&session.view(&self.config));
        self.presenter.set_enabled(Control::Connect, false);

        let params = self
            .page
            .as_ref()
            .map(|page| self.links.read(page))
            .unwrap_or_default();
        self.form = ReferralForm::new(&self.config, &params, session.account);
        self.session = Some(session);
        self.show_form();

        if let Err(err) = self.load_packages().await {
            self.report(&err);
        }
        self.refresh().await?;
        self.presenter.notify(Notice::info("Connected"));
        Ok(())
    }

    /// Account or chain switch: discard the session and connect again.
    pub async fn reload(&mut self) -> Result<(), ClientError> {
        info!("reloading session");
        self.connect().await
    }

    pub async fn handle_wallet_event(&mut self, event: WalletEvent) -> Result<(), ClientError> {
        info!("wallet event: {event:?}");
        self.reload().await
    }

    fn connected(&self) -> Result<&Session, ClientError> {
        self.session.as_ref().ok_or(ClientError::NotConnected)
    }

    fn show_form(&self) {
        let view = ReferralFormView {
            sponsor: self.form.sponsor_input().to_string(),
            sponsor_locked: self.form.sponsor_locked(),
            side: self.form.side().to_string(),
            side_locked: self.form.side_locked(),
        };
        self.presenter.show_referral_form(&view);
        self.presenter
            .set_enabled(Control::SponsorField, !view.sponsor_locked);
        self.presenter.set_enabled(Control::SideField, !view.side_locked);
    }

    pub fn set_sponsor_input(&mut self, input: &str) -> bool {
        let changed = self.form.set_sponsor_input(input);
        self.show_form();
        changed
    }

    pub fn set_side(&mut self, side: Side) -> bool {
        let changed = self.form.set_side(side);
        self.show_form();
        changed
    }

    /// Reloads the package list, keeping the selection if still active.
    pub async fn load_packages(&mut self) -> Result<PackageList, ClientError> {
        let session = self.connected()?;
        let selected = self.packages.as_ref().and_then(|p| p.selected);
        let list = packages::load_packages(&session.core, selected).await?;
        self.presenter.show_packages(&list);
        if list.packages.is_empty() {
            self.presenter
                .notify(Notice::error(ClientError::NoActivePackages.to_string()));
        }
        for control in [Control::Approve, Control::Buy] {
            self.presenter
                .set_enabled(control, list.selected.is_some());
        }
        self.packages = Some(list.clone());
        Ok(list)
    }

    /// Selects `id` and previews its freshly read price.
    pub async fn select_package(&mut self, id: u64) -> Result<String, ClientError> {
        let session = self.connected()?;
        let price = match packages::package_price(&session.core, id).await {
            Ok(price) => price,
            Err(err) => {
                self.report(&err);
                return Err(err);
            }
        };
        let list = self.packages.get_or_insert_with(PackageList::default);
        list.selected = Some(id);
        list.selected_price = Some(price.clone());
        self.presenter.show_packages(list);
        Ok(price)
    }

    fn selected_package(&self, package: Option<u64>) -> Result<u64, ClientError> {
        package
            .or_else(|| self.packages.as_ref().and_then(|p| p.selected))
            .ok_or(ClientError::NoActivePackages)
    }

    /// Full re-derivation of the account view and stake list. Restarts the
    /// countdown over the new stake set.
    pub async fn refresh(&mut self) -> Result<Refresh, ClientError> {
        let session = self.connected()?;
        let refresh = view::refresh_all(
            session,
            self.clock.as_ref(),
            self.page.as_ref(),
            &self.links,
        )
        .await;

        self.presenter.show_account(&refresh.account);
        for control in [Control::ClaimReferral, Control::ClaimMatching, Control::ClaimAll] {
            self.presenter
                .set_enabled(control, refresh.can_share_referral());
        }
        self.presenter.show_stakes(&refresh.stakes.list);
        for row in &refresh.stakes.list.stakes {
            self.presenter
                .set_enabled(Control::ClaimStake(row.index), row.claim_enabled);
        }

        self.countdown = None;
        let countdown = Countdown::new(refresh.stakes.countdown.iter().copied(), self.clock.clone());
        self.countdown =
            Some(countdown.spawn(self.presenter.clone(), self.config.countdown_interval()));

        self.last_refresh = Some(refresh.clone());
        Ok(refresh)
    }

    pub fn dashboard(&self) -> Option<DashboardView> {
        let session = self.session.as_ref()?;
        let refresh = self.last_refresh.as_ref()?;
        Some(DashboardView {
            session: session.view(&self.config),
            account: refresh.account.clone(),
            stakes: refresh.stakes.list.clone(),
        })
    }

    /// Checks the connection and network before a write.
    async fn ready(&self) -> Result<&Session, ClientError> {
        let session = self.connected()?;
        session::ensure_network(self.provider.as_ref(), &self.config).await?;
        Ok(session)
    }

    fn transactor(&self) -> Transactor<'_> {
        Transactor {
            provider: self.provider.as_ref(),
            config: &self.config,
            presenter: self.presenter.as_ref(),
        }
    }

    /// Reports a failed action, or refreshes after a successful one.
    async fn finish<T>(&mut self, action: &str, result: Result<T, ClientError>) -> Result<T, ClientError> {
        match result {
            Ok(value) => {
                self.refresh().await?;
                Ok(value)
            }
            Err(err) => {
                let message = match err.kind() {
                    ErrorKind::Precondition => err.to_string(),
                    _ => format!("{action} failed: {err}"),
                };
                self.presenter.notify(Notice::error(message));
                Err(err)
            }
        }
    }

    pub async fn approve(&mut self, package: Option<u64>) -> Result<TransactionView, ClientError> {
        let result = async {
            self.connected()?;
            let id = self.selected_package(package)?;
            let session = self.ready().await?;
            actions::approve(session, &self.transactor(), id).await
        }
        .await;
        self.finish("Approve", result).await
    }

    pub async fn buy(
        &mut self,
        package: Option<u64>,
    ) -> Result<(TransactionView, SponsorDecision), ClientError> {
        let result = async {
            self.connected()?;
            let id = self.selected_package(package)?;
            let session = self.ready().await?;
            actions::buy(session, &self.transactor(), &self.form, id).await
        }
        .await;
        self.finish("Buy", result).await
    }

    pub async fn claim_referral(&mut self) -> Result<TransactionView, ClientError> {
        let result = async {
            let session = self.ready().await?;
            actions::claim_referral(session, &self.transactor()).await
        }
        .await;
        self.finish("Claim Referral", result).await
    }

    pub async fn claim_matching(&mut self) -> Result<TransactionView, ClientError> {
        let result = async {
            let session = self.ready().await?;
            actions::claim_matching(session, &self.transactor()).await
        }
        .await;
        self.finish("Claim Matching", result).await
    }

    pub async fn claim_all(&mut self) -> Result<TransactionView, ClientError> {
        let result = async {
            let session = self.ready().await?;
            actions::claim_all(session, &self.transactor()).await
        }
        .await;
        self.finish("Claim All", result).await
    }

    /// Claims by contract-assigned stake index, never by list position.
    pub async fn claim_stake(&mut self, index: u64) -> Result<TransactionView, ClientError> {
        let result = async {
            let session = self.ready().await?;
            actions::claim_stake(session, &self.transactor(), self.clock.as_ref(), index).await
        }
        .await;
        self.finish("Claim Stake", result).await
    }

    /// Shareable left and right links, once the account may share them.
    pub fn referral_links(&self) -> Result<(String, String), ClientError> {
        self.connected()?;
        self.last_refresh
            .as_ref()
            .and_then(|r| r.account.referral_links.as_ref())
            .map(|links| (links.left.clone(), links.right.clone()))
            .ok_or(ClientError::ReferralUnavailable)
    }

    pub fn copy_referral_link(
        &self,
        side: Side,
        clipboard: &dyn Clipboard,
    ) -> Result<CopyOutcome, ClientError> {
        let (left, right) = self.referral_links()?;
        let link = match side {
            Side::Left => left,
            Side::Right => right,
        };
        let outcome = copy_text(clipboard, &link);
        let notice = match &outcome {
            CopyOutcome::Copied => Notice::info("Copied"),
            CopyOutcome::Manual(text) => {
                Notice::error(format!("Clipboard unavailable; select and copy: {text}"))
            }
        };
        self.presenter.notify(notice);
        Ok(outcome)
    }
}

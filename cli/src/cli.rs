use {
    crate::{
        claim::{parse_claim_command, process_claim_command, ClaimCliCommand},
        config_command::{parse_config_command, process_config_command, ConfigCliCommand},
        console_presenter::ConsolePresenter,
        purchase::{parse_purchase_command, process_purchase_command, PurchaseCliCommand},
        query::{parse_packages_command, process_query_command, QueryCliCommand},
        referral_link::{parse_referral_link_command, process_referral_link_command},
        watch::process_watch_command,
    },
    clap::ArgMatches,
    stcex_cli_config::Config,
    stcex_cli_output::OutputFormat,
    stcex_client::{ClientError, Dapp, Side, SystemClock},
    stcex_rpc_client::HttpProvider,
    std::{error, sync::Arc},
    thiserror::Error,
    url::Url,
};

pub type ProcessResult = Result<String, Box<dyn error::Error>>;

#[derive(Debug, PartialEq)]
pub enum CliCommand {
    Query(QueryCliCommand),
    Purchase(PurchaseCliCommand),
    Claim(ClaimCliCommand),
    ReferralLink { copy: Option<Side> },
    Watch,
    Config(ConfigCliCommand),
}

#[derive(Debug, PartialEq)]
pub struct CliCommandInfo {
    pub command: CliCommand,
}

impl CliCommandInfo {
    pub fn new(command: CliCommand) -> Self {
        Self { command }
    }
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Bad parameter: {0}")]
    BadParameter(String),
    #[error("Command not recognized: {0}")]
    CommandNotRecognized(String),
}

pub struct CliConfig {
    pub command: CliCommand,
    pub config: Arc<Config>,
    pub config_path: String,
    /// Landing page that referral parameters are read from and links are
    /// built on.
    pub page: Option<Url>,
    pub output_format: OutputFormat,
    pub verbose: bool,
}

impl CliConfig {
    /// A controller bound to the configured wallet endpoint.
    pub fn dapp(&self, presenter: Arc<ConsolePresenter>) -> Dapp {
        let provider = Arc::new(HttpProvider::new(&self.config.wallet_url));
        Dapp::new(
            self.config.clone(),
            provider,
            presenter,
            Arc::new(SystemClock),
            self.page.clone(),
        )
    }

    /// Connects and performs the initial load. Notices go to stderr.
    pub async fn connect(&self) -> Result<Dapp, ClientError> {
        let mut dapp = self.dapp(Arc::new(ConsolePresenter::new(self.output_format)));
        dapp.connect().await?;
        Ok(dapp)
    }
}

pub fn parse_command(matches: &ArgMatches<'_>) -> Result<CliCommandInfo, CliError> {
    let command = match matches.subcommand() {
        ("status", Some(_)) => CliCommand::Query(QueryCliCommand::Status),
        ("packages", Some(matches)) => CliCommand::Query(parse_packages_command(matches)?),
        ("stakes", Some(_)) => CliCommand::Query(QueryCliCommand::Stakes),
        (name @ ("approve" | "buy"), Some(matches)) => {
            CliCommand::Purchase(parse_purchase_command(name, matches)?)
        }
        (name @ ("claim-referral" | "claim-matching" | "claim-all" | "claim-stake"), Some(matches)) => {
            CliCommand::Claim(parse_claim_command(name, matches)?)
        }
        ("referral-link", Some(matches)) => parse_referral_link_command(matches)?,
        ("watch", Some(_)) => CliCommand::Watch,
        ("config", Some(matches)) => CliCommand::Config(parse_config_command(matches)?),
        (name, _) => return Err(CliError::CommandNotRecognized(name.to_string())),
    };
    Ok(CliCommandInfo::new(command))
}

pub async fn process_command(config: &CliConfig) -> ProcessResult {
    log::debug!("processing {:?}", config.command);
    match &config.command {
        CliCommand::Query(command) => process_query_command(config, command).await,
        CliCommand::Purchase(command) => process_purchase_command(config, command).await,
        CliCommand::Claim(command) => process_claim_command(config, command).await,
        CliCommand::ReferralLink { copy } => process_referral_link_command(config, *copy).await,
        CliCommand::Watch => process_watch_command(config).await,
        CliCommand::Config(command) => process_config_command(config, command),
    }
}

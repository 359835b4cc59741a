use {
    crate::{
        clap_app::is_parsable_u64,
        cli::{CliConfig, CliError, ProcessResult},
    },
    clap::{App, AppSettings, Arg, ArgMatches, SubCommand},
};

// ── CLI Command Enum Variants ───────────────────────────────────────
#[derive(Debug, PartialEq)]
pub enum ClaimCliCommand {
    Referral,
    Matching,
    All,
    /// By the contract-assigned stake index shown in `stakes`.
    Stake { index: u64 },
}

// ── Subcommand Definition (clap) ────────────────────────────────────
pub trait ClaimSubCommands {
    fn claim_subcommands(self) -> Self;
}

impl ClaimSubCommands for App<'_, '_> {
    fn claim_subcommands(self) -> Self {
        self.subcommand(
            SubCommand::with_name("claim-referral")
                .about("Claim the whole accrued referral reward"),
        )
        .subcommand(
            SubCommand::with_name("claim-matching")
                .about("Claim the whole accrued matching reward"),
        )
        .subcommand(
            SubCommand::with_name("claim-all")
                .about("Claim accrued referral and matching rewards together"),
        )
        .subcommand(
            SubCommand::with_name("claim-stake")
                .about("Claim a matured stake")
                .setting(AppSettings::ArgRequiredElseHelp)
                .arg(
                    Arg::with_name("index")
                        .index(1)
                        .value_name("INDEX")
                        .takes_value(true)
                        .required(true)
                        .validator(is_parsable_u64)
                        .help("Stake index as listed by `stcex stakes`"),
                ),
        )
    }
}

// ── Argument Parsing ────────────────────────────────────────────────
pub fn parse_claim_command(
    name: &str,
    matches: &ArgMatches<'_>,
) -> Result<ClaimCliCommand, CliError> {
    match name {
        "claim-referral" => Ok(ClaimCliCommand::Referral),
        "claim-matching" => Ok(ClaimCliCommand::Matching),
        "claim-all" => Ok(ClaimCliCommand::All),
        "claim-stake" => {
            let index = matches
                .value_of("index")
                .ok_or_else(|| CliError::BadParameter("missing stake index".to_string()))?;
            let index = index
                .parse()
                .map_err(|_| CliError::BadParameter(format!("invalid stake index {index}")))?;
            Ok(ClaimCliCommand::Stake { index })
        }
        other => Err(CliError::CommandNotRecognized(other.to_string())),
    }
}

// ── Command Processing ──────────────────────────────────────────────
pub async fn process_claim_command(config: &CliConfig, command: &ClaimCliCommand) -> ProcessResult {
    let mut dapp = config.connect().await?;
    let transaction = match command {
        ClaimCliCommand::Referral => dapp.claim_referral().await?,
        ClaimCliCommand::Matching => dapp.claim_matching().await?,
        ClaimCliCommand::All => dapp.claim_all().await?,
        ClaimCliCommand::Stake { index } => dapp.claim_stake(*index).await?,
    };
    Ok(config.output_format.formatted_string(&transaction))
}

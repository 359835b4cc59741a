use {
    crate::{
        clap_app::{is_parsable_u64, is_valid_address, is_valid_side},
        cli::{CliConfig, CliError, ProcessResult},
    },
    clap::{App, Arg, ArgMatches, SubCommand},
    log::warn,
    serde::Serialize,
    stcex_cli_output::TransactionView,
    stcex_client::{Side, SponsorDecision},
    std::fmt,
};

// ── CLI Command Enum Variants ───────────────────────────────────────
#[derive(Debug, PartialEq)]
pub enum PurchaseCliCommand {
    Approve {
        package: Option<u64>,
    },
    Buy {
        package: Option<u64>,
        sponsor: Option<String>,
        side: Option<Side>,
    },
}

// ── Output Structs ──────────────────────────────────────────────────
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliPurchase {
    pub transaction: TransactionView,
    pub sponsor: SponsorDecision,
}

impl fmt::Display for CliPurchase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.transaction)?;
        writeln!(f, "  Sponsor:  {} ({:?})", self.sponsor.sponsor, self.sponsor.source)?;
        if self.sponsor.self_referral_blocked {
            writeln!(f, "  Self-referral replaced by the zero address")?;
        }
        for note in &self.sponsor.notes {
            writeln!(f, "  - {note}")?;
        }
        Ok(())
    }
}

// ── Subcommand Definition (clap) ────────────────────────────────────
pub trait PurchaseSubCommands {
    fn purchase_subcommands(self) -> Self;
}

fn package_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("package")
        .long("package")
        .value_name("PACKAGE_ID")
        .takes_value(true)
        .validator(is_parsable_u64)
        .help("Package to act on [default: the first active package]")
}

impl PurchaseSubCommands for App<'_, '_> {
    fn purchase_subcommands(self) -> Self {
        self.subcommand(
            SubCommand::with_name("approve")
                .about("Approve the core contract to spend exactly the package price")
                .arg(package_arg()),
        )
        .subcommand(
            SubCommand::with_name("buy")
                .about("Buy a package")
                .arg(package_arg())
                .arg(
                    Arg::with_name("sponsor")
                        .long("sponsor")
                        .value_name("ADDRESS")
                        .takes_value(true)
                        .validator(is_valid_address)
                        .help(
                            "Sponsor address. Ignored when the landing URL carries a \
                             referral link",
                        ),
                )
                .arg(
                    Arg::with_name("side")
                        .long("side")
                        .value_name("SIDE")
                        .takes_value(true)
                        .validator(is_valid_side)
                        .help("Placement side: left/right, L/R or 0/1 [default: left]"),
                ),
        )
    }
}

// ── Argument Parsing ────────────────────────────────────────────────
fn package_of(matches: &ArgMatches<'_>) -> Result<Option<u64>, CliError> {
    matches
        .value_of("package")
        .map(|id| {
            id.parse()
                .map_err(|_| CliError::BadParameter(format!("invalid package id {id}")))
        })
        .transpose()
}

pub fn parse_purchase_command(
    name: &str,
    matches: &ArgMatches<'_>,
) -> Result<PurchaseCliCommand, CliError> {
    let package = package_of(matches)?;
    match name {
        "approve" => Ok(PurchaseCliCommand::Approve { package }),
        "buy" => {
            let side = matches
                .value_of("side")
                .map(|side| side.parse().map_err(CliError::BadParameter))
                .transpose()?;
            Ok(PurchaseCliCommand::Buy {
                package,
                sponsor: matches.value_of("sponsor").map(str::to_string),
                side,
            })
        }
        other => Err(CliError::CommandNotRecognized(other.to_string())),
    }
}

// ── Command Processing ──────────────────────────────────────────────
pub async fn process_purchase_command(
    config: &CliConfig,
    command: &PurchaseCliCommand,
) -> ProcessResult {
    let mut dapp = config.connect().await?;
    match command {
        PurchaseCliCommand::Approve { package } => {
            let transaction = dapp.approve(*package).await?;
            Ok(config.output_format.formatted_string(&transaction))
        }
        PurchaseCliCommand::Buy {
            package,
            sponsor,
            side,
        } => {
            if let Some(sponsor) = sponsor {
                if !dapp.set_sponsor_input(sponsor) {
                    warn!("--sponsor ignored: the referral link sets the sponsor");
                }
            }
            if let Some(side) = side {
                if !dapp.set_side(*side) {
                    warn!("--side ignored: the referral link sets the side");
                }
            }
            let (transaction, sponsor) = dapp.buy(*package).await?;
            Ok(config.output_format.formatted_string(&CliPurchase {
                transaction,
                sponsor,
            }))
        }
    }
}

use {
    crate::{
        clap_app::is_valid_side,
        cli::{CliCommand, CliConfig, CliError, ProcessResult},
        clipboard::SystemClipboard,
    },
    clap::{App, Arg, ArgMatches, SubCommand},
    serde::Serialize,
    stcex_client::{CopyOutcome, Side},
    std::fmt,
};

// ── Output Structs ──────────────────────────────────────────────────
#[derive(Serialize, Debug)]
pub struct CliReferralLinks {
    pub left: String,
    pub right: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copied: Option<Side>,
}

impl fmt::Display for CliReferralLinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Left:  {}", self.left)?;
        writeln!(f, "Right: {}", self.right)?;
        if let Some(side) = self.copied {
            writeln!(f, "The {side} link was copied to the clipboard")?;
        }
        Ok(())
    }
}

// ── Subcommand Definition (clap) ────────────────────────────────────
pub trait ReferralLinkSubCommands {
    fn referral_link_subcommands(self) -> Self;
}

impl ReferralLinkSubCommands for App<'_, '_> {
    fn referral_link_subcommands(self) -> Self {
        self.subcommand(
            SubCommand::with_name("referral-link")
                .about("Show the shareable left and right referral links")
                .arg(
                    Arg::with_name("copy")
                        .long("copy")
                        .value_name("SIDE")
                        .takes_value(true)
                        .validator(is_valid_side)
                        .help("Also copy the link of this side to the clipboard"),
                ),
        )
    }
}

// ── Argument Parsing ────────────────────────────────────────────────
pub fn parse_referral_link_command(matches: &ArgMatches<'_>) -> Result<CliCommand, CliError> {
    let copy = matches
        .value_of("copy")
        .map(|side| side.parse().map_err(CliError::BadParameter))
        .transpose()?;
    Ok(CliCommand::ReferralLink { copy })
}

// ── Command Processing ──────────────────────────────────────────────
pub async fn process_referral_link_command(config: &CliConfig, copy: Option<Side>) -> ProcessResult {
    let dapp = config.connect().await?;
    let (left, right) = dapp.referral_links().map_err(|err| err.to_string())?;
    let copied = match copy {
        Some(side) => match dapp.copy_referral_link(side, &SystemClipboard)? {
            CopyOutcome::Copied => Some(side),
            CopyOutcome::Manual(_) => None,
        },
        None => None,
    };
    Ok(config
        .output_format
        .formatted_string(&CliReferralLinks { left, right, copied }))
}

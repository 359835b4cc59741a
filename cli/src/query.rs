use {
    crate::{
        clap_app::is_parsable_u64,
        cli::{CliConfig, CliError, ProcessResult},
    },
    clap::{App, Arg, ArgMatches, SubCommand},
    stcex_client::ClientError,
};

// ── CLI Command Enum Variants ───────────────────────────────────────
#[derive(Debug, PartialEq)]
pub enum QueryCliCommand {
    /// Session header, account view and stake list.
    Status,
    Packages {
        select: Option<u64>,
    },
    Stakes,
}

// ── Subcommand Definition (clap) ────────────────────────────────────
pub trait QuerySubCommands {
    fn query_subcommands(self) -> Self;
}

impl QuerySubCommands for App<'_, '_> {
    fn query_subcommands(self) -> Self {
        self.subcommand(
            SubCommand::with_name("status")
                .about("Show the connected account, balances, earnings and stakes"),
        )
        .subcommand(
            SubCommand::with_name("packages")
                .about("List the active packages")
                .arg(
                    Arg::with_name("select")
                        .long("select")
                        .value_name("PACKAGE_ID")
                        .takes_value(true)
                        .validator(is_parsable_u64)
                        .help("Select a package and preview its current price"),
                ),
        )
        .subcommand(
            SubCommand::with_name("stakes")
                .about("List stakes with their status and remaining lock time"),
        )
    }
}

// ── Argument Parsing ────────────────────────────────────────────────
pub fn parse_packages_command(matches: &ArgMatches<'_>) -> Result<QueryCliCommand, CliError> {
    let select = matches
        .value_of("select")
        .map(|id| {
            id.parse()
                .map_err(|_| CliError::BadParameter(format!("invalid package id {id}")))
        })
        .transpose()?;
    Ok(QueryCliCommand::Packages { select })
}

// ── Command Processing ──────────────────────────────────────────────
pub async fn process_query_command(config: &CliConfig, command: &QueryCliCommand) -> ProcessResult {
    let mut dapp = config.connect().await?;
    let output = match command {
        QueryCliCommand::Status => {
            let dashboard = dapp.dashboard().ok_or(ClientError::NotConnected)?;
            config.output_format.formatted_string(&dashboard)
        }
        QueryCliCommand::Packages { select } => {
            if let Some(id) = select {
                dapp.select_package(*id).await?;
            }
            let packages = dapp.packages().cloned().unwrap_or_default();
            config.output_format.formatted_string(&packages)
        }
        QueryCliCommand::Stakes => {
            let stakes = dapp
                .last_refresh()
                .map(|refresh| refresh.stakes.list.clone())
                .unwrap_or_default();
            config.output_format.formatted_string(&stakes)
        }
    };
    Ok(output)
}

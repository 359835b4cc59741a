use {
    crate::cli::{CliConfig, CliError, ProcessResult},
    clap::{App, AppSettings, Arg, ArgMatches, SubCommand},
    serde::Serialize,
    stcex_cli_config::Config,
    std::{fmt, path::Path},
};

// ── CLI Command Enum Variants ───────────────────────────────────────
#[derive(Debug, PartialEq)]
pub enum ConfigCliCommand {
    Get,
    /// Writes the effective configuration to the config file.
    Init { force: bool },
}

// ── Output Structs ──────────────────────────────────────────────────
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliConfigView<'a> {
    pub config_file: &'a str,
    #[serde(flatten)]
    pub config: &'a Config,
}

impl fmt::Display for CliConfigView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.config;
        let contracts = &config.contracts;
        writeln!(f, "Config File: {}", self.config_file)?;
        writeln!(f, "Chain: {} (chainId {})", config.chain_name, config.chain_id)?;
        writeln!(f, "RPC URL: {}", config.rpc_url)?;
        writeln!(f, "Explorer: {}", config.block_explorer)?;
        writeln!(f, "Wallet URL: {}", config.wallet_url)?;
        writeln!(f, "dApp URL: {}", config.dapp_url)?;
        writeln!(f, "Token: {}", contracts.token)?;
        writeln!(f, "Core: {}", contracts.core)?;
        writeln!(f, "Earnings: {}", contracts.earnings)?;
        writeln!(f, "Staking: {}", contracts.staking)?;
        writeln!(f, "Default Sponsor: {}", config.default_sponsor)?;
        writeln!(f, "Referral Keys: {}", config.ref_param_keys.join(", "))?;
        writeln!(f, "Side Key: {}", config.side_param_key)?;
        Ok(())
    }
}

// ── Subcommand Definition (clap) ────────────────────────────────────
pub trait ConfigSubCommands {
    fn config_subcommands(self) -> Self;
}

impl ConfigSubCommands for App<'_, '_> {
    fn config_subcommands(self) -> Self {
        self.subcommand(
            SubCommand::with_name("config")
                .about("STCEx command-line tool configuration settings")
                .setting(AppSettings::SubcommandRequiredElseHelp)
                .subcommand(SubCommand::with_name("get").about("Get current config settings"))
                .subcommand(
                    SubCommand::with_name("init")
                        .about("Write the current settings to the config file")
                        .arg(
                            Arg::with_name("force")
                                .long("force")
                                .takes_value(false)
                                .help("Overwrite an existing config file"),
                        ),
                ),
        )
    }
}

// ── Argument Parsing ────────────────────────────────────────────────
pub fn parse_config_command(matches: &ArgMatches<'_>) -> Result<ConfigCliCommand, CliError> {
    match matches.subcommand() {
        ("get", Some(_)) => Ok(ConfigCliCommand::Get),
        ("init", Some(matches)) => Ok(ConfigCliCommand::Init {
            force: matches.is_present("force"),
        }),
        (name, _) => Err(CliError::CommandNotRecognized(format!("config {name}"))),
    }
}

// ── Command Processing ──────────────────────────────────────────────
pub fn process_config_command(config: &CliConfig, command: &ConfigCliCommand) -> ProcessResult {
    let view = CliConfigView {
        config_file: &config.config_path,
        config: &config.config,
    };
    match command {
        ConfigCliCommand::Get => Ok(config.output_format.formatted_string(&view)),
        ConfigCliCommand::Init { force } => {
            if Path::new(&config.config_path).exists() && !force {
                return Err(CliError::BadParameter(format!(
                    "{} already exists; pass --force to overwrite it",
                    config.config_path
                ))
                .into());
            }
            config.config.save(&config.config_path)?;
            Ok(format!("Wrote {}", config.config_path))
        }
    }
}

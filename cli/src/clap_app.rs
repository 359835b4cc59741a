use {
    crate::{
        claim::ClaimSubCommands, config_command::ConfigSubCommands, purchase::PurchaseSubCommands,
        query::QuerySubCommands, referral_link::ReferralLinkSubCommands, watch::WatchSubCommands,
    },
    clap::{App, AppSettings, Arg},
    stcex_abi::Address,
    stcex_client::Side,
};

pub fn is_valid_address(string: String) -> Result<(), String> {
    string
        .parse::<Address>()
        .map(|_| ())
        .map_err(|err| err.to_string())
}

pub fn is_valid_side(string: String) -> Result<(), String> {
    string.parse::<Side>().map(|_| ())
}

pub fn is_parsable_u64(string: String) -> Result<(), String> {
    string
        .parse::<u64>()
        .map(|_| ())
        .map_err(|err| format!("Unable to parse '{string}': {err}"))
}

pub fn get_clap_app<'ab, 'v>(name: &str, about: &'ab str, version: &'v str) -> App<'ab, 'v> {
    App::new(name)
        .about(about)
        .version(version)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config_file")
                .short("C")
                .long("config")
                .value_name("FILEPATH")
                .takes_value(true)
                .global(true)
                .help("Configuration file to use [default: ~/.config/stcex/cli/config.yml]"),
        )
        .arg(
            Arg::with_name("page_url")
                .long("url")
                .value_name("URL")
                .takes_value(true)
                .global(true)
                .help(
                    "Landing page carrying referral parameters, e.g. \
                     https://stcex.io/?ref=0x...&side=0 [default: dapp_url from the config]",
                ),
        )
        .arg(
            Arg::with_name("wallet_url")
                .long("wallet-url")
                .value_name("URL")
                .takes_value(true)
                .global(true)
                .help("JSON-RPC endpoint of the signing wallet"),
        )
        .arg(
            Arg::with_name("output_format")
                .long("output")
                .value_name("FORMAT")
                .takes_value(true)
                .global(true)
                .possible_values(&["display", "json", "json-compact"])
                .help("Return information in specified output format"),
        )
        .arg(
            Arg::with_name("log_file")
                .long("log")
                .value_name("FILEPATH")
                .takes_value(true)
                .global(true)
                .help("Append log output to this file instead of stderr"),
        )
        .arg(
            Arg::with_name("verbose")
                .long("verbose")
                .short("v")
                .global(true)
                .help("Show additional information"),
        )
        .query_subcommands()
        .purchase_subcommands()
        .claim_subcommands()
        .referral_link_subcommands()
        .watch_subcommands()
        .config_subcommands()
}

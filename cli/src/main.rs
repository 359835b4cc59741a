use {
    clap::{crate_description, crate_name, crate_version, ArgMatches},
    log::error,
    stcex_cli::{
        clap_app::get_clap_app,
        cli::{parse_command, process_command, CliCommand, CliConfig},
        config_command::ConfigCliCommand,
    },
    stcex_cli_config::{Config, CONFIG_FILE},
    stcex_cli_output::OutputFormat,
    stcex_client::ClientError,
    std::{error, path::Path, process::exit, sync::Arc},
    url::Url,
};

fn setup_logging(matches: &ArgMatches<'_>) -> Result<(), Box<dyn error::Error>> {
    let filter = if matches.is_present("verbose") {
        "debug"
    } else {
        "warn"
    };
    match matches.value_of("log_file") {
        Some(log_file) => stcex_logger::setup_file_with_default(Path::new(log_file), filter)?,
        None => stcex_logger::setup_with_default(filter),
    }
    Ok(())
}

fn load_config(matches: &ArgMatches<'_>) -> (String, Config) {
    let config_path = matches
        .value_of("config_file")
        .map(str::to_string)
        .or_else(|| CONFIG_FILE.clone())
        .unwrap_or_else(|| "config.yml".to_string());
    let config = if Path::new(&config_path).exists() {
        Config::load(&config_path).unwrap_or_else(|err| {
            eprintln!("Failed to load {config_path}: {err}; using defaults");
            Config::default()
        })
    } else {
        Config::default()
    };
    (config_path, config)
}

fn parse_args(matches: &ArgMatches<'_>) -> Result<CliConfig, Box<dyn error::Error>> {
    let (config_path, mut config) = load_config(matches);
    if let Some(wallet_url) = matches.value_of("wallet_url") {
        config.wallet_url = wallet_url.to_string();
    }

    let page = match matches.value_of("page_url") {
        Some(url) => Some(config.page_url(Some(url))?),
        None if config.dapp_url.is_empty() => None,
        None => Some(config.page_url(None)?),
    };
    let output_format = matches
        .value_of("output_format")
        .and_then(OutputFormat::from_name)
        .unwrap_or(OutputFormat::Display);

    let command = parse_command(matches)?.command;
    Ok(CliConfig {
        command,
        config: Arc::new(config),
        config_path,
        page,
        output_format,
        verbose: matches.is_present("verbose"),
    })
}

async fn do_main(matches: &ArgMatches<'_>) -> Result<(), Box<dyn error::Error>> {
    setup_logging(matches)?;
    let config = parse_args(matches)?;
    if config.verbose && !matches!(config.command, CliCommand::Config(ConfigCliCommand::Get)) {
        eprintln!("Wallet URL: {}", config.config.wallet_url);
        if let Some(page) = config.page.as_ref().map(Url::as_str) {
            eprintln!("Landing page: {page}");
        }
    }
    let result = process_command(&config).await?;
    if !result.is_empty() {
        println!("{result}");
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let matches = get_clap_app(crate_name!(), crate_description!(), crate_version!()).get_matches();
    if let Err(err) = do_main(&matches).await {
        // Client errors were already shown as notices.
        if err.downcast_ref::<ClientError>().is_none() {
            eprintln!("Error: {err}");
        }
        error!("{err}");
        exit(1);
    }
}

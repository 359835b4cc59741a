use {
    crate::{
        cli::{CliConfig, ProcessResult},
        console_presenter::ConsolePresenter,
    },
    clap::{App, SubCommand},
    log::{info, warn},
    stcex_client::WalletWatcher,
    stcex_rpc_client::HttpProvider,
    std::{sync::Arc, time::Duration},
};

/// How often the wallet is asked for its accounts and chain.
const WALLET_POLL_INTERVAL: Duration = Duration::from_secs(2);

// ── Subcommand Definition (clap) ────────────────────────────────────
pub trait WatchSubCommands {
    fn watch_subcommands(self) -> Self;
}

impl WatchSubCommands for App<'_, '_> {
    fn watch_subcommands(self) -> Self {
        self.subcommand(
            SubCommand::with_name("watch")
                .about("Show the dashboard with live stake countdowns; reconnect on wallet changes"),
        )
    }
}

// ── Command Processing ──────────────────────────────────────────────
pub async fn process_watch_command(config: &CliConfig) -> ProcessResult {
    let presenter = Arc::new(ConsolePresenter::live(config.output_format));
    let mut dapp = config.dapp(presenter);
    dapp.connect().await?;

    let provider = Arc::new(HttpProvider::new(&config.config.wallet_url));
    let mut watcher = WalletWatcher::new(provider, WALLET_POLL_INTERVAL)
        .await
        .map_err(|err| err.to_string())?;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
            event = watcher.next_event() => {
                if let Err(err) = dapp.handle_wallet_event(event).await {
                    warn!("reconnect failed: {err}");
                }
            }
        }
    }
    dapp.disconnect();
    Ok(String::new())
}

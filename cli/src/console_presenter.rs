use {
    console::{style, Term},
    log::{debug, info},
    parking_lot::Mutex,
    stcex_cli_output::{
        AccountView, OutputFormat, PackageList, SessionView, StakeList, TransactionView,
    },
    stcex_client::{Control, Notice, Presenter, ReferralFormView},
    std::collections::BTreeMap,
};

#[derive(Default)]
struct CountdownRows {
    rows: BTreeMap<u64, String>,
    drawn: usize,
}

/// Writes notices to stderr. In live mode every view and the countdown are
/// printed as they change; otherwise the command prints its own result.
pub struct ConsolePresenter {
    term: Term,
    live: bool,
    output_format: OutputFormat,
    countdown: Mutex<CountdownRows>,
}

impl ConsolePresenter {
    pub fn new(output_format: OutputFormat) -> Self {
        Self {
            term: Term::stderr(),
            live: false,
            output_format,
            countdown: Mutex::new(CountdownRows::default()),
        }
    }

    pub fn live(output_format: OutputFormat) -> Self {
        Self {
            live: true,
            ..Self::new(output_format)
        }
    }

    fn line(&self, text: &str) {
        self.countdown.lock().drawn = 0;
        if let Err(err) = self.term.write_line(text) {
            debug!("stderr unavailable: {err}");
        }
    }

    fn show<T: serde::Serialize + std::fmt::Display>(&self, item: &T) {
        if self.live {
            println!("{}", self.output_format.formatted_string(item));
            self.countdown.lock().drawn = 0;
        }
    }
}

impl Presenter for ConsolePresenter {
    fn notify(&self, notice: Notice) {
        let text = if notice.ok {
            style(notice.message).green()
        } else {
            style(notice.message).red()
        };
        self.line(&text.to_string());
    }

    fn set_enabled(&self, control: Control, enabled: bool) {
        debug!("{control:?} enabled: {enabled}");
    }

    fn show_session(&self, session: &SessionView) {
        self.show(session);
    }

    fn show_referral_form(&self, form: &ReferralFormView) {
        if form.sponsor_locked || form.side_locked {
            self.line(&format!(
                "Referral link: sponsor {} on the {} side",
                form.sponsor, form.side
            ));
        }
    }

    fn show_packages(&self, packages: &PackageList) {
        self.show(packages);
    }

    fn show_account(&self, account: &AccountView) {
        self.show(account);
    }

    fn show_stakes(&self, stakes: &StakeList) {
        self.countdown.lock().rows.clear();
        self.show(stakes);
    }

    fn show_countdown(&self, index: u64, text: &str) {
        if !self.live || self.output_format != OutputFormat::Display {
            return;
        }
        let mut countdown = self.countdown.lock();
        countdown.rows.insert(index, text.to_string());
        let redraw = if self.term.is_term() {
            self.term.clear_last_lines(countdown.drawn)
        } else {
            Ok(())
        };
        let lines: Vec<String> = if self.term.is_term() {
            countdown
                .rows
                .iter()
                .map(|(index, text)| format!("  stake #{index}: {text}"))
                .collect()
        } else {
            vec![format!("  stake #{index}: {text}")]
        };
        let written = redraw.and_then(|()| {
            lines
                .iter()
                .try_for_each(|line| self.term.write_line(line))
        });
        match written {
            Ok(()) => countdown.drawn = if self.term.is_term() { lines.len() } else { 0 },
            Err(err) => debug!("countdown redraw failed: {err}"),
        }
    }

    fn show_transaction(&self, transaction: &TransactionView) {
        info!(
            "{} in block {}: {}",
            transaction.action, transaction.block_number, transaction.explorer_url
        );
        self.line(&format!("  {}", style(&transaction.explorer_url).dim()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_ignored_outside_live_mode() {
        let presenter = ConsolePresenter::new(OutputFormat::Display);
        presenter.show_countdown(7, "0d 00:00:10");
        assert!(presenter.countdown.lock().rows.is_empty());

        let presenter = ConsolePresenter::live(OutputFormat::Display);
        presenter.show_countdown(7, "0d 00:00:10");
        presenter.show_countdown(3, "READY");
        assert_eq!(
            presenter.countdown.lock().rows.keys().copied().collect::<Vec<_>>(),
            vec![3, 7]
        );
    }
}

use {
    crate::{clock::Clock, presenter::Presenter},
    stcex_cli_output::display::format_countdown,
    std::{collections::BTreeMap, sync::Arc, time::Duration},
    tokio::{
        task::JoinHandle,
        time::{interval, MissedTickBehavior},
    },
};

/// A stake end timestamp, keyed by the authoritative stake index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownEntry {
    pub index: u64,
    pub end_ts: u64,
}

/// Remaining-time text for a fixed set of stakes.
///
/// The set is replaced as a whole on every stake reload: build a new
/// `Countdown` and drop the old [`CountdownHandle`].
pub struct Countdown {
    entries: BTreeMap<u64, u64>,
    clock: Arc<dyn Clock>,
}

impl Countdown {
    pub fn new(entries: impl IntoIterator<Item = CountdownEntry>, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.index, e.end_ts)).collect(),
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(index, text)` for every entry, against the current clock.
    pub fn tick(&self) -> Vec<(u64, String)> {
        let now = self.clock.now();
        self.entries
            .iter()
            .map(|(index, end_ts)| (*index, format_countdown(*end_ts, now)))
            .collect()
    }

    /// Renders every `period` until the returned handle is dropped.
    pub fn spawn(self, presenter: Arc<dyn Presenter>, period: Duration) -> CountdownHandle {
        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                for (index, text) in self.tick() {
                    presenter.show_countdown(index, &text);
                }
            }
        });
        CountdownHandle(task)
    }
}

/// Stops the countdown task when dropped.
#[derive(Debug)]
pub struct CountdownHandle(JoinHandle<()>);

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.0.abort();
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::test_utils::{ManualClock, RecordingPresenter},
    };

    #[test]
    fn test_tick_renders_every_entry() {
        let clock = Arc::new(ManualClock::new(1_000));
        let countdown = Countdown::new(
            [
                CountdownEntry { index: 7, end_ts: 900 },
                CountdownEntry { index: 3, end_ts: 1_061 },
            ],
            clock.clone(),
        );
        assert_eq!(
            countdown.tick(),
            vec![(3, "0d 00:01:01".to_string()), (7, "READY".to_string())]
        );
        clock.advance(61);
        assert_eq!(countdown.tick()[0].1, "READY");
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_countdown_stops_on_drop() {
        let clock = Arc::new(ManualClock::new(0));
        let presenter = Arc::new(RecordingPresenter::default());
        let handle = Countdown::new([CountdownEntry { index: 1, end_ts: 10 }], clock.clone())
            .spawn(presenter.clone(), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(presenter.countdown(1).as_deref(), Some("0d 00:00:10"));
        let ticks = presenter.countdown_updates();
        assert_eq!(ticks, 3);

        drop(handle);
        clock.advance(10);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(presenter.countdown_updates(), ticks);
    }
}
